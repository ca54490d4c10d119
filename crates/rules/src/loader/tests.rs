//! Tests for the policy loader module.

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::source::RuleSource;

const SITE_POLICY_YAML: &str = r#"
apiVersion: v1
kind: Policy
metadata:
  id: site-reader
  name: Site reader
rules:
  - action: read
    subject: Site
    conditions:
      ownerId: user1
  - action: read
    subject: Site
    conditions:
      isPublic: true
  - action: read
    subject: Site
    inverted: true
    reason: archived sites are hidden
    conditions:
      archived: true
"#;

const EDITOR_POLICY_YAML: &str = r#"
apiVersion: v1
kind: Policy
metadata:
  id: site-editor
rules:
  - action: [update, delete]
    subject: Site
    conditions:
      ownerId: user1
      category: { $in: [tech, news] }
"#;

fn temp_dir() -> TempDir {
    TempDir::new().expect("create tempdir")
}

#[test]
fn parse_policy_reads_rules_in_order() {
    let doc = parse_policy(SITE_POLICY_YAML).unwrap();
    assert_eq!(doc.metadata.id, "site-reader");
    assert_eq!(doc.metadata.name.as_deref(), Some("Site reader"));
    assert!(doc.metadata.enabled);
    assert_eq!(doc.rules.len(), 3);
    assert!(doc.rules[2].is_deny());
    assert_eq!(doc.rules[2].reason.as_deref(), Some("archived sites are hidden"));
}

#[test]
fn parse_policy_keeps_operator_objects() {
    let doc = parse_policy(EDITOR_POLICY_YAML).unwrap();
    let rule = &doc.rules[0];
    assert_eq!(rule.action, vec!["update", "delete"]);
    let conditions = rule.conditions.as_ref().unwrap();
    assert_eq!(conditions["category"], json!({ "$in": ["tech", "news"] }));
}

#[test]
fn parse_policy_rejects_wrong_kind() {
    let yaml = SITE_POLICY_YAML.replace("kind: Policy", "kind: AnomalyRule");
    let err = parse_policy(&yaml).unwrap_err();
    assert!(matches!(err, LoadError::Validation(ref msg) if msg.contains("AnomalyRule")));
}

#[test]
fn parse_policy_rejects_empty_id() {
    let yaml = SITE_POLICY_YAML.replace("id: site-reader", "id: \"\"");
    assert!(matches!(parse_policy(&yaml), Err(LoadError::Validation(_))));
}

#[test]
fn parse_policy_rejects_malformed_yaml() {
    assert!(matches!(
        parse_policy("apiVersion: v1\nkind: [unclosed"),
        Err(LoadError::Parse(_))
    ));
}

#[test]
fn load_single_file_root() {
    let dir = temp_dir();
    let path = dir.path().join("site.yml");
    fs::write(&path, SITE_POLICY_YAML).unwrap();

    let mut loader = PolicyLoader::new(&path);
    let results = loader.load_all().unwrap();

    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0].status,
        LoadStatus::Loaded { ref policy_id, rules: 3 } if policy_id == "site-reader"
    ));
    assert_eq!(loader.policy_set().len(), 3);
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let dir = temp_dir();
    fs::write(dir.path().join("site.yml"), SITE_POLICY_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), EDITOR_POLICY_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a policy").unwrap();

    let mut loader = PolicyLoader::new(dir.path());
    let results = loader.load_all().unwrap();

    let loaded = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Loaded { .. }))
        .count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(loaded, 1);
    assert_eq!(skipped, 2);
    assert_eq!(loader.documents().count(), 1);
}

#[test]
fn load_all_recurses_and_merges_in_path_order() {
    let dir = temp_dir();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(dir.path().join("b-site.yaml"), SITE_POLICY_YAML).unwrap();
    fs::write(nested.join("editor.yml"), EDITOR_POLICY_YAML).unwrap();

    let mut loader = PolicyLoader::new(dir.path());
    loader.load_all().unwrap();

    let ids: Vec<&str> = loader.documents().map(|d| d.metadata.id.as_str()).collect();
    assert_eq!(ids, vec!["site-reader", "site-editor"]);

    let set = loader.policy_set();
    assert_eq!(set.len(), 4);
    assert_eq!(set.rules_for("read", "Site").len(), 3);
    assert_eq!(set.rules_for("delete", "Site").len(), 1);
}

#[test]
fn failed_file_does_not_abort_scan() {
    let dir = temp_dir();
    fs::write(dir.path().join("a-broken.yml"), "kind: [").unwrap();
    fs::write(dir.path().join("b-site.yml"), SITE_POLICY_YAML).unwrap();

    let mut loader = PolicyLoader::new(dir.path());
    let results = loader.load_all().unwrap();

    assert!(matches!(results[0].status, LoadStatus::Failed { .. }));
    assert!(matches!(results[1].status, LoadStatus::Loaded { .. }));
    assert_eq!(loader.policy_set().len(), 3);
}

#[test]
fn duplicate_policy_id_is_rejected() {
    let dir = temp_dir();
    fs::write(dir.path().join("a.yml"), SITE_POLICY_YAML).unwrap();
    fs::write(dir.path().join("b.yml"), SITE_POLICY_YAML).unwrap();

    let mut loader = PolicyLoader::new(dir.path());
    let results = loader.load_all().unwrap();

    assert!(matches!(results[0].status, LoadStatus::Loaded { .. }));
    assert!(matches!(
        results[1].status,
        LoadStatus::Failed { ref error } if error.contains("duplicate policy id")
    ));
    assert_eq!(loader.policy_set().len(), 3);
}

#[test]
fn disabled_policy_is_skipped() {
    let dir = temp_dir();
    let yaml = SITE_POLICY_YAML.replace("name: Site reader", "name: Site reader\n  enabled: false");
    fs::write(dir.path().join("site.yml"), yaml).unwrap();

    let mut loader = PolicyLoader::new(dir.path());
    let results = loader.load_all().unwrap();

    assert!(matches!(
        results[0].status,
        LoadStatus::Skipped { ref reason } if reason == "disabled"
    ));
    assert!(loader.policy_set().is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let dir = temp_dir();
    let mut loader = PolicyLoader::new(dir.path().join("does-not-exist"));
    assert!(matches!(loader.load_all(), Err(LoadError::Io(_))));
}

#[test]
fn document_round_trips_through_yaml() {
    let doc = parse_policy(EDITOR_POLICY_YAML).unwrap();
    let yaml = doc.to_yaml().unwrap();
    assert_eq!(parse_policy(&yaml).unwrap(), doc);
}
