use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use rowguard_rules::loader::{LoadResult, LoadStatus, PolicyLoader};
use rowguard_rules::{OperatorRegistry, RowFilterAdapter, RuleSource};
use rowguard_sql::{Placeholder, SqlPredicate, TableSchema};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::Settings;

/// Result of compiling one action/subject pair.
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub action: String,
    pub subject: String,
    pub rules: usize,
    pub placeholder: Placeholder,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Load policies from `settings.policy_path`, keeping per-file results.
pub fn load_policies(settings: &Settings) -> Result<(PolicyLoader, Vec<LoadResult>)> {
    let mut loader = PolicyLoader::new(&settings.policy_path);
    let results = loader
        .load_all()
        .with_context(|| format!("failed to load policies from {}", settings.policy_path.display()))?;
    Ok((loader, results))
}

pub fn compile_filter(settings: &Settings, action: &str, subject: &str) -> Result<FilterReport> {
    let schema_path = settings.require_schema()?;
    let schema = TableSchema::from_yaml_file(schema_path)
        .with_context(|| format!("failed to load schema from {}", schema_path.display()))?;

    let (loader, results) = load_policies(settings)?;
    // A dropped file could have carried deny rules.
    if let Some((path, error)) = results.iter().find_map(|r| match &r.status {
        LoadStatus::Failed { error } => Some((&r.path, error)),
        _ => None,
    }) {
        bail!("policy file {} failed to load: {}", path.display(), error);
    }
    let policy = loader.policy_set();

    let adapter = if settings.comparisons {
        RowFilterAdapter::with_operators(schema, OperatorRegistry::<SqlPredicate>::empty().with_comparisons())
    } else {
        RowFilterAdapter::new(schema)
    };

    let rules = policy.rules_for(action, subject).len();
    let filter = adapter
        .filter_from_source(&policy, action, subject)
        .with_context(|| format!("failed to compile rules for {} {}", action, subject))?;
    let fragment = filter.to_sql(settings.placeholder);
    info!(action, subject, rules, params = fragment.params.len(), "compiled row filter");

    Ok(FilterReport {
        action: action.to_string(),
        subject: subject.to_string(),
        rules,
        placeholder: settings.placeholder,
        sql: fragment.sql,
        params: fragment.params,
    })
}

impl FilterReport {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "-- {} {} ({} rules)", self.action, self.subject, self.rules);
        let _ = writeln!(out, "WHERE {}", self.sql);
        let marker = match self.placeholder {
            Placeholder::Postgres => '$',
            Placeholder::Question => '?',
        };
        for (i, param) in self.params.iter().enumerate() {
            let _ = writeln!(out, "-- {}{} = {}", marker, i + 1, param);
        }
        out
    }
}

pub fn load_results_text(results: &[LoadResult]) -> String {
    let mut out = String::new();
    for result in results {
        let status = match &result.status {
            LoadStatus::Loaded { policy_id, rules } => format!("loaded   {} ({} rules)", policy_id, rules),
            LoadStatus::Skipped { reason } => format!("skipped  {}", reason),
            LoadStatus::Failed { error } => format!("failed   {}", error),
        };
        let _ = writeln!(out, "{}  {}", status, result.path.display());
    }
    out
}
