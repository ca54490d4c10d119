//! Core [`PolicyLoader`] struct: filesystem-backed policy loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::source::PolicySet;

use super::document::{PolicyDocument, POLICY_KIND};
use super::error::{LoadError, LoadResult, LoadStatus, Result};

/// Filesystem-backed policy loader.
///
/// The root is either a single YAML file or a directory scanned
/// recursively for `*.yml` / `*.yaml` files. Loaded documents are kept in
/// path order, which is also the order their rules appear in the merged
/// [`PolicySet`].
pub struct PolicyLoader {
    /// Policy file or directory containing policy files.
    root: PathBuf,
    /// Loaded documents keyed by source path.
    documents: BTreeMap<PathBuf, PolicyDocument>,
}

impl PolicyLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: BTreeMap::new(),
        }
    }

    /// Load the root file, or recursively scan the root directory.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse errors are reported
    /// per file and do not abort the scan. A missing root is an error.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let root = self.root.clone();
        if root.is_file() {
            self.load_entry(root, &mut results);
        } else {
            fs::metadata(&root)?;
            self.scan_dir_recursive(&root, &mut results)?;
        }
        Ok(results)
    }

    /// Recursively scan a directory for YAML policy files.
    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            paths.push(entry?.path());
        }
        paths.sort();

        for path in paths {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            self.load_entry(path, results);
        }

        Ok(())
    }

    fn load_entry(&mut self, path: PathBuf, results: &mut Vec<LoadResult>) {
        let status = match self.load_file(&path) {
            Ok(doc) => self.insert_document(&path, doc),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load policy file");
                LoadStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        results.push(LoadResult { path, status });
    }

    fn insert_document(&mut self, path: &Path, doc: PolicyDocument) -> LoadStatus {
        let policy_id = doc.metadata.id.clone();

        if !doc.metadata.enabled {
            info!(policy_id = %policy_id, path = %path.display(), "skipping disabled policy");
            return LoadStatus::Skipped {
                reason: "disabled".to_string(),
            };
        }

        let duplicate = self
            .documents
            .iter()
            .find(|(other, existing)| other.as_path() != path && existing.metadata.id == policy_id);
        if let Some((other, _)) = duplicate {
            let error = format!(
                "duplicate policy id '{}' (already loaded from {})",
                policy_id,
                other.display()
            );
            warn!(path = %path.display(), %error, "rejecting policy");
            return LoadStatus::Failed { error };
        }

        let rules = doc.rules.len();
        info!(policy_id = %policy_id, rules, path = %path.display(), "loaded policy");
        self.documents.insert(path.to_path_buf(), doc);
        LoadStatus::Loaded { policy_id, rules }
    }

    /// Parse and validate a single policy file.
    pub fn load_file(&self, path: &Path) -> Result<PolicyDocument> {
        let contents = fs::read_to_string(path)?;
        parse_policy(&contents)
    }

    /// Loaded documents in path order.
    pub fn documents(&self) -> impl Iterator<Item = &PolicyDocument> {
        self.documents.values()
    }

    /// Rules of every loaded policy, merged in path order.
    pub fn policy_set(&self) -> PolicySet {
        self.documents
            .values()
            .flat_map(|doc| doc.rules.iter().cloned())
            .collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Parse and validate a policy document from YAML text.
pub fn parse_policy(contents: &str) -> Result<PolicyDocument> {
    let doc: PolicyDocument = serde_yaml::from_str(contents)?;

    if doc.kind != POLICY_KIND {
        return Err(LoadError::Validation(format!(
            "expected kind '{}', found '{}'",
            POLICY_KIND, doc.kind
        )));
    }
    if doc.metadata.id.is_empty() {
        return Err(LoadError::Validation(
            "policy metadata.id must not be empty".to_string(),
        ));
    }

    Ok(doc)
}
