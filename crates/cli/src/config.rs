use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rowguard_core::Config;
use rowguard_sql::Placeholder;
use tracing::debug;

use crate::cli::CliArgs;

/// Effective settings for one run.
/// Priority: command-line flag > environment (profiled) > built-in default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub policy_path: PathBuf,
    pub schema_path: Option<PathBuf>,
    pub placeholder: Placeholder,
    pub comparisons: bool,
}

impl Settings {
    pub fn resolve(args: &CliArgs, config: &Config) -> Result<Self> {
        let policy_path = args
            .policy
            .clone()
            .or_else(|| config.policy.path.clone())
            .context("no policy given: pass --policy or set POLICY_PATH")?;

        let schema_path = args.schema.clone().or_else(|| config.schema.path.clone());

        let placeholder_str = args
            .placeholder
            .as_deref()
            .unwrap_or(config.sql.placeholder.as_str());
        let placeholder = placeholder_str
            .parse::<Placeholder>()
            .map_err(|e| anyhow!(e))?;

        let settings = Self {
            policy_path,
            schema_path,
            placeholder,
            comparisons: args.comparisons_flag().unwrap_or(config.sql.comparisons),
        };
        debug!(?settings, "resolved settings");
        Ok(settings)
    }

    /// The schema path, required for compilation.
    pub fn require_schema(&self) -> Result<&PathBuf> {
        self.schema_path
            .as_ref()
            .context("no schema given: pass --schema or set SCHEMA_PATH")
    }
}
