use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    profiled_env_opt(profile, key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub policy: PolicyConfig,
    pub schema: SchemaConfig,
    pub sql: SqlConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ROWGUARD_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ROWGUARD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            policy: PolicyConfig::from_env_profiled(p),
            schema: SchemaConfig::from_env_profiled(p),
            sql: SqlConfig::from_env_profiled(p),
            log: LogConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  policy:  path={}",
            self.policy.path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none)".into())
        );
        tracing::info!(
            "  schema:  path={}",
            self.schema.path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none)".into())
        );
        tracing::info!("  sql:     placeholder={}, comparisons={}", self.sql.placeholder, self.sql.comparisons);
        tracing::info!("  log:     level={}", self.log.level);
    }
}

// ── Policy source ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Policy YAML file, or a directory scanned recursively for policies.
    pub path: Option<PathBuf>,
}

impl PolicyConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: profiled_env_opt(p, "POLICY_PATH").map(PathBuf::from),
        }
    }
}

// ── Table schema ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub path: Option<PathBuf>,
}

impl SchemaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: profiled_env_opt(p, "SCHEMA_PATH").map(PathBuf::from),
        }
    }
}

// ── SQL rendering ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlConfig {
    /// "postgres" (`$1`, `$2`, ...) or "question" (`?`)
    pub placeholder: String,
    /// Register `$ne`/`$gt`/`$gte`/`$lt`/`$lte`/`$nin` on top of the defaults.
    pub comparisons: bool,
}

impl SqlConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            placeholder: profiled_env_or(p, "SQL_PLACEHOLDER", "postgres"),
            comparisons: profiled_env_bool(p, "SQL_COMPARISONS", false),
        }
    }
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
}

impl LogConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            level: profiled_env_or(p, "LOG_LEVEL", "warn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own profile so the process-wide env does not leak
    // between tests running in parallel.

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::for_profile("rgtest_defaults");
        assert_eq!(config.profile, "RGTEST_DEFAULTS");
        assert_eq!(config.sql.placeholder, env_or("SQL_PLACEHOLDER", "postgres"));
        assert_eq!(config.profile_label(), "RGTEST_DEFAULTS");
    }

    #[test]
    fn profiled_keys_win_over_plain_keys() {
        env::set_var("RGTEST_PROFILED_POLICY_PATH", "policies/prod.yml");
        env::set_var("RGTEST_PROFILED_SQL_COMPARISONS", "true");
        env::set_var("RGTEST_PROFILED_SQL_PLACEHOLDER", "question");

        let config = Config::for_profile("rgtest_profiled");
        assert_eq!(config.policy.path, Some(PathBuf::from("policies/prod.yml")));
        assert!(config.sql.comparisons);
        assert_eq!(config.sql.placeholder, "question");
    }

    #[test]
    fn empty_profile_is_labelled_default() {
        let config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        env::set_var("RGTEST_BOOL_SQL_COMPARISONS", "YES");
        assert!(profiled_env_bool("RGTEST_BOOL", "SQL_COMPARISONS", false));
        env::set_var("RGTEST_BOOL_SQL_COMPARISONS", "0");
        assert!(!profiled_env_bool("RGTEST_BOOL", "SQL_COMPARISONS", true));
    }
}
