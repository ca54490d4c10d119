use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Compile permission rules into a SQL row filter.
///
/// Loads YAML policies and a table schema, selects the rules for one
/// action/subject pair and prints the resulting `WHERE` fragment with its
/// bound parameters.
#[derive(Parser, Debug)]
#[command(name = "rowguard", about = "Compile permission rules into a SQL row filter")]
pub struct CliArgs {
    /// Policy YAML file, or a directory scanned recursively (default: $POLICY_PATH)
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Table schema YAML file (default: $SCHEMA_PATH)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Action to compile rules for, e.g. `read`
    #[arg(long, required_unless_present = "list_policies")]
    pub action: Option<String>,

    /// Subject type to compile rules for, e.g. `Site`
    #[arg(long, required_unless_present = "list_policies")]
    pub subject: Option<String>,

    /// Bind-parameter style: postgres or question (default: $SQL_PLACEHOLDER)
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Enable `$ne`, `$gt`, `$gte`, `$lt`, `$lte` and `$nin` (default: $SQL_COMPARISONS)
    #[arg(long, overrides_with = "no_comparisons")]
    pub comparisons: bool,

    /// Disable the comparison operators even when SQL_COMPARISONS is set
    #[arg(long, overrides_with = "comparisons")]
    pub no_comparisons: bool,

    /// Config profile; overrides ROWGUARD_PROFILE
    #[arg(long)]
    pub profile: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// List policy files and their load status, then exit
    #[arg(long)]
    pub list_policies: bool,
}

impl CliArgs {
    /// `Some` when a comparisons flag was given; the last one wins.
    pub fn comparisons_flag(&self) -> Option<bool> {
        match (self.comparisons, self.no_comparisons) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
