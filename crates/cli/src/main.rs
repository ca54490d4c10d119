mod cli;
mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use rowguard_core::config::{load_dotenv, Config};

use crate::cli::{CliArgs, OutputFormat};
use crate::config::Settings;
use crate::report::{compile_filter, load_policies, load_results_text};

fn main() -> Result<()> {
    load_dotenv();
    let args = CliArgs::parse();

    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config.log_summary();

    let settings = Settings::resolve(&args, &config)?;

    // Handle --list-policies
    if args.list_policies {
        let (_, results) = load_policies(&settings)?;
        print!("{}", load_results_text(&results));
        return Ok(());
    }

    let action = args.action.as_deref().context("--action is required")?;
    let subject = args.subject.as_deref().context("--subject is required")?;
    let report = compile_filter(&settings, action, subject)?;

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        ),
    }

    Ok(())
}
