mod config;
mod runner;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use scrape_logging::{LogDestination, DEFAULT_LOG_FILE};

use crate::config::AppConfig;

/// Collect the full follower list of one or more remote profiles.
///
/// Prints one JSON object per profile on stdout. Credentials come from the
/// config file or the SCRAPER_EMAIL, SCRAPER_PASSWORD and SCRAPER_MANUAL_TOKEN
/// environment variables.
#[derive(Debug, Parser)]
#[command(name = "follower_app", version)]
struct Cli {
    /// RON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also write logs to ./scrape.log.
    #[arg(long)]
    log_file: bool,
    /// Log per-page details.
    #[arg(short, long)]
    verbose: bool,
    /// Profile URLs (containing `profile/<id>`) or bare ids.
    #[arg(required = true)]
    profiles: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = if cli.log_file {
        LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
    } else {
        LogDestination::Terminal
    };
    scrape_logging::initialize(destination, level);

    let config = AppConfig::load(cli.config.as_deref(), |key| std::env::var(key).ok())
        .context("loading configuration")?;

    let stdout = io::stdout();
    let all_ok = runner::run(config, &cli.profiles, &mut stdout.lock())?;
    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
