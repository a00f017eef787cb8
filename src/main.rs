//! mdcredits - markdown contributor lists from git history
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use mdcredits::cli::{Cli, Commands};
use mdcredits::config::ConfigManager;
use mdcredits::error::CreditsResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> CreditsResult<()> {
    let cli = Cli::parse();

    // 0 = info (progress lines), 1+ = debug; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("mdcredits=info"),
        _ => EnvFilter::new("mdcredits=debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    match cli.command {
        Commands::Update(args) => mdcredits::cli::commands::update(args, &config),
        Commands::Print(args) => mdcredits::cli::commands::print(args, &config),
        Commands::Cache(args) => mdcredits::cli::commands::cache(args, &config),
        Commands::Config(args) => mdcredits::cli::commands::config(args, &config_manager, &config),
        Commands::Formats => mdcredits::cli::commands::formats(&config),
    }
}
