//! CLI argument definitions using clap derive

use crate::config::schema::{ForgeKind, SortOrder};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// mdcredits - keep markdown contributor lists in sync with git history
///
/// Finds `<!-- authors -->` ... `<!-- endauthors -->` blocks in markdown
/// files and fills them with the project's authors, enriched with logins,
/// emails and full names from GitHub.
#[derive(Parser, Debug)]
#[command(name = "mdcredits")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug)
    #[arg(short, long, visible_alias = "debug", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MDCREDITS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite author blocks in markdown files
    Update(UpdateArgs),

    /// Write the author list to stdout
    Print(PrintArgs),

    /// Manage the lookup cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// List available format specs
    Formats,
}

/// Options shared by commands that generate author lists
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Format spec, or name of a predefined one (see `mdcredits formats`)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Sort order of new entries
    #[arg(short, long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Keep existing entries and only append new authors
    #[arg(short, long)]
    pub append: bool,

    /// Emails, names and logins to leave out (comma-separated)
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Service used to fill in missing fields
    #[arg(long, value_enum)]
    pub forge: Option<ForgeKind>,

    /// Forge project as owner/repo (auto-detected from remotes)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Re-query everything instead of trusting cached lookups
    #[arg(short, long)]
    pub refresh: bool,

    /// Repository to read history from
    #[arg(short = 'C', long, default_value = ".")]
    pub repo: PathBuf,
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Markdown files containing author blocks
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the print command.
///
/// With --append, existing entries are read from stdin.
#[derive(Args, Debug)]
pub struct PrintArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,
}

/// Arguments for the cache command
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache file path
    Path,

    /// Show number of cached lookups
    Info,

    /// Delete the cache file
    Clear,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
