//! Cache command - inspect or delete the lookup cache

use super::cache_path;
use crate::cache::Cache;
use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::Config;
use crate::error::{CreditsError, CreditsResult};
use console::style;
use std::path::Path;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> CreditsResult<()> {
    let path = cache_path(config);

    match args.action {
        CacheAction::Path => println!("{}", path.display()),
        CacheAction::Info => show_info(&path)?,
        CacheAction::Clear => clear(&path)?,
    }

    Ok(())
}

fn show_info(path: &Path) -> CreditsResult<()> {
    if !path.exists() {
        println!("No cache at {}", path.display());
        return Ok(());
    }

    let cache = Cache::open(path, false)?;
    println!("Cache: {}", path.display());
    println!("Entries: {}", cache.len());
    Ok(())
}

fn clear(path: &Path) -> CreditsResult<()> {
    if !path.exists() {
        println!("Cache is already empty.");
        return Ok(());
    }

    std::fs::remove_file(path)
        .map_err(|e| CreditsError::io(format!("removing {}", path.display()), e))?;

    println!("{} removed {}", style("✓").green(), path.display());
    Ok(())
}
