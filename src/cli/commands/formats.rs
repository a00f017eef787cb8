//! Formats command - list predefined and configured format specs

use crate::config::Config;
use crate::error::CreditsResult;
use crate::render::format::{BUILTIN_FORMATS, FIELDS};
use console::style;

/// Execute the formats command
pub fn execute(config: &Config) -> CreditsResult<()> {
    println!("{}", style("Builtin formats:").bold());
    for (name, spec) in BUILTIN_FORMATS {
        println!("  {:<12} \"{}\"", name, spec);
    }

    if !config.formats.is_empty() {
        println!();
        println!("{}", style("Configured formats:").bold());
        for (name, spec) in &config.formats {
            println!("  {:<12} \"{}\"", name, spec);
        }
    }

    println!();
    println!("{} {}", style("Fields:").bold(), FIELDS.join(", "));

    Ok(())
}
