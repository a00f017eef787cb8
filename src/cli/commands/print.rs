//! Print command - write the author list to stdout

use super::build_generator;
use crate::cli::args::PrintArgs;
use crate::config::Config;
use crate::error::{CreditsError, CreditsResult};
use std::io::{self, Read};
use tracing::debug;

/// Execute the print command
pub fn execute(args: PrintArgs, config: &Config) -> CreditsResult<()> {
    let mut existing = String::new();
    if args.generate.append {
        io::stdin()
            .read_to_string(&mut existing)
            .map_err(|e| CreditsError::io("reading stdin", e))?;
    }

    let mut generator = build_generator(args.generate, config)?;

    let stdout = io::stdout();
    let written = generator.stream(&existing, &mut stdout.lock())?;
    debug!("printed {} author(s)", written);

    Ok(())
}
