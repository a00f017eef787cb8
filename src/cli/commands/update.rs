//! Update command - rewrite author blocks in place

use super::build_generator;
use crate::cli::args::UpdateArgs;
use crate::config::Config;
use crate::error::CreditsResult;
use crate::render::update_file;
use tracing::info;

/// Execute the update command
pub fn execute(args: UpdateArgs, config: &Config) -> CreditsResult<()> {
    let mut generator = build_generator(args.generate, config)?;

    for path in &args.files {
        if update_file(path, |body| generator.generate(body))? {
            info!("updated {}", path.display());
        }
    }

    Ok(())
}
