//! CLI command implementations

pub mod cache;
pub mod config;
pub mod formats;
pub mod print;
pub mod update;

pub use cache::execute as cache;
pub use config::execute as config;
pub use formats::execute as formats;
pub use print::execute as print;
pub use update::execute as update;

use crate::cache::Cache;
use crate::cli::args::GenerateArgs;
use crate::config::schema::{Config, ForgeKind};
use crate::error::CreditsResult;
use crate::forge::GithubForge;
use crate::generate::{GenerateOptions, Generator};
use crate::resolve::Resolver;
use std::path::PathBuf;
use tracing::debug;

/// Location of the persistent cache for `config`
pub(crate) fn cache_path(config: &Config) -> PathBuf {
    config
        .cache
        .path
        .clone()
        .unwrap_or_else(Cache::default_path)
}

/// Set up a generator from command-line options over `config`
pub(crate) fn build_generator(
    args: GenerateArgs,
    config: &Config,
) -> CreditsResult<Generator<GithubForge>> {
    let forge = args.forge.unwrap_or(config.forge.kind);

    let resolver = match forge {
        ForgeKind::None => {
            debug!("forge disabled, using git history only");
            None
        }
        ForgeKind::Github => {
            let cache = Cache::open(cache_path(config), args.refresh)?;
            Some(Resolver::new(GithubForge::new(&config.forge), cache))
        }
    };

    let options = GenerateOptions {
        format: args.format.unwrap_or_else(|| config.general.format.clone()),
        sort: args.sort.unwrap_or(config.general.sort),
        append: args.append,
        ignore: args.ignore,
        project: args.project.unwrap_or_default(),
        repo: args.repo,
    };

    Generator::new(config, options, resolver)
}
