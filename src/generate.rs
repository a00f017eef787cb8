//! Author list generation
//!
//! Ties history, filtering, resolution, deduplication and formatting
//! together. History is read once per run; each block (or the pipe) then
//! gets its own [`Roster`].

use crate::author::{Author, RawAuthor};
use crate::config::schema::{Config, SortOrder};
use crate::error::CreditsResult;
use crate::forge::{normalize_project, Forge};
use crate::history::{collect_authors, detect_project};
use crate::render::{resolve_format, Template};
use crate::resolve::Resolver;
use crate::roster::Roster;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Per-run options, usually from the command line
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Format spec, or name of a builtin or configured one
    pub format: String,
    pub sort: SortOrder,
    /// Keep existing block contents and only add new authors
    pub append: bool,
    /// Extra emails, names and logins to skip
    pub ignore: Vec<String>,
    /// `owner/repo`; detected from remotes when empty
    pub project: String,
    /// Path inside the repository to read history from
    pub repo: PathBuf,
}

impl GenerateOptions {
    /// Options taking every default from `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: config.general.format.clone(),
            sort: config.general.sort,
            append: false,
            ignore: Vec::new(),
            project: String::new(),
            repo: PathBuf::from("."),
        }
    }
}

/// Which authors never make it into a list
#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    ignore: Vec<String>,
    bots: Vec<String>,
}

impl AuthorFilter {
    pub fn new(ignore: impl IntoIterator<Item = String>, bots: &[String]) -> Self {
        Self {
            ignore: ignore
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            bots: bots.to_vec(),
        }
    }

    /// Whether `author` is ignored or a bot
    pub fn rejects(&self, author: &Author) -> bool {
        self.is_ignored(author) || self.is_bot(author)
    }

    fn is_ignored(&self, author: &Author) -> bool {
        self.ignore.iter().any(|ign| {
            author.email.eq_ignore_ascii_case(ign)
                || author.name.eq_ignore_ascii_case(ign)
                || author.login.eq_ignore_ascii_case(ign)
        })
    }

    fn is_bot(&self, author: &Author) -> bool {
        if author.login.ends_with("[bot]") || author.name.ends_with("[bot]") {
            return true;
        }
        self.bots.iter().any(|bot| {
            [&author.email, &author.name, &author.login]
                .iter()
                .any(|field| !field.is_empty() && *field == bot)
        })
    }
}

/// Generates author lists for blocks or the pipe
pub struct Generator<F> {
    template: Template,
    append: bool,
    filter: AuthorFilter,
    resolver: Option<Resolver<F>>,
    project: String,
    authors: Vec<RawAuthor>,
}

impl<F: Forge> Generator<F> {
    /// Prepare a run: parse the format and read history.
    ///
    /// Without a resolver, authors are listed exactly as history has them.
    pub fn new(
        config: &Config,
        options: GenerateOptions,
        resolver: Option<Resolver<F>>,
    ) -> CreditsResult<Self> {
        let template = Template::parse(&resolve_format(&options.format, config)?)?;

        let mut authors = collect_authors(&options.repo)?;
        if options.sort == SortOrder::Name {
            authors.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        }

        let project = if resolver.is_none() {
            String::new()
        } else if options.project.is_empty() {
            detect_project(&options.repo, &config.forge.host)
        } else {
            normalize_project(&options.project, &config.forge.host)
        };
        if resolver.is_some() && project.is_empty() {
            debug!("project unknown, repository-scoped lookups are skipped");
        }

        let ignore = config
            .filter
            .ignore
            .iter()
            .cloned()
            .chain(options.ignore);

        Ok(Self {
            template,
            append: options.append,
            filter: AuthorFilter::new(ignore, &config.filter.bots),
            resolver,
            project,
            authors,
        })
    }

    /// Build new block contents from `existing`.
    ///
    /// In append mode the result is `existing` plus lines for authors not
    /// already in it; otherwise it's a fresh list.
    pub fn generate(&mut self, existing: &str) -> CreditsResult<String> {
        let mut content = if self.append {
            existing.to_string()
        } else {
            String::new()
        };

        let added = self.run(existing, |author, line| {
            info!("new: {} <{}> {}", author.name, author.email, author.login);
            content.push_str(&line);
            Ok(())
        })?;

        if added == 0 {
            info!("no new authors");
        } else {
            info!("added {} author(s)", added);
        }

        Ok(content)
    }

    /// Write lines for new authors to `out` as soon as each is resolved.
    ///
    /// Returns the number of lines written.
    pub fn stream(&mut self, existing: &str, out: &mut impl Write) -> CreditsResult<usize> {
        self.run(existing, |_, line| {
            out.write_all(line.as_bytes())
                .and_then(|()| out.flush())
                .map_err(|e| crate::error::CreditsError::io("writing to stdout", e))
        })
    }

    fn run<E>(&mut self, existing: &str, mut emit: E) -> CreditsResult<usize>
    where
        E: FnMut(&Author, String) -> CreditsResult<()>,
    {
        let mut roster = if self.append {
            Roster::appending(existing)
        } else {
            Roster::new()
        };

        for raw in &self.authors {
            if self.filter.rejects(&Author::from_raw(raw)) {
                debug!("skip: {} <{}>", raw.name, raw.email);
                continue;
            }

            let author = match self.resolver {
                Some(ref mut resolver) => resolver.populate(raw, &self.project)?,
                None => Author::from_raw(raw),
            };

            // check again now that login and name are known
            if self.filter.rejects(&author) {
                debug!("skip: {} <{}> {}", author.name, author.email, author.login);
                continue;
            }

            if let Some(author) = roster.admit(author) {
                let line = self.template.render(&author);
                roster.record(&line);
                emit(&author, line)?;
            }
        }

        Ok(roster.added())
    }
}
