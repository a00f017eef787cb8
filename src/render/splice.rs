//! In-place regeneration of marked author blocks
//!
//! A block is the text between a `<!-- authors -->` line and the next
//! `<!-- endauthors -->` line. Marker lines themselves are kept as is.

use crate::error::{CreditsError, CreditsResult};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static BEGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!--\s*authors\s*-->\s*$").expect("valid regex"));
static END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!--\s*endauthors\s*-->\s*$").expect("valid regex"));

/// Rewrite every author block of `text` with `regenerate`.
///
/// `regenerate` receives the current block body and returns the new one.
/// Lines are normalized to end with `\n`.
pub fn splice_blocks<G>(path: &Path, text: &str, mut regenerate: G) -> CreditsResult<String>
where
    G: FnMut(&str) -> CreditsResult<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut block: Option<String> = None;
    let mut line_no = 0;

    for line in text.lines() {
        line_no += 1;

        if BEGIN_RE.is_match(line) {
            if block.is_some() {
                return Err(unpaired(path, line_no));
            }
            out.push_str(line);
            out.push('\n');
            block = Some(String::new());
            continue;
        }

        if END_RE.is_match(line) {
            let Some(body) = block.take() else {
                return Err(unpaired(path, line_no));
            };
            out.push_str(&regenerate_block(&body, &mut regenerate)?);
            out.push_str(line);
            out.push('\n');
            continue;
        }

        let target = block.as_mut().unwrap_or(&mut out);
        target.push_str(line);
        target.push('\n');
    }

    if block.is_some() {
        return Err(unpaired(path, line_no));
    }

    Ok(out)
}

/// Normalize a block body around one regeneration
fn regenerate_block<G>(body: &str, regenerate: &mut G) -> CreditsResult<String>
where
    G: FnMut(&str) -> CreditsResult<String>,
{
    let mut body = body.trim_matches('\n').to_string();
    if !body.is_empty() {
        body.push('\n');
    }

    let generated = regenerate(&body)?;
    let generated = generated.trim_matches('\n');

    if generated.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("\n{}\n\n", generated))
    }
}

fn unpaired(path: &Path, line: usize) -> CreditsError {
    CreditsError::UnpairedMarker {
        path: path.to_path_buf(),
        line,
    }
}

/// Regenerate the author blocks of a file, writing it only if changed.
///
/// Returns whether the file was rewritten.
pub fn update_file<G>(path: &Path, regenerate: G) -> CreditsResult<bool>
where
    G: FnMut(&str) -> CreditsResult<String>,
{
    debug!("processing {}", path.display());

    let old = std::fs::read_to_string(path)
        .map_err(|e| CreditsError::io(format!("reading {}", path.display()), e))?;

    let new = splice_blocks(path, &old, regenerate)?;

    // compare against the line-normalized original so a missing final
    // newline alone doesn't count as a change
    let normalized: String = old.lines().flat_map(|l| [l, "\n"]).collect();
    if new == normalized {
        debug!("{} is up to date", path.display());
        return Ok(false);
    }

    std::fs::write(path, new)
        .map_err(|e| CreditsError::io(format!("writing {}", path.display()), e))?;
    Ok(true)
}
