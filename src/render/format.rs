//! Author line templates
//!
//! A format spec mixes literal text with fields:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{foo}` | value of field `foo` |
//! | `{foo?}` | same, but when empty, adjacent non-whitespace text is dropped |
//! | `{foo\|bar}` | `foo`, or `bar` if `foo` is empty |
//! | `{foo\|bar?}` | as above, squashing when both are empty |
//!
//! Escapes like `\n` and `\{` are recognized in literal text.

use crate::author::Author;
use crate::config::Config;
use crate::error::{CreditsError, CreditsResult};

/// Predefined format specs, by name
pub const BUILTIN_FORMATS: &[(&str, &str)] = &[
    // 1. Ford Prefect `ix`
    ("modern", "{index}. {name} `{login?}`\\n"),
    // - Ford Prefect `ix` (<ford@betelgeuse.sid>)
    ("classic", "- {name} `{login?}` (<{email|profile?}>)\\n"),
];

/// Field names accepted inside braces
pub const FIELDS: &[&str] = &["index", "date", "name", "email", "login", "profile"];

/// Resolve a `--format` value to a spec.
///
/// Values containing `{` are specs already; anything else names a
/// configured or builtin format.
pub fn resolve_format(value: &str, config: &Config) -> CreditsResult<String> {
    if value.contains('{') {
        return Ok(value.to_string());
    }

    if let Some(spec) = config.formats.get(value) {
        return Ok(spec.clone());
    }

    BUILTIN_FORMATS
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, spec)| spec.to_string())
        .ok_or_else(|| CreditsError::UnknownFormat(value.to_string()))
}

/// One parsed piece of a format spec
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field {
        alternatives: Vec<String>,
        squash: bool,
    },
}

/// A parsed format spec
#[derive(Debug, Clone)]
pub struct Template {
    pieces: Vec<Piece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Squash {
    Off,
    NonWsBefore,
    WsBefore,
    NonWsAfter,
    WsAfter,
}

impl Template {
    /// Parse and validate a format spec
    pub fn parse(spec: &str) -> CreditsResult<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut pos = 0;

        while pos < chars.len() {
            match chars[pos] {
                '\\' if pos + 1 < chars.len() => {
                    literal.push(unescape(chars[pos + 1]));
                    pos += 2;
                }
                '{' => {
                    let close = chars[pos + 1..]
                        .iter()
                        .position(|&c| c == '}')
                        .map(|offset| pos + 1 + offset)
                        .ok_or_else(|| CreditsError::BadFormat("missing trailing `}'".to_string()))?;

                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    let expr: String = chars[pos + 1..close].iter().collect();
                    pieces.push(parse_field(&expr)?);
                    pos = close + 1;
                }
                c => {
                    literal.push(c);
                    pos += 1;
                }
            }
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { pieces })
    }

    /// Render one author line; a trailing newline is added if missing
    pub fn render(&self, author: &Author) -> String {
        let mut out = String::new();
        // literal chars at the end of `out` since the last field
        let mut trailing_literal = 0usize;
        let mut state = Squash::Off;

        for piece in &self.pieces {
            let (mut text, is_literal) = match piece {
                Piece::Literal(text) => (text.clone(), true),
                Piece::Field {
                    alternatives,
                    squash,
                } => {
                    let value = alternatives
                        .iter()
                        .map(|name| field_value(name, author))
                        .find(|v| !v.is_empty())
                        .unwrap_or_default();
                    state = if value.is_empty() && *squash {
                        Squash::NonWsBefore
                    } else {
                        Squash::Off
                    };
                    (value, false)
                }
            };

            if state == Squash::NonWsBefore {
                while trailing_literal > 0 && out.ends_with(|c: char| !c.is_whitespace()) {
                    out.pop();
                    trailing_literal -= 1;
                }
                state = Squash::WsBefore;
            }

            if state == Squash::WsBefore {
                let kept = out.trim_end_matches(char::is_whitespace).len();
                if let Some(first_ws) = out[kept..].chars().next() {
                    out.truncate(kept);
                    out.push(first_ws);
                }
                trailing_literal = 0;
                state = Squash::NonWsAfter;
            }

            // fields always reset the state, so only literals get here
            if state == Squash::NonWsAfter && is_literal && !text.is_empty() {
                text = text.trim_start_matches(|c: char| !c.is_whitespace()).to_string();
                if text.starts_with(char::is_whitespace) {
                    state = Squash::WsAfter;
                }
            }

            if state == Squash::WsAfter && !text.is_empty() {
                text = if out.ends_with(char::is_whitespace) {
                    text.trim_start().to_string()
                } else {
                    keep_last_leading_ws(&text)
                };
                if text.starts_with(|c: char| !c.is_whitespace()) {
                    state = Squash::Off;
                }
            }

            if !text.is_empty() {
                out.push_str(&text);
                if is_literal {
                    trailing_literal += text.chars().count();
                } else {
                    trailing_literal = 0;
                }
            }
        }

        if state == Squash::WsAfter {
            out.truncate(out.trim_end().len());
        }

        if !out.contains('\n') {
            out.push('\n');
        }

        out
    }
}

fn parse_field(expr: &str) -> CreditsResult<Piece> {
    let (expr, squash) = match expr.strip_suffix('?') {
        Some(rest) => (rest, true),
        None => (expr, false),
    };

    let alternatives: Vec<String> = expr.split('|').map(str::to_string).collect();
    for name in &alternatives {
        if !FIELDS.contains(&name.as_str()) {
            return Err(CreditsError::BadFormat(format!("unknown field `{}'", name)));
        }
    }

    Ok(Piece::Field {
        alternatives,
        squash,
    })
}

fn field_value(name: &str, author: &Author) -> String {
    let value = match name {
        "index" => author.index.to_string(),
        "date" => author.date.clone(),
        "name" => author.name.clone(),
        "email" => author.email.clone(),
        "login" => author.login.clone(),
        "profile" => author.profile.clone(),
        _ => String::new(),
    };
    value.trim().to_string()
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// Drop leading whitespace except the last char of the run
fn keep_last_leading_ws(text: &str) -> String {
    let rest = text.trim_start();
    let ws = &text[..text.len() - rest.len()];
    match ws.chars().last() {
        Some(last) => format!("{}{}", last, rest),
        None => rest.to_string(),
    }
}
