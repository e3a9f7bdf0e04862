//! Argument templates
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Syntax, as written in the action config:
//!
//! | Written        | Meaning                                          |
//! |----------------|--------------------------------------------------|
//! | `$0`, `${0}`   | caller-supplied token 0 (message commands only)  |
//! | `${actor}`     | a field of the execution context                 |
//! | `$$5`          | the literal text `$5`                            |
//! | anything else  | a literal; `${..}` inside it is interpolated      |
//!
//! Inside a literal, `$$` always stands for a single `$`, so `$${actor}`
//! is the text `${actor}` and is never interpolated.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::context::ContextField;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
static LITERAL_TOKEN: OnceLock<Regex> = OnceLock::new();
static POSITIONAL_SHORT: OnceLock<Regex> = OnceLock::new();

/// Matches `${name}` anywhere in a string
fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("static pattern"))
}

/// Matches an escaped `$$` or a `${name}` placeholder, leftmost first
fn literal_token_regex() -> &'static Regex {
    LITERAL_TOKEN.get_or_init(|| Regex::new(r"\$\$|\$\{([^}]*)\}").expect("static pattern"))
}

fn positional_short_regex() -> &'static Regex {
    POSITIONAL_SHORT.get_or_init(|| Regex::new(r"^\$(\d+)$").expect("static pattern"))
}

/// What a `${..}` placeholder points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Context(ContextField),
    Positional(usize),
}

impl FromStr for Placeholder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            let index = name
                .parse()
                .map_err(|_| anyhow!("Positional index out of range: {name}"))?;
            return Ok(Placeholder::Positional(index));
        }
        name.parse().map(Placeholder::Context)
    }
}

/// One declared argument of an action invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentTemplate {
    Literal(String),
    ContextRef(ContextField),
    Positional(usize),
}

impl ArgumentTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        if let Some(caps) = positional_short_regex().captures(raw) {
            let index = caps[1]
                .parse()
                .map_err(|_| anyhow!("Positional index out of range: {raw}"))?;
            return Ok(ArgumentTemplate::Positional(index));
        }

        if let Some(caps) = placeholder_regex().captures(raw) {
            if caps.get(0).map(|m| m.as_str()) == Some(raw) {
                return Ok(match caps[1].parse::<Placeholder>()? {
                    Placeholder::Context(field) => ArgumentTemplate::ContextRef(field),
                    Placeholder::Positional(index) => ArgumentTemplate::Positional(index),
                });
            }
        }

        let template = ArgumentTemplate::Literal(raw.to_string());
        template
            .embedded_placeholders()
            .map_err(|e| anyhow!("Invalid placeholder in '{raw}': {e}"))?;
        Ok(template)
    }

    /// Placeholders interpolated into a literal (empty for other variants)
    pub fn embedded_placeholders(&self) -> Result<Vec<Placeholder>> {
        let mut found = Vec::new();
        if let ArgumentTemplate::Literal(text) = self {
            render_literal(text, |name| {
                found.push(name.parse::<Placeholder>()?);
                Ok::<_, anyhow::Error>(String::new())
            })?;
        }
        Ok(found)
    }

    /// Whether this template reads caller-supplied tokens at all
    pub fn uses_positional(&self) -> bool {
        match self {
            ArgumentTemplate::Positional(_) => true,
            ArgumentTemplate::ContextRef(_) => false,
            ArgumentTemplate::Literal(_) => self
                .embedded_placeholders()
                .map(|ps| ps.iter().any(|p| matches!(p, Placeholder::Positional(_))))
                .unwrap_or(false),
        }
    }
}

/// Render a literal: `$$` becomes `$`, each `${name}` is replaced by
/// `resolve(name)`.
///
/// Substituted text is appended as-is and never scanned again.
pub(crate) fn render_literal<F, E>(text: &str, mut resolve: F) -> std::result::Result<String, E>
where
    F: FnMut(&str) -> std::result::Result<String, E>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in literal_token_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&text[last..whole.start()]);
        match caps.get(1) {
            None => out.push('$'),
            Some(name) => out.push_str(&resolve(name.as_str())?),
        }
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

impl fmt::Display for ArgumentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentTemplate::Literal(text) => write!(f, "{text:?}"),
            ArgumentTemplate::ContextRef(field) => write!(f, "${{{field}}}"),
            ArgumentTemplate::Positional(index) => write!(f, "${index}"),
        }
    }
}
