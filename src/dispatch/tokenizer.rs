//! Message tokenizer
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Splits `!greet "hello world" 42` into the command `greet` and the
//! arguments `["hello world", "42"]`. A token that opens with `"` runs to the
//! next `"`; a quote with no partner is kept as an ordinary character.

/// Command name and arguments taken from one message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// Command name with the prefix removed, case as typed. Empty when the
    /// message was only the prefix.
    pub name: String,
    pub args: Vec<String>,
}

/// Tokenize `content` and strip `prefix` from the first token
pub fn tokenize(content: &str, prefix: &str) -> ParsedCommand {
    let mut tokens = split_tokens(content).into_iter();

    let name = match tokens.next() {
        Some(first) => match first.strip_prefix(prefix) {
            Some(stripped) => stripped.to_string(),
            None => first,
        },
        None => String::new(),
    };

    ParsedCommand {
        name,
        args: tokens.collect(),
    }
}

/// Split on whitespace, keeping `"quoted spans"` together without their quotes
pub fn split_tokens(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = content.trim_start();

    while !rest.is_empty() {
        let (token, remainder) = next_token(rest);
        tokens.push(token);
        rest = remainder.trim_start();
    }

    tokens
}

fn next_token(input: &str) -> (String, &str) {
    if let Some(after_open) = input.strip_prefix('"') {
        if let Some(close) = after_open.find('"') {
            return (after_open[..close].to_string(), &after_open[close + 1..]);
        }
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    (input[..end].to_string(), &input[end..])
}
