//! Typed argument values and string coercion
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::fmt;

/// Declared type of an action parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Text,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
    Guild,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Text => "text",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::User => "user",
            ParamKind::Channel => "channel",
            ParamKind::Role => "role",
            ParamKind::Guild => "guild",
        };
        f.write_str(name)
    }
}

/// A platform user as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: u64,
    /// Display name; empty when only the id is known (e.g. parsed from a mention)
    pub name: String,
    pub is_bot: bool,
}

impl UserRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot: false,
        }
    }

    pub fn from_id(id: u64) -> Self {
        Self::new(id, String::new())
    }

    pub fn bot(id: u64, name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id, name)
        }
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<@{}>", self.id)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A guild (server) as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRef {
    pub id: u64,
    pub name: String,
}

impl GuildRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for GuildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A concrete argument handed to an action
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(UserRef),
    Channel(u64),
    Role(u64),
    Guild(GuildRef),
}

impl Value {
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Text(_) => ParamKind::Text,
            Value::Integer(_) => ParamKind::Integer,
            Value::Number(_) => ParamKind::Number,
            Value::Boolean(_) => ParamKind::Boolean,
            Value::User(_) => ParamKind::User,
            Value::Channel(_) => ParamKind::Channel,
            Value::Role(_) => ParamKind::Role,
            Value::Guild(_) => ParamKind::Guild,
        }
    }

    /// Parse raw text into a value of the requested kind.
    ///
    /// Returns `None` when the text has no sensible reading as `kind`.
    pub fn parse(raw: &str, kind: ParamKind) -> Option<Value> {
        let trimmed = raw.trim();
        match kind {
            ParamKind::Text => Some(Value::Text(raw.to_string())),
            ParamKind::Integer => trimmed.parse().ok().map(Value::Integer),
            ParamKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Number),
            ParamKind::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Value::Boolean(true)),
                "false" | "no" | "off" | "0" => Some(Value::Boolean(false)),
                _ => None,
            },
            ParamKind::User => parse_mention(trimmed, &["<@!", "<@"])
                .map(|id| Value::User(UserRef::from_id(id))),
            ParamKind::Channel => parse_mention(trimmed, &["<#"]).map(Value::Channel),
            ParamKind::Role => parse_mention(trimmed, &["<@&"]).map(Value::Role),
            ParamKind::Guild => trimmed
                .parse()
                .ok()
                .map(|id| Value::Guild(GuildRef::new(id, String::new()))),
        }
    }

    /// Convert an already-typed value into `kind`.
    ///
    /// Every value converts to its own kind and to text; nothing else.
    pub fn coerce(self, kind: ParamKind) -> Option<Value> {
        if self.kind() == kind {
            return Some(self);
        }
        match kind {
            ParamKind::Text => Some(Value::Text(self.to_string())),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserRef> {
        match self {
            Value::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<u64> {
        match self {
            Value::Channel(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<u64> {
        match self {
            Value::Role(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::User(u) => write!(f, "{u}"),
            Value::Channel(id) => write!(f, "<#{id}>"),
            Value::Role(id) => write!(f, "<@&{id}>"),
            Value::Guild(g) => write!(f, "{g}"),
        }
    }
}

/// Accept `<PREFIX id>` for any of `prefixes`, or a bare numeric id
fn parse_mention(raw: &str, prefixes: &[&str]) -> Option<u64> {
    if let Ok(id) = raw.parse() {
        return Some(id);
    }
    let inner = raw.strip_suffix('>')?;
    prefixes
        .iter()
        .find_map(|p| inner.strip_prefix(p))
        .and_then(|id| id.parse().ok())
}
