//! Per-dispatch execution context
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! A context is built fresh for every inbound stimulus, passed by reference
//! through argument resolution and action invocation, and dropped when the
//! dispatch completes. Nothing here is shared between dispatches except the
//! connection handle.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::tokenizer::ParsedCommand;
use crate::actions::value::{GuildRef, UserRef, Value};
use crate::gateway::Connection;

/// Lifecycle events that can be wired to actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    UserJoined,
    UserLeft,
    UserBanned,
    UserUnbanned,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::UserJoined,
        EventKind::UserLeft,
        EventKind::UserBanned,
        EventKind::UserUnbanned,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A lifecycle event delivered by the gateway
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub kind: EventKind,
    pub actor: UserRef,
    pub secondary: Option<UserRef>,
    pub group: Option<GuildRef>,
}

/// A text message delivered by the gateway
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: u64,
    pub author: UserRef,
    pub content: String,
    pub channel_id: u64,
    /// `None` for direct messages
    pub guild: Option<GuildRef>,
    pub mentions: Vec<UserRef>,
}

/// Where a dispatch came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Message,
    Event(EventKind),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Message => f.write_str("message"),
            Origin::Event(kind) => write!(f, "{kind}"),
        }
    }
}

/// A named field of the execution context that templates may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    Actor,
    Target,
    Group,
    Channel,
    Message,
    Args,
}

impl FromStr for ContextField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "actor" | "user" | "author" => Ok(ContextField::Actor),
            "target" => Ok(ContextField::Target),
            "group" | "guild" => Ok(ContextField::Group),
            "channel" => Ok(ContextField::Channel),
            "message" => Ok(ContextField::Message),
            "args" => Ok(ContextField::Args),
            other => Err(anyhow!("Unknown context field '{other}'")),
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContextField::Actor => "actor",
            ContextField::Target => "target",
            ContextField::Group => "group",
            ContextField::Channel => "channel",
            ContextField::Message => "message",
            ContextField::Args => "args",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
struct MessageData {
    channel_id: u64,
    content: String,
    args: Vec<String>,
}

/// Everything an action can learn about the stimulus that triggered it
#[derive(Clone)]
pub struct ExecutionContext {
    origin: Origin,
    actor: UserRef,
    target: Option<UserRef>,
    group: Option<GuildRef>,
    message: Option<MessageData>,
    connection: Arc<dyn Connection>,
}

impl ExecutionContext {
    /// Bind a lifecycle event
    pub fn for_event(connection: Arc<dyn Connection>, event: &LifecycleEvent) -> Self {
        Self {
            origin: Origin::Event(event.kind),
            actor: event.actor.clone(),
            target: event.secondary.clone(),
            group: event.group.clone(),
            message: None,
            connection,
        }
    }

    /// Bind a prefixed message and its parsed command.
    ///
    /// The target is the first mentioned user other than the bot itself.
    pub fn for_message(
        connection: Arc<dyn Connection>,
        message: &InboundMessage,
        parsed: &ParsedCommand,
    ) -> Self {
        let bot_id = connection.bot_user_id();
        let target = message
            .mentions
            .iter()
            .find(|u| Some(u.id) != bot_id)
            .cloned();

        Self {
            origin: Origin::Message,
            actor: message.author.clone(),
            target,
            group: message.guild.clone(),
            message: Some(MessageData {
                channel_id: message.channel_id,
                content: message.content.clone(),
                args: parsed.args.clone(),
            }),
            connection,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn actor(&self) -> &UserRef {
        &self.actor
    }

    pub fn target(&self) -> Option<&UserRef> {
        self.target.as_ref()
    }

    pub fn group(&self) -> Option<&GuildRef> {
        self.group.as_ref()
    }

    pub fn channel_id(&self) -> Option<u64> {
        self.message.as_ref().map(|m| m.channel_id)
    }

    pub fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    /// Look up a context field; `None` when this stimulus does not carry it
    pub fn field(&self, field: ContextField) -> Option<Value> {
        match field {
            ContextField::Actor => Some(Value::User(self.actor.clone())),
            ContextField::Target => self.target.clone().map(Value::User),
            ContextField::Group => self.group.clone().map(Value::Guild),
            ContextField::Channel => self.channel_id().map(Value::Channel),
            ContextField::Message => self
                .message
                .as_ref()
                .map(|m| Value::Text(m.content.clone())),
            ContextField::Args => self
                .message
                .as_ref()
                .map(|m| Value::Text(m.args.join(" "))),
        }
    }

    /// Channel that replies should go to: the source channel of a message,
    /// or the guild's system channel for lifecycle events.
    pub async fn reply_channel(&self) -> Result<u64> {
        if let Some(channel_id) = self.channel_id() {
            return Ok(channel_id);
        }
        let guild = self
            .group
            .as_ref()
            .ok_or_else(|| anyhow!("No channel to reply to for {} event", self.origin))?;
        self.connection
            .system_channel(guild.id)
            .await?
            .ok_or_else(|| anyhow!("Guild {} has no system channel", guild.id))
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("origin", &self.origin)
            .field("actor", &self.actor)
            .field("target", &self.target)
            .field("group", &self.group)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
