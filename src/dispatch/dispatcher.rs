//! Dispatcher
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Entry point for inbound stimuli. A message goes through prefix check,
//! tokenizing, command lookup, context binding, then each configured action
//! in order. A lifecycle event skips straight to the event table lookup.
//!
//! Actions in one list run strictly one after another; each is awaited
//! before the next starts. A failing action is logged and the remaining
//! actions still run. Nothing is rolled back.

use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::context::{ExecutionContext, InboundMessage, LifecycleEvent};
use super::error::{DispatchError, DispatchResult};
use super::resolver::resolve_arguments;
use super::table::{ActionInvocation, DispatchTables};
use super::tokenizer::{tokenize, ParsedCommand};
use crate::actions::ActionRegistry;
use crate::core::Config;
use crate::gateway::Connection;

/// How messages are recognised as commands
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub prefix: String,
    pub allow_mention_prefix: bool,
    pub unknown_command_reply: Option<String>,
}

impl DispatchSettings {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            allow_mention_prefix: true,
            unknown_command_reply: None,
        }
    }
}

impl From<&Config> for DispatchSettings {
    fn from(config: &Config) -> Self {
        Self {
            prefix: config.command_prefix.clone(),
            allow_mention_prefix: config.allow_mention_prefix,
            unknown_command_reply: config.unknown_command_reply.clone(),
        }
    }
}

/// What happened to one stimulus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Bot-authored, or not addressed to the bot
    Ignored,
    /// No definition for this event kind
    NotWired,
    /// Prefixed, but the command name is not in the table
    UnknownCommand,
    Completed { succeeded: usize, failed: usize },
}

/// Shared, read-only dispatcher; clone freely across tasks
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    tables: Arc<DispatchTables>,
    settings: Arc<DispatchSettings>,
}

impl Dispatcher {
    pub fn new(registry: ActionRegistry, tables: DispatchTables, settings: DispatchSettings) -> Self {
        let dispatcher = Self {
            registry: Arc::new(registry),
            tables: Arc::new(tables),
            settings: Arc::new(settings),
        };
        dispatcher.warn_unregistered_actions();
        dispatcher
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn tables(&self) -> &DispatchTables {
        &self.tables
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Startup hint only: unknown action names still fail per invocation
    fn warn_unregistered_actions(&self) {
        let commands = self
            .tables
            .commands
            .names()
            .filter_map(|name| self.tables.commands.get(name))
            .flat_map(|c| c.actions.iter());
        let events = crate::dispatch::EventKind::ALL
            .iter()
            .filter_map(|kind| self.tables.events.get(*kind))
            .flat_map(|e| e.actions.iter());

        for invocation in commands.chain(events) {
            if !self.registry.contains(&invocation.action) {
                warn!(
                    "⚠️ Configured action '{}' is not registered; invocations will fail",
                    invocation.action
                );
            }
        }
    }

    /// Handle one inbound message
    pub async fn dispatch_message(
        &self,
        connection: Arc<dyn Connection>,
        message: &InboundMessage,
    ) -> DispatchOutcome {
        let bot_id = connection.bot_user_id();
        if message.author.is_bot || Some(message.author.id) == bot_id {
            return DispatchOutcome::Ignored;
        }

        let Some(parsed) = self.parse_command(&message.content, bot_id) else {
            return DispatchOutcome::Ignored;
        };

        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] 📥 Command '{}' from {} in channel {} with {} arg(s)",
            parsed.name,
            message.author.id,
            message.channel_id,
            parsed.args.len()
        );

        let Some(command) = self.tables.commands.get(&parsed.name) else {
            debug!(
                "[{request_id}] {}",
                DispatchError::Lookup {
                    name: parsed.name.clone()
                }
            );
            self.reply_unknown_command(request_id, connection.as_ref(), message, &parsed)
                .await;
            return DispatchOutcome::UnknownCommand;
        };

        let ctx = ExecutionContext::for_message(connection, message, &parsed);
        self.run_actions(request_id, &command.actions, &ctx, &parsed.args)
            .await
    }

    /// Handle one lifecycle event
    pub async fn dispatch_event(
        &self,
        connection: Arc<dyn Connection>,
        event: &LifecycleEvent,
    ) -> DispatchOutcome {
        let Some(definition) = self.tables.events.get(event.kind) else {
            return DispatchOutcome::NotWired;
        };

        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] 📥 {} for user {} ({} action(s))",
            event.kind,
            event.actor.id,
            definition.actions.len()
        );

        let ctx = ExecutionContext::for_event(connection, event);
        self.run_actions(request_id, &definition.actions, &ctx, &[])
            .await
    }

    /// Run an action list in order, isolating failures
    async fn run_actions(
        &self,
        request_id: Uuid,
        actions: &[ActionInvocation],
        ctx: &ExecutionContext,
        tokens: &[String],
    ) -> DispatchOutcome {
        let mut succeeded = 0;
        let mut failed = 0;

        for invocation in actions {
            match self.invoke(invocation, ctx, tokens).await {
                Ok(()) => {
                    info!("[{request_id}] ✅ {} ({})", invocation.action, ctx.origin());
                    succeeded += 1;
                }
                Err(e) => {
                    warn!("[{request_id}] ⚠️ {e}");
                    failed += 1;
                }
            }
        }

        DispatchOutcome::Completed { succeeded, failed }
    }

    /// Resolve and invoke a single action
    pub async fn invoke(
        &self,
        invocation: &ActionInvocation,
        ctx: &ExecutionContext,
        tokens: &[String],
    ) -> DispatchResult<()> {
        let action = self
            .registry
            .get(&invocation.action)
            .ok_or_else(|| DispatchError::UnknownAction {
                name: invocation.action.clone(),
            })?;

        let args = resolve_arguments(
            &action.descriptor.name,
            &invocation.arguments,
            &action.descriptor.parameters,
            ctx,
            tokens,
        )?;

        action
            .handler
            .invoke(ctx, args)
            .await
            .map_err(|source| DispatchError::Invocation {
                action: action.descriptor.name.clone(),
                source,
            })
    }

    /// Strip the literal prefix or, if allowed, a leading mention of the bot.
    ///
    /// Returns `None` when the message is not addressed to the bot.
    pub fn parse_command(&self, content: &str, bot_id: Option<u64>) -> Option<ParsedCommand> {
        if content.starts_with(&self.settings.prefix) {
            return Some(tokenize(content, &self.settings.prefix));
        }

        if self.settings.allow_mention_prefix {
            let id = bot_id?;
            for mention in [format!("<@{id}>"), format!("<@!{id}>")] {
                if let Some(rest) = content.strip_prefix(&mention) {
                    return Some(tokenize(rest, ""));
                }
            }
        }

        None
    }

    async fn reply_unknown_command(
        &self,
        request_id: Uuid,
        connection: &dyn Connection,
        message: &InboundMessage,
        parsed: &ParsedCommand,
    ) {
        let Some(reply) = &self.settings.unknown_command_reply else {
            return;
        };
        if parsed.name.is_empty() {
            return;
        }
        if let Err(e) = connection.send_message(message.channel_id, reply).await {
            warn!("[{request_id}] Failed to send unknown-command reply: {e}");
        }
    }
}
