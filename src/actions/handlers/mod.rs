//! Built-in action implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Messaging (SendMessage, SendChannelMessage, SendDirectMessage, SendWelcome, Log)
//!   and moderation (BanUser, KickUser, UnbanUser, AddRole, RemoveRole)

pub mod messaging;
pub mod moderation;

use anyhow::{anyhow, Result};
use std::sync::Arc;

use super::handler::ActionHandler;
use super::value::{GuildRef, UserRef, Value};
use crate::dispatch::ExecutionContext;

/// Create every built-in action handler
///
/// Returns handlers ready to be registered with ActionRegistry.
pub fn create_builtin_handlers() -> Vec<Arc<dyn ActionHandler>> {
    vec![
        Arc::new(messaging::SendMessage),
        Arc::new(messaging::SendChannelMessage),
        Arc::new(messaging::SendDirectMessage),
        Arc::new(messaging::SendWelcome),
        Arc::new(messaging::Log),
        Arc::new(moderation::BanUser),
        Arc::new(moderation::KickUser),
        Arc::new(moderation::UnbanUser),
        Arc::new(moderation::AddRole),
        Arc::new(moderation::RemoveRole),
    ]
}

fn arg<'a>(args: &'a [Value], index: usize) -> Result<&'a Value> {
    args.get(index).ok_or_else(|| anyhow!("Missing argument {index}"))
}

fn text_arg(args: &[Value], index: usize) -> Result<&str> {
    arg(args, index)?
        .as_text()
        .ok_or_else(|| anyhow!("Argument {index} is not text"))
}

fn user_arg(args: &[Value], index: usize) -> Result<&UserRef> {
    arg(args, index)?
        .as_user()
        .ok_or_else(|| anyhow!("Argument {index} is not a user"))
}

fn channel_arg(args: &[Value], index: usize) -> Result<u64> {
    arg(args, index)?
        .as_channel()
        .ok_or_else(|| anyhow!("Argument {index} is not a channel"))
}

fn role_arg(args: &[Value], index: usize) -> Result<u64> {
    arg(args, index)?
        .as_role()
        .ok_or_else(|| anyhow!("Argument {index} is not a role"))
}

/// Guild the action applies to; moderation needs one
fn require_group(ctx: &ExecutionContext) -> Result<&GuildRef> {
    ctx.group().ok_or_else(|| {
        anyhow!(
            "This action needs a guild; none is available for {} dispatches",
            ctx.origin()
        )
    })
}
