//! Messaging actions
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use super::{channel_arg, text_arg, user_arg};
use crate::actions::handler::{ActionHandler, Parameter};
use crate::actions::value::{ParamKind, Value};
use crate::dispatch::ExecutionContext;

const TEXT_ONLY: &[Parameter] = &[Parameter::new("text", ParamKind::Text)];

/// Post text to the reply channel (source channel, or the guild's system channel)
pub struct SendMessage;

#[async_trait]
impl ActionHandler for SendMessage {
    fn name(&self) -> &'static str {
        "SendMessage"
    }

    fn parameters(&self) -> &'static [Parameter] {
        TEXT_ONLY
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let text = text_arg(&args, 0)?;
        let channel = ctx.reply_channel().await?;
        ctx.connection().send_message(channel, text).await
    }
}

pub struct SendChannelMessage;

#[async_trait]
impl ActionHandler for SendChannelMessage {
    fn name(&self) -> &'static str {
        "SendChannelMessage"
    }

    fn parameters(&self) -> &'static [Parameter] {
        const PARAMS: &[Parameter] = &[
            Parameter::new("channel", ParamKind::Channel),
            Parameter::new("text", ParamKind::Text),
        ];
        PARAMS
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let channel = channel_arg(&args, 0)?;
        let text = text_arg(&args, 1)?;
        ctx.connection().send_message(channel, text).await
    }
}

pub struct SendDirectMessage;

#[async_trait]
impl ActionHandler for SendDirectMessage {
    fn name(&self) -> &'static str {
        "SendDirectMessage"
    }

    fn parameters(&self) -> &'static [Parameter] {
        const PARAMS: &[Parameter] = &[
            Parameter::new("user", ParamKind::User),
            Parameter::new("text", ParamKind::Text),
        ];
        PARAMS
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let user = user_arg(&args, 0)?;
        let text = text_arg(&args, 1)?;
        ctx.connection().send_direct_message(user.id, text).await
    }
}

/// Greet a user in the reply channel
pub struct SendWelcome;

#[async_trait]
impl ActionHandler for SendWelcome {
    fn name(&self) -> &'static str {
        "SendWelcome"
    }

    fn parameters(&self) -> &'static [Parameter] {
        const PARAMS: &[Parameter] = &[Parameter::new("user", ParamKind::User)];
        PARAMS
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let user = user_arg(&args, 0)?;
        let text = match ctx.group() {
            Some(guild) if !guild.name.is_empty() => {
                format!("Welcome to {}, {}!", guild.name, user.mention())
            }
            _ => format!("Welcome, {}!", user.mention()),
        };
        let channel = ctx.reply_channel().await?;
        ctx.connection().send_message(channel, &text).await
    }
}

/// Write a line to the bot's log
pub struct Log;

#[async_trait]
impl ActionHandler for Log {
    fn name(&self) -> &'static str {
        "Log"
    }

    fn parameters(&self) -> &'static [Parameter] {
        TEXT_ONLY
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let text = text_arg(&args, 0)?;
        info!("📝 [{}] {}", ctx.origin(), text);
        Ok(())
    }
}
