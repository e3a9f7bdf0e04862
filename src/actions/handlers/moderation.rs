//! Moderation actions
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! All of these act on the guild of the current dispatch and fail when
//! there is none (direct messages).
//!
//! ## Changelog
//! - 1.1.0: Ban and kick accept a member name as well as a mention or id
//! - 1.0.0: Initial ban, kick, unban and role actions

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;

use super::{require_group, role_arg, text_arg, user_arg};
use crate::actions::handler::{ActionHandler, Parameter};
use crate::actions::value::{GuildRef, ParamKind, Value};
use crate::dispatch::ExecutionContext;

/// Target member given as a mention, an id, or a user name / nickname
const MEMBER_AND_REASON: &[Parameter] = &[
    Parameter::new("member", ParamKind::Text),
    Parameter::new("reason", ParamKind::Text),
];

const USER_AND_ROLE: &[Parameter] = &[
    Parameter::new("user", ParamKind::User),
    Parameter::new("role", ParamKind::Role),
];

/// Resolve a member reference to a user id within `guild`
async fn resolve_member(ctx: &ExecutionContext, guild: &GuildRef, member: &str) -> Result<u64> {
    if let Some(Value::User(user)) = Value::parse(member, ParamKind::User) {
        return Ok(user.id);
    }
    ctx.connection()
        .find_member(guild.id, member.trim())
        .await?
        .ok_or_else(|| anyhow!("No member named '{member}' in {guild}"))
}

pub struct BanUser;

#[async_trait]
impl ActionHandler for BanUser {
    fn name(&self) -> &'static str {
        "BanUser"
    }

    fn parameters(&self) -> &'static [Parameter] {
        MEMBER_AND_REASON
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let member = text_arg(&args, 0)?;
        let reason = text_arg(&args, 1)?;
        let guild = require_group(ctx)?;
        let user_id = resolve_member(ctx, guild, member).await?;

        ctx.connection().ban_member(guild.id, user_id, reason).await?;
        info!("🔨 Banned {} from {} ({})", user_id, guild.id, reason);
        Ok(())
    }
}

pub struct KickUser;

#[async_trait]
impl ActionHandler for KickUser {
    fn name(&self) -> &'static str {
        "KickUser"
    }

    fn parameters(&self) -> &'static [Parameter] {
        MEMBER_AND_REASON
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let member = text_arg(&args, 0)?;
        let reason = text_arg(&args, 1)?;
        let guild = require_group(ctx)?;
        let user_id = resolve_member(ctx, guild, member).await?;

        ctx.connection().kick_member(guild.id, user_id, reason).await?;
        info!("👢 Kicked {} from {} ({})", user_id, guild.id, reason);
        Ok(())
    }
}

pub struct UnbanUser;

#[async_trait]
impl ActionHandler for UnbanUser {
    fn name(&self) -> &'static str {
        "UnbanUser"
    }

    fn parameters(&self) -> &'static [Parameter] {
        const PARAMS: &[Parameter] = &[Parameter::new("user", ParamKind::User)];
        PARAMS
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let user = user_arg(&args, 0)?;
        let guild = require_group(ctx)?;
        ctx.connection().unban_member(guild.id, user.id).await
    }
}

pub struct AddRole;

#[async_trait]
impl ActionHandler for AddRole {
    fn name(&self) -> &'static str {
        "AddRole"
    }

    fn parameters(&self) -> &'static [Parameter] {
        USER_AND_ROLE
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let user = user_arg(&args, 0)?;
        let role = role_arg(&args, 1)?;
        let guild = require_group(ctx)?;
        ctx.connection().add_role(guild.id, user.id, role).await
    }
}

pub struct RemoveRole;

#[async_trait]
impl ActionHandler for RemoveRole {
    fn name(&self) -> &'static str {
        "RemoveRole"
    }

    fn parameters(&self) -> &'static [Parameter] {
        USER_AND_ROLE
    }

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        let user = user_arg(&args, 0)?;
        let role = role_arg(&args, 1)?;
        let guild = require_group(ctx)?;
        ctx.connection().remove_role(guild.id, user.id, role).await
    }
}
