//! Platform connection handle used by actions
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Actions never touch serenity directly; they go through [`Connection`],
//! which is shared by every in-flight dispatch.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use log::debug;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;

use crate::core::chunk_for_message;

const MEMBER_SEARCH_LIMIT: u64 = 10;

/// Operations an action may perform against the chat platform
#[async_trait]
pub trait Connection: Send + Sync {
    /// Id of the bot's own account, once known
    fn bot_user_id(&self) -> Option<u64>;

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()>;

    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<()>;

    async fn ban_member(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<()>;

    async fn unban_member(&self, guild_id: u64, user_id: u64) -> Result<()>;

    async fn kick_member(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<()>;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    /// Channel the guild uses for join/leave notices, if it has one
    async fn system_channel(&self, guild_id: u64) -> Result<Option<u64>>;

    /// Id of the guild member whose user name or nickname is `name`
    async fn find_member(&self, guild_id: u64, name: &str) -> Result<Option<u64>>;
}

/// [`Connection`] backed by serenity's HTTP client and cache
#[derive(Clone)]
pub struct SerenityConnection {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityConnection {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    pub fn from_context(ctx: &serenity::prelude::Context) -> Self {
        Self::new(ctx.http.clone(), ctx.cache.clone())
    }
}

#[async_trait]
impl Connection for SerenityConnection {
    fn bot_user_id(&self) -> Option<u64> {
        let id = self.cache.current_user_id();
        // The cache reports 0 until the Ready event has been processed
        (id.0 != 0).then_some(id.0)
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()> {
        for chunk in chunk_for_message(content) {
            ChannelId(channel_id)
                .say(&self.http, chunk)
                .await
                .with_context(|| format!("Failed to send message to channel {channel_id}"))?;
        }
        Ok(())
    }

    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<()> {
        let dm = UserId(user_id)
            .create_dm_channel(&self.http)
            .await
            .with_context(|| format!("Failed to open DM channel with user {user_id}"))?;
        self.send_message(dm.id.0, content).await
    }

    async fn ban_member(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<()> {
        debug!("Banning user {user_id} from guild {guild_id}");
        let result = if reason.is_empty() {
            GuildId(guild_id).ban(&self.http, UserId(user_id), 0).await
        } else {
            GuildId(guild_id)
                .ban_with_reason(&self.http, UserId(user_id), 0, reason)
                .await
        };
        result.with_context(|| format!("Failed to ban user {user_id} from guild {guild_id}"))
    }

    async fn unban_member(&self, guild_id: u64, user_id: u64) -> Result<()> {
        GuildId(guild_id)
            .unban(&self.http, UserId(user_id))
            .await
            .with_context(|| format!("Failed to unban user {user_id} in guild {guild_id}"))
    }

    async fn kick_member(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<()> {
        debug!("Kicking user {user_id} from guild {guild_id}");
        let result = if reason.is_empty() {
            GuildId(guild_id).kick(&self.http, UserId(user_id)).await
        } else {
            GuildId(guild_id)
                .kick_with_reason(&self.http, UserId(user_id), reason)
                .await
        };
        result.with_context(|| format!("Failed to kick user {user_id} from guild {guild_id}"))
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.http
            .add_member_role(guild_id, user_id, role_id, None)
            .await
            .with_context(|| format!("Failed to add role {role_id} to user {user_id}"))
    }

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.http
            .remove_member_role(guild_id, user_id, role_id, None)
            .await
            .with_context(|| format!("Failed to remove role {role_id} from user {user_id}"))
    }

    async fn system_channel(&self, guild_id: u64) -> Result<Option<u64>> {
        if let Some(channel) = self
            .cache
            .guild_field(GuildId(guild_id), |g| g.system_channel_id)
        {
            return Ok(channel.map(|c| c.0));
        }

        let guild = GuildId(guild_id)
            .to_partial_guild(&self.http)
            .await
            .with_context(|| format!("Failed to fetch guild {guild_id}"))?;
        Ok(guild.system_channel_id.map(|c| c.0))
    }

    async fn find_member(&self, guild_id: u64, name: &str) -> Result<Option<u64>> {
        if let Some(Some(id)) = self
            .cache
            .guild_field(GuildId(guild_id), |g| g.member_named(name).map(|m| m.user.id))
        {
            return Ok(Some(id.0));
        }

        let members = GuildId(guild_id)
            .search_members(&self.http, name, Some(MEMBER_SEARCH_LIMIT))
            .await
            .with_context(|| format!("Failed to search members of guild {guild_id}"))?;
        Ok(members
            .iter()
            .find(|m| {
                m.user.name.eq_ignore_ascii_case(name)
                    || m.nick.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .map(|m| m.user.id.0))
    }
}
