//! Serenity event handler
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Converts gateway events into [`InboundMessage`] and [`LifecycleEvent`]
//! values and hands them to the [`Dispatcher`]. Serenity already runs each
//! event on its own task, so dispatches here are awaited in place.
//!
//! ## Changelog
//! - 1.0.0: Replaces the slash-command handler with table-driven dispatch

use log::{debug, info, warn};
use serenity::async_trait;
use serenity::client::bridge::gateway::event::ShardStageUpdateEvent;
use serenity::gateway::GatewayError;
use serenity::http::HttpError;
use serenity::model::channel::Message;
use serenity::model::event::ResumedEvent;
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::sync::Arc;

use super::connection::{Connection, SerenityConnection};
use crate::actions::value::{GuildRef, UserRef};
use crate::dispatch::{
    DispatchOutcome, Dispatcher, EventKind, EventTable, InboundMessage, LifecycleEvent,
};

pub struct Handler {
    dispatcher: Dispatcher,
    print_gateway_log: bool,
}

impl Handler {
    pub fn new(dispatcher: Dispatcher, print_gateway_log: bool) -> Self {
        Self {
            dispatcher,
            print_gateway_log,
        }
    }

    async fn dispatch_lifecycle(
        &self,
        ctx: &Context,
        kind: EventKind,
        guild_id: GuildId,
        user: &User,
    ) {
        let event = LifecycleEvent {
            kind,
            actor: user_ref(user),
            secondary: None,
            group: Some(guild_ref(ctx, guild_id)),
        };
        let connection: Arc<dyn Connection> = Arc::new(SerenityConnection::from_context(ctx));
        let outcome = self.dispatcher.dispatch_event(connection, &event).await;
        log_outcome(&kind.to_string(), outcome);
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let guild = msg.guild_id.map(|id| guild_ref(&ctx, id));
        let inbound = inbound_message(&msg, guild);
        let connection: Arc<dyn Connection> = Arc::new(SerenityConnection::from_context(&ctx));
        let outcome = self.dispatcher.dispatch_message(connection, &inbound).await;
        if outcome != DispatchOutcome::Ignored {
            log_outcome("message", outcome);
        }
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        self.dispatch_lifecycle(&ctx, EventKind::UserJoined, new_member.guild_id, &new_member.user)
            .await;
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        self.dispatch_lifecycle(&ctx, EventKind::UserLeft, guild_id, &user)
            .await;
    }

    async fn guild_ban_addition(&self, ctx: Context, guild_id: GuildId, banned_user: User) {
        self.dispatch_lifecycle(&ctx, EventKind::UserBanned, guild_id, &banned_user)
            .await;
    }

    async fn guild_ban_removal(&self, ctx: Context, guild_id: GuildId, unbanned_user: User) {
        self.dispatch_lifecycle(&ctx, EventKind::UserUnbanned, guild_id, &unbanned_user)
            .await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        if self.print_gateway_log {
            info!("📡 Connected to {} guilds", ready.guilds.len());
            info!("🔗 Gateway session ID: {:?}", ready.session_id);
            info!("🤖 Bot ID: {}", ready.user.id);
            if let Some(shard) = ready.shard {
                info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
            }
        }
        info!(
            "📜 {} command(s), {} event(s) wired",
            self.dispatcher.tables().commands.len(),
            self.dispatcher.tables().events.len()
        );
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        if self.print_gateway_log {
            info!("🔄 Gateway session resumed");
        }
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        if self.print_gateway_log {
            info!(
                "⚡ Shard {} stage: {:?} -> {:?}",
                event.shard_id.0, event.old, event.new
            );
        }
    }
}

fn log_outcome(source: &str, outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::Completed { failed, .. } if failed > 0 => {
            warn!("⚠️ {source}: {outcome:?}");
        }
        _ => debug!("{source}: {outcome:?}"),
    }
}

pub fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.0,
        name: user.name.clone(),
        is_bot: user.bot,
    }
}

fn guild_ref(ctx: &Context, guild_id: GuildId) -> GuildRef {
    GuildRef::new(guild_id.0, guild_id.name(&ctx.cache).unwrap_or_default())
}

pub fn inbound_message(msg: &Message, guild: Option<GuildRef>) -> InboundMessage {
    InboundMessage {
        id: msg.id.0,
        author: user_ref(&msg.author),
        content: msg.content.clone(),
        channel_id: msg.channel_id.0,
        guild,
        mentions: msg.mentions.iter().map(user_ref).collect(),
    }
}

/// Gateway intents for a set of wired events.
///
/// Member and ban intents are only requested when an event that needs them
/// is wired, so unused events cost no subscription.
pub fn gateway_intents(events: &EventTable) -> GatewayIntents {
    let mut intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    for kind in events.wired() {
        intents |= match kind {
            EventKind::UserJoined | EventKind::UserLeft => GatewayIntents::GUILD_MEMBERS,
            EventKind::UserBanned | EventKind::UserUnbanned => GatewayIntents::GUILD_BANS,
        };
    }
    intents
}

/// Why logging in to the gateway failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    InvalidToken,
    Unreachable,
    Other,
}

impl LoginFailure {
    pub fn describe(&self) -> &'static str {
        match self {
            LoginFailure::InvalidToken => "The bot token was rejected",
            LoginFailure::Unreachable => "The gateway could not be reached",
            LoginFailure::Other => "Login failed",
        }
    }
}

pub fn classify_login_error(error: &serenity::Error) -> LoginFailure {
    match error {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => LoginFailure::InvalidToken,
        serenity::Error::Http(http) => match http.as_ref() {
            HttpError::UnsuccessfulRequest(response) if response.status_code.as_u16() == 401 => {
                LoginFailure::InvalidToken
            }
            HttpError::Request(_) => LoginFailure::Unreachable,
            _ => LoginFailure::Other,
        },
        serenity::Error::Io(_) | serenity::Error::Tungstenite(_) => LoginFailure::Unreachable,
        _ => LoginFailure::Other,
    }
}
