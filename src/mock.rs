//! Test doubles for the connection handle and for actions

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::actions::handler::{ActionHandler, Parameter};
use crate::actions::value::{ParamKind, Value};
use crate::dispatch::ExecutionContext;
use crate::gateway::Connection;

/// A platform mutation observed by [`MockConnection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCall {
    Message { channel_id: u64, content: String },
    DirectMessage { user_id: u64, content: String },
    Ban { guild_id: u64, user_id: u64, reason: String },
    Unban { guild_id: u64, user_id: u64 },
    Kick { guild_id: u64, user_id: u64, reason: String },
    AddRole { guild_id: u64, user_id: u64, role_id: u64 },
    RemoveRole { guild_id: u64, user_id: u64, role_id: u64 },
}

#[derive(Default)]
pub struct MockConnection {
    bot_id: Option<u64>,
    system_channels: HashMap<u64, u64>,
    members: HashMap<(u64, String), u64>,
    calls: Mutex<Vec<ConnectionCall>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bot_id(mut self, id: u64) -> Self {
        self.bot_id = Some(id);
        self
    }

    pub fn with_system_channel(mut self, guild_id: u64, channel_id: u64) -> Self {
        self.system_channels.insert(guild_id, channel_id);
        self
    }

    pub fn with_member(mut self, guild_id: u64, name: &str, user_id: u64) -> Self {
        self.members.insert((guild_id, name.to_lowercase()), user_id);
        self
    }

    pub fn calls(&self) -> Vec<ConnectionCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ConnectionCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn bot_user_id(&self) -> Option<u64> {
        self.bot_id
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<()> {
        self.record(ConnectionCall::Message {
            channel_id,
            content: content.to_string(),
        })
    }

    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<()> {
        self.record(ConnectionCall::DirectMessage {
            user_id,
            content: content.to_string(),
        })
    }

    async fn ban_member(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<()> {
        self.record(ConnectionCall::Ban {
            guild_id,
            user_id,
            reason: reason.to_string(),
        })
    }

    async fn unban_member(&self, guild_id: u64, user_id: u64) -> Result<()> {
        self.record(ConnectionCall::Unban { guild_id, user_id })
    }

    async fn kick_member(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<()> {
        self.record(ConnectionCall::Kick {
            guild_id,
            user_id,
            reason: reason.to_string(),
        })
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.record(ConnectionCall::AddRole {
            guild_id,
            user_id,
            role_id,
        })
    }

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.record(ConnectionCall::RemoveRole {
            guild_id,
            user_id,
            role_id,
        })
    }

    async fn system_channel(&self, guild_id: u64) -> Result<Option<u64>> {
        Ok(self.system_channels.get(&guild_id).copied())
    }

    async fn find_member(&self, guild_id: u64, name: &str) -> Result<Option<u64>> {
        Ok(self.members.get(&(guild_id, name.to_lowercase())).copied())
    }
}

/// One invocation seen by a [`RecordingAction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub action: String,
    pub args: Vec<String>,
}

pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

const PARAM_NAMES: [&str; 6] = ["arg0", "arg1", "arg2", "arg3", "arg4", "arg5"];

/// Action that records its arguments (as display strings) into a shared log
pub struct RecordingAction {
    name: &'static str,
    params: &'static [Parameter],
    log: CallLog,
    fail: bool,
}

impl RecordingAction {
    pub fn new(name: &'static str, kinds: &[ParamKind]) -> (Arc<Self>, CallLog) {
        let log = CallLog::default();
        (Self::with_log(name, kinds, log.clone()), log)
    }

    pub fn with_log(name: &'static str, kinds: &[ParamKind], log: CallLog) -> Arc<Self> {
        let params: Vec<Parameter> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| Parameter::new(PARAM_NAMES[i], *kind))
            .collect();
        Arc::new(Self {
            name,
            params: Box::leak(params.into_boxed_slice()),
            log,
            fail: false,
        })
    }

    /// Records the call, then reports failure
    pub fn failing(name: &'static str, kinds: &[ParamKind], log: CallLog) -> Arc<Self> {
        let mut action = Self::with_log(name, kinds, log);
        if let Some(inner) = Arc::get_mut(&mut action) {
            inner.fail = true;
        }
        action
    }
}

#[async_trait]
impl ActionHandler for RecordingAction {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parameters(&self) -> &'static [Parameter] {
        self.params
    }

    async fn invoke(&self, _ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
        self.log.lock().unwrap().push(RecordedCall {
            action: self.name.to_string(),
            args: args.iter().map(Value::to_string).collect(),
        });
        if self.fail {
            return Err(anyhow!("{} failed on purpose", self.name));
        }
        Ok(())
    }
}
