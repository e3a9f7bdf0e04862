//! Process configuration read from the environment
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Settings for the declarative dispatcher (prefix, mention prefix, gateway log)
//! - 1.0.0: Initial env-based config

use anyhow::{anyhow, Result};
use std::env;

/// Bot settings loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Literal prefix that marks a message as a command
    pub command_prefix: String,
    /// Also accept `@bot` as a command prefix
    pub allow_mention_prefix: bool,
    /// Log connection-level gateway events (ready, resume, shard stages)
    pub print_gateway_log: bool,
    /// JSON or YAML file holding the command and event tables
    pub actions_config_path: String,
    pub log_level: String,
    /// Sent to the channel when a prefixed message names no known command.
    /// Unknown commands are ignored silently when unset.
    pub unknown_command_reply: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let command_prefix = lookup("COMMAND_PREFIX").unwrap_or_else(|| "!".to_string());
        if command_prefix.trim().is_empty() {
            return Err(anyhow!("COMMAND_PREFIX must not be empty"));
        }

        let allow_mention_prefix = parse_flag(&lookup, "ALLOW_MENTION_PREFIX", true)?;
        let print_gateway_log = parse_flag(&lookup, "PRINT_GATEWAY_LOG", true)?;

        Ok(Config {
            discord_token,
            command_prefix,
            allow_mention_prefix,
            print_gateway_log,
            actions_config_path: lookup("ACTIONS_CONFIG_PATH")
                .unwrap_or_else(|| "actions.json".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            unknown_command_reply: lookup("UNKNOWN_COMMAND_REPLY").filter(|r| !r.is_empty()),
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(anyhow!("{key} must be a boolean, got '{other}'")),
        },
    }
}
