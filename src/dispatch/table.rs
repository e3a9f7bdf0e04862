//! # Command and Event Tables
//!
//! Declarative action configuration: which actions a command or lifecycle
//! event runs, and with which argument templates. Loaded once from JSON or
//! YAML before the gateway starts; read-only afterwards.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ```yaml
//! commands:
//!   - name: ban
//!     actions:
//!       - action: BanUser
//!         arguments: ["$0", "$1"]
//! events:
//!   - event: UserJoined
//!     actions:
//!       - action: SendWelcome
//!         arguments: ["${actor}"]
//! ```

use anyhow::{anyhow, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::context::EventKind;
use super::template::ArgumentTemplate;

/// Root of the action configuration file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
    #[serde(default)]
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub actions: Vec<InvocationEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EventEntry {
    pub event: EventKind,
    pub actions: Vec<InvocationEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationEntry {
    pub action: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl ActionConfig {
    /// Read a config file, choosing the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let parse: fn(&str) -> Result<Self> = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(anyhow!(
                    "Unsupported action config format: {} (expected .json, .yaml or .yml)",
                    path.display()
                ))
            }
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read action config {}", path.display()))?;
        parse(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid action config JSON")
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("Invalid action config YAML")
    }
}

/// One action call with its declared argument templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInvocation {
    pub action: String,
    pub arguments: Vec<ArgumentTemplate>,
}

impl ActionInvocation {
    fn from_entry(entry: &InvocationEntry) -> Result<Self> {
        if entry.action.trim().is_empty() {
            return Err(anyhow!("Action name must not be empty"));
        }
        let arguments = entry
            .arguments
            .iter()
            .map(|raw| ArgumentTemplate::parse(raw))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("In action '{}'", entry.action))?;
        Ok(Self {
            action: entry.action.clone(),
            arguments,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: Option<String>,
    pub actions: Vec<ActionInvocation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDefinition {
    pub kind: EventKind,
    pub actions: Vec<ActionInvocation>,
}

/// Commands keyed by lower-cased name; lookups ignore case
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: HashMap<String, CommandDefinition>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command; fails if a command with the same name (ignoring case) exists
    pub fn insert(&mut self, definition: CommandDefinition) -> Result<()> {
        let key = definition.name.to_lowercase();
        if self.commands.contains_key(&key) {
            return Err(anyhow!("Duplicate command '{}'", definition.name));
        }
        self.commands.insert(key, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.values().map(|c| c.name.as_str())
    }
}

/// At most one definition per event kind
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: HashMap<EventKind, EventDefinition>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: EventDefinition) -> Result<()> {
        if self.events.contains_key(&definition.kind) {
            return Err(anyhow!("Duplicate event definition for {}", definition.kind));
        }
        self.events.insert(definition.kind, definition);
        Ok(())
    }

    pub fn get(&self, kind: EventKind) -> Option<&EventDefinition> {
        self.events.get(&kind)
    }

    pub fn is_wired(&self, kind: EventKind) -> bool {
        self.events.contains_key(&kind)
    }

    pub fn wired(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.events.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Validated command and event tables
#[derive(Debug, Clone, Default)]
pub struct DispatchTables {
    pub commands: CommandTable,
    pub events: EventTable,
}

impl DispatchTables {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(&ActionConfig::load(path)?)
    }

    /// Validate a parsed config and build the lookup tables
    pub fn from_config(config: &ActionConfig) -> Result<Self> {
        let mut tables = DispatchTables::default();

        for entry in &config.commands {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(anyhow!("Command name must not be empty"));
            }
            if name.contains(char::is_whitespace) {
                return Err(anyhow!("Command name must not contain whitespace: '{name}'"));
            }
            if entry.actions.is_empty() {
                return Err(anyhow!("Command '{name}' has no actions"));
            }

            let actions = entry
                .actions
                .iter()
                .map(ActionInvocation::from_entry)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("In command '{name}'"))?;

            tables.commands.insert(CommandDefinition {
                name: name.to_string(),
                description: entry.description.clone(),
                actions,
            })?;
        }

        for entry in &config.events {
            if entry.actions.is_empty() {
                return Err(anyhow!("Event {} has no actions", entry.event));
            }

            let actions = entry
                .actions
                .iter()
                .map(ActionInvocation::from_entry)
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("In event {}", entry.event))?;

            // Lifecycle events never carry caller-supplied tokens
            if let Some(invocation) = actions
                .iter()
                .find(|a| a.arguments.iter().any(ArgumentTemplate::uses_positional))
            {
                return Err(anyhow!(
                    "Event {} action '{}' uses a positional argument; events have no caller tokens",
                    entry.event,
                    invocation.action
                ));
            }

            tables.events.insert(EventDefinition {
                kind: entry.event,
                actions,
            })?;
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::context::ContextField;

    const SAMPLE_JSON: &str = r#"{
        "commands": [
            { "name": "ban", "actions": [ { "action": "BanUser", "arguments": ["$0", "$1"] } ] },
            { "name": "Greet", "description": "Say hi", "actions": [
                { "action": "SendMessage", "arguments": ["Hello ${actor}!"] }
            ] }
        ],
        "events": [
            { "event": "UserJoined", "actions": [ { "action": "SendWelcome", "arguments": ["${actor}"] } ] }
        ]
    }"#;

    #[test]
    fn test_parse_json_config() {
        let tables = DispatchTables::from_config(&ActionConfig::from_json_str(SAMPLE_JSON).unwrap())
            .unwrap();
        assert_eq!(tables.commands.len(), 2);
        assert_eq!(tables.events.len(), 1);

        let ban = tables.commands.get("ban").unwrap();
        assert_eq!(
            ban.actions[0].arguments,
            vec![ArgumentTemplate::Positional(0), ArgumentTemplate::Positional(1)]
        );

        let joined = tables.events.get(EventKind::UserJoined).unwrap();
        assert_eq!(
            joined.actions[0].arguments,
            vec![ArgumentTemplate::ContextRef(ContextField::Actor)]
        );
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
commands:
  - name: kick
    actions:
      - action: KickUser
        arguments: ["${target}", "$0"]
events:
  - event: UserBanned
    actions:
      - action: Log
        arguments: ["${actor} was banned"]
"#;
        let tables =
            DispatchTables::from_config(&ActionConfig::from_yaml_str(yaml).unwrap()).unwrap();
        assert!(tables.commands.get("kick").is_some());
        assert!(tables.events.is_wired(EventKind::UserBanned));
        assert!(!tables.events.is_wired(EventKind::UserJoined));
    }

    #[test]
    fn test_command_lookup_ignores_case() {
        let tables = DispatchTables::from_config(&ActionConfig::from_json_str(SAMPLE_JSON).unwrap())
            .unwrap();
        for name in ["greet", "GREET", "Greet"] {
            let found = tables.commands.get(name).unwrap();
            assert_eq!(found.name, "Greet");
            assert!(!found.actions.is_empty());
        }
        assert!(tables.commands.get("missing").is_none());
        assert!(tables.commands.get("").is_none());
    }

    #[test]
    fn test_unknown_event_kind_fails_at_load() {
        let json = r#"{ "events": [ { "event": "UserSneezed", "actions": [] } ] }"#;
        assert!(ActionConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_missing_fields_fail_at_load() {
        assert!(ActionConfig::from_json_str(r#"{ "commands": [ { "name": "x" } ] }"#).is_err());
        assert!(ActionConfig::from_json_str(
            r#"{ "commands": [ { "name": "x", "actions": [ { "arguments": [] } ] } ] }"#
        )
        .is_err());
    }

    #[test]
    fn test_unknown_field_fails_at_load() {
        let json = r#"{ "commands": [], "extras": true }"#;
        assert!(ActionConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let json = r#"{ "commands": [
            { "name": "ping", "actions": [ { "action": "Log", "arguments": ["a"] } ] },
            { "name": "PING", "actions": [ { "action": "Log", "arguments": ["b"] } ] }
        ] }"#;
        let err = DispatchTables::from_config(&ActionConfig::from_json_str(json).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate command"));
    }

    #[test]
    fn test_duplicate_event_rejected() {
        let json = r#"{ "events": [
            { "event": "UserLeft", "actions": [ { "action": "Log", "arguments": ["a"] } ] },
            { "event": "UserLeft", "actions": [ { "action": "Log", "arguments": ["b"] } ] }
        ] }"#;
        assert!(DispatchTables::from_config(&ActionConfig::from_json_str(json).unwrap()).is_err());
    }

    #[test]
    fn test_empty_action_list_rejected() {
        let json = r#"{ "commands": [ { "name": "noop", "actions": [] } ] }"#;
        assert!(DispatchTables::from_config(&ActionConfig::from_json_str(json).unwrap()).is_err());
    }

    #[test]
    fn test_bad_command_names_rejected() {
        for name in ["", "   ", "two words"] {
            let config = ActionConfig {
                commands: vec![CommandEntry {
                    name: name.to_string(),
                    description: None,
                    actions: vec![InvocationEntry {
                        action: "Log".into(),
                        arguments: vec!["x".into()],
                    }],
                }],
                events: vec![],
            };
            assert!(DispatchTables::from_config(&config).is_err(), "accepted '{name}'");
        }
    }

    #[test]
    fn test_positional_in_event_rejected() {
        let json = r#"{ "events": [
            { "event": "UserJoined", "actions": [ { "action": "Log", "arguments": ["$0"] } ] }
        ] }"#;
        let err = DispatchTables::from_config(&ActionConfig::from_json_str(json).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("positional"));

        let interpolated = r#"{ "events": [
            { "event": "UserJoined", "actions": [ { "action": "Log", "arguments": ["hi ${0}"] } ] }
        ] }"#;
        assert!(
            DispatchTables::from_config(&ActionConfig::from_json_str(interpolated).unwrap())
                .is_err()
        );
    }

    #[test]
    fn test_malformed_placeholder_rejected() {
        let json = r#"{ "commands": [
            { "name": "x", "actions": [ { "action": "Log", "arguments": ["${bogus}"] } ] }
        ] }"#;
        assert!(DispatchTables::from_config(&ActionConfig::from_json_str(json).unwrap()).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = ActionConfig::load("actions.toml").unwrap_err();
        assert!(err.to_string().contains("Unsupported action config format"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("actionbot-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, SAMPLE_JSON).unwrap();
        let tables = DispatchTables::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(tables.commands.len(), 2);
    }
}
