//! Action registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Case-insensitive names, operation descriptors, first-registration-wins
//! - 1.0.0: Initial implementation for handler dispatch

use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{ActionHandler, Parameter};
use super::handlers::create_builtin_handlers;

/// Registered shape of an action: its name and ordered parameter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

/// A descriptor paired with the handler that implements it
#[derive(Clone)]
pub struct RegisteredAction {
    pub descriptor: ActionDescriptor,
    pub handler: Arc<dyn ActionHandler>,
}

/// Registry mapping lower-cased action names to handlers
///
/// Built once at startup, then shared read-only (behind an `Arc`) by every
/// in-flight dispatch.
///
/// # Example
///
/// ```ignore
/// let mut registry = ActionRegistry::new();
/// registry.register(Arc::new(SendMessage));
///
/// if let Some(action) = registry.get("sendmessage") {
///     action.handler.invoke(&ctx, args).await?;
/// }
/// ```
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, RegisteredAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Registry preloaded with every built-in action
    pub fn with_builtin_actions() -> Self {
        let mut registry = Self::new();
        for handler in create_builtin_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register a handler under its declared name.
    ///
    /// A name that is already taken (ignoring case) is logged and skipped;
    /// the first registration stays. Returns whether the handler was added.
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) -> bool {
        let key = handler.name().to_lowercase();
        if let Some(existing) = self.actions.get(&key) {
            warn!(
                "Action '{}' collides with already registered '{}'; keeping the first",
                handler.name(),
                existing.descriptor.name
            );
            return false;
        }

        let descriptor = ActionDescriptor {
            name: handler.name().to_string(),
            parameters: handler.parameters().to_vec(),
        };
        self.actions
            .insert(key, RegisteredAction { descriptor, handler });
        true
    }

    /// Look up an action by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&RegisteredAction> {
        self.actions.get(&name.to_lowercase())
    }

    pub fn descriptor(&self, name: &str) -> Option<&ActionDescriptor> {
        self.get(name).map(|a| &a.descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
