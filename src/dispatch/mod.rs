//! # Dispatch Module
//!
//! Turns inbound messages and lifecycle events into ordered action
//! invocations, driven entirely by the command and event tables.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Tokenizer, argument templates, config tables, resolver and dispatcher

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod resolver;
pub mod table;
pub mod template;
pub mod tokenizer;

pub use context::{ContextField, EventKind, ExecutionContext, InboundMessage, LifecycleEvent, Origin};
pub use dispatcher::{DispatchOutcome, DispatchSettings, Dispatcher};
pub use error::{DispatchError, DispatchResult};
pub use resolver::resolve_arguments;
pub use table::{
    ActionConfig, ActionInvocation, CommandDefinition, CommandTable, DispatchTables,
    EventDefinition, EventTable,
};
pub use template::ArgumentTemplate;
pub use tokenizer::{tokenize, ParsedCommand};
