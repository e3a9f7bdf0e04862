//! # Action System
//!
//! Named, typed operations that the command and event tables invoke.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Declarative actions replace hard-coded slash command handlers
//! - 1.0.0: Initial handler trait, context and registry

pub mod handler;
pub mod handlers;
pub mod registry;
pub mod value;

pub use handler::{ActionHandler, Parameter};
pub use registry::{ActionDescriptor, ActionRegistry, RegisteredAction};
pub use value::{GuildRef, ParamKind, UserRef, Value};
