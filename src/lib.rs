// Core layer - configuration and message utilities
pub mod core;

// Actions - named, typed operations the tables can invoke
pub mod actions;

// Dispatch - tokenizer, tables, argument resolution and the dispatcher
pub mod dispatch;

// Gateway - serenity adapter and the platform connection handle
pub mod gateway;

#[cfg(test)]
pub mod mock;

pub use core::Config;

pub use actions::{ActionHandler, ActionRegistry, ParamKind, Parameter, Value};
pub use dispatch::{
    DispatchError, DispatchOutcome, DispatchSettings, DispatchTables, Dispatcher, EventKind,
    ExecutionContext,
};
pub use gateway::{Connection, Handler, SerenityConnection};
