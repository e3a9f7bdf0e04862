//! # Gateway Module
//!
//! Bridges serenity's event stream to the dispatcher and gives actions a
//! platform handle.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod connection;
pub mod handler;

pub use connection::{Connection, SerenityConnection};
pub use handler::{classify_login_error, gateway_intents, Handler, LoginFailure};
