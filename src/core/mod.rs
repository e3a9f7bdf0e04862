//! # Core Module
//!
//! Process configuration and Discord message utilities shared by the
//! dispatcher, the built-in actions and the gateway adapter.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Config reduced to dispatcher settings; embed helpers removed
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod response;

pub use config::Config;
pub use response::{chunk_for_message, chunk_text, MESSAGE_LIMIT};
