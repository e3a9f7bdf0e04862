//! Action handler trait
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Handlers declare a name and typed parameter list and receive resolved values
//! - 1.0.0: Initial slash-command handler trait

use anyhow::Result;
use async_trait::async_trait;

use super::value::{ParamKind, Value};
use crate::dispatch::ExecutionContext;

/// One declared parameter of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl Parameter {
    pub const fn new(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind }
    }
}

/// An operation that configuration can invoke by name
///
/// The dispatcher resolves arguments against [`parameters`](Self::parameters)
/// before calling [`invoke`](Self::invoke), so `args` always has exactly one
/// value per parameter, each of the declared kind.
///
/// # Example
///
/// ```ignore
/// pub struct Shout;
///
/// #[async_trait]
/// impl ActionHandler for Shout {
///     fn name(&self) -> &'static str {
///         "Shout"
///     }
///
///     fn parameters(&self) -> &'static [Parameter] {
///         const PARAMS: &[Parameter] = &[Parameter::new("text", ParamKind::Text)];
///         PARAMS
///     }
///
///     async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()> {
///         let channel = ctx.reply_channel().await?;
///         ctx.connection().send_message(channel, &args[0].to_string().to_uppercase()).await
///     }
/// }
/// ```
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Name used in configuration; matched case-insensitively
    fn name(&self) -> &'static str;

    fn parameters(&self) -> &'static [Parameter];

    async fn invoke(&self, ctx: &ExecutionContext, args: Vec<Value>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn ActionHandler) {}

    #[test]
    fn test_parameter_is_const_constructible() {
        const P: Parameter = Parameter::new("user", ParamKind::User);
        assert_eq!(P.name, "user");
        assert_eq!(P.kind, ParamKind::User);
    }
}
