//! Per-dispatch error taxonomy
//!
//! None of these escape the dispatcher: each one ends a single action
//! invocation (or, for `Lookup`, the dispatch of one stimulus) and is logged.

use thiserror::Error;

use super::context::{ContextField, Origin};
use crate::actions::value::ParamKind;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown command '{name}'")]
    Lookup { name: String },

    #[error("Action '{name}' is not registered")]
    UnknownAction { name: String },

    #[error("Context field '{field}' is not available for {origin} dispatches")]
    Binding { field: ContextField, origin: Origin },

    #[error("Action '{action}' takes {expected} argument(s) but {supplied} were declared")]
    Arity {
        action: String,
        expected: usize,
        supplied: usize,
    },

    #[error("Argument ${index} was requested but only {supplied} were supplied")]
    PositionalOutOfRange { index: usize, supplied: usize },

    #[error("Cannot use '{value}' as {expected} for parameter '{parameter}'")]
    TypeCoercion {
        parameter: String,
        expected: ParamKind,
        value: String,
    },

    #[error("Action '{action}' failed: {source:#}")]
    Invocation {
        action: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Whether the error is an arity problem (count mismatch or missing token)
    pub fn is_arity(&self) -> bool {
        matches!(
            self,
            DispatchError::Arity { .. } | DispatchError::PositionalOutOfRange { .. }
        )
    }
}

pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
