//! Argument resolution
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Turns an invocation's argument templates into typed values for the
//! target action's parameter list. Pure: no I/O, no mutation.

use super::context::{ContextField, ExecutionContext};
use super::error::{DispatchError, DispatchResult};
use super::template::{render_literal, ArgumentTemplate, Placeholder};
use crate::actions::handler::Parameter;
use crate::actions::value::Value;

/// Resolve `templates` against `params`.
///
/// Returns exactly `params.len()` values or an error; never a partial list.
/// `tokens` are the caller-supplied message arguments (empty for events).
pub fn resolve_arguments(
    action: &str,
    templates: &[ArgumentTemplate],
    params: &[Parameter],
    ctx: &ExecutionContext,
    tokens: &[String],
) -> DispatchResult<Vec<Value>> {
    if templates.len() != params.len() {
        return Err(DispatchError::Arity {
            action: action.to_string(),
            expected: params.len(),
            supplied: templates.len(),
        });
    }

    templates
        .iter()
        .zip(params)
        .map(|(template, param)| resolve_one(template, param, ctx, tokens))
        .collect()
}

fn resolve_one(
    template: &ArgumentTemplate,
    param: &Parameter,
    ctx: &ExecutionContext,
    tokens: &[String],
) -> DispatchResult<Value> {
    match template {
        ArgumentTemplate::ContextRef(field) => {
            let value = context_value(*field, ctx)?;
            let display = value.to_string();
            value
                .coerce(param.kind)
                .ok_or_else(|| coercion_error(param, display))
        }
        ArgumentTemplate::Positional(index) => {
            let token = positional(*index, tokens)?;
            Value::parse(token, param.kind).ok_or_else(|| coercion_error(param, token.to_string()))
        }
        ArgumentTemplate::Literal(text) => {
            let text = interpolate(text, ctx, tokens)?;
            Value::parse(&text, param.kind).ok_or_else(|| coercion_error(param, text))
        }
    }
}

fn context_value(field: ContextField, ctx: &ExecutionContext) -> DispatchResult<Value> {
    ctx.field(field).ok_or(DispatchError::Binding {
        field,
        origin: ctx.origin(),
    })
}

fn positional(index: usize, tokens: &[String]) -> DispatchResult<&str> {
    tokens
        .get(index)
        .map(String::as_str)
        .ok_or(DispatchError::PositionalOutOfRange {
            index,
            supplied: tokens.len(),
        })
}

/// Substitute `${..}` placeholders inside a configured literal.
///
/// Caller tokens are inserted verbatim and never re-scanned.
fn interpolate(text: &str, ctx: &ExecutionContext, tokens: &[String]) -> DispatchResult<String> {
    // Placeholders were validated when the table was loaded
    render_literal(text, |name| match name.parse::<Placeholder>() {
        Ok(Placeholder::Context(field)) => Ok(context_value(field, ctx)?.to_string()),
        Ok(Placeholder::Positional(index)) => positional(index, tokens).map(str::to_string),
        Err(_) => Ok(format!("${{{name}}}")),
    })
}

fn coercion_error(param: &Parameter, value: String) -> DispatchError {
    DispatchError::TypeCoercion {
        parameter: param.name.to_string(),
        expected: param.kind,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::value::{GuildRef, ParamKind, UserRef};
    use crate::dispatch::context::{EventKind, InboundMessage, LifecycleEvent};
    use crate::dispatch::tokenizer::ParsedCommand;
    use crate::mock::MockConnection;
    use std::sync::Arc;

    const TEXT: Parameter = Parameter::new("text", ParamKind::Text);
    const COUNT: Parameter = Parameter::new("count", ParamKind::Integer);
    const USER: Parameter = Parameter::new("user", ParamKind::User);

    fn event_ctx(kind: EventKind, group: Option<GuildRef>) -> ExecutionContext {
        let event = LifecycleEvent {
            kind,
            actor: UserRef::new(10, "alice"),
            secondary: None,
            group,
        };
        ExecutionContext::for_event(Arc::new(MockConnection::new()), &event)
    }

    fn message_ctx(args: &[&str]) -> ExecutionContext {
        let message = InboundMessage {
            id: 1,
            author: UserRef::new(10, "alice"),
            content: "!cmd".into(),
            channel_id: 500,
            guild: None,
            mentions: vec![],
        };
        let parsed = ParsedCommand {
            name: "cmd".into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        ExecutionContext::for_message(Arc::new(MockConnection::new()), &message, &parsed)
    }

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_context_ref_actor_as_text() {
        let ctx = event_ctx(EventKind::UserJoined, None);
        let values = resolve_arguments(
            "SendWelcome",
            &[ArgumentTemplate::ContextRef(ContextField::Actor)],
            &[TEXT],
            &ctx,
            &[],
        )
        .unwrap();
        assert_eq!(values, vec![Value::Text("alice".into())]);
    }

    #[test]
    fn test_context_ref_actor_as_user() {
        let ctx = event_ctx(EventKind::UserJoined, None);
        let values = resolve_arguments(
            "SendWelcome",
            &[ArgumentTemplate::ContextRef(ContextField::Actor)],
            &[USER],
            &ctx,
            &[],
        )
        .unwrap();
        assert_eq!(values, vec![Value::User(UserRef::new(10, "alice"))]);
    }

    #[test]
    fn test_missing_context_field_is_binding_error() {
        let ctx = event_ctx(EventKind::UserBanned, None);
        for field in [ContextField::Group, ContextField::Target, ContextField::Channel] {
            let err = resolve_arguments(
                "Log",
                &[ArgumentTemplate::ContextRef(field)],
                &[TEXT],
                &ctx,
                &[],
            )
            .unwrap_err();
            assert!(matches!(err, DispatchError::Binding { field: f, .. } if f == field));
        }
    }

    #[test]
    fn test_positionals() {
        let ctx = message_ctx(&["troll user", "spamming"]);
        let values = resolve_arguments(
            "BanUser",
            &[ArgumentTemplate::Positional(0), ArgumentTemplate::Positional(1)],
            &[TEXT, TEXT],
            &ctx,
            &tokens(&["troll user", "spamming"]),
        )
        .unwrap();
        assert_eq!(
            values,
            vec![Value::Text("troll user".into()), Value::Text("spamming".into())]
        );
    }

    #[test]
    fn test_positional_out_of_range() {
        let ctx = message_ctx(&["one"]);
        let err = resolve_arguments(
            "Log",
            &[ArgumentTemplate::Positional(1)],
            &[TEXT],
            &ctx,
            &tokens(&["one"]),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::PositionalOutOfRange { index: 1, supplied: 1 }));
        assert!(err.is_arity());
    }

    #[test]
    fn test_count_mismatch_is_arity_error() {
        let ctx = message_ctx(&[]);
        let too_many = resolve_arguments(
            "Log",
            &[
                ArgumentTemplate::Literal("a".into()),
                ArgumentTemplate::Literal("b".into()),
            ],
            &[TEXT],
            &ctx,
            &[],
        )
        .unwrap_err();
        assert!(matches!(too_many, DispatchError::Arity { expected: 1, supplied: 2, .. }));

        let too_few = resolve_arguments("Log", &[], &[TEXT], &ctx, &[]).unwrap_err();
        assert!(matches!(too_few, DispatchError::Arity { expected: 1, supplied: 0, .. }));
    }

    #[test]
    fn test_literal_coercion() {
        let ctx = message_ctx(&[]);
        let values = resolve_arguments(
            "Purge",
            &[ArgumentTemplate::Literal("42".into())],
            &[COUNT],
            &ctx,
            &[],
        )
        .unwrap();
        assert_eq!(values, vec![Value::Integer(42)]);

        let err = resolve_arguments(
            "Purge",
            &[ArgumentTemplate::Literal("lots".into())],
            &[COUNT],
            &ctx,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::TypeCoercion { expected: ParamKind::Integer, .. }));
    }

    #[test]
    fn test_token_coercion_failure() {
        let ctx = message_ctx(&["troll user"]);
        let err = resolve_arguments(
            "BanUser",
            &[ArgumentTemplate::Positional(0)],
            &[USER],
            &ctx,
            &tokens(&["troll user"]),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::TypeCoercion { .. }));
    }

    #[test]
    fn test_context_user_into_integer_fails() {
        let ctx = event_ctx(EventKind::UserJoined, None);
        let err = resolve_arguments(
            "Purge",
            &[ArgumentTemplate::ContextRef(ContextField::Actor)],
            &[COUNT],
            &ctx,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::TypeCoercion { .. }));
    }

    #[test]
    fn test_interpolation() {
        let ctx = event_ctx(EventKind::UserJoined, Some(GuildRef::new(9, "Galaxy")));
        let values = resolve_arguments(
            "SendMessage",
            &[ArgumentTemplate::Literal("Welcome ${actor} to ${group}!".into())],
            &[TEXT],
            &ctx,
            &[],
        )
        .unwrap();
        assert_eq!(values, vec![Value::Text("Welcome alice to Galaxy!".into())]);
    }

    #[test]
    fn test_interpolation_binding_error() {
        let ctx = event_ctx(EventKind::UserJoined, None);
        let err = resolve_arguments(
            "SendMessage",
            &[ArgumentTemplate::Literal("Welcome to ${group}".into())],
            &[TEXT],
            &ctx,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::Binding { field: ContextField::Group, .. }));
    }

    #[test]
    fn test_tokens_are_not_reinterpolated() {
        let ctx = message_ctx(&["${actor}"]);
        let values = resolve_arguments(
            "Log",
            &[ArgumentTemplate::Literal("said: ${0}".into())],
            &[TEXT],
            &ctx,
            &tokens(&["${actor}"]),
        )
        .unwrap();
        assert_eq!(values, vec![Value::Text("said: ${actor}".into())]);
    }

    #[test]
    fn test_escaped_dollar_is_not_interpolated() {
        let ctx = event_ctx(EventKind::UserJoined, None);
        let template = ArgumentTemplate::parse("$${actor} is ${actor}").unwrap();
        let values = resolve_arguments("Log", &[template], &[TEXT], &ctx, &[]).unwrap();
        assert_eq!(values, vec![Value::Text("${actor} is alice".into())]);
    }
}
