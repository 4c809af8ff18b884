//! Building the response envelope from a dispatch outcome.

use bridge_core::{ResponseEnvelope, ResponseKind, ResponsePayload, ResponseStatus, TypedPayload, Value};

use crate::dispatcher::DispatchError;

/// Turn a handler result, or the reason there is none, into a response.
///
/// On success the new state replaces the old one unless the handler left it
/// unset. On failure the incoming state is echoed back unchanged so the
/// proxy never loses state because of a failed command.
pub fn build(
    actor_name: impl Into<String>,
    actor_system: impl Into<String>,
    original_context: Option<TypedPayload>,
    result: Result<Value, DispatchError>,
) -> ResponseEnvelope {
    let (updated_context, payload, status) = match result {
        Ok(value) => {
            let state = value.state.or(original_context);
            let payload = match value.kind {
                ResponseKind::Reply => ResponsePayload::Reply(value.value.unwrap_or_default()),
                ResponseKind::NoReply => ResponsePayload::NoReply,
            };
            (state, payload, ResponseStatus::Ok)
        }
        Err(err) => (
            original_context,
            ResponsePayload::NoReply,
            ResponseStatus::Error(err.to_string()),
        ),
    };

    ResponseEnvelope {
        actor_name: actor_name.into(),
        actor_system: actor_system.into(),
        updated_context,
        payload,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerError;

    fn payload(tag: u8) -> TypedPayload {
        TypedPayload::pack("type.googleapis.com/test.State", vec![8, tag])
    }

    #[test]
    fn test_reply_replaces_state() {
        let value = Value::at().state_payload(payload(2)).value_payload(payload(3)).reply();
        let response = build("counter", "system", Some(payload(1)), Ok(value));

        assert_eq!(response.updated_context, Some(payload(2)));
        assert_eq!(response.payload, ResponsePayload::Reply(payload(3)));
        assert!(response.status.is_ok());
    }

    #[test]
    fn test_unset_state_keeps_original() {
        let response = build("counter", "system", Some(payload(1)), Ok(Value::no_reply()));
        assert_eq!(response.updated_context, Some(payload(1)));
        assert_eq!(response.payload, ResponsePayload::NoReply);
    }

    #[test]
    fn test_reply_without_value_is_empty() {
        let response = build("counter", "system", None, Ok(Value::at().reply()));
        assert_eq!(response.payload, ResponsePayload::Reply(TypedPayload::empty()));
        assert_eq!(response.updated_context, None);
    }

    #[test]
    fn test_failure_echoes_original_state() {
        let err = DispatchError::Handler(HandlerError::msg("insufficient funds"));
        let response = build("counter", "system", Some(payload(1)), Err(err));

        assert_eq!(response.actor_name, "counter");
        assert_eq!(response.actor_system, "system");
        assert_eq!(response.updated_context, Some(payload(1)));
        assert_eq!(response.payload, ResponsePayload::NoReply);
        assert!(response.status.message().contains("insufficient funds"));
    }
}
