//! Envelope codec between wire bytes and envelopes.
//!
//! Decoding is strict: a buffer that is not a complete, well-formed
//! invocation is rejected as a whole and nothing is handed to the
//! dispatcher. Encoding a response cannot fail.

use prost::Message;
use prost_types::Any;

use crate::protocol::{
    ActorId, ActorInvocation, ActorInvocationResponse, Context, Noop, RequestStatus, Status,
    actor_invocation, actor_invocation_response,
};
use crate::{ActorRef, InvocationEnvelope, ResponseEnvelope, ResponsePayload, ResponseStatus, TypedPayload};

/// Errors raised while decoding envelopes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] prost::DecodeError),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("required field is empty: {0}")]
    EmptyField(&'static str),
}

/// Decode an `ActorInvocation` sent by the proxy.
pub fn decode_invocation(bytes: &[u8]) -> Result<InvocationEnvelope, CodecError> {
    let invocation = ActorInvocation::decode(bytes)?;

    let actor = invocation.actor.ok_or(CodecError::MissingField("actor"))?;
    require("actor.name", &actor.name)?;
    require("actor.system", &actor.system)?;
    require("command_name", &invocation.command_name)?;

    let value = match invocation.payload {
        Some(actor_invocation::Payload::Value(any)) => typed("value", any)?,
        Some(actor_invocation::Payload::Noop(_)) => TypedPayload::empty(),
        None => return Err(CodecError::MissingField("payload")),
    };

    let (current_context, metadata) = match invocation.current_context {
        Some(context) => (context.state.map(TypedPayload::from), context.metadata),
        None => (None, Default::default()),
    };

    Ok(InvocationEnvelope {
        actor_name: actor.name,
        actor_system: actor.system,
        actor_parent: actor.parent,
        command_name: invocation.command_name,
        value,
        current_context,
        metadata,
        caller: invocation.caller.map(|id| ActorRef::new(id.system, id.name)),
        r#async: invocation.r#async,
    })
}

/// Encode a response for the proxy.
pub fn encode_response(response: &ResponseEnvelope) -> Vec<u8> {
    let payload = match &response.payload {
        ResponsePayload::Reply(value) => actor_invocation_response::Payload::Value(value.clone().into()),
        ResponsePayload::NoReply => actor_invocation_response::Payload::Noop(Noop {}),
    };
    let status = match &response.status {
        ResponseStatus::Ok => RequestStatus {
            status: Status::Ok as i32,
            message: String::new(),
        },
        ResponseStatus::Error(message) => RequestStatus {
            status: Status::Error as i32,
            message: message.clone(),
        },
    };

    ActorInvocationResponse {
        actor_name: response.actor_name.clone(),
        actor_system: response.actor_system.clone(),
        updated_context: Some(Context {
            state: response.updated_context.clone().map(Any::from),
            ..Default::default()
        }),
        status: Some(status),
        payload: Some(payload),
    }
    .encode_to_vec()
}

/// Encode an invocation the way the proxy does.
///
/// Used by clients that drive a host directly and by tests.
pub fn encode_invocation(envelope: &InvocationEnvelope) -> Vec<u8> {
    let payload = if envelope.value.is_empty() {
        actor_invocation::Payload::Noop(Noop {})
    } else {
        actor_invocation::Payload::Value(envelope.value.clone().into())
    };

    ActorInvocation {
        actor: Some(ActorId {
            name: envelope.actor_name.clone(),
            system: envelope.actor_system.clone(),
            parent: envelope.actor_parent.clone(),
        }),
        command_name: envelope.command_name.clone(),
        current_context: Some(Context {
            state: envelope.current_context.clone().map(Any::from),
            metadata: envelope.metadata.clone(),
            ..Default::default()
        }),
        caller: envelope.caller.as_ref().map(|caller| ActorId {
            name: caller.name.clone(),
            system: caller.system.clone(),
            parent: String::new(),
        }),
        r#async: envelope.r#async,
        payload: Some(payload),
    }
    .encode_to_vec()
}

/// Decode a response the way the proxy does.
pub fn decode_response(bytes: &[u8]) -> Result<ResponseEnvelope, CodecError> {
    let response = ActorInvocationResponse::decode(bytes)?;

    let updated_context = response
        .updated_context
        .and_then(|context| context.state)
        .map(TypedPayload::from);

    let payload = match response.payload {
        Some(actor_invocation_response::Payload::Value(any)) => ResponsePayload::Reply(any.into()),
        Some(actor_invocation_response::Payload::Noop(_)) | None => ResponsePayload::NoReply,
    };

    let status = response.status.ok_or(CodecError::MissingField("status"))?;
    let status = match status.status() {
        Status::Ok => ResponseStatus::Ok,
        _ => ResponseStatus::Error(status.message),
    };

    Ok(ResponseEnvelope {
        actor_name: response.actor_name,
        actor_system: response.actor_system,
        updated_context,
        payload,
        status,
    })
}

fn require(field: &'static str, value: &str) -> Result<(), CodecError> {
    if value.is_empty() {
        return Err(CodecError::EmptyField(field));
    }
    Ok(())
}

/// Command input must carry a type URL. State may be empty.
fn typed(field: &'static str, any: Any) -> Result<TypedPayload, CodecError> {
    require(field, &any.type_url)?;
    Ok(any.into())
}
