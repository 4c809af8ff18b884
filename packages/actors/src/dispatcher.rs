//! Command dispatcher.
//!
//! Every request walks `Received → Decoded → Resolved → Invoking` and ends in
//! `Completed` or `Failed`. Whatever happens, the caller gets back an encoded
//! response; per-request errors are reported in the response status and
//! never returned to the transport.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bridge_core::codec::{self, CodecError};
use bridge_core::{InvocationEnvelope, PayloadError, ResponseEnvelope, Value};
use futures_util::FutureExt;
use tracing::{debug, instrument, warn};
use ulid::Ulid;

use crate::handler::{ActorContext, CommandDescriptor, HandlerError};
use crate::locks::ActorLocks;
use crate::registry::{ActorRegistry, LookupError};
use crate::response;

/// Where a request is in its dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchPhase {
    Received,
    Decoded,
    Resolved,
    Invoking,
    Completed,
    Failed,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchPhase::Received => "received",
            DispatchPhase::Decoded => "decoded",
            DispatchPhase::Resolved => "resolved",
            DispatchPhase::Invoking => "invoking",
            DispatchPhase::Completed => "completed",
            DispatchPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Per-request failures.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("malformed invocation: {0}")]
    Decode(#[from] CodecError),

    #[error("actor type not registered: {0}")]
    UnknownActorType(String),

    #[error("command {command} not found on actor type {actor_type}")]
    UnknownCommand { actor_type: String, command: String },

    #[error("invalid command input: {0}")]
    TypeMismatch(#[from] PayloadError),

    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
}

impl DispatchError {
    /// The last phase reached before the failure.
    pub fn failed_in(&self) -> DispatchPhase {
        match self {
            DispatchError::Decode(_) => DispatchPhase::Received,
            DispatchError::UnknownActorType(_) | DispatchError::UnknownCommand { .. } => DispatchPhase::Decoded,
            DispatchError::TypeMismatch(_) => DispatchPhase::Resolved,
            DispatchError::Handler(_) => DispatchPhase::Invoking,
        }
    }
}

impl From<LookupError> for DispatchError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::UnknownActorType(actor_type) => DispatchError::UnknownActorType(actor_type),
            LookupError::UnknownCommand { actor_type, command } => {
                DispatchError::UnknownCommand { actor_type, command }
            }
        }
    }
}

/// Routes invocations to registered command handlers.
#[derive(Debug)]
pub struct CommandDispatcher {
    registry: Arc<ActorRegistry>,
    locks: ActorLocks,
}

impl CommandDispatcher {
    pub fn new(registry: impl Into<Arc<ActorRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            locks: ActorLocks::new(),
        }
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    /// Number of actor instances that have been invoked at least once.
    pub fn active_actors(&self) -> usize {
        self.locks.len()
    }

    /// Transport entry point: invocation bytes in, response bytes out.
    #[instrument(name = "dispatch", skip_all, fields(request_id = %Ulid::new()), level = "info")]
    pub async fn handle(&self, request: &[u8]) -> Vec<u8> {
        self.dispatch_bytes(request).await
    }

    /// Same as [`handle`](Self::handle) without the request span.
    pub async fn dispatch_bytes(&self, request: &[u8]) -> Vec<u8> {
        let response = match codec::decode_invocation(request) {
            Ok(envelope) => self.dispatch(envelope).await,
            Err(err) => {
                warn!(phase = %DispatchPhase::Failed, len = request.len(), error = %err, "Rejected invocation");
                // Nothing in a rejected buffer is trusted, not even the actor name.
                response::build("", "", None, Err(DispatchError::Decode(err)))
            }
        };
        codec::encode_response(&response)
    }

    /// Dispatch an already decoded invocation.
    pub async fn dispatch(&self, envelope: InvocationEnvelope) -> ResponseEnvelope {
        debug!(
            phase = %DispatchPhase::Decoded,
            actor = %envelope.actor(),
            actor_type = envelope.actor_type(),
            command = %envelope.command_name,
            is_async = envelope.r#async,
            "Invocation decoded"
        );

        let result = self.run(&envelope).await;
        match &result {
            Ok(value) => debug!(
                phase = %DispatchPhase::Completed,
                command = %envelope.command_name,
                kind = ?value.kind,
                state_changed = value.state.is_some(),
                "Invocation completed"
            ),
            Err(err) => warn!(
                phase = %DispatchPhase::Failed,
                failed_in = %err.failed_in(),
                actor = %envelope.actor(),
                command = %envelope.command_name,
                error = %err,
                "Invocation failed"
            ),
        }

        response::build(envelope.actor_name, envelope.actor_system, envelope.current_context, result)
    }

    async fn run(&self, envelope: &InvocationEnvelope) -> Result<Value, DispatchError> {
        let (_, command) = self.registry.lookup(envelope.actor_type(), &envelope.command_name)?;
        debug!(phase = %DispatchPhase::Resolved, command = command.name(), "Command resolved");

        let _guard = self.locks.acquire(&envelope.actor()).await;
        debug!(phase = %DispatchPhase::Invoking, "Actor lock acquired");

        let context = ActorContext::from_envelope(envelope);
        match AssertUnwindSafe(invoke(command, envelope, context)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(HandlerError::Panicked(panic_message(&*panic)).into()),
        }
    }
}

async fn invoke(
    command: &CommandDescriptor,
    envelope: &InvocationEnvelope,
    context: ActorContext,
) -> Result<Value, DispatchError> {
    let future = command.handler().invoke(&envelope.value, context)?;
    Ok(future.await?)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
