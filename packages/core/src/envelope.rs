//! Decoded invocation and response envelopes.

use std::collections::HashMap;

use crate::{ActorRef, ResponseKind, TypedPayload};

/// One invocation delivered by the proxy, after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationEnvelope {
    pub actor_name: String,
    pub actor_system: String,
    /// Declared actor type for abstract actor instances, empty otherwise.
    pub actor_parent: String,
    pub command_name: String,
    /// Command input. Empty for `Noop` invocations.
    pub value: TypedPayload,
    /// State before this invocation.
    pub current_context: Option<TypedPayload>,
    pub metadata: HashMap<String, String>,
    pub caller: Option<ActorRef>,
    /// The caller does not wait for the reply.
    pub r#async: bool,
}

impl InvocationEnvelope {
    pub fn new(
        actor_system: impl Into<String>,
        actor_name: impl Into<String>,
        command_name: impl Into<String>,
    ) -> Self {
        Self {
            actor_name: actor_name.into(),
            actor_system: actor_system.into(),
            actor_parent: String::new(),
            command_name: command_name.into(),
            value: TypedPayload::empty(),
            current_context: None,
            metadata: HashMap::new(),
            caller: None,
            r#async: false,
        }
    }

    pub fn with_value(mut self, value: TypedPayload) -> Self {
        self.value = value;
        self
    }

    pub fn with_state(mut self, state: TypedPayload) -> Self {
        self.current_context = Some(state);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.actor_parent = parent.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_caller(mut self, caller: ActorRef) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_async(mut self, r#async: bool) -> Self {
        self.r#async = r#async;
        self
    }

    /// The actor type used for registry lookup.
    pub fn actor_type(&self) -> &str {
        if self.actor_parent.is_empty() {
            &self.actor_name
        } else {
            &self.actor_parent
        }
    }

    pub fn actor(&self) -> ActorRef {
        ActorRef::new(&self.actor_system, &self.actor_name)
    }
}

/// What the caller receives from an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Reply(TypedPayload),
    NoReply,
}

impl ResponsePayload {
    pub fn kind(&self) -> ResponseKind {
        match self {
            ResponsePayload::Reply(_) => ResponseKind::Reply,
            ResponsePayload::NoReply => ResponseKind::NoReply,
        }
    }

    pub fn value(&self) -> Option<&TypedPayload> {
        match self {
            ResponsePayload::Reply(value) => Some(value),
            ResponsePayload::NoReply => None,
        }
    }
}

/// Application-level outcome carried inside a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    Error(String),
}

impl ResponseStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseStatus::Ok)
    }

    pub fn message(&self) -> &str {
        match self {
            ResponseStatus::Ok => "",
            ResponseStatus::Error(message) => message,
        }
    }
}

/// Response for one invocation, ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub actor_name: String,
    pub actor_system: String,
    /// State after the invocation.
    pub updated_context: Option<TypedPayload>,
    pub payload: ResponsePayload,
    pub status: ResponseStatus,
}

impl ResponseEnvelope {
    pub fn kind(&self) -> ResponseKind {
        self.payload.kind()
    }

    pub fn value(&self) -> Option<&TypedPayload> {
        self.payload.value()
    }
}
