//! Results produced by command handlers.

use prost::{Message, Name};

use crate::TypedPayload;

/// Whether the caller receives the handler's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    #[default]
    Reply,
    NoReply,
}

/// What a handler hands back to the dispatcher.
///
/// `state: None` leaves the actor state unchanged. `value` only reaches the
/// caller when `kind` is [`ResponseKind::Reply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub state: Option<TypedPayload>,
    pub value: Option<TypedPayload>,
    pub kind: ResponseKind,
}

impl Value {
    /// Start building a handler result.
    ///
    /// ```
    /// use bridge_core::{ResponseKind, TypedPayload, Value};
    ///
    /// let result = Value::at()
    ///     .state_payload(TypedPayload::pack("type.googleapis.com/demo.State", vec![8, 1]))
    ///     .no_reply();
    /// assert_eq!(result.kind, ResponseKind::NoReply);
    /// assert!(result.value.is_none());
    /// ```
    pub fn at() -> ValueBuilder {
        ValueBuilder::default()
    }

    /// A result that leaves state untouched and answers nothing.
    pub fn no_reply() -> Self {
        Self {
            state: None,
            value: None,
            kind: ResponseKind::NoReply,
        }
    }
}

/// Builder returned by [`Value::at`].
#[derive(Debug, Clone, Default)]
pub struct ValueBuilder {
    state: Option<TypedPayload>,
    value: Option<TypedPayload>,
}

impl ValueBuilder {
    /// Set the new actor state from a protobuf message.
    pub fn state<M: Message + Name>(self, state: &M) -> Self {
        self.state_payload(TypedPayload::pack_message(state))
    }

    pub fn state_payload(mut self, state: TypedPayload) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the value returned to the caller from a protobuf message.
    pub fn value<M: Message + Name>(self, value: &M) -> Self {
        self.value_payload(TypedPayload::pack_message(value))
    }

    pub fn value_payload(mut self, value: TypedPayload) -> Self {
        self.value = Some(value);
        self
    }

    pub fn reply(self) -> Value {
        Value {
            state: self.state,
            value: self.value,
            kind: ResponseKind::Reply,
        }
    }

    /// Finish without a reply; any value set on the builder is discarded.
    pub fn no_reply(self) -> Value {
        Value {
            state: self.state,
            value: None,
            kind: ResponseKind::NoReply,
        }
    }
}
