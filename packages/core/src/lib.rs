//! Core types for the actor host bridge.
//!
//! This crate contains the types shared by every package:
//! - `TypedPayload` for state and values exchanged with the proxy
//! - Invocation and response envelopes and their wire codec
//! - `Value`, the result of a command handler
//! - Actor descriptors carried to the proxy at registration

mod actor;
pub mod codec;
mod envelope;
mod payload;
pub mod protocol;
mod value;

pub use actor::{ActorDescriptor, ActorKind, ActorRef, DeactivationStrategy, SnapshotStrategy};
pub use codec::CodecError;
pub use envelope::{InvocationEnvelope, ResponseEnvelope, ResponsePayload, ResponseStatus};
pub use payload::{PayloadError, TYPE_URL_PREFIX, TypedPayload, type_url_of};
pub use value::{ResponseKind, Value, ValueBuilder};
