//! Invocation dispatch engine.
//!
//! This crate routes invocations sent by the actor proxy to user command
//! handlers and builds the responses.
//!
//! # Architecture
//!
//! - `ActorRegistry` - Actor types and their command tables, built once at startup
//! - `CommandDispatcher` - Decodes, resolves, serializes per actor and invokes
//! - `ActorLocks` - One FIFO lock per actor instance
//! - `response::build` - Pure construction of the response envelope
//! - `registration` - The message announcing the registry to the proxy
//!
//! # Usage
//!
//! ```ignore
//! use actors::{ActorDefinition, ActorRegistry, CommandDispatcher};
//!
//! let mut builder = ActorRegistry::builder();
//! builder.define(ActorDefinition::new("counter").command("sum", sum))?;
//! let dispatcher = CommandDispatcher::new(builder.build());
//!
//! let response_bytes = dispatcher.handle(&request_bytes).await;
//! ```

mod dispatcher;
mod handler;
mod locks;
pub mod registration;
mod registry;
pub mod response;

pub use dispatcher::{CommandDispatcher, DispatchError, DispatchPhase};
pub use handler::{
    ActorContext, CommandDescriptor, CommandHandler, CommandInput, CommandKind, FnHandler, HandlerError,
    HandlerFuture, HandlerResult, NoInput, RawInput,
};
pub use locks::ActorLocks;
pub use registry::{ActorDefinition, ActorRegistry, LookupError, RegisteredActor, RegistryBuilder, RegistryError};
