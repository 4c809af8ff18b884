//! Protobuf messages shared with the actor proxy.
//!
//! Tag numbers follow the proxy schema. `ActorInvocation.async` and
//! `ActorInvocationResponse.status` (both tag 7) are the additions made by
//! protocol 1.0; older peers skip them as unknown fields.

use std::collections::HashMap;

use prost_types::Any;

/// Major version of the wire protocol spoken by this crate.
pub const PROTOCOL_MAJOR_VERSION: i32 = 1;
/// Minor version of the wire protocol spoken by this crate.
pub const PROTOCOL_MINOR_VERSION: i32 = 0;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorId {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub system: String,
    /// Declared actor type of an abstract actor instance.
    #[prost(string, tag = "3")]
    pub parent: String,
}

/// Current or updated state travelling between proxy and host.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Context {
    #[prost(message, optional, tag = "1")]
    pub state: Option<Any>,
    #[prost(message, optional, tag = "2")]
    pub caller: Option<ActorId>,
    #[prost(message, optional, tag = "3")]
    pub self_: Option<ActorId>,
    #[prost(map = "string, string", tag = "4")]
    pub metadata: HashMap<String, String>,
    #[prost(map = "string, string", tag = "5")]
    pub tags: HashMap<String, String>,
}

/// Marks an invocation or response without a value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Noop {}

/// Request sent by the proxy to run one command on one actor.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorInvocation {
    #[prost(message, optional, tag = "1")]
    pub actor: Option<ActorId>,
    #[prost(string, tag = "2")]
    pub command_name: String,
    #[prost(message, optional, tag = "3")]
    pub current_context: Option<Context>,
    #[prost(message, optional, tag = "6")]
    pub caller: Option<ActorId>,
    #[prost(bool, tag = "7")]
    pub r#async: bool,
    #[prost(oneof = "actor_invocation::Payload", tags = "4, 5")]
    pub payload: Option<actor_invocation::Payload>,
}

pub mod actor_invocation {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "4")]
        Value(::prost_types::Any),
        #[prost(message, tag = "5")]
        Noop(super::Noop),
    }
}

/// Reply sent back to the proxy for one `ActorInvocation`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorInvocationResponse {
    #[prost(string, tag = "1")]
    pub actor_name: String,
    #[prost(string, tag = "2")]
    pub actor_system: String,
    #[prost(message, optional, tag = "3")]
    pub updated_context: Option<Context>,
    #[prost(message, optional, tag = "7")]
    pub status: Option<RequestStatus>,
    #[prost(oneof = "actor_invocation_response::Payload", tags = "4, 6")]
    pub payload: Option<actor_invocation_response::Payload>,
}

pub mod actor_invocation_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "4")]
        Value(::prost_types::Any),
        #[prost(message, tag = "6")]
        Noop(super::Noop),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestStatus {
    #[prost(enumeration = "Status", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Status {
    Unknown = 0,
    Ok = 1,
    ActorNotFound = 2,
    Error = 3,
}

// Registration messages

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TimeoutStrategy {
    /// Timeout in milliseconds.
    #[prost(int64, tag = "1")]
    pub timeout: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorSnapshotStrategy {
    #[prost(oneof = "actor_snapshot_strategy::Strategy", tags = "1")]
    pub strategy: Option<actor_snapshot_strategy::Strategy>,
}

pub mod actor_snapshot_strategy {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Strategy {
        #[prost(message, tag = "1")]
        Timeout(super::TimeoutStrategy),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorDeactivationStrategy {
    #[prost(oneof = "actor_deactivation_strategy::Strategy", tags = "1")]
    pub strategy: Option<actor_deactivation_strategy::Strategy>,
}

pub mod actor_deactivation_strategy {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Strategy {
        #[prost(message, tag = "1")]
        Timeout(super::TimeoutStrategy),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Kind {
    UnknowKind = 0,
    Abstract = 1,
    Singleton = 2,
    Pooled = 3,
    Proxy = 4,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorSettings {
    #[prost(enumeration = "Kind", tag = "1")]
    pub kind: i32,
    #[prost(bool, tag = "2")]
    pub stateful: bool,
    #[prost(message, optional, tag = "3")]
    pub snapshot_strategy: Option<ActorSnapshotStrategy>,
    #[prost(message, optional, tag = "4")]
    pub deactivation_strategy: Option<ActorDeactivationStrategy>,
    #[prost(int32, tag = "5")]
    pub min_pool_size: i32,
    #[prost(int32, tag = "6")]
    pub max_pool_size: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Command {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FixedTimerCommand {
    #[prost(int32, tag = "1")]
    pub seconds: i32,
    #[prost(message, optional, tag = "2")]
    pub command: Option<Command>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Actor {
    #[prost(message, optional, tag = "1")]
    pub id: Option<ActorId>,
    #[prost(message, optional, tag = "3")]
    pub settings: Option<ActorSettings>,
    #[prost(message, repeated, tag = "4")]
    pub commands: Vec<Command>,
    #[prost(message, repeated, tag = "5")]
    pub timer_commands: Vec<FixedTimerCommand>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Registry {
    #[prost(map = "string, message", tag = "1")]
    pub actors: HashMap<String, Actor>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActorSystem {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub registry: Option<Registry>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceInfo {
    #[prost(string, tag = "1")]
    pub service_name: String,
    #[prost(string, tag = "2")]
    pub service_version: String,
    #[prost(string, tag = "3")]
    pub service_runtime: String,
    #[prost(string, tag = "4")]
    pub support_library_name: String,
    #[prost(string, tag = "5")]
    pub support_library_version: String,
    #[prost(int32, tag = "6")]
    pub protocol_major_version: i32,
    #[prost(int32, tag = "7")]
    pub protocol_minor_version: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegistrationRequest {
    #[prost(message, optional, tag = "1")]
    pub service_info: Option<ServiceInfo>,
    #[prost(message, optional, tag = "2")]
    pub actor_system: Option<ActorSystem>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProxyInfo {
    #[prost(int32, tag = "1")]
    pub protocol_major_version: i32,
    #[prost(int32, tag = "2")]
    pub protocol_minor_version: i32,
    #[prost(string, tag = "3")]
    pub proxy_name: String,
    #[prost(string, tag = "4")]
    pub proxy_version: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegistrationResponse {
    #[prost(message, optional, tag = "1")]
    pub status: Option<RequestStatus>,
    #[prost(message, optional, tag = "2")]
    pub proxy_info: Option<ProxyInfo>,
}
