//! Actor identity and per-type descriptors.

use std::fmt;
use std::time::Duration;

/// One stateful actor instance managed by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorRef {
    pub system: String,
    pub name: String,
}

impl ActorRef {
    pub fn new(system: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.system, self.name)
    }
}

/// Runtime shape of an actor type. Interpreted by the proxy only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActorKind {
    #[default]
    Singleton,
    Abstract,
    Pooled,
}

impl ActorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorKind::Singleton => "singleton",
            ActorKind::Abstract => "abstract",
            ActorKind::Pooled => "pooled",
        }
    }
}

/// When the proxy snapshots actor state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SnapshotStrategy {
    /// Leave the choice to the proxy.
    #[default]
    ProxyDefault,
    Timeout(Duration),
}

/// When the proxy deactivates an idle actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeactivationStrategy {
    /// Leave the choice to the proxy.
    #[default]
    ProxyDefault,
    Timeout(Duration),
}

/// Registration-time metadata for one actor type.
///
/// Everything besides `actor_type` is carried to the proxy unchanged and
/// never consulted while dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorDescriptor {
    pub actor_type: String,
    pub persistent: bool,
    pub kind: ActorKind,
    pub snapshot: SnapshotStrategy,
    pub deactivation: DeactivationStrategy,
    pub min_pool_size: u32,
    pub max_pool_size: u32,
}

impl ActorDescriptor {
    /// A persistent singleton actor type with proxy-default strategies.
    pub fn new(actor_type: impl Into<String>) -> Self {
        Self {
            actor_type: actor_type.into(),
            persistent: true,
            kind: ActorKind::default(),
            snapshot: SnapshotStrategy::default(),
            deactivation: DeactivationStrategy::default(),
            min_pool_size: 0,
            max_pool_size: 0,
        }
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn with_kind(mut self, kind: ActorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotStrategy) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_deactivation(mut self, deactivation: DeactivationStrategy) -> Self {
        self.deactivation = deactivation;
        self
    }

    /// Pool bounds for `ActorKind::Pooled` actor types.
    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max;
        self
    }
}
