//! Actor registry mapping `(actor_type, command)` to handlers.
//!
//! Registration happens once, through [`RegistryBuilder`], before the first
//! request is served. The built [`ActorRegistry`] is immutable, so lookups
//! from concurrent requests need no synchronization.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use bridge_core::{ActorDescriptor, ActorKind, DeactivationStrategy, SnapshotStrategy};

use crate::handler::{ActorContext, CommandDescriptor, CommandInput, HandlerResult};

/// Setup-time registration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("actor type already registered: {0}")]
    DuplicateActorType(String),

    #[error("command {command} registered twice for actor type {actor_type}")]
    DuplicateCommand { actor_type: String, command: String },

    #[error("actor type must not be empty")]
    EmptyActorType,

    #[error("command name must not be empty (actor type {0})")]
    EmptyCommandName(String),
}

/// Registry misses at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown actor type: {0}")]
    UnknownActorType(String),

    #[error("unknown command {command} for actor type {actor_type}")]
    UnknownCommand { actor_type: String, command: String },
}

/// One registered actor type and its commands.
#[derive(Debug)]
pub struct RegisteredActor {
    descriptor: ActorDescriptor,
    commands: HashMap<String, CommandDescriptor>,
}

impl RegisteredActor {
    pub fn descriptor(&self) -> &ActorDescriptor {
        &self.descriptor
    }

    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Commands sorted by name.
    pub fn commands(&self) -> Vec<&CommandDescriptor> {
        let mut commands: Vec<_> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }
}

/// Read-only registry of actor types.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: HashMap<String, RegisteredActor>,
}

impl ActorRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Find the handler for `command_name` on `actor_type`.
    pub fn lookup(
        &self,
        actor_type: &str,
        command_name: &str,
    ) -> Result<(&ActorDescriptor, &CommandDescriptor), LookupError> {
        let actor = self
            .actors
            .get(actor_type)
            .ok_or_else(|| LookupError::UnknownActorType(actor_type.to_string()))?;

        let command = actor.command(command_name).ok_or_else(|| LookupError::UnknownCommand {
            actor_type: actor_type.to_string(),
            command: command_name.to_string(),
        })?;

        Ok((&actor.descriptor, command))
    }

    pub fn actor(&self, actor_type: &str) -> Option<&RegisteredActor> {
        self.actors.get(actor_type)
    }

    /// Registered actors sorted by type.
    pub fn actors(&self) -> Vec<&RegisteredActor> {
        let mut actors: Vec<_> = self.actors.values().collect();
        actors.sort_by(|a, b| a.descriptor.actor_type.cmp(&b.descriptor.actor_type));
        actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// Accumulates actor types before any request is served.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    actors: HashMap<String, RegisteredActor>,
}

impl RegistryBuilder {
    /// Register an actor type with its commands.
    pub fn register(
        &mut self,
        descriptor: ActorDescriptor,
        commands: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Result<&mut Self, RegistryError> {
        let actor_type = descriptor.actor_type.clone();
        if actor_type.is_empty() {
            return Err(RegistryError::EmptyActorType);
        }
        if self.actors.contains_key(&actor_type) {
            return Err(RegistryError::DuplicateActorType(actor_type));
        }

        let mut table = HashMap::new();
        for command in commands {
            if command.name().is_empty() {
                return Err(RegistryError::EmptyCommandName(actor_type));
            }
            if table.contains_key(command.name()) {
                return Err(RegistryError::DuplicateCommand {
                    actor_type,
                    command: command.name().to_string(),
                });
            }
            table.insert(command.name().to_string(), command);
        }

        tracing::debug!(
            actor_type = %actor_type,
            commands = table.len(),
            persistent = descriptor.persistent,
            "Registered actor type"
        );

        self.actors.insert(
            actor_type,
            RegisteredActor {
                descriptor,
                commands: table,
            },
        );
        Ok(self)
    }

    /// Register an actor type from its individual settings.
    pub fn register_actor(
        &mut self,
        actor_type: impl Into<String>,
        persistent: bool,
        snapshot: SnapshotStrategy,
        deactivation: DeactivationStrategy,
        command_table: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Result<&mut Self, RegistryError> {
        let descriptor = ActorDescriptor::new(actor_type)
            .with_persistent(persistent)
            .with_snapshot(snapshot)
            .with_deactivation(deactivation);
        self.register(descriptor, command_table)
    }

    /// Register a fluent [`ActorDefinition`].
    pub fn define(&mut self, definition: ActorDefinition) -> Result<&mut Self, RegistryError> {
        self.register(definition.descriptor, definition.commands)
    }

    pub fn build(self) -> ActorRegistry {
        ActorRegistry { actors: self.actors }
    }
}

/// Fluent description of one actor type.
///
/// ```
/// use actors::{ActorContext, ActorDefinition, ActorRegistry, NoInput};
/// use bridge_core::Value;
///
/// let mut builder = ActorRegistry::builder();
/// builder
///     .define(
///         ActorDefinition::new("greeter")
///             .persistent(false)
///             .command("ping", |_: NoInput, _ctx: ActorContext| async { Ok(Value::no_reply()) }),
///     )
///     .unwrap();
/// let registry = builder.build();
/// assert!(registry.lookup("greeter", "ping").is_ok());
/// ```
#[derive(Debug)]
pub struct ActorDefinition {
    descriptor: ActorDescriptor,
    commands: Vec<CommandDescriptor>,
}

impl ActorDefinition {
    pub fn new(actor_type: impl Into<String>) -> Self {
        Self {
            descriptor: ActorDescriptor::new(actor_type),
            commands: Vec::new(),
        }
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.descriptor = self.descriptor.with_persistent(persistent);
        self
    }

    pub fn kind(mut self, kind: ActorKind) -> Self {
        self.descriptor = self.descriptor.with_kind(kind);
        self
    }

    pub fn snapshot(mut self, snapshot: SnapshotStrategy) -> Self {
        self.descriptor = self.descriptor.with_snapshot(snapshot);
        self
    }

    pub fn deactivation(mut self, deactivation: DeactivationStrategy) -> Self {
        self.descriptor = self.descriptor.with_deactivation(deactivation);
        self
    }

    pub fn pool_size(mut self, min: u32, max: u32) -> Self {
        self.descriptor = self.descriptor.with_pool_size(min, max);
        self
    }

    pub fn command<I, F, Fut>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        I: CommandInput,
        F: Fn(I, ActorContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.commands.push(CommandDescriptor::new(name, handler));
        self
    }

    pub fn timer_command<I, F, Fut>(mut self, name: impl Into<String>, interval: Duration, handler: F) -> Self
    where
        I: CommandInput,
        F: Fn(I, ActorContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.commands.push(CommandDescriptor::timer(name, interval, handler));
        self
    }

    pub fn with_command(mut self, command: CommandDescriptor) -> Self {
        self.commands.push(command);
        self
    }

    pub fn descriptor(&self) -> &ActorDescriptor {
        &self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoInput;
    use bridge_core::Value;

    fn noop(name: &str) -> CommandDescriptor {
        CommandDescriptor::new(name, |_: NoInput, _ctx: ActorContext| async { Ok(Value::no_reply()) })
    }

    #[test]
    fn test_duplicate_command_is_rejected() {
        let mut builder = ActorRegistry::builder();
        let err = builder
            .register(ActorDescriptor::new("counter"), [noop("sum"), noop("sum")])
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateCommand {
                actor_type: "counter".into(),
                command: "sum".into()
            }
        );
    }

    #[test]
    fn test_same_command_name_on_different_actor_types() {
        let mut builder = ActorRegistry::builder();
        builder
            .register(ActorDescriptor::new("counter"), [noop("sum")])
            .unwrap()
            .register(ActorDescriptor::new("adder"), [noop("sum")])
            .unwrap();

        let registry = builder.build();
        assert_eq!(registry.len(), 2);
        assert!(registry.lookup("counter", "sum").is_ok());
        assert!(registry.lookup("adder", "sum").is_ok());
    }

    #[test]
    fn test_duplicate_actor_type_is_rejected() {
        let mut builder = ActorRegistry::builder();
        builder.define(ActorDefinition::new("counter").with_command(noop("get"))).unwrap();
        let err = builder
            .define(ActorDefinition::new("counter").with_command(noop("sum")))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateActorType("counter".into()));
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let mut builder = ActorRegistry::builder();
        assert_eq!(
            builder.register(ActorDescriptor::new(""), []).unwrap_err(),
            RegistryError::EmptyActorType
        );
        assert_eq!(
            builder.register(ActorDescriptor::new("counter"), [noop("")]).unwrap_err(),
            RegistryError::EmptyCommandName("counter".into())
        );
    }

    #[test]
    fn test_lookup_misses() {
        let mut builder = ActorRegistry::builder();
        builder
            .register_actor(
                "counter",
                true,
                SnapshotStrategy::Timeout(Duration::from_secs(2)),
                DeactivationStrategy::ProxyDefault,
                [noop("get")],
            )
            .unwrap();
        let registry = builder.build();

        let (descriptor, command) = registry.lookup("counter", "get").unwrap();
        assert_eq!(descriptor.snapshot, SnapshotStrategy::Timeout(Duration::from_secs(2)));
        assert_eq!(command.name(), "get");

        assert_eq!(
            registry.lookup("missing", "get").unwrap_err(),
            LookupError::UnknownActorType("missing".into())
        );
        assert_eq!(
            registry.lookup("counter", "missing").unwrap_err(),
            LookupError::UnknownCommand {
                actor_type: "counter".into(),
                command: "missing".into()
            }
        );
    }
}
