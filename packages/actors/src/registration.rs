//! Proxy registration message built from the actor registry.

use std::collections::HashMap;
use std::time::Duration;

use bridge_core::protocol::{
    self, ActorDeactivationStrategy, ActorId, ActorSettings, ActorSnapshotStrategy, ActorSystem, Command,
    FixedTimerCommand, Kind, RegistrationRequest, ServiceInfo, TimeoutStrategy, actor_deactivation_strategy,
    actor_snapshot_strategy,
};
use bridge_core::{ActorDescriptor, ActorKind, DeactivationStrategy, SnapshotStrategy};

use crate::handler::CommandKind;
use crate::registry::{ActorRegistry, RegisteredActor};

pub const SUPPORT_LIBRARY_NAME: &str = "spawn-rust";

/// Describe this host process to the proxy.
pub fn service_info(service_name: impl Into<String>) -> ServiceInfo {
    ServiceInfo {
        service_name: service_name.into(),
        service_version: env!("CARGO_PKG_VERSION").to_string(),
        service_runtime: "rust".to_string(),
        support_library_name: SUPPORT_LIBRARY_NAME.to_string(),
        support_library_version: env!("CARGO_PKG_VERSION").to_string(),
        protocol_major_version: protocol::PROTOCOL_MAJOR_VERSION,
        protocol_minor_version: protocol::PROTOCOL_MINOR_VERSION,
    }
}

/// Build the registration request announcing every actor type in `registry`.
pub fn registration_request(
    registry: &ActorRegistry,
    system_name: &str,
    service_info: ServiceInfo,
) -> RegistrationRequest {
    let actors: HashMap<String, protocol::Actor> = registry
        .actors()
        .into_iter()
        .map(|actor| {
            (
                actor.descriptor().actor_type.clone(),
                actor_message(actor, system_name),
            )
        })
        .collect();

    RegistrationRequest {
        service_info: Some(service_info),
        actor_system: Some(ActorSystem {
            name: system_name.to_string(),
            registry: Some(protocol::Registry { actors }),
        }),
    }
}

fn actor_message(actor: &RegisteredActor, system_name: &str) -> protocol::Actor {
    let descriptor = actor.descriptor();

    let mut commands = Vec::new();
    let mut timer_commands = Vec::new();
    for command in actor.commands() {
        let message = Command {
            name: command.name().to_string(),
        };
        match command.kind() {
            CommandKind::Standard => commands.push(message),
            CommandKind::Timer { interval } => timer_commands.push(FixedTimerCommand {
                seconds: saturating_i32(interval.as_secs()),
                command: Some(message),
            }),
        }
    }

    protocol::Actor {
        id: Some(ActorId {
            name: descriptor.actor_type.clone(),
            system: system_name.to_string(),
            parent: String::new(),
        }),
        settings: Some(settings(descriptor)),
        commands,
        timer_commands,
    }
}

fn settings(descriptor: &ActorDescriptor) -> ActorSettings {
    let kind = match descriptor.kind {
        ActorKind::Singleton => Kind::Singleton,
        ActorKind::Abstract => Kind::Abstract,
        ActorKind::Pooled => Kind::Pooled,
    };

    let snapshot_strategy = match descriptor.snapshot {
        SnapshotStrategy::ProxyDefault => None,
        SnapshotStrategy::Timeout(timeout) => Some(ActorSnapshotStrategy {
            strategy: Some(actor_snapshot_strategy::Strategy::Timeout(timeout_strategy(timeout))),
        }),
    };

    let deactivation_strategy = match descriptor.deactivation {
        DeactivationStrategy::ProxyDefault => None,
        DeactivationStrategy::Timeout(timeout) => Some(ActorDeactivationStrategy {
            strategy: Some(actor_deactivation_strategy::Strategy::Timeout(timeout_strategy(timeout))),
        }),
    };

    ActorSettings {
        kind: kind as i32,
        stateful: descriptor.persistent,
        snapshot_strategy,
        deactivation_strategy,
        min_pool_size: saturating_i32(u64::from(descriptor.min_pool_size)),
        max_pool_size: saturating_i32(u64::from(descriptor.max_pool_size)),
    }
}

/// Timeouts travel as milliseconds.
fn timeout_strategy(timeout: Duration) -> TimeoutStrategy {
    TimeoutStrategy {
        timeout: i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX),
    }
}

fn saturating_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorContext, ActorDefinition, NoInput};
    use bridge_core::Value;

    fn registry() -> ActorRegistry {
        let mut builder = ActorRegistry::builder();
        builder
            .define(
                ActorDefinition::new("counter")
                    .snapshot(SnapshotStrategy::Timeout(Duration::from_secs(2)))
                    .command("sum", |_: NoInput, _ctx: ActorContext| async { Ok(Value::no_reply()) })
                    .command("get", |_: NoInput, _ctx: ActorContext| async { Ok(Value::no_reply()) })
                    .timer_command("tick", Duration::from_secs(30), |_: NoInput, _ctx: ActorContext| async {
                        Ok(Value::no_reply())
                    }),
            )
            .unwrap()
            .define(
                ActorDefinition::new("worker")
                    .persistent(false)
                    .kind(ActorKind::Pooled)
                    .pool_size(1, 4)
                    .deactivation(DeactivationStrategy::Timeout(Duration::from_secs(60))),
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_registration_request_describes_every_actor() {
        let request = registration_request(&registry(), "spawn-system", service_info("demo"));

        let info = request.service_info.unwrap();
        assert_eq!(info.service_name, "demo");
        assert_eq!(info.support_library_name, SUPPORT_LIBRARY_NAME);
        assert_eq!(info.protocol_major_version, protocol::PROTOCOL_MAJOR_VERSION);

        let system = request.actor_system.unwrap();
        assert_eq!(system.name, "spawn-system");
        let actors = system.registry.unwrap().actors;
        assert_eq!(actors.len(), 2);

        let counter = &actors["counter"];
        assert_eq!(counter.id.as_ref().unwrap().system, "spawn-system");
        let names: Vec<_> = counter.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["get", "sum"]);
        assert_eq!(counter.timer_commands.len(), 1);
        assert_eq!(counter.timer_commands[0].seconds, 30);

        let settings = counter.settings.as_ref().unwrap();
        assert!(settings.stateful);
        assert_eq!(settings.kind(), Kind::Singleton);
        assert_eq!(
            settings.snapshot_strategy,
            Some(ActorSnapshotStrategy {
                strategy: Some(actor_snapshot_strategy::Strategy::Timeout(TimeoutStrategy { timeout: 2000 })),
            })
        );
        assert_eq!(settings.deactivation_strategy, None);
    }

    #[test]
    fn test_pooled_settings() {
        let request = registration_request(&registry(), "spawn-system", service_info("demo"));
        let actors = request.actor_system.unwrap().registry.unwrap().actors;
        let settings = actors["worker"].settings.clone().unwrap();

        assert!(!settings.stateful);
        assert_eq!(settings.kind(), Kind::Pooled);
        assert_eq!((settings.min_pool_size, settings.max_pool_size), (1, 4));
        assert!(settings.deactivation_strategy.is_some());
    }
}
