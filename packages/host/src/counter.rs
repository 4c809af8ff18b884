//! Demo `counter` actor.

use std::time::Duration;

use actors::{ActorContext, ActorDefinition, HandlerError, HandlerResult, NoInput};
use bridge_core::{SnapshotStrategy, Value};

/// State of the counter and input of `sum`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MyBusinessMessage {
    #[prost(int32, tag = "1")]
    pub value: i32,
}

impl prost::Name for MyBusinessMessage {
    const NAME: &'static str = "MyBusinessMessage";
    const PACKAGE: &'static str = "io.eigr.spawn.example";
}

pub fn definition() -> ActorDefinition {
    ActorDefinition::new("counter")
        .persistent(true)
        .snapshot(SnapshotStrategy::Timeout(Duration::from_secs(2)))
        .command("sum", sum)
        .command("get", get)
        .timer_command("log", Duration::from_secs(60), log)
}

async fn sum(input: MyBusinessMessage, ctx: ActorContext) -> HandlerResult {
    let state: MyBusinessMessage = ctx.state_or_default()?;
    let value = state
        .value
        .checked_add(input.value)
        .ok_or_else(|| HandlerError::msg("counter overflow"))?;

    tracing::info!(actor = %ctx.actor(), previous = state.value, value, "Counter updated");
    let next = MyBusinessMessage { value };
    Ok(Value::at().state(&next).value(&next).reply())
}

async fn get(_: NoInput, ctx: ActorContext) -> HandlerResult {
    let state: MyBusinessMessage = ctx.state_or_default()?;
    Ok(Value::at().value(&state).reply())
}

async fn log(_: NoInput, ctx: ActorContext) -> HandlerResult {
    let state: MyBusinessMessage = ctx.state_or_default()?;
    tracing::info!(actor = %ctx.actor(), value = state.value, "Counter tick");
    Ok(Value::no_reply())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actors::{ActorRegistry, CommandDispatcher};
    use bridge_core::{InvocationEnvelope, TypedPayload};

    fn dispatcher() -> CommandDispatcher {
        let mut builder = ActorRegistry::builder();
        builder.define(definition()).unwrap();
        CommandDispatcher::new(builder.build())
    }

    fn counter(value: i32) -> TypedPayload {
        TypedPayload::pack_message(&MyBusinessMessage { value })
    }

    #[tokio::test]
    async fn test_sum_and_get() {
        let dispatcher = dispatcher();

        let summed = dispatcher
            .dispatch(
                InvocationEnvelope::new("spawn-system", "counter", "sum")
                    .with_value(counter(5))
                    .with_state(counter(10)),
            )
            .await;
        assert_eq!(summed.value(), Some(&counter(15)));

        let got = dispatcher
            .dispatch(InvocationEnvelope::new("spawn-system", "counter", "get").with_state(counter(15)))
            .await;
        assert_eq!(got.value(), Some(&counter(15)));
    }

    #[tokio::test]
    async fn test_overflow_keeps_state() {
        let response = dispatcher()
            .dispatch(
                InvocationEnvelope::new("spawn-system", "counter", "sum")
                    .with_value(counter(1))
                    .with_state(counter(i32::MAX)),
            )
            .await;
        assert!(response.status.message().contains("counter overflow"));
        assert_eq!(response.updated_context, Some(counter(i32::MAX)));
    }
}
