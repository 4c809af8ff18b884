use std::sync::Arc;
use std::time::{Duration, Instant};

use actors::{ActorContext, ActorDefinition, ActorRegistry, CommandDispatcher, HandlerError, HandlerResult, NoInput};
use bridge_core::codec::{decode_response, encode_invocation};
use bridge_core::{InvocationEnvelope, ResponseEnvelope, TypedPayload, Value};
use parking_lot::Mutex;

/// State and input of the counter actor.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CounterState {
    #[prost(int32, tag = "1")]
    pub value: i32,
}

impl prost::Name for CounterState {
    const NAME: &'static str = "MyBusinessMessage";
    const PACKAGE: &'static str = "io.eigr.spawn.example";
}

pub fn counter(value: i32) -> TypedPayload {
    TypedPayload::pack_message(&CounterState { value })
}

async fn sum(input: CounterState, ctx: ActorContext) -> HandlerResult {
    let state: CounterState = ctx.state_or_default()?;
    let total = CounterState {
        value: state.value + input.value,
    };
    Ok(Value::at().state(&total).value(&total).reply())
}

async fn get(_: NoInput, ctx: ActorContext) -> HandlerResult {
    let state: CounterState = ctx.state_or_default()?;
    Ok(Value::at().value(&state).reply())
}

async fn reset(_: NoInput, _ctx: ActorContext) -> HandlerResult {
    Ok(Value::at().state(&CounterState { value: 0 }).no_reply())
}

async fn clear(_: NoInput, _ctx: ActorContext) -> HandlerResult {
    Ok(Value::at().state_payload(TypedPayload::empty()).no_reply())
}

pub const CALLER_TYPE_URL: &str = "type.googleapis.com/io.eigr.spawn.example.Caller";

/// Replies with `"<caller>|<trace metadata>"`.
async fn whoami(_: NoInput, ctx: ActorContext) -> HandlerResult {
    let caller = ctx.caller().map(ToString::to_string).unwrap_or_default();
    let trace = ctx.metadata().get("trace").cloned().unwrap_or_default();
    let reply = TypedPayload::pack(CALLER_TYPE_URL, format!("{caller}|{trace}").into_bytes());
    Ok(Value::at().value_payload(reply).reply())
}

async fn fail(_: NoInput, _ctx: ActorContext) -> HandlerResult {
    Err(HandlerError::msg("counter refuses"))
}

async fn explode(_: NoInput, _ctx: ActorContext) -> HandlerResult {
    panic!("counter exploded")
}

/// Handler execution window recorded by the sleeper actor.
#[derive(Debug, Clone)]
pub struct Interval {
    pub actor: String,
    /// The `seq` metadata entry of the invocation, if any.
    pub seq: Option<u32>,
    pub start: Instant,
    pub end: Instant,
}

impl Interval {
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub struct Fixture {
    pub dispatcher: Arc<CommandDispatcher>,
    pub intervals: Arc<Mutex<Vec<Interval>>>,
}

pub const SLEEP_DELAY: Duration = Duration::from_millis(100);

pub fn fixture() -> Fixture {
    let intervals = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&intervals);

    let mut builder = ActorRegistry::builder();
    builder
        .define(
            ActorDefinition::new("counter")
                .command("sum", sum)
                .command("get", get)
                .command("reset", reset)
                .command("clear", clear)
                .command("whoami", whoami)
                .command("fail", fail)
                .command("explode", explode),
        )
        .expect("counter registers")
        .define(ActorDefinition::new("sleeper").persistent(false).command(
            "slow",
            move |_: NoInput, ctx: ActorContext| {
                let recorded = Arc::clone(&recorded);
                async move {
                    let start = Instant::now();
                    tokio::time::sleep(SLEEP_DELAY).await;
                    recorded.lock().push(Interval {
                        actor: ctx.actor().name.clone(),
                        seq: ctx.metadata().get("seq").and_then(|seq| seq.parse().ok()),
                        start,
                        end: Instant::now(),
                    });
                    Ok(Value::no_reply())
                }
            },
        ))
        .expect("sleeper registers");

    Fixture {
        dispatcher: Arc::new(CommandDispatcher::new(builder.build())),
        intervals,
    }
}

/// Send an invocation through the byte boundary, as the transport would.
pub async fn invoke(dispatcher: &CommandDispatcher, envelope: &InvocationEnvelope) -> ResponseEnvelope {
    let bytes = dispatcher.handle(&encode_invocation(envelope)).await;
    decode_response(&bytes).expect("dispatcher always answers with a valid response")
}
