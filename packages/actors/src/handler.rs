//! Command handler trait and function-based handlers.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bridge_core::{ActorRef, InvocationEnvelope, PayloadError, TypedPayload, Value, type_url_of};
use prost::{Message, Name};

/// Result type for command handlers.
pub type HandlerResult = Result<Value, HandlerError>;

/// Future type for async command handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// Error raised by user code while handling a command.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("state error: {0}")]
    State(#[from] PayloadError),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// What a handler sees of the actor it runs on.
#[derive(Debug, Clone)]
pub struct ActorContext {
    actor: ActorRef,
    state: Option<TypedPayload>,
    metadata: HashMap<String, String>,
    caller: Option<ActorRef>,
}

impl ActorContext {
    pub fn new(actor: ActorRef, state: Option<TypedPayload>) -> Self {
        Self {
            actor,
            state,
            metadata: HashMap::new(),
            caller: None,
        }
    }

    pub(crate) fn from_envelope(envelope: &InvocationEnvelope) -> Self {
        Self {
            actor: envelope.actor(),
            state: envelope.current_context.clone(),
            metadata: envelope.metadata.clone(),
            caller: envelope.caller.clone(),
        }
    }

    pub fn actor(&self) -> &ActorRef {
        &self.actor
    }

    /// Raw state before this invocation.
    pub fn state(&self) -> Option<&TypedPayload> {
        self.state.as_ref()
    }

    /// Decode the current state as `S`, if there is one.
    ///
    /// An empty payload counts as no state.
    pub fn state_as<S: Message + Name + Default>(&self) -> Result<Option<S>, PayloadError> {
        self.state
            .as_ref()
            .filter(|state| !state.is_empty())
            .map(|state| state.unpack_message::<S>())
            .transpose()
    }

    /// Decode the current state as `S`, falling back to `S::default()`.
    pub fn state_or_default<S: Message + Name + Default>(&self) -> Result<S, PayloadError> {
        Ok(self.state_as()?.unwrap_or_default())
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn caller(&self) -> Option<&ActorRef> {
        self.caller.as_ref()
    }
}

/// Input accepted by a command.
///
/// Implemented for every protobuf message with a [`Name`], for [`NoInput`]
/// and for [`RawInput`].
pub trait CommandInput: Sized + Send + 'static {
    /// Type URL the command expects, `None` if it accepts anything.
    fn expected_type_url() -> Option<String>;

    fn decode(payload: &TypedPayload) -> Result<Self, PayloadError>;
}

impl<M> CommandInput for M
where
    M: Message + Name + Default + Send + 'static,
{
    fn expected_type_url() -> Option<String> {
        Some(type_url_of::<M>())
    }

    fn decode(payload: &TypedPayload) -> Result<Self, PayloadError> {
        payload.unpack_message()
    }
}

/// Input of commands that only look at state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoInput;

impl CommandInput for NoInput {
    fn expected_type_url() -> Option<String> {
        None
    }

    fn decode(_payload: &TypedPayload) -> Result<Self, PayloadError> {
        Ok(NoInput)
    }
}

/// Input of commands that take the payload as is, whatever its type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput(pub TypedPayload);

impl CommandInput for RawInput {
    fn expected_type_url() -> Option<String> {
        None
    }

    fn decode(payload: &TypedPayload) -> Result<Self, PayloadError> {
        Ok(RawInput(payload.clone()))
    }
}

/// Trait for command handlers.
///
/// `invoke` decodes the input synchronously and only then hands back the
/// future that runs user code, so a bad input never reaches the handler.
pub trait CommandHandler: Send + Sync + 'static {
    /// Type URL of the expected input, `None` if any input is accepted.
    fn input_type_url(&self) -> Option<String>;

    fn invoke(&self, input: &TypedPayload, context: ActorContext) -> Result<HandlerFuture, PayloadError>;
}

/// A function-based command handler.
pub struct FnHandler<I, F> {
    handler: F,
    _input: PhantomData<fn() -> I>,
}

impl<I, F> FnHandler<I, F> {
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _input: PhantomData,
        }
    }
}

impl<I, F, Fut> CommandHandler for FnHandler<I, F>
where
    I: CommandInput,
    F: Fn(I, ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn input_type_url(&self) -> Option<String> {
        I::expected_type_url()
    }

    fn invoke(&self, input: &TypedPayload, context: ActorContext) -> Result<HandlerFuture, PayloadError> {
        let input = I::decode(input)?;
        Ok(Box::pin((self.handler)(input, context)))
    }
}

/// How the proxy triggers a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Invoked on request.
    Standard,
    /// Invoked by the proxy at a fixed interval.
    Timer { interval: Duration },
}

/// A named command of one actor type.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    kind: CommandKind,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    /// Create a command from an async function of `(input, context)`.
    pub fn new<I, F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        I: CommandInput,
        F: Fn(I, ActorContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::from_handler(name, FnHandler::new(handler))
    }

    /// Create a fixed timer command.
    pub fn timer<I, F, Fut>(name: impl Into<String>, interval: Duration, handler: F) -> Self
    where
        I: CommandInput,
        F: Fn(I, ActorContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let mut command = Self::new(name, handler);
        command.kind = CommandKind::Timer { interval };
        command
    }

    pub fn from_handler<H: CommandHandler>(name: impl Into<String>, handler: H) -> Self {
        Self {
            name: name.into(),
            kind: CommandKind::Standard,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn input_type_url(&self) -> Option<String> {
        self.handler.input_type_url()
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("input", &self.input_type_url())
            .finish()
    }
}
