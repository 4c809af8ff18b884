//! Server initialization for the actor host.

use std::sync::Arc;

use actors::{ActorRegistry, CommandDispatcher, registration};
use bridge_core::protocol::RegistrationResponse;
use tokio::net::TcpListener;

use crate::config::{ConfigError, HostConfig};
use crate::http;
use crate::proxy::{ProxyClient, ProxyError};

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("registration with the proxy failed: {0}")]
    Registration(#[from] ProxyError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Freeze the registry and build the dispatcher.
///
/// This should be called once at startup, after every actor is registered.
pub fn init(registry: ActorRegistry) -> Arc<CommandDispatcher> {
    for actor in registry.actors() {
        let commands: Vec<_> = actor.commands().iter().map(|command| command.name()).collect();
        tracing::info!(
            actor_type = %actor.descriptor().actor_type,
            kind = actor.descriptor().kind.as_str(),
            persistent = actor.descriptor().persistent,
            ?commands,
            "Actor type ready"
        );
    }
    Arc::new(CommandDispatcher::new(registry))
}

/// Announce the registry to the proxy.
pub async fn register_with_proxy(
    config: &HostConfig,
    registry: &ActorRegistry,
) -> Result<RegistrationResponse, ProxyError> {
    let client = ProxyClient::new(&config.proxy_url)?;
    let request = registration::registration_request(
        registry,
        &config.system_name,
        registration::service_info(&config.service_name),
    );

    tracing::info!(url = %client.system_url(), system = %config.system_name, "Registering with proxy");
    let response = client.register(&request).await?;

    if let Some(proxy) = &response.proxy_info {
        tracing::info!(
            proxy = %proxy.proxy_name,
            version = %proxy.proxy_version,
            protocol = %format!("{}.{}", proxy.protocol_major_version, proxy.protocol_minor_version),
            "Registered with proxy"
        );
    }
    Ok(response)
}

/// Bind, register with the proxy if enabled, then serve until Ctrl-C.
pub async fn serve(config: &HostConfig, dispatcher: Arc<CommandDispatcher>) -> Result<(), ServeError> {
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await.map_err(|source| ServeError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    tracing::info!(%addr, path = http::ACTIONS_PATH, "Listening for invocations");

    // The proxy may call back as soon as it accepts the registration.
    if config.register_with_proxy {
        register_with_proxy(config, dispatcher.registry()).await?;
    } else {
        tracing::info!("Proxy registration disabled");
    }

    axum::serve(listener, http::router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
