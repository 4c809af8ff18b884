use actors::ActorRegistry;
use anyhow::Context;
use api::HostConfig;
use tracing_subscriber::EnvFilter;

mod counter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = HostConfig::load().context("loading host configuration")?;
    tracing::info!(
        system = %config.system_name,
        service = %config.service_name,
        proxy = %config.proxy_url,
        "Starting actor host"
    );

    let mut registry = ActorRegistry::builder();
    registry.define(counter::definition())?;

    let dispatcher = api::init(registry.build());
    api::serve(&config, dispatcher).await?;
    Ok(())
}
