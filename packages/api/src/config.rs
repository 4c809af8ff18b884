//! Host configuration.

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

/// Environment variable naming a TOML configuration file.
pub const CONFIG_FILE_ENV: &str = "SPAWN_CONFIG";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings of the host process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Actor system the actors are registered in.
    pub system_name: String,
    pub service_name: String,
    /// Address the proxy calls back on.
    pub host: String,
    pub port: u16,
    pub proxy_url: String,
    /// Announce the actors to the proxy at startup.
    pub register_with_proxy: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            system_name: "spawn-system".to_string(),
            service_name: "spawn-rust-host".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8091,
            proxy_url: "http://127.0.0.1:9001".to_string(),
            register_with_proxy: true,
        }
    }
}

impl HostConfig {
    /// Load from `SPAWN_CONFIG` if set, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::default().with_overrides(lookup)
    }

    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&document)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("SPAWN_SYSTEM_NAME") {
            self.system_name = value;
        }
        if let Some(value) = lookup("SPAWN_SERVICE_NAME") {
            self.service_name = value;
        }
        if let Some(value) = lookup("USER_FUNCTION_HOST") {
            self.host = value;
        }
        if let Some(value) = lookup("USER_FUNCTION_PORT") {
            self.port = value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "USER_FUNCTION_PORT", value })?;
        }
        if let Some(value) = lookup("SPAWN_PROXY_URL") {
            self.proxy_url = value;
        }
        if let Some(value) = lookup("SPAWN_REGISTER_WITH_PROXY") {
            self.register_with_proxy = parse_bool(&value)
                .ok_or(ConfigError::InvalidValue { key: "SPAWN_REGISTER_WITH_PROXY", value })?;
        }
        Ok(self)
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "USER_FUNCTION_HOST",
            value: self.host.clone(),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
