//! Transport and startup for the actor host.
//!
//! This crate contains:
//! - Host configuration (environment and TOML)
//! - The HTTP routes the proxy calls (`POST /api/v1/actors/actions`)
//! - The proxy registration client
//! - `init`/`serve` helpers used by the binary

mod config;

#[cfg(feature = "server")]
pub mod http;

#[cfg(feature = "server")]
mod init;

#[cfg(feature = "server")]
mod proxy;

pub use config::{CONFIG_FILE_ENV, ConfigError, HostConfig};

#[cfg(feature = "server")]
pub use init::*;

#[cfg(feature = "server")]
pub use proxy::{ProxyClient, ProxyError};
