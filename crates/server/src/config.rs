//! Server configuration.

use std::net::IpAddr;

use anyhow::Context;

use crate::types::{DEFAULT_HOST, DEFAULT_PORT};

/// Environment variable overriding the bind address.
pub const HOST_ENV: &str = "RAINBOW_UDP_HOST";
/// Environment variable overriding the startup port.
pub const PORT_ENV: &str = "RAINBOW_UDP_PORT";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup. Missing or unparsable values fall
    /// back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup(HOST_ENV)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup(PORT_ENV)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { host, port }
    }

    pub fn host_addr(&self) -> anyhow::Result<IpAddr> {
        self.host
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.host))
    }
}
