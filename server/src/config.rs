use std::env;
use std::net::SocketAddr;

use larder_core::llm::ConfigError;
use larder_core::LlmConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// Load from the environment. A missing upstream credential is an error
    /// here, so the server refuses to start rather than failing every request.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr =
            env::var("LARDER_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "LARDER_BIND_ADDR".to_string(),
            value: raw_addr.clone(),
        })?;

        Ok(Self {
            bind_addr,
            llm: LlmConfig::from_env()?,
        })
    }
}
