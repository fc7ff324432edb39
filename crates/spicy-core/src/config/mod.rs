//! Configuration management for the spicy client

mod api_config;
mod auth_config;
mod env_loader;

pub mod timeouts;

pub use api_config::ApiConfig;
pub use auth_config::{AuthConfig, default_token_file};
pub use env_loader::{load_from_env, load_from_lookup};

/// Complete client configuration
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Login handshake and credential cache
    pub auth: AuthConfig,
    /// REST services
    pub api: ApiConfig,
}

impl ClientConfig {
    /// Defaults overridden by `SPICY_*` environment variables
    pub fn from_env() -> crate::error::SpicyResult<Self> {
        load_from_env()
    }
}
