//! Environment variable-based configuration loading
//!
//! Recognised variables (all optional):
//! - `SPICY_AUTH_BASE_URL`: identity provider origin
//! - `SPICY_CLIENT_ID`: OAuth client id
//! - `SPICY_TOKEN_FILE`: credential cache location
//! - `SPICY_API_BASE_URL`, `SPICY_CHAT_API_URL`, `SPICY_SEARCH_URL`,
//!   `SPICY_RECOMMENDATION_URL`: REST service origins
//! - `SPICY_GUEST_ID`: fixed guest id instead of a random one
//! - `SPICY_TIMEOUT_SECS`: request timeout applied to auth and API calls

use super::ClientConfig;
use crate::error::{SpicyError, SpicyResult};
use std::path::PathBuf;
use std::time::Duration;

/// Load configuration from the process environment
pub fn load_from_env() -> SpicyResult<ClientConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary key lookup
pub fn load_from_lookup<F>(lookup: F) -> SpicyResult<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ClientConfig::default();

    if let Some(base) = lookup("SPICY_AUTH_BASE_URL") {
        config.auth = config.auth.with_base_url(base);
    }
    if let Some(client_id) = lookup("SPICY_CLIENT_ID") {
        config.auth.client_id = client_id;
    }
    if let Some(path) = lookup("SPICY_TOKEN_FILE") {
        config.auth.token_file = PathBuf::from(path);
    }

    if let Some(url) = lookup("SPICY_API_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(url) = lookup("SPICY_CHAT_API_URL") {
        config.api.chat_api_url = url;
    }
    if let Some(url) = lookup("SPICY_SEARCH_URL") {
        config.api.search_url = url;
    }
    if let Some(url) = lookup("SPICY_RECOMMENDATION_URL") {
        config.api.recommendation_url = url;
    }
    if let Some(guest_id) = lookup("SPICY_GUEST_ID") {
        config.api.guest_id = guest_id;
    }

    if let Some(raw) = lookup("SPICY_TIMEOUT_SECS") {
        let secs: u64 = raw.trim().parse().map_err(|_| {
            SpicyError::config_with_context("Invalid SPICY_TIMEOUT_SECS value", raw.clone())
        })?;
        if secs == 0 {
            return Err(SpicyError::config("SPICY_TIMEOUT_SECS must be greater than zero"));
        }
        config.auth.request_timeout = Duration::from_secs(secs);
        config.api.request_timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = load_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.auth.auth_base_url, "https://gamma.kinde.com");
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = load_from_lookup(lookup(&[
            ("SPICY_AUTH_BASE_URL", "http://localhost:8080"),
            ("SPICY_TOKEN_FILE", "/tmp/spicy/tokens.json"),
            ("SPICY_GUEST_ID", "guest-1"),
            ("SPICY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.auth.token_endpoint, "http://localhost:8080/oauth2/token");
        assert_eq!(config.auth.token_file, PathBuf::from("/tmp/spicy/tokens.json"));
        assert_eq!(config.api.guest_id, "guest-1");
        assert_eq!(config.auth.request_timeout, Duration::from_secs(5));
        assert_eq!(config.api.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load_from_lookup(lookup(&[("SPICY_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, SpicyError::Config { .. }));

        let err = load_from_lookup(lookup(&[("SPICY_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, SpicyError::Config { .. }));
    }
}
