//! Centralized timeout configuration
//!
//! Every network call made by the client is bounded; these are the defaults
//! used when no explicit timeout is configured.

use std::time::Duration;

/// Default timeout for generic HTTP requests (30 seconds)
pub const HTTP_REQUEST_SECS: u64 = 30;

/// Safety margin subtracted from a credential's lifetime (5 minutes)
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Get HTTP request timeout as Duration
pub fn http_request_timeout() -> Duration {
    Duration::from_secs(HTTP_REQUEST_SECS)
}
