//! Core error types and traits

use thiserror::Error;

/// Result type alias for spicy operations
pub type SpicyResult<T> = Result<T, SpicyError>;

/// Unified error trait implemented by [`SpicyError`].
///
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable by the caller
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Main error type for the spicy client
#[derive(Error, Debug, Clone)]
pub enum SpicyError {
    /// Login handshake, token exchange, or missing/expired credential
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: Option<String>,
    },

    /// The REST API answered with a non-success status
    #[error("API returned {status_code}: {message}")]
    Api { status_code: u16, message: String },

    /// The REST API answered 429
    #[error("Rate limited ({status_code}): {message}")]
    RateLimit { status_code: u16, message: String },

    /// The REST API answered 404
    #[error("Not found ({status_code}): {message}")]
    NotFound { status_code: u16, message: String },

    /// Transport-level failure (connect, timeout, decode)
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        timeout: bool,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Invalid caller input
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },
}

impl UnifiedError for SpicyError {
    fn error_code(&self) -> &str {
        match self {
            SpicyError::Authentication { .. } => "SPICY_AUTH",
            SpicyError::Api { .. } => "SPICY_API",
            SpicyError::RateLimit { .. } => "SPICY_RATE_LIMIT",
            SpicyError::NotFound { .. } => "SPICY_NOT_FOUND",
            SpicyError::Http { .. } => "SPICY_HTTP",
            SpicyError::Config { .. } => "SPICY_CONFIG",
            SpicyError::Io { .. } => "SPICY_IO",
            SpicyError::Json { .. } => "SPICY_JSON",
            SpicyError::InvalidInput { .. } => "SPICY_INVALID_INPUT",
        }
    }

    fn message(&self) -> &str {
        match self {
            SpicyError::Authentication { message, .. }
            | SpicyError::Api { message, .. }
            | SpicyError::RateLimit { message, .. }
            | SpicyError::NotFound { message, .. }
            | SpicyError::Http { message, .. }
            | SpicyError::Config { message, .. }
            | SpicyError::Io { message, .. }
            | SpicyError::Json { message }
            | SpicyError::InvalidInput { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            SpicyError::Authentication { context, .. } | SpicyError::Config { context, .. } => {
                context.as_deref()
            }
            SpicyError::Http { url, .. } => url.as_deref(),
            SpicyError::Io { path, .. } => path.as_deref(),
            SpicyError::InvalidInput { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            SpicyError::RateLimit { .. } => true,
            SpicyError::Http { timeout, .. } => *timeout,
            SpicyError::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl SpicyError {
    /// Whether this is an authentication failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, SpicyError::Authentication { .. })
    }

    /// HTTP status code carried by API-level errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SpicyError::Api { status_code, .. }
            | SpicyError::RateLimit { status_code, .. }
            | SpicyError::NotFound { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
