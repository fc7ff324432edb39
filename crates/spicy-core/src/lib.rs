//! Spicy Core Library
//!
//! Authentication and transport for the SpicyChat companion service:
//! the email OTP login (OAuth 2.0 + PKCE against the identity provider),
//! credential caching with expiry-aware reuse, the shared HTTP layer and the
//! REST models.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod models;

// Re-export commonly used types
pub use auth::{SessionManager, TokenData, TokenStorage};
pub use config::{ApiConfig, AuthConfig, ClientConfig};
pub use error::{SpicyError, SpicyResult, UnifiedError};
pub use http::HttpManager;
