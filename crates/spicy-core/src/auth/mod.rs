//! Authentication module: email OTP login over OAuth 2.0 + PKCE
//!
//! Provides:
//! - PKCE verifier/challenge generation
//! - The identity provider handshake (login page, OTP submission, redirect)
//! - Authorization code exchange
//! - Single-slot credential storage with expiry-aware reuse
//! - [`SessionManager`], which ties the above together behind one lock

mod exchange;
mod handshake;
mod html;
mod pkce;
mod session;
mod token;

pub use exchange::exchange_code;
pub use handshake::{
    Handshake, OtpChallenge, OtpOutcome, OtpRejection, extract_authorization_code,
    parse_otp_response,
};
pub use pkce::{PkceChallenge, PkceVerifier, generate as generate_pkce};
pub use session::SessionManager;
pub use token::{FileTokenStorage, TokenData, TokenStorage, now_epoch_secs};

use crate::error::SpicyError;

/// Network failures during login surface as authentication errors
pub(crate) fn transport_error(step: &str, error: reqwest::Error) -> SpicyError {
    let kind = if error.is_timeout() { " (timed out)" } else { "" };
    SpicyError::authentication_with_context(
        format!("{} request failed{}: {}", step, kind, error),
        error
            .url()
            .map(|u| u.as_str().to_string())
            .unwrap_or_else(|| step.to_string()),
    )
}
