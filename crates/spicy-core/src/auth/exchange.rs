//! Authorization code for token exchange

use super::pkce::PkceVerifier;
use super::token::{TokenData, now_epoch_secs};
use super::transport_error;
use crate::config::AuthConfig;
use crate::error::{SpicyError, SpicyResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Token response from the provider
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    token_type: String,
}

impl TokenResponse {
    fn into_token_data(self, created_at: f64) -> TokenData {
        TokenData {
            access_token: self.access_token,
            expires_in: self.expires_in,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            scope: self.scope,
            token_type: self.token_type,
            created_at,
        }
    }
}

/// Exchange an authorization code and PKCE verifier for a credential.
///
/// `created_at` is stamped with the local clock on receipt.
pub async fn exchange_code(
    client: &Client,
    config: &AuthConfig,
    code: &str,
    verifier: &PkceVerifier,
) -> SpicyResult<TokenData> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("code", code),
        ("code_verifier", verifier.as_str()),
        ("grant_type", "authorization_code"),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = client
        .post(&config.token_endpoint)
        .header("kinde-sdk", &config.sdk_header)
        .header("origin", &config.app_origin)
        .form(&params)
        .send()
        .await
        .map_err(|e| transport_error("token exchange", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error("token exchange", e))?;
    debug!("Token endpoint responded with {}", status);

    if !status.is_success() {
        return Err(SpicyError::authentication_with_context(
            format!("Token exchange failed: {}", status.as_u16()),
            body,
        ));
    }

    let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
        SpicyError::authentication(format!("Token exchange returned an invalid body: {}", e))
    })?;

    Ok(token.into_token_data(now_epoch_secs()))
}
