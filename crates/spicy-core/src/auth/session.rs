//! Session manager: credential lifecycle for one process
//!
//! A single async mutex guards both the cached credential and the login
//! handshake, so concurrent callers never see a half-written credential and
//! at most one handshake runs at a time.

use super::exchange::exchange_code;
use super::handshake::Handshake;
use super::pkce;
use super::token::{FileTokenStorage, TokenData, TokenStorage, now_epoch_secs};
use crate::config::AuthConfig;
use crate::error::{SpicyError, SpicyResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Owns the cached credential and drives logins
pub struct SessionManager {
    config: Arc<AuthConfig>,
    storage: Arc<dyn TokenStorage>,
    token: Mutex<Option<TokenData>>,
}

impl SessionManager {
    /// Session manager persisting to `config.token_file`
    pub fn new(config: AuthConfig) -> Self {
        let storage = Arc::new(FileTokenStorage::new(config.token_file.clone()));
        Self::with_storage(config, storage)
    }

    /// Session manager with custom storage
    pub fn with_storage(config: AuthConfig, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            token: Mutex::new(None),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Current usable credential, if any. Never touches the network.
    pub async fn get_token(&self) -> Option<TokenData> {
        let mut cached = self.token.lock().await;
        self.current_token(&mut cached)
    }

    /// Log in with an emailed one-time code.
    ///
    /// Returns immediately when a usable credential already exists. Otherwise
    /// runs the full handshake, awaiting `otp_prompt` for the code the provider
    /// sent to `email`. The prompt is awaited without a timeout.
    pub async fn login<F, Fut>(&self, email: &str, otp_prompt: F) -> SpicyResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SpicyResult<String>>,
    {
        let mut cached = self.token.lock().await;
        if self.current_token(&mut cached).is_some() {
            debug!("Valid credential already cached, skipping login");
            return Ok(());
        }

        info!("Starting new login process");
        let (verifier, challenge) = pkce::generate();
        let handshake = Handshake::new(self.config.clone())?;

        info!("Requesting OTP page for {}", email);
        let otp_challenge = handshake.request_otp(email, &challenge).await?;

        let otp = otp_prompt().await.map_err(|e| match e {
            SpicyError::Authentication { .. } => e,
            other => SpicyError::authentication(format!("Failed to read OTP: {}", other)),
        })?;

        info!("Submitting OTP");
        let code = handshake.submit_otp(&otp, &otp_challenge).await?;

        info!("Exchanging authorization code for token");
        let token = exchange_code(handshake.client(), &self.config, &code, &verifier).await?;

        self.storage.save(&token).map_err(|e| {
            SpicyError::authentication_with_context("Failed to persist credential", e.to_string())
        })?;
        *cached = Some(token);
        info!("Login successful, tokens saved");
        Ok(())
    }

    /// Forget the credential in memory and on disk
    pub async fn logout(&self) -> SpicyResult<()> {
        let mut cached = self.token.lock().await;
        *cached = None;
        self.storage.clear()?;
        info!("Logged out");
        Ok(())
    }

    fn current_token(&self, cached: &mut Option<TokenData>) -> Option<TokenData> {
        if cached.is_none() {
            *cached = self.storage.load();
        }

        let token = cached.as_ref()?;
        if token.is_valid_at(now_epoch_secs()) {
            return Some(token.clone());
        }

        debug!("Cached credential expired, discarding");
        *cached = None;
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to remove expired token file: {}", e);
        }
        None
    }
}
