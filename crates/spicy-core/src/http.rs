//! Shared HTTP layer for the REST services
//!
//! Adds the browser-like default headers the services expect, injects the
//! bearer credential for authenticated calls and maps error statuses onto
//! [`SpicyError`].

use crate::auth::SessionManager;
use crate::config::ApiConfig;
use crate::error::{SpicyError, SpicyResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

const BASE_HEADERS: &[(&str, &str)] = &[
    ("accept", "application/json, text/plain, */*"),
    ("accept-language", "en-US,en;q=0.9"),
    ("origin", "https://spicychat.ai"),
    ("referer", "https://spicychat.ai/"),
    ("sec-ch-ua", "\"Not A(Brand\";v=\"8\", \"Chromium\";v=\"132\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "cross-site"),
    ("x-app-id", "spicychat"),
];

/// Longest body excerpt written to debug logs
const LOG_BODY_LIMIT: usize = 200;

/// HTTP client bound to a session
pub struct HttpManager {
    client: Client,
    session: Arc<SessionManager>,
}

impl HttpManager {
    /// Build the client with default headers and the configured timeout
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> SpicyResult<Self> {
        let client = Client::builder()
            .default_headers(default_headers(&config.guest_id)?)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, session })
    }

    /// Session backing authenticated requests
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Start a request
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request, attaching the bearer credential when `authenticated`.
    ///
    /// Non-success statuses become errors: 401 → `Authentication`,
    /// 404 → `NotFound`, 429 → `RateLimit`, anything else → `Api`.
    pub async fn send(&self, request: RequestBuilder, authenticated: bool) -> SpicyResult<Response> {
        let request = if authenticated {
            let token = self
                .session
                .get_token()
                .await
                .ok_or_else(|| SpicyError::authentication("Not logged in or token expired."))?;
            request.bearer_auth(token.access_token)
        } else {
            request
        };

        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Error body: {}", truncate(&body, LOG_BODY_LIMIT));
        Err(error_from_response(status, &body))
    }

    /// Send and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        authenticated: bool,
    ) -> SpicyResult<T> {
        let response = self.send(request, authenticated).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!("Undecodable body: {}", truncate(&body, LOG_BODY_LIMIT));
            SpicyError::json(format!("Failed to decode response: {}", e))
        })
    }

    /// Authenticated GET decoded as JSON
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> SpicyResult<T> {
        self.send_json(self.request(Method::GET, url), true).await
    }
}

fn default_headers(guest_id: &str) -> SpicyResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in BASE_HEADERS {
        headers.insert(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        );
    }
    let guest = HeaderValue::from_str(guest_id)
        .map_err(|_| SpicyError::config_with_context("Invalid guest id", guest_id.to_string()))?;
    headers.insert(HeaderName::from_static("x-guest-userid"), guest);
    Ok(headers)
}

/// Map an error status and body to a [`SpicyError`]
pub fn error_from_response(status: StatusCode, body: &str) -> SpicyError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED => {
            SpicyError::authentication(format!("Authentication failed: {}", message))
        }
        StatusCode::NOT_FOUND => SpicyError::not_found(status.as_u16(), message),
        StatusCode::TOO_MANY_REQUESTS => SpicyError::rate_limit(status.as_u16(), message),
        _ => SpicyError::api(status.as_u16(), message),
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
