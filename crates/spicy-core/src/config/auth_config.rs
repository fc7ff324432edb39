//! Identity provider configuration

use super::timeouts;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_AUTH_BASE_URL: &str = "https://gamma.kinde.com";
const DEFAULT_CLIENT_ID: &str = "fb5754f42ee84f4787f9bd8ff49cac7a";
const DEFAULT_REDIRECT_URI: &str = "https://spicychat.ai";
const DEFAULT_CONNECTION_ID: &str = "conn_018f086c2c8b8d0865256c986b6ad99f";
const DEFAULT_ORG_CODE: &str = "org_7d8efc10ab9";

/// Configuration for the login handshake and the token exchange.
///
/// Constructed once and handed to [`crate::auth::SessionManager`]; nothing in
/// the auth module reads global state.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity provider origin, also sent as `origin` on OTP submission
    pub auth_base_url: String,
    /// OAuth authorization endpoint serving the HTML login page
    pub authorization_endpoint: String,
    /// OAuth token endpoint
    pub token_endpoint: String,
    /// Widget endpoint accepting the confirmation code
    pub otp_submit_endpoint: String,
    /// OAuth client id
    pub client_id: String,
    /// Redirect URI registered for the client
    pub redirect_uri: String,
    /// Passwordless email connection id
    pub connection_id: String,
    /// Organization code
    pub org_code: String,
    /// Requested scopes
    pub scope: String,
    /// Cookie the provider must set on the login page for OTP submission to work
    pub session_cookie: String,
    /// Application origin sent with the token exchange
    pub app_origin: String,
    /// Value of the `kinde-sdk` header on the token exchange
    pub sdk_header: String,
    /// Phrase in the OTP form fragment meaning the code was wrong or expired
    pub invalid_code_phrase: String,
    /// CSS class of the inline validation message in the OTP form fragment
    pub validation_message_class: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Location of the cached credential
    pub token_file: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let base = DEFAULT_AUTH_BASE_URL;
        Self {
            auth_base_url: base.to_string(),
            authorization_endpoint: format!("{}/oauth2/auth", base),
            token_endpoint: format!("{}/oauth2/token", base),
            otp_submit_endpoint: format!(
                "{}/end_user_pages/widgets/partials/otp/otp_code_form",
                base
            ),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            connection_id: DEFAULT_CONNECTION_ID.to_string(),
            org_code: DEFAULT_ORG_CODE.to_string(),
            scope: "openid profile email offline".to_string(),
            session_cookie: "kbtc".to_string(),
            app_origin: DEFAULT_REDIRECT_URI.to_string(),
            sdk_header: "React/4.0.5".to_string(),
            invalid_code_phrase: "Please enter a valid confirmation code".to_string(),
            validation_message_class: "kinde-control-associated-text-variant-invalid"
                .to_string(),
            request_timeout: timeouts::http_request_timeout(),
            token_file: default_token_file(),
        }
    }
}

impl AuthConfig {
    /// Point every provider endpoint at a different origin
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        self.authorization_endpoint = format!("{}/oauth2/auth", base);
        self.token_endpoint = format!("{}/oauth2/token", base);
        self.otp_submit_endpoint = format!(
            "{}/end_user_pages/widgets/partials/otp/otp_code_form",
            base
        );
        self.auth_base_url = base;
        self
    }

    /// Set the token file location
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = path.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Referer the provider expects on OTP submission
    pub fn verify_email_referer(&self, session_id: &str) -> String {
        format!(
            "{}/auth/cx/_:nav&m:verify_email&psid:{}",
            self.auth_base_url, session_id
        )
    }
}

/// `~/.config/spicychat-api/tokens.json`
pub fn default_token_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("spicychat-api")
        .join("tokens.json")
}
