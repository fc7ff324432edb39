//! Email OTP handshake against the identity provider
//!
//! One [`Handshake`] drives one login attempt:
//! fetch the login page, submit the confirmation code, follow the redirect
//! chain to the authorization code. It owns the HTTP client and its cookie
//! jar, so provider session state lives exactly as long as the attempt.

use super::html;
use super::pkce::PkceChallenge;
use super::transport_error;
use crate::config::AuthConfig;
use crate::error::{SpicyError, SpicyResult};
use rand::RngCore;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart::Form;
use reqwest::{Client, Url, redirect};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Redirect hops followed after the OTP is accepted
const MAX_REDIRECTS: usize = 10;

/// Anti-forgery state scraped from the login page
#[derive(Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// Value of `<meta name="csrf-token">`
    pub csrf_token: String,
    /// Value of the hidden `p_psid` field
    pub session_id: String,
}

impl std::fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

/// Decoded result of an OTP submission.
///
/// The provider answers 200 whether or not the code was accepted; the body
/// shape is the only signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpOutcome {
    /// Code accepted; continue at `location`
    Redirect { location: String },
    /// Code refused
    Rejected(OtpRejection),
}

/// Why the provider refused a confirmation code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpRejection {
    /// The known "invalid code" phrase was present
    InvalidCode,
    /// Inline validation message from the provider
    ProviderMessage(String),
    /// Nothing recognisable; carries the raw body
    Unrecognized(String),
}

impl From<OtpRejection> for SpicyError {
    fn from(rejection: OtpRejection) -> Self {
        match rejection {
            OtpRejection::InvalidCode => SpicyError::authentication(
                "OTP submission failed. The code was likely incorrect or expired. Please try again.",
            ),
            OtpRejection::ProviderMessage(message) => {
                SpicyError::authentication(format!("OTP submission failed: {}", message))
            }
            OtpRejection::Unrecognized(body) => SpicyError::authentication_with_context(
                "OTP submission failed with an unrecognized response",
                body,
            ),
        }
    }
}

#[derive(Deserialize)]
struct OtpEnvelope {
    #[serde(default)]
    json: serde_json::Value,
    #[serde(default)]
    html: Option<String>,
}

#[derive(Deserialize)]
struct RedirectInstruction {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// Classify an OTP submission body.
///
/// Checked in order: nested redirect instruction, the invalid-code phrase,
/// the inline validation message, then anything else as unrecognized.
pub fn parse_otp_response(body: &str, config: &AuthConfig) -> SpicyResult<OtpOutcome> {
    let envelope: Option<OtpEnvelope> = serde_json::from_str(body).ok();

    if let Some(envelope) = &envelope {
        let nested = match &envelope.json {
            serde_json::Value::String(s) if !s.trim().is_empty() => {
                Some(serde_json::from_str::<serde_json::Value>(s).map_err(|e| {
                    SpicyError::authentication_with_context(
                        format!("Failed to parse redirect information from OTP response: {}", e),
                        body.to_string(),
                    )
                })?)
            }
            serde_json::Value::Object(_) => Some(envelope.json.clone()),
            _ => None,
        };

        if let Some(nested) = nested {
            let instruction: RedirectInstruction =
                serde_json::from_value(nested).map_err(|e| {
                    SpicyError::authentication_with_context(
                        format!("Failed to parse redirect information from OTP response: {}", e),
                        body.to_string(),
                    )
                })?;
            return match (instruction.action.as_deref(), instruction.location) {
                (Some("redirect"), Some(location)) if !location.is_empty() => {
                    Ok(OtpOutcome::Redirect { location })
                }
                _ => Err(SpicyError::authentication_with_context(
                    "OTP submission response was not a valid redirect object",
                    body.to_string(),
                )),
            };
        }
    }

    let fragment = envelope
        .as_ref()
        .and_then(|e| e.html.as_deref())
        .unwrap_or(body);

    if fragment.contains(&config.invalid_code_phrase) {
        return Ok(OtpOutcome::Rejected(OtpRejection::InvalidCode));
    }
    if let Some(message) = html::find_text_by_class(fragment, &config.validation_message_class)
        .filter(|m| !m.is_empty())
    {
        return Ok(OtpOutcome::Rejected(OtpRejection::ProviderMessage(message)));
    }
    Ok(OtpOutcome::Rejected(OtpRejection::Unrecognized(body.to_string())))
}

/// Pull the authorization code out of the final redirect URL
pub fn extract_authorization_code(url: &Url) -> SpicyResult<String> {
    let mut code = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        let message = format!(
            "Authentication failed after redirect. Server returned error: '{}'.",
            error
        );
        return Err(match description {
            Some(description) => SpicyError::authentication_with_context(message, description),
            None => SpicyError::authentication(message),
        });
    }

    code.filter(|c| !c.is_empty()).ok_or_else(|| {
        SpicyError::authentication_with_context(
            "Could not extract authorization code from final redirect URL",
            url.to_string(),
        )
    })
}

/// Provider handshake for a single login attempt
pub struct Handshake {
    config: Arc<AuthConfig>,
    client: Client,
    jar: Arc<Jar>,
}

impl Handshake {
    /// Build a handshake with a fresh cookie jar
    pub fn new(config: Arc<AuthConfig>) -> SpicyResult<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                SpicyError::authentication(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { config, client, jar })
    }

    /// HTTP client scoped to this attempt, shared with the token exchange
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Open the login page for `email`, which makes the provider send the OTP
    pub async fn request_otp(
        &self,
        email: &str,
        challenge: &PkceChallenge,
    ) -> SpicyResult<OtpChallenge> {
        let state = random_state();
        let params = [
            ("connection_id", self.config.connection_id.as_str()),
            ("login_hint", email),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", self.config.scope.as_str()),
            ("code_challenge", challenge.as_str()),
            ("code_challenge_method", PkceChallenge::METHOD),
            ("state", state.as_str()),
            ("prompt", "create"),
            ("org_code", self.config.org_code.as_str()),
        ];

        let response = self
            .client
            .get(&self.config.authorization_endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| transport_error("OTP page", e))?;

        let status = response.status();
        let page_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("OTP page", e))?;
        debug!("OTP page responded with {}", status);

        if !status.is_success() {
            return Err(SpicyError::authentication_with_context(
                format!("Failed to get OTP page: {}", status.as_u16()),
                body,
            ));
        }

        let csrf_token = html::find_attribute(&body, "meta", "name", "csrf-token", "content");
        let session_id = html::find_attribute(&body, "input", "name", "p_psid", "value");
        let (Some(csrf_token), Some(session_id)) = (csrf_token, session_id) else {
            return Err(SpicyError::authentication(
                "Could not find CSRF token or PSID on the page.",
            ));
        };

        if !self.has_session_cookie(&page_url) {
            return Err(SpicyError::authentication(format!(
                "Failed to get {} cookie.",
                self.config.session_cookie
            )));
        }

        info!("Login page parsed; the provider has emailed a confirmation code");
        Ok(OtpChallenge {
            csrf_token,
            session_id,
        })
    }

    /// Submit the confirmation code and follow the provider's redirect to
    /// the authorization code
    pub async fn submit_otp(&self, otp: &str, challenge: &OtpChallenge) -> SpicyResult<String> {
        let form = Form::new()
            .text("x_csrf_token", challenge.csrf_token.clone())
            .text("p_psid", challenge.session_id.clone())
            .text("p_confirmation_code", otp.trim().to_string());

        let response = self
            .client
            .post(&self.config.otp_submit_endpoint)
            .multipart(form)
            .header("accept", "roast/mixed")
            .header("x-csrf-token", &challenge.csrf_token)
            .header("x-requested-with", "XMLHttpRequest")
            .header("origin", &self.config.auth_base_url)
            .header(
                "referer",
                self.config.verify_email_referer(&challenge.session_id),
            )
            .send()
            .await
            .map_err(|e| transport_error("OTP submission", e))?;

        let status = response.status();
        let submit_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("OTP submission", e))?;

        if !status.is_success() {
            return Err(SpicyError::authentication_with_context(
                format!(
                    "OTP submission failed with unexpected status: {}",
                    status.as_u16()
                ),
                body,
            ));
        }

        let location = match parse_otp_response(&body, &self.config)? {
            OtpOutcome::Redirect { location } => location,
            OtpOutcome::Rejected(rejection) => return Err(rejection.into()),
        };

        let target = submit_url.join(&location).map_err(|e| {
            SpicyError::authentication_with_context(
                format!("Invalid redirect location in OTP response: {}", e),
                location.clone(),
            )
        })?;

        info!("OTP accepted; following provider redirect");
        let final_response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| transport_error("authorization redirect", e))?;

        extract_authorization_code(final_response.url())
    }

    fn has_session_cookie(&self, url: &Url) -> bool {
        let prefix = format!("{}=", self.config.session_cookie);
        self.jar
            .cookies(url)
            .and_then(|header| header.to_str().ok().map(str::to_owned))
            .map(|cookies| {
                cookies
                    .split(';')
                    .any(|cookie| cookie.trim_start().starts_with(&prefix))
            })
            .unwrap_or(false)
    }
}

fn random_state() -> String {
    let mut bytes = [0u8; 30];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::pkce;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOGIN_PAGE: &str = r#"<html><head><meta name="csrf-token" content="csrf-xyz"></head>
<body><form><input type="hidden" name="p_psid" value="psid-42"></form></body></html>"#;

    fn config_for(server: &MockServer) -> Arc<AuthConfig> {
        Arc::new(
            AuthConfig::default()
                .with_base_url(server.uri())
                .with_timeout(Duration::from_secs(5)),
        )
    }

    fn redirect_body(location: &str) -> String {
        let nested = serde_json::json!({ "action": "redirect", "location": location }).to_string();
        serde_json::json!({ "json": nested, "html": "" }).to_string()
    }

    async fn mount_login_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/oauth2/auth"))
            .and(query_param("prompt", "create"))
            .and(query_param("code_challenge_method", "S256"))
            .and(query_param("login_hint", "user@example.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "kbtc=session-cookie; Path=/")
                    .set_body_string(LOGIN_PAGE),
            )
            .mount(server)
            .await;
    }

    fn otp_challenge() -> OtpChallenge {
        OtpChallenge {
            csrf_token: "csrf-xyz".to_string(),
            session_id: "psid-42".to_string(),
        }
    }

    #[test]
    fn test_parse_redirect() {
        let config = AuthConfig::default();
        let outcome =
            parse_otp_response(&redirect_body("https://example/callback?code=ABC123"), &config)
                .unwrap();
        assert_eq!(
            outcome,
            OtpOutcome::Redirect {
                location: "https://example/callback?code=ABC123".to_string()
            }
        );
    }

    #[test]
    fn test_parse_invalid_code() {
        let config = AuthConfig::default();
        let body = serde_json::json!({
            "json": "",
            "html": "<p>Please enter a valid confirmation code</p>"
        })
        .to_string();
        assert_eq!(
            parse_otp_response(&body, &config).unwrap(),
            OtpOutcome::Rejected(OtpRejection::InvalidCode)
        );
    }

    #[test]
    fn test_parse_provider_message() {
        let config = AuthConfig::default();
        let body = serde_json::json!({
            "json": "",
            "html": "<span class=\"kinde-control-associated-text-variant-invalid\">Code expired</span>"
        })
        .to_string();
        assert_eq!(
            parse_otp_response(&body, &config).unwrap(),
            OtpOutcome::Rejected(OtpRejection::ProviderMessage("Code expired".to_string()))
        );
    }

    #[test]
    fn test_parse_unrecognized_keeps_raw_body() {
        let config = AuthConfig::default();
        let body = r#"{"json":"","html":"<div>something else</div>"}"#;
        assert_eq!(
            parse_otp_response(body, &config).unwrap(),
            OtpOutcome::Rejected(OtpRejection::Unrecognized(body.to_string()))
        );
    }

    #[test]
    fn test_parse_plain_html_body() {
        let config = AuthConfig::default();
        let body = "<p>Please enter a valid confirmation code</p>";
        assert_eq!(
            parse_otp_response(body, &config).unwrap(),
            OtpOutcome::Rejected(OtpRejection::InvalidCode)
        );
    }

    #[test]
    fn test_parse_non_redirect_action_fails() {
        let config = AuthConfig::default();
        let nested = serde_json::json!({ "action": "render" }).to_string();
        let body = serde_json::json!({ "json": nested }).to_string();
        let err = parse_otp_response(&body, &config).unwrap_err();
        assert!(err.to_string().contains("not a valid redirect object"));
    }

    #[test]
    fn test_parse_malformed_nested_json_fails() {
        let config = AuthConfig::default();
        let body = r#"{"json":"{not json"}"#;
        assert!(parse_otp_response(body, &config).unwrap_err().is_authentication());
    }

    #[test]
    fn test_extract_code() {
        let url = Url::parse("https://spicychat.ai/?code=ABC123&state=s").unwrap();
        assert_eq!(extract_authorization_code(&url).unwrap(), "ABC123");
    }

    #[test]
    fn test_extract_error_is_verbatim() {
        let url = Url::parse("https://spicychat.ai/?error=access_denied").unwrap();
        let err = extract_authorization_code(&url).unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_extract_missing_code() {
        let url = Url::parse("https://spicychat.ai/?state=s").unwrap();
        assert!(extract_authorization_code(&url).is_err());
    }

    #[tokio::test]
    async fn test_request_otp_parses_page() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let (_, challenge) = pkce::generate();
        let otp = handshake
            .request_otp("user@example.com", &challenge)
            .await
            .unwrap();

        assert_eq!(otp, otp_challenge());
    }

    #[tokio::test]
    async fn test_request_otp_requires_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let (_, challenge) = pkce::generate();
        let err = handshake
            .request_otp("user@example.com", &challenge)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("kbtc"));
    }

    #[tokio::test]
    async fn test_request_otp_missing_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/auth"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "kbtc=1; Path=/")
                    .set_body_string("<html><body>maintenance</body></html>"),
            )
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let (_, challenge) = pkce::generate();
        let err = handshake
            .request_otp("user@example.com", &challenge)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("CSRF token or PSID"));
    }

    #[tokio::test]
    async fn test_request_otp_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/auth"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let (_, challenge) = pkce::generate();
        let err = handshake
            .request_otp("user@example.com", &challenge)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_submit_otp_follows_redirect_chain() {
        let server = MockServer::start().await;
        let location = format!("{}/auth/continue", server.uri());

        Mock::given(method("POST"))
            .and(path("/end_user_pages/widgets/partials/otp/otp_code_form"))
            .and(header("x-csrf-token", "csrf-xyz"))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(redirect_body(&location)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/continue"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/callback?code=ABC123", server.uri())),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/callback"))
            .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
            .expect(1)
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let code = handshake.submit_otp("123456", &otp_challenge()).await.unwrap();
        assert_eq!(code, "ABC123");
    }

    #[tokio::test]
    async fn test_submit_otp_invalid_code_skips_redirect() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "json": "",
            "html": "<p class=\"error\">Please enter a valid confirmation code</p>"
        })
        .to_string();

        Mock::given(method("POST"))
            .and(path("/end_user_pages/widgets/partials/otp/otp_code_form"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let err = handshake.submit_otp("000000", &otp_challenge()).await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("incorrect or expired"));
    }

    #[tokio::test]
    async fn test_submit_otp_redirect_error() {
        let server = MockServer::start().await;
        let location = format!("{}/callback?error=access_denied", server.uri());

        Mock::given(method("POST"))
            .and(path("/end_user_pages/widgets/partials/otp/otp_code_form"))
            .respond_with(ResponseTemplate::new(200).set_body_string(redirect_body(&location)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/callback"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let err = handshake.submit_otp("123456", &otp_challenge()).await.unwrap_err();
        assert!(err.is_authentication());
        assert!(err.to_string().contains("access_denied"));
    }

    #[tokio::test]
    async fn test_submit_otp_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let handshake = Handshake::new(config_for(&server)).unwrap();
        let err = handshake.submit_otp("123456", &otp_challenge()).await.unwrap_err();
        assert!(err.to_string().contains("unexpected status: 500"));
    }
}
