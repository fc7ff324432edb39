//! End-to-end login flow test
//!
//! Drives the SDK client through the whole email OTP handshake against a
//! mocked identity provider, then checks the account data is loaded from a
//! mocked REST API with the freshly issued credential.

use serde_json::json;
use spicy_core::auth::{FileTokenStorage, TokenStorage};
use spicy_sdk::{ApiConfig, AuthConfig, ClientConfig, SpicyClient, SpicyError};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html><head><meta name="csrf-token" content="csrf-e2e"></head>
<body><form><input type="hidden" name="p_psid" value="psid-e2e"></form></body></html>"#;

fn client(dir: &TempDir, provider: &MockServer, api: &MockServer) -> SpicyClient {
    SpicyClient::with_config(ClientConfig {
        auth: AuthConfig::default()
            .with_base_url(provider.uri())
            .with_token_file(dir.path().join("tokens.json"))
            .with_timeout(Duration::from_secs(5)),
        api: ApiConfig::default()
            .with_single_origin(api.uri())
            .with_guest_id("guest-e2e"),
    })
    .unwrap()
}

async fn mount_login_page(provider: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/oauth2/auth"))
        .and(query_param("login_hint", "ada@example.com"))
        .and(query_param("code_challenge_method", "S256"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "kbtc=session-cookie; Path=/")
                .set_body_string(LOGIN_PAGE),
        )
        .expect(1)
        .mount(provider)
        .await;
}

async fn mount_api(api: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/users"))
        .and(header("authorization", "Bearer e2e-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": "user-1",
                "name": "Ada",
                "username": "ada",
                "email": "ada@example.com"
            }
        })))
        .expect(1)
        .mount(api)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "user-1",
            "blur_nsfw": false,
            "show_nsfw": true
        })))
        .mount(api)
        .await;
    Mock::given(method("GET"))
        .and(path("/personas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(api)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/applications/spicychat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "SpicyChat",
            "id": "spicychat",
            "typesenseConfig": {
                "collectionNamePublicCharacter": "public_characters_alias",
                "apiKeyPublicCharacter": "search-key"
            }
        })))
        .mount(api)
        .await;
}

#[tokio::test]
async fn test_otp_login_then_account_setup() {
    let provider = MockServer::start().await;
    let api = MockServer::start().await;
    mount_login_page(&provider).await;
    mount_api(&api).await;

    let redirect = json!({
        "action": "redirect",
        "location": "/callback?code=E2E-CODE&state=ignored",
    })
    .to_string();
    Mock::given(method("POST"))
        .and(path("/end_user_pages/widgets/partials/otp/otp_code_form"))
        .and(header("x-csrf-token", "csrf-e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "json": redirect })))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "e2e-access",
            "expires_in": 86400,
            "id_token": "e2e-id",
            "refresh_token": "e2e-refresh",
            "scope": "openid profile email offline",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client(&dir, &provider, &api);
    let prompts = Mutex::new(0);
    client
        .login("ada@example.com", || async {
            *prompts.lock().unwrap() += 1;
            Ok("123456".to_string())
        })
        .await
        .unwrap();

    assert_eq!(*prompts.lock().unwrap(), 1);
    assert_eq!(client.user().unwrap().username, "ada");
    assert!(client.settings().unwrap().show_nsfw);

    let stored = FileTokenStorage::new(dir.path().join("tokens.json"))
        .load()
        .unwrap();
    assert_eq!(stored.access_token, "e2e-access");
    assert_eq!(stored.refresh_token, "e2e-refresh");
    assert!(stored.is_valid());

    // Second login reuses the stored credential without another handshake
    client
        .login("ada@example.com", || async {
            Err::<String, _>(SpicyError::authentication("prompted twice"))
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wrong_code_leaves_no_credential() {
    let provider = MockServer::start().await;
    let api = MockServer::start().await;
    mount_login_page(&provider).await;
    Mock::given(method("POST"))
        .and(path("/end_user_pages/widgets/partials/otp/otp_code_form"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": "",
            "html": "<div><p>Please enter a valid confirmation code</p></div>"
        })))
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&api)
        .await;

    let dir = TempDir::new().unwrap();
    let client = client(&dir, &provider, &api);
    let err = client
        .login("ada@example.com", || async { Ok("000000".to_string()) })
        .await
        .unwrap_err();

    assert!(err.is_authentication());
    assert!(err.to_string().contains("likely incorrect or expired"));
    assert!(!dir.path().join("tokens.json").exists());
    assert!(client.user().is_none());
}
