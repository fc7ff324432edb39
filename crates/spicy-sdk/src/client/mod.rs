//! SDK client implementation

use parking_lot::RwLock;
use spicy_core::auth::SessionManager;
use spicy_core::config::{ApiConfig, ClientConfig};
use spicy_core::error::{SpicyError, SpicyResult};
use spicy_core::http::HttpManager;
use spicy_core::models::{ApplicationSettings, Persona, User, UserSettings};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

mod account;
mod chat;
mod discovery;

/// Data fetched after login and kept for later calls
#[derive(Debug, Default)]
struct ClientState {
    user: Option<User>,
    settings: Option<UserSettings>,
    personas: Option<Vec<Persona>>,
    app_settings: Option<ApplicationSettings>,
    search_api_key: Option<String>,
}

/// High-level async client for the SpicyChat service.
///
/// Holds one [`SessionManager`] and the HTTP layer bound to it. Account data
/// fetched after login (profile, settings, personas, application settings)
/// is cached on the client and refreshed by the calls that change it.
///
/// # Examples
///
/// ```no_run
/// use spicy_sdk::{SpicyClient, TerminalOtpPrompt};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SpicyClient::new()?;
/// let prompt = TerminalOtpPrompt::default();
/// client.login("me@example.com", || prompt.read()).await?;
///
/// if let Some(user) = client.user() {
///     println!("Logged in as {}", user.username);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SpicyClient {
    api: ApiConfig,
    session: Arc<SessionManager>,
    http: HttpManager,
    state: RwLock<ClientState>,
}

impl SpicyClient {
    /// Client configured from defaults and `SPICY_*` environment variables
    pub fn new() -> SpicyResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Client with explicit configuration
    pub fn with_config(config: ClientConfig) -> SpicyResult<Self> {
        let session = Arc::new(SessionManager::new(config.auth));
        Self::with_session(config.api, session)
    }

    /// Client sharing an existing session manager
    pub fn with_session(api: ApiConfig, session: Arc<SessionManager>) -> SpicyResult<Self> {
        let http = HttpManager::new(&api, session.clone())?;
        Ok(Self {
            api,
            session,
            http,
            state: RwLock::new(ClientState::default()),
        })
    }

    /// Session manager backing this client
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// REST configuration in use
    pub fn api_config(&self) -> &ApiConfig {
        &self.api
    }

    /// Cached profile of the logged-in user
    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Cached user settings
    pub fn settings(&self) -> Option<UserSettings> {
        self.state.read().settings.clone()
    }

    /// Cached personas
    pub fn personas(&self) -> Option<Vec<Persona>> {
        self.state.read().personas.clone()
    }

    /// Cached application settings
    pub fn app_settings(&self) -> Option<ApplicationSettings> {
        self.state.read().app_settings.clone()
    }

    /// Log in and load the account data.
    ///
    /// A cached, still-valid credential is reused without prompting.
    /// Otherwise the email OTP handshake runs and `otp_prompt` is awaited for
    /// the code. Failures while loading account data afterwards are logged
    /// and do not fail the login.
    pub async fn login<F, Fut>(&self, email: &str, otp_prompt: F) -> SpicyResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SpicyResult<String>>,
    {
        if self.session.get_token().await.is_some() {
            info!("Found valid session token. Logging in...");
        }
        self.session.login(email, otp_prompt).await?;

        info!("Login successful. Fetching user data...");
        self.post_login_setup().await;

        let name = self.user().map(|u| u.name);
        info!("Welcome, {}!", name.as_deref().unwrap_or("User"));
        Ok(())
    }

    /// Forget the credential and every cached account object
    pub async fn logout(&self) -> SpicyResult<()> {
        self.session.logout().await?;
        *self.state.write() = ClientState::default();
        Ok(())
    }

    async fn post_login_setup(&self) {
        let (profile, settings, personas, app_settings) = tokio::join!(
            self.get_user_profile(),
            self.get_user_settings(),
            self.get_personas(),
            self.get_application_settings(),
        );

        let failures = [
            profile.err(),
            settings.err(),
            personas.err(),
            app_settings.err(),
        ];
        for failure in failures.into_iter().flatten() {
            error!("Error during post-login setup: {}", failure);
        }
    }

    /// Cached user, or an authentication error when no profile is loaded
    fn require_user(&self, message: &str) -> SpicyResult<User> {
        self.user()
            .ok_or_else(|| SpicyError::authentication(message.to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api.base_url, path)
    }
}
