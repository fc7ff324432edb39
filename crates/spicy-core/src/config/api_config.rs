//! REST API configuration

use super::timeouts;
use std::time::Duration;

/// Endpoints and identity used by [`crate::http::HttpManager`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Main REST API
    pub base_url: String,
    /// Chat inference API
    pub chat_api_url: String,
    /// Character search (Typesense)
    pub search_url: String,
    /// Recommendation service used for ratings and bookmarks
    pub recommendation_url: String,
    /// Value sent as `x-guest-userid`
    pub guest_id: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://4mpanjbsf6.execute-api.us-east-1.amazonaws.com".to_string(),
            chat_api_url: "https://chat.nd-api.com".to_string(),
            search_url: "https://etmzpxgvnid370fyp.a1.typesense.net".to_string(),
            recommendation_url: "https://client-rapi-ca-east.recombee.com/spicychat-prod"
                .to_string(),
            guest_id: uuid::Uuid::new_v4().to_string(),
            request_timeout: timeouts::http_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Route every service to one origin (useful against a local mock)
    pub fn with_single_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        self.base_url = origin.clone();
        self.chat_api_url = origin.clone();
        self.search_url = origin.clone();
        self.recommendation_url = origin;
        self
    }

    /// Set the guest id
    pub fn with_guest_id(mut self, guest_id: impl Into<String>) -> Self {
        self.guest_id = guest_id.into();
        self
    }
}
