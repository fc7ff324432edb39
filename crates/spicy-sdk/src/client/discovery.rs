//! Application settings, character search, ratings and favourites

use super::SpicyClient;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use spicy_core::error::{SpicyError, SpicyResult};
use spicy_core::models::{ApplicationSettings, RatingAction, SearchResult};
use tracing::debug;

const SEARCH_QUERY_FIELDS: &str = "name,title,tags,creator_username,character_id";
const SEARCH_EXCLUDED_FIELDS: &str = "application_ids,greeting,moderation_flags,\
moderation_keywords,moderation_status,reportsType";

#[derive(Deserialize)]
struct MultiSearchResponse {
    results: Vec<SearchResult>,
}

impl SpicyClient {
    /// Fetch global settings and remember the public search key
    pub async fn get_application_settings(&self) -> SpicyResult<ApplicationSettings> {
        let settings: ApplicationSettings = self
            .http
            .get(&self.endpoint("/v2/applications/spicychat"))
            .await?;

        let mut state = self.state.write();
        state.search_api_key = Some(settings.typesense_config.api_key_public_character.clone())
            .filter(|key| !key.is_empty());
        state.app_settings = Some(settings.clone());
        Ok(settings)
    }

    /// Search public characters, most active first
    pub async fn search(&self, query: &str, per_page: u32) -> SpicyResult<SearchResult> {
        let api_key = self.search_api_key().await?;
        let payload = json!({
            "searches": [{
                "query_by": SEARCH_QUERY_FIELDS,
                "exclude_fields": SEARCH_EXCLUDED_FIELDS,
                "sort_by": "num_messages_24h:desc",
                "highlight_full_fields": SEARCH_QUERY_FIELDS,
                "collection": "public_characters_alias",
                "q": query,
                "per_page": per_page,
            }]
        });

        let url = format!("{}/multi_search", self.api.search_url);
        let request = self
            .http
            .request(Method::POST, &url)
            .header("x-typesense-api-key", api_key)
            .header("content-type", "text/plain")
            .body(payload.to_string());
        let response: MultiSearchResponse = self.http.send_json(request, false).await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SpicyError::json("Search response contained no results"))
    }

    /// Characters for the home feed
    pub async fn get_home_feed(&self, count: u32) -> SpicyResult<SearchResult> {
        self.search("*", count).await
    }

    /// Rate a character with the recommendation service
    pub async fn rate_bot(&self, character_id: &str, action: RatingAction) -> SpicyResult<bool> {
        let user = self.require_user("User not logged in.")?;
        let url = format!("{}/ratings/", self.api.recommendation_url);
        let request = self.http.request(Method::POST, &url).json(&json!({
            "userId": user.id,
            "itemId": character_id,
            "rating": action.value(),
            "cascadeCreate": true,
        }));
        let response = self.http.send(request, false).await?;
        let body = response.text().await?;
        Ok(body.trim() == "\"ok\"")
    }

    /// Add a character to the user's favourites
    pub async fn favorite_bot(&self, character_id: &str) -> SpicyResult<bool> {
        let user = self.require_user("User not logged in.")?;

        let request = self
            .http
            .request(Method::PATCH, &self.endpoint("/users/settings"))
            .json(&json!({ "likedBot": character_id }));
        self.http.send(request, true).await?;

        let url = format!("{}/bookmarks/", self.api.recommendation_url);
        let request = self.http.request(Method::POST, &url).json(&json!({
            "userId": user.id,
            "itemId": character_id,
            "cascadeCreate": true,
        }));
        self.http.send(request, false).await?;

        self.get_user_settings().await?;
        Ok(true)
    }

    /// Remove a character from the user's favourites
    pub async fn unfavorite_bot(&self, character_id: &str) -> SpicyResult<bool> {
        let user = self.require_user("User not logged in.")?;

        let settings = match self.settings() {
            Some(settings) => settings,
            None => self.get_user_settings().await?,
        };

        if settings.liked_bots.iter().any(|id| id == character_id) {
            let remaining: Vec<&String> = settings
                .liked_bots
                .iter()
                .filter(|id| *id != character_id)
                .collect();
            let request = self
                .http
                .request(Method::PATCH, &self.endpoint("/users/settings"))
                .json(&json!({ "liked_bots": remaining }));
            self.http.send(request, true).await?;
        } else {
            debug!("{} is not in the favourites list", character_id);
        }

        let url = format!("{}/bookmarks/", self.api.recommendation_url);
        let request = self
            .http
            .request(Method::DELETE, &url)
            .query(&[("userId", user.id.as_str()), ("itemId", character_id)]);
        self.http.send(request, false).await?;

        self.get_user_settings().await?;
        Ok(true)
    }

    async fn search_api_key(&self) -> SpicyResult<String> {
        let cached = self.state.read().search_api_key.clone();
        if let Some(key) = cached {
            return Ok(key);
        }
        self.get_application_settings().await?;
        self.state
            .read()
            .search_api_key
            .clone()
            .ok_or_else(|| SpicyError::api(500, "Could not retrieve Typesense API key."))
    }
}
