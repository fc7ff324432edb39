//! Profile, settings and persona operations

use super::SpicyClient;
use md5::{Digest, Md5};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use spicy_core::error::{SpicyError, SpicyResult};
use spicy_core::http::error_from_response;
use spicy_core::models::{Persona, ProfileUpdate, UploadTarget, User, UserSettings};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

impl SpicyClient {
    /// Fetch and cache the current user's profile
    pub async fn get_user_profile(&self) -> SpicyResult<User> {
        let envelope: UserEnvelope = self.http.get(&self.endpoint("/v2/users")).await?;
        self.state.write().user = Some(envelope.user.clone());
        Ok(envelope.user)
    }

    /// Fetch and cache the current user's settings
    pub async fn get_user_settings(&self) -> SpicyResult<UserSettings> {
        let settings: UserSettings = self.http.get(&self.endpoint("/users/settings")).await?;
        self.state.write().settings = Some(settings.clone());
        Ok(settings)
    }

    /// Fetch and cache the user's personas
    pub async fn get_personas(&self) -> SpicyResult<Vec<Persona>> {
        let personas: Vec<Persona> = self.http.get(&self.endpoint("/personas")).await?;
        self.state.write().personas = Some(personas.clone());
        Ok(personas)
    }

    /// Update profile fields and return the refreshed profile.
    ///
    /// An update with no fields set sends nothing and returns the cached
    /// profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> SpicyResult<User> {
        let user = self.require_user("Cannot update profile, not logged in.")?;
        if update.is_empty() {
            warn!("Update profile called with no changes.");
            return Ok(user);
        }

        let request = self
            .http
            .request(Method::PATCH, &self.endpoint("/users"))
            .json(update);
        self.http.send(request, true).await?;
        self.get_user_profile().await
    }

    /// Create a persona with an avatar read from `avatar_path` (PNG, JPEG,
    /// WebP or GIF) and refresh the cached list
    pub async fn create_persona(
        &self,
        name: &str,
        highlights: &str,
        avatar_path: impl AsRef<Path>,
        is_default: bool,
    ) -> SpicyResult<Persona> {
        let avatar_path = avatar_path.as_ref();
        let mime_type = image_mime_type(avatar_path).ok_or_else(|| {
            SpicyError::invalid_field(
                "avatar_path",
                "Could not determine image type for avatar. Use PNG or JPG.",
            )
        })?;
        let image = tokio::fs::read(avatar_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpicyError::invalid_field(
                    "avatar_path",
                    format!("Avatar file not found at: {}", avatar_path.display()),
                )
            } else {
                SpicyError::io_with_path(e.to_string(), avatar_path.display().to_string())
            }
        })?;

        let target = self.get_upload_url(&image, mime_type).await?;
        self.upload_to_s3(&target.signed_url, image, mime_type).await?;

        let request = self
            .http
            .request(Method::POST, &self.endpoint("/personas"))
            .json(&serde_json::json!({
                "name": name,
                "highlights": highlights,
                "avatar_url": target.key,
                "is_default": is_default,
            }));
        let persona: Persona = self.http.send_json(request, true).await?;

        self.get_personas().await?;
        Ok(persona)
    }

    /// Delete a persona and refresh the cached list
    pub async fn delete_persona(&self, persona_id: &str) -> SpicyResult<bool> {
        let url = self.endpoint(&format!("/personas/{}", persona_id));
        self.http
            .send(self.http.request(Method::DELETE, &url), true)
            .await?;
        self.get_personas().await?;
        Ok(true)
    }

    /// Use a different persona for one conversation
    pub async fn switch_persona_for_chat(
        &self,
        conversation_id: &str,
        persona_id: &str,
    ) -> SpicyResult<bool> {
        let url = self.endpoint(&format!("/conversations/{}/user_persona", conversation_id));
        let request = self
            .http
            .request(Method::PATCH, &url)
            .json(&serde_json::json!({ "user_persona_id": persona_id }));
        let response = self.http.send(request, true).await?;
        Ok(response.status() == StatusCode::OK)
    }
}

impl SpicyClient {
    /// Ask the API for a pre-signed upload slot keyed by the image's MD5
    async fn get_upload_url(&self, image: &[u8], mime_type: &str) -> SpicyResult<UploadTarget> {
        let hash = format!("{:x}", Md5::digest(image));
        let request = self
            .http
            .request(Method::POST, &self.endpoint("/save-image"))
            .json(&serde_json::json!({ "image_type": mime_type, "hash": hash }));
        self.http.send_json(request, true).await
    }

    /// PUT the raw image to the pre-signed URL without API headers or bearer
    async fn upload_to_s3(
        &self,
        signed_url: &str,
        image: Vec<u8>,
        mime_type: &str,
    ) -> SpicyResult<()> {
        let client = Client::builder().timeout(self.api.request_timeout).build()?;
        let response = client
            .put(signed_url)
            .header("content-type", mime_type)
            .body(image)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }
        debug!("Uploaded avatar ({})", status.as_u16());
        Ok(())
    }
}

fn image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
