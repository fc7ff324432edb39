//! Account models

use serde::{Deserialize, Serialize};

/// Authenticated user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(default)]
    pub default_persona_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Opaque; the service has never put anything useful in it
    #[serde(default)]
    pub subscription: serde_json::Value,
}

/// A persona the user can chat as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
}

/// Pre-signed destination for an avatar upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTarget {
    /// Storage key, used as the persona's `avatar_url`
    pub key: String,
    /// URL accepting a single PUT of the image
    pub signed_url: String,
}

/// Per-user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub blur_nsfw: bool,
    pub show_nsfw: bool,
    #[serde(default)]
    pub liked_bots: Vec<String>,
    #[serde(default)]
    pub blocked_users: Vec<String>,
    #[serde(default)]
    pub tts_include_narration: bool,
    #[serde(default)]
    pub chat_language: String,
}

/// Fields accepted by the profile update endpoint; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
}

impl ProfileUpdate {
    /// True when the update would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none() && self.highlights.is_none()
    }
}
