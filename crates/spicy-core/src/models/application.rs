//! Application-wide settings

use serde::{Deserialize, Serialize};

/// A model listed in the application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceModel {
    pub id: String,
    #[serde(default)]
    pub tag: Option<String>,
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub tokens: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hide_unauthorized: Option<bool>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
}

/// Search collections and their public keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypesenseConfig {
    pub collection_name_public_character: String,
    pub api_key_public_character: String,
    #[serde(default)]
    pub collection_name_leaderboard: String,
    #[serde(default)]
    pub api_key_leaderboard: String,
}

/// Global application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSettings {
    pub name: String,
    pub id: String,
    pub typesense_config: TypesenseConfig,
    #[serde(default)]
    pub inference_models: Vec<InferenceModel>,
    #[serde(default)]
    pub is_nsfw_enabled: bool,
}
