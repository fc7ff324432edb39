//! Conversation, message and inference models

use serde::{Deserialize, Serialize};

/// Inference models offered by the chat API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChatModel {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "electra-r1-70b")]
    ElectraR1,
    #[serde(rename = "thespice-8b")]
    TheSpice8b,
    #[serde(rename = "stheno-8b")]
    Stheno8b,
    #[serde(rename = "squelching_fantasies_8b")]
    SquelchingFantasies8b,
    #[default]
    #[serde(rename = "spicedq3_a3b")]
    SpicedQ3,
    #[serde(rename = "lyra-12b")]
    Lyra12b,
    #[serde(rename = "magnum-12b")]
    Magnum12b,
    #[serde(rename = "shimizu-24b")]
    Shimizu24b,
    #[serde(rename = "mixtral")]
    Mixtral,
    #[serde(rename = "euryale-70b")]
    Euryale70b,
    #[serde(rename = "midnightrose-70b")]
    MidnightRose70b,
    #[serde(rename = "magnum-72b")]
    Magnum72b,
    #[serde(rename = "spicyxl-132b")]
    SpicyXl132b,
    #[serde(rename = "wizardlm2-8x22b")]
    WizardLm2,
    #[serde(rename = "qwen3-235b-a22b")]
    Qwen3Moe,
    #[serde(rename = "deepseek_v3")]
    DeepSeekV3,
    #[serde(rename = "deepseek_r1")]
    DeepSeekR1,
    #[serde(rename = "spinel-q3-32b")]
    SpinelQ3,
    #[serde(rename = "qwen3-32b")]
    Qwen3Dense,
}

impl ChatModel {
    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Default => "default",
            ChatModel::ElectraR1 => "electra-r1-70b",
            ChatModel::TheSpice8b => "thespice-8b",
            ChatModel::Stheno8b => "stheno-8b",
            ChatModel::SquelchingFantasies8b => "squelching_fantasies_8b",
            ChatModel::SpicedQ3 => "spicedq3_a3b",
            ChatModel::Lyra12b => "lyra-12b",
            ChatModel::Magnum12b => "magnum-12b",
            ChatModel::Shimizu24b => "shimizu-24b",
            ChatModel::Mixtral => "mixtral",
            ChatModel::Euryale70b => "euryale-70b",
            ChatModel::MidnightRose70b => "midnightrose-70b",
            ChatModel::Magnum72b => "magnum-72b",
            ChatModel::SpicyXl132b => "spicyxl-132b",
            ChatModel::WizardLm2 => "wizardlm2-8x22b",
            ChatModel::Qwen3Moe => "qwen3-235b-a22b",
            ChatModel::DeepSeekV3 => "deepseek_v3",
            ChatModel::DeepSeekR1 => "deepseek_r1",
            ChatModel::SpinelQ3 => "spinel-q3-32b",
            ChatModel::Qwen3Dense => "qwen3-32b",
        }
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling parameters sent with every chat request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceSettings {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            max_new_tokens: 180,
            temperature: 0.7,
            top_k: 90,
            top_p: 0.7,
        }
    }
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub conversation_id: String,
    pub role: String,
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub prev_id: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<f64>,
}

/// A message as returned by the delete endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedMessage {
    #[serde(flatten)]
    pub message: Message,
    #[serde(rename = "deletedAt")]
    pub deleted_at: i64,
    #[serde(rename = "deleteReason")]
    pub delete_reason: String,
    pub is_deleted: bool,
}

/// A conversation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub character_id: String,
    #[serde(default)]
    pub last_message: Option<serde_json::Value>,
    #[serde(default)]
    pub character: serde_json::Value,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub user_persona_id: Option<String>,
}

/// Character rating sent to the recommendation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingAction {
    Like,
    Love,
    Dislike,
}

impl RatingAction {
    /// Rating value understood by the recommendation service
    pub fn value(&self) -> f64 {
        match self {
            RatingAction::Like => -1.0,
            RatingAction::Love => 1.0,
            RatingAction::Dislike => 0.5,
        }
    }
}

/// Image generation styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageModel {
    #[serde(rename = "anime")]
    Anime,
    #[default]
    #[serde(rename = "anime_v2")]
    AnimeV2,
    #[serde(rename = "semi-realistic")]
    SemiRealistic,
    #[serde(rename = "semi-realistic_v2")]
    SemiRealisticV2,
}

impl ImageModel {
    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::Anime => "anime",
            ImageModel::AnimeV2 => "anime_v2",
            ImageModel::SemiRealistic => "semi-realistic",
            ImageModel::SemiRealisticV2 => "semi-realistic_v2",
        }
    }
}

/// A generated image stored by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub key: String,
    pub signed_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_model_wire_names_match_serde() {
        for model in [
            ChatModel::Default,
            ChatModel::SpicedQ3,
            ChatModel::Qwen3Moe,
            ChatModel::WizardLm2,
        ] {
            assert_eq!(
                serde_json::to_value(model).unwrap(),
                serde_json::json!(model.as_str())
            );
        }
        assert_eq!(ChatModel::default(), ChatModel::SpicedQ3);
    }

    #[test]
    fn test_image_model_wire_names_match_serde() {
        assert_eq!(
            serde_json::to_value(ImageModel::SemiRealisticV2).unwrap(),
            serde_json::json!(ImageModel::SemiRealisticV2.as_str())
        );
    }

    #[test]
    fn test_deleted_message_flattens() {
        let deleted: DeletedMessage = serde_json::from_value(serde_json::json!({
            "conversation_id": "conv",
            "role": "user",
            "id": "m1",
            "content": "hi",
            "deletedAt": 1714564800,
            "deleteReason": "user",
            "is_deleted": true
        }))
        .unwrap();
        assert_eq!(deleted.message.id, "m1");
        assert!(deleted.is_deleted);
    }

    #[test]
    fn test_rating_values() {
        assert_eq!(RatingAction::Like.value(), -1.0);
        assert_eq!(RatingAction::Love.value(), 1.0);
        assert_eq!(RatingAction::Dislike.value(), 0.5);
    }
}
