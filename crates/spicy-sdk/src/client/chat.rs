//! Conversations, messages and images

use super::SpicyClient;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use spicy_core::error::SpicyResult;
use spicy_core::models::{
    ChatModel, Conversation, DeletedMessage, GeneratedImage, ImageModel, InferenceSettings,
    Message,
};

#[derive(Deserialize)]
struct MessageEnvelope {
    message: Message,
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    #[serde(default)]
    messages: Vec<Message>,
}

impl SpicyClient {
    /// Most recent conversations
    pub async fn get_conversations(&self, limit: u32) -> SpicyResult<Vec<Conversation>> {
        let request = self
            .http
            .request(Method::GET, &self.endpoint("/v2/conversations"))
            .query(&[("limit", limit)]);
        self.http.send_json(request, true).await
    }

    /// Message history with one character
    pub async fn get_conversation_history(
        &self,
        character_id: &str,
        limit: u32,
    ) -> SpicyResult<Vec<Message>> {
        let url = self.endpoint(&format!("/characters/{}/messages", character_id));
        let request = self
            .http
            .request(Method::GET, &url)
            .query(&[("limit", limit)]);
        let history: HistoryEnvelope = self.http.send_json(request, true).await?;
        Ok(history.messages)
    }

    /// Send a message and return the character's reply.
    ///
    /// Without `persona_id` the user's default persona is used. Without
    /// `conversation_id` the service starts a new conversation.
    pub async fn send_message(
        &self,
        character_id: &str,
        message: &str,
        model: ChatModel,
        persona_id: Option<&str>,
        conversation_id: Option<&str>,
    ) -> SpicyResult<Message> {
        let user = self.require_user("User not logged in. Please call login() first.")?;
        let mut payload = json!({
            "message": message,
            "character_id": character_id,
            "inference_model": model,
            "user_persona_id": persona_id.map(str::to_owned).or(user.default_persona_id),
            "inference_settings": InferenceSettings::default(),
        });
        if let Some(conversation_id) = conversation_id {
            payload["conversation_id"] = json!(conversation_id);
        }
        self.chat(payload).await
    }

    /// Regenerate the reply to `last_user_message_id`
    pub async fn regenerate_response(
        &self,
        conversation_id: &str,
        character_id: &str,
        last_user_message_id: &str,
        model: ChatModel,
    ) -> SpicyResult<Message> {
        self.chat(json!({
            "character_id": character_id,
            "inference_model": model,
            "inference_settings": InferenceSettings::default(),
            "continue_chat": true,
            "conversation_id": conversation_id,
            "prev_id": last_user_message_id,
        }))
        .await
    }

    /// Ask the model to write the user's next reply (autopilot)
    pub async fn get_suggested_reply(
        &self,
        conversation_id: &str,
        character_id: &str,
        bot_message_id: &str,
        model: ChatModel,
    ) -> SpicyResult<Message> {
        let user = self.require_user("User not logged in.")?;
        self.chat(json!({
            "character_id": character_id,
            "conversation_id": conversation_id,
            "inference_model": model,
            "inference_settings": InferenceSettings::default(),
            "autopilot": true,
            "user_persona_id": user.default_persona_id,
            "alt_message_id": bot_message_id,
        }))
        .await
    }

    /// Replace the content of a message
    pub async fn edit_message(&self, message_id: &str, content: &str) -> SpicyResult<Message> {
        let url = self.endpoint(&format!("/messages/{}", message_id));
        let request = self
            .http
            .request(Method::PATCH, &url)
            .json(&json!({ "content": content }));
        self.http.send_json(request, true).await
    }

    /// Delete messages from a conversation
    pub async fn delete_messages(
        &self,
        conversation_id: &str,
        message_ids: &[String],
    ) -> SpicyResult<Vec<DeletedMessage>> {
        let url = self.endpoint(&format!("/conversations/{}/messages", conversation_id));
        let request = self
            .http
            .request(Method::DELETE, &url)
            .json(&json!({ "ids": message_ids }));
        self.http.send_json(request, true).await
    }

    /// Generate an image from a prompt
    pub async fn generate_image(
        &self,
        prompt: &str,
        model: ImageModel,
        negative_prompt: &str,
    ) -> SpicyResult<GeneratedImage> {
        let request = self
            .http
            .request(Method::POST, &self.endpoint("/generate-image"))
            .json(&json!({
                "prompt": prompt,
                "negative_prompt": negative_prompt,
                "model_style": model,
                "seed": null,
                "image": null,
            }));
        self.http.send_json(request, true).await
    }

    async fn chat(&self, payload: Value) -> SpicyResult<Message> {
        let url = format!("{}/chat", self.api.chat_api_url);
        let request = self.http.request(Method::POST, &url).json(&payload);
        let envelope: MessageEnvelope = self.http.send_json(request, true).await?;
        Ok(envelope.message)
    }
}
