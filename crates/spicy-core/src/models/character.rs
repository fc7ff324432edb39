//! Character and search models

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A public character as indexed by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub visibility: String,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub creator_user_id: Option<String>,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub num_messages: i64,
    #[serde(default)]
    pub is_nsfw: bool,
    #[serde(default)]
    pub avatar_is_nsfw: bool,
    #[serde(default)]
    pub definition_visible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub token_count: i64,
    #[serde(rename = "createdAt", deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", deserialize_with = "flexible_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: Character,
}

/// Result page of a character search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub found: u64,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// Accepts RFC 3339 strings or epoch numbers (seconds or milliseconds)
fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom),
        serde_json::Value::Number(n) => {
            let raw = n
                .as_f64()
                .ok_or_else(|| D::Error::custom("timestamp out of range"))?;
            // Anything past 1e11 cannot be seconds in this century
            let millis = if raw.abs() >= 1e11 { raw } else { raw * 1000.0 };
            Utc.timestamp_millis_opt(millis as i64)
                .single()
                .ok_or_else(|| D::Error::custom("timestamp out of range"))
        }
        other => Err(D::Error::custom(format!("invalid timestamp: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character_json(created: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "c1",
            "name": "Nova",
            "visibility": "public",
            "num_messages": 12,
            "is_nsfw": false,
            "avatar_is_nsfw": false,
            "definition_visible": true,
            "tags": ["sci-fi"],
            "language": "en",
            "token_count": 900,
            "createdAt": created,
            "updatedAt": "2024-05-01T12:00:00Z"
        })
    }

    #[test]
    fn test_epoch_seconds_and_millis() {
        let seconds: Character =
            serde_json::from_value(character_json(serde_json::json!(1714564800))).unwrap();
        let millis: Character =
            serde_json::from_value(character_json(serde_json::json!(1714564800000i64))).unwrap();
        assert_eq!(seconds.created_at, millis.created_at);
        assert_eq!(seconds.created_at, seconds.updated_at);
    }

    #[test]
    fn test_invalid_timestamp() {
        let result: Result<Character, _> =
            serde_json::from_value(character_json(serde_json::json!(true)));
        assert!(result.is_err());
    }
}
