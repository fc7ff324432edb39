//! From trait implementations for SpicyError conversions

use super::types::SpicyError;

impl From<std::io::Error> for SpicyError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for SpicyError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for SpicyError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http {
            message: error.to_string(),
            url: error.url().map(|u| u.to_string()),
            timeout: error.is_timeout(),
        }
    }
}
