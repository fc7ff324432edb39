//! Spicy SDK
//!
//! High-level async client for the SpicyChat companion service. Wraps the
//! session and transport layers of [`spicy_core`] with account, chat,
//! search and rating operations.
//!
//! # Example
//!
//! ```no_run
//! use spicy_sdk::{SpicyClient, TerminalOtpPrompt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SpicyClient::new()?;
//! let prompt = TerminalOtpPrompt::default();
//! client.login("me@example.com", || prompt.read()).await?;
//!
//! let feed = client.get_home_feed(12).await?;
//! println!("{} characters found", feed.found);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod prompt;

pub use client::SpicyClient;
pub use prompt::TerminalOtpPrompt;

// Re-export commonly used types from core
pub use spicy_core::{
    config::{ApiConfig, AuthConfig, ClientConfig},
    error::{SpicyError, SpicyResult, UnifiedError},
    models::{
        ApplicationSettings, Character, ChatModel, Conversation, DeletedMessage, GeneratedImage,
        ImageModel, Message, Persona, ProfileUpdate, RatingAction, SearchResult, User,
        UserSettings,
    },
    auth::TokenData,
};
