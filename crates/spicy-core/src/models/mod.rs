//! Response and request models for the REST API

mod application;
mod character;
mod chat;
mod user;

pub use application::{ApplicationSettings, InferenceModel, TypesenseConfig};
pub use character::{Character, SearchHit, SearchResult};
pub use chat::{
    ChatModel, Conversation, DeletedMessage, GeneratedImage, ImageModel, InferenceSettings,
    Message, RatingAction,
};
pub use user::{Persona, ProfileUpdate, UploadTarget, User, UserSettings};
