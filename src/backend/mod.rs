//! Remote data client for the chat backend actor.
//!
//! The backend owns chats, messages, citations, follow-ups and user
//! settings. The web layer only talks to it through [`ChatBackend`].
//!
//! # Providers
//!
//! - [`MemoryBackend`]: in-process reference actor, also served over REST by
//!   the embedded backend router
//! - [`HttpBackend`]: reqwest client for a remote actor

mod http;
mod memory;

pub use http::HttpBackend;
pub(crate) use http::{CitationBody, FollowUpBody, IdBody, MessageBody, ModeBody, TitleBody};
pub use memory::MemoryBackend;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::models::{
    Chat, ChatId, CitationId, FollowUpId, MessageId, Mode, Role, UserSettings,
};

/// Backend call failure.
#[derive(Error, Debug)]
pub enum BackendError {
    /// No actor is reachable (not initialized, connection refused).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend.
        message: String,
    },

    /// A write referenced a chat or message that does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl BackendError {
    /// Whether the failure is a missing entity rather than a transport problem.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::Api { status: 404, .. })
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// The backend actor contract.
#[async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    // Reads
    async fn get_all_chats(&self) -> Result<Vec<Chat>>;
    async fn get_pinned_chats(&self) -> Result<Vec<Chat>>;
    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>>;
    async fn get_user_settings(&self, user_id: &str) -> Result<Option<UserSettings>>;

    // Chats
    async fn create_chat(&self, title: &str) -> Result<ChatId>;
    async fn pin_chat(&self, chat_id: ChatId) -> Result<()>;
    async fn unpin_chat(&self, chat_id: ChatId) -> Result<()>;
    async fn rename_chat(&self, chat_id: ChatId, new_title: &str) -> Result<()>;
    async fn delete_chat(&self, chat_id: ChatId) -> Result<()>;

    // Messages
    async fn add_message(&self, chat_id: ChatId, role: Role, content: &str) -> Result<MessageId>;
    async fn add_citation(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reference: &str,
        details: &str,
    ) -> Result<CitationId>;
    async fn add_follow_up(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        question: &str,
    ) -> Result<FollowUpId>;

    // Settings
    async fn save_user_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()>;

    /// Change only the mode, creating default settings if the user has none.
    async fn update_user_mode(&self, user_id: &str, mode: Mode) -> Result<()>;
}

/// Build the configured backend provider.
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn ChatBackend>> {
    match config.provider.as_str() {
        "http" => {
            let base_url = config.base_url.as_deref().ok_or_else(|| {
                BackendError::Unavailable("backend.base_url is required for provider http".into())
            })?;
            let backend = HttpBackend::new(base_url)?;
            Ok(Arc::new(backend))
        }
        _ => Ok(Arc::new(MemoryBackend::new())),
    }
}
