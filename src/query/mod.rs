//! Cached reads and invalidating writes over a [`ChatBackend`].
//!
//! Every read is stored under a [`QueryKey`]. Every write, once the backend
//! accepts it, drops exactly the keys listed by [`Mutation::invalidates`];
//! the next read of those keys goes back to the backend. Nothing is ever
//! patched in place.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use nelson_gpt::backend::MemoryBackend;
//! use nelson_gpt::query::DataClient;
//!
//! # async fn example() -> Result<(), nelson_gpt::backend::BackendError> {
//! let client = DataClient::new(Arc::new(MemoryBackend::new()));
//! assert!(client.peek_chats().await.is_none());
//!
//! let id = client.create_chat("New Chat").await?;
//! let chats = client.chats().await?;
//! assert_eq!(chats[0].id, id);
//! assert!(client.peek_chats().await.is_some());
//! # Ok(())
//! # }
//! ```

mod cache;

pub use cache::{QueryCache, QueryKey};

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{ChatBackend, Result};
use crate::models::{
    Chat, ChatId, CitationId, FollowUpId, MessageId, Mode, Role, SettingsUpdate, UserSettings,
};
use cache::Cached;

/// A write against the backend, named by what it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateChat,
    AddMessage(ChatId),
    AddCitation(ChatId),
    AddFollowUp(ChatId),
    PinChat(ChatId),
    UnpinChat(ChatId),
    RenameChat(ChatId),
    DeleteChat(ChatId),
    SaveUserSettings(String),
    UpdateUserMode(String),
}

impl Mutation {
    /// Keys whose cached reads are stale once this write succeeds.
    #[must_use]
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Self::CreateChat => vec![QueryKey::Chats],
            Self::AddMessage(chat_id) => vec![QueryKey::Chat(*chat_id), QueryKey::Chats],
            Self::AddCitation(chat_id) | Self::AddFollowUp(chat_id) => {
                vec![QueryKey::Chat(*chat_id)]
            }
            Self::PinChat(chat_id)
            | Self::UnpinChat(chat_id)
            | Self::RenameChat(chat_id)
            | Self::DeleteChat(chat_id) => vec![
                QueryKey::Chats,
                QueryKey::PinnedChats,
                QueryKey::Chat(*chat_id),
            ],
            Self::SaveUserSettings(user_id) | Self::UpdateUserMode(user_id) => {
                vec![QueryKey::UserSettings(user_id.clone())]
            }
        }
    }

    fn event(&self) -> &'static str {
        match self {
            Self::CreateChat => "create_chat",
            Self::AddMessage(_) => "add_message",
            Self::AddCitation(_) => "add_citation",
            Self::AddFollowUp(_) => "add_follow_up",
            Self::PinChat(_) => "pin_chat",
            Self::UnpinChat(_) => "unpin_chat",
            Self::RenameChat(_) => "rename_chat",
            Self::DeleteChat(_) => "delete_chat",
            Self::SaveUserSettings(_) => "save_user_settings",
            Self::UpdateUserMode(_) => "update_user_mode",
        }
    }
}

/// Backend handle plus its read cache. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DataClient {
    backend: Arc<dyn ChatBackend>,
    cache: QueryCache,
}

impl DataClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            cache: QueryCache::new(),
        }
    }

    /// The uncached backend.
    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn chats(&self) -> Result<Vec<Chat>> {
        self.cached(QueryKey::Chats, self.backend.get_all_chats())
            .await
    }

    pub async fn pinned_chats(&self) -> Result<Vec<Chat>> {
        self.cached(QueryKey::PinnedChats, self.backend.get_pinned_chats())
            .await
    }

    pub async fn chat(&self, chat_id: ChatId) -> Result<Option<Chat>> {
        self.cached(QueryKey::Chat(chat_id), self.backend.get_chat(chat_id))
            .await
    }

    /// Drop the cached chat and read it again.
    pub async fn refetch_chat(&self, chat_id: ChatId) -> Result<Option<Chat>> {
        self.cache.invalidate(&[QueryKey::Chat(chat_id)]).await;
        self.chat(chat_id).await
    }

    pub async fn user_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        self.cached(
            QueryKey::UserSettings(user_id.to_string()),
            self.backend.get_user_settings(user_id),
        )
        .await
    }

    /// Stored settings, or the defaults when the user has none yet.
    pub async fn settings_or_default(&self, user_id: &str) -> Result<UserSettings> {
        Ok(self.user_settings(user_id).await?.unwrap_or_default())
    }

    pub async fn peek_chats(&self) -> Option<Vec<Chat>> {
        self.cache.get(&QueryKey::Chats).await
    }

    pub async fn peek_pinned_chats(&self) -> Option<Vec<Chat>> {
        self.cache.get(&QueryKey::PinnedChats).await
    }

    /// `None` while the chat has not been read; `Some(None)` if it was read
    /// and does not exist.
    pub async fn peek_chat(&self, chat_id: ChatId) -> Option<Option<Chat>> {
        self.cache.get(&QueryKey::Chat(chat_id)).await
    }

    pub async fn peek_user_settings(&self, user_id: &str) -> Option<Option<UserSettings>> {
        self.cache
            .get(&QueryKey::UserSettings(user_id.to_string()))
            .await
    }

    async fn cached<T, F>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Cached,
        F: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }
        let generation = self.cache.generation().await;
        let value = fetch.await?;
        self.cache
            .insert_if_current(key, value.clone(), generation)
            .await;
        Ok(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_chat(&self, title: &str) -> Result<ChatId> {
        let chat_id = self
            .settle(Mutation::CreateChat, self.backend.create_chat(title))
            .await?;
        info!(name: "chat.created", chat_id, title, "Chat created");
        Ok(chat_id)
    }

    pub async fn add_message(&self, chat_id: ChatId, role: Role, content: &str) -> Result<MessageId> {
        let message_id = self
            .settle(
                Mutation::AddMessage(chat_id),
                self.backend.add_message(chat_id, role, content),
            )
            .await?;
        info!(
            name: "message.added",
            chat_id,
            message_id,
            role = role.as_str(),
            "Message added"
        );
        Ok(message_id)
    }

    pub async fn add_citation(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reference: &str,
        details: &str,
    ) -> Result<CitationId> {
        self.settle(
            Mutation::AddCitation(chat_id),
            self.backend
                .add_citation(chat_id, message_id, reference, details),
        )
        .await
    }

    pub async fn add_follow_up(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        question: &str,
    ) -> Result<FollowUpId> {
        self.settle(
            Mutation::AddFollowUp(chat_id),
            self.backend.add_follow_up(chat_id, message_id, question),
        )
        .await
    }

    pub async fn pin_chat(&self, chat_id: ChatId) -> Result<()> {
        self.settle(Mutation::PinChat(chat_id), self.backend.pin_chat(chat_id))
            .await
    }

    pub async fn unpin_chat(&self, chat_id: ChatId) -> Result<()> {
        self.settle(Mutation::UnpinChat(chat_id), self.backend.unpin_chat(chat_id))
            .await
    }

    pub async fn rename_chat(&self, chat_id: ChatId, new_title: &str) -> Result<()> {
        self.settle(
            Mutation::RenameChat(chat_id),
            self.backend.rename_chat(chat_id, new_title),
        )
        .await
    }

    pub async fn delete_chat(&self, chat_id: ChatId) -> Result<()> {
        self.settle(Mutation::DeleteChat(chat_id), self.backend.delete_chat(chat_id))
            .await?;
        info!(name: "chat.deleted", chat_id, "Chat deleted");
        Ok(())
    }

    pub async fn save_user_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        self.settle(
            Mutation::SaveUserSettings(user_id.to_string()),
            self.backend.save_user_settings(user_id, settings),
        )
        .await
    }

    /// Merge `update` over the current settings (or defaults) and save the
    /// whole record.
    pub async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<UserSettings> {
        let settings = self.settings_or_default(user_id).await?.merged(update);
        self.save_user_settings(user_id, &settings).await?;
        Ok(settings)
    }

    pub async fn update_user_mode(&self, user_id: &str, mode: Mode) -> Result<()> {
        self.settle(
            Mutation::UpdateUserMode(user_id.to_string()),
            self.backend.update_user_mode(user_id, mode),
        )
        .await
    }

    /// Await a write and invalidate its keys only if it succeeded.
    async fn settle<T, F>(&self, mutation: Mutation, write: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match write.await {
            Ok(value) => {
                self.cache.invalidate(&mutation.invalidates()).await;
                Ok(value)
            }
            Err(err) => {
                warn!(
                    name: "backend.mutation.failed",
                    mutation = mutation.event(),
                    error = %err,
                    "Backend write failed"
                );
                Err(err)
            }
        }
    }
}
