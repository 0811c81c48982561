//! In-process backend actor.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BackendError, ChatBackend, Result};
use crate::models::{
    Chat, ChatId, Citation, CitationId, FollowUp, FollowUpId, Message, MessageId, Mode, Role,
    UserSettings,
};

/// Thread-safe in-memory actor.
///
/// Chat and message ids come from global counters starting at 1, so they are
/// unique and never reused after deletion. Citation and follow-up ids count
/// per message.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Ordered by id, which is also creation order.
    chats: BTreeMap<ChatId, Chat>,
    settings: HashMap<String, UserSettings>,
    last_chat_id: ChatId,
    last_message_id: MessageId,
}

impl MemoryState {
    fn chat_mut(&mut self, chat_id: ChatId) -> Result<&mut Chat> {
        self.chats
            .get_mut(&chat_id)
            .ok_or_else(|| BackendError::NotFound(format!("chat {chat_id}")))
    }

    fn message_mut(&mut self, chat_id: ChatId, message_id: MessageId) -> Result<&mut Message> {
        self.chat_mut(chat_id)?
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| BackendError::NotFound(format!("message {message_id} in chat {chat_id}")))
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.chats.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn set_pinned(&self, chat_id: ChatId, pinned: bool) -> Result<()> {
        let mut state = self.inner.write().await;
        state.chat_mut(chat_id)?.pinned = pinned;
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for MemoryBackend {
    async fn get_all_chats(&self) -> Result<Vec<Chat>> {
        Ok(self.inner.read().await.chats.values().cloned().collect())
    }

    async fn get_pinned_chats(&self) -> Result<Vec<Chat>> {
        Ok(self
            .inner
            .read()
            .await
            .chats
            .values()
            .filter(|chat| chat.pinned)
            .cloned()
            .collect())
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>> {
        Ok(self.inner.read().await.chats.get(&chat_id).cloned())
    }

    async fn get_user_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        Ok(self.inner.read().await.settings.get(user_id).cloned())
    }

    async fn create_chat(&self, title: &str) -> Result<ChatId> {
        let mut state = self.inner.write().await;
        state.last_chat_id += 1;
        let id = state.last_chat_id;
        state.chats.insert(
            id,
            Chat {
                id,
                title: title.to_string(),
                pinned: false,
                messages: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn pin_chat(&self, chat_id: ChatId) -> Result<()> {
        self.set_pinned(chat_id, true).await
    }

    async fn unpin_chat(&self, chat_id: ChatId) -> Result<()> {
        self.set_pinned(chat_id, false).await
    }

    async fn rename_chat(&self, chat_id: ChatId, new_title: &str) -> Result<()> {
        let mut state = self.inner.write().await;
        state.chat_mut(chat_id)?.title = new_title.to_string();
        Ok(())
    }

    async fn delete_chat(&self, chat_id: ChatId) -> Result<()> {
        let mut state = self.inner.write().await;
        state
            .chats
            .remove(&chat_id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("chat {chat_id}")))
    }

    async fn add_message(&self, chat_id: ChatId, role: Role, content: &str) -> Result<MessageId> {
        let mut state = self.inner.write().await;
        // check before burning an id
        state.chat_mut(chat_id)?;
        state.last_message_id += 1;
        let id = state.last_message_id;
        state.chat_mut(chat_id)?.messages.push(Message {
            id,
            role,
            content: content.to_string(),
            citations: Vec::new(),
            follow_ups: Vec::new(),
        });
        Ok(id)
    }

    async fn add_citation(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reference: &str,
        details: &str,
    ) -> Result<CitationId> {
        let mut state = self.inner.write().await;
        let message = state.message_mut(chat_id, message_id)?;
        let id = message.citations.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        message.citations.push(Citation {
            id,
            reference: reference.to_string(),
            details: details.to_string(),
        });
        Ok(id)
    }

    async fn add_follow_up(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        question: &str,
    ) -> Result<FollowUpId> {
        let mut state = self.inner.write().await;
        let message = state.message_mut(chat_id, message_id)?;
        let id = message.follow_ups.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        message.follow_ups.push(FollowUp {
            id,
            question: question.to_string(),
        });
        Ok(id)
    }

    async fn save_user_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        self.inner
            .write()
            .await
            .settings
            .insert(user_id.to_string(), settings.clone());
        Ok(())
    }

    async fn update_user_mode(&self, user_id: &str, mode: Mode) -> Result<()> {
        let mut state = self.inner.write().await;
        state.settings.entry(user_id.to_string()).or_default().mode = mode;
        Ok(())
    }
}
