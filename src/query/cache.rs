//! Keyed read cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Chat, ChatId, UserSettings};

/// Identity of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Chats,
    PinnedChats,
    Chat(ChatId),
    UserSettings(String),
}

#[derive(Debug, Clone)]
pub(crate) enum CachedValue {
    ChatList(Vec<Chat>),
    Chat(Option<Chat>),
    Settings(Option<UserSettings>),
}

/// A read result that can live in the cache.
pub(crate) trait Cached: Clone + Sized {
    fn into_value(self) -> CachedValue;
    fn from_value(value: &CachedValue) -> Option<Self>;
}

impl Cached for Vec<Chat> {
    fn into_value(self) -> CachedValue {
        CachedValue::ChatList(self)
    }

    fn from_value(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::ChatList(chats) => Some(chats.clone()),
            _ => None,
        }
    }
}

impl Cached for Option<Chat> {
    fn into_value(self) -> CachedValue {
        CachedValue::Chat(self)
    }

    fn from_value(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Chat(chat) => Some(chat.clone()),
            _ => None,
        }
    }
}

impl Cached for Option<UserSettings> {
    fn into_value(self) -> CachedValue {
        CachedValue::Settings(self)
    }

    fn from_value(value: &CachedValue) -> Option<Self> {
        match value {
            CachedValue::Settings(settings) => Some(settings.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CachedValue>,
    /// Bumped on every invalidation. A fetch that started under an older
    /// generation may have raced a write and is not stored.
    generation: u64,
}

/// Thread-safe cache shared by all handlers.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheState>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn get<T: Cached>(&self, key: &QueryKey) -> Option<T> {
        self.inner
            .read()
            .await
            .entries
            .get(key)
            .and_then(T::from_value)
    }

    pub(crate) async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    pub(crate) async fn insert_if_current<T: Cached>(&self, key: QueryKey, value: T, generation: u64) {
        let mut state = self.inner.write().await;
        if state.generation == generation {
            state.entries.insert(key, value.into_value());
        } else {
            debug!(name: "query.cache.stale_fetch", key = ?key, "Dropped read that raced a write");
        }
    }

    /// Forget the given keys.
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        let mut state = self.inner.write().await;
        state.generation += 1;
        for key in keys {
            state.entries.remove(key);
        }
        debug!(name: "query.cache.invalidated", keys = ?keys, "Cache keys invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_invalidate() {
        let cache = QueryCache::new();
        let generation = cache.generation().await;
        cache
            .insert_if_current(QueryKey::Chats, Vec::<Chat>::new(), generation)
            .await;
        cache
            .insert_if_current(QueryKey::Chat(1), None::<Chat>, generation)
            .await;
        assert!(cache.get::<Vec<Chat>>(&QueryKey::Chats).await.is_some());

        cache.invalidate(&[QueryKey::Chats]).await;
        assert!(cache.get::<Vec<Chat>>(&QueryKey::Chats).await.is_none());
        assert_eq!(cache.get::<Option<Chat>>(&QueryKey::Chat(1)).await, Some(None));
    }

    #[tokio::test]
    async fn test_fetch_older_than_invalidation_is_dropped() {
        let cache = QueryCache::new();
        let generation = cache.generation().await;
        cache.invalidate(&[QueryKey::Chat(1)]).await;
        cache
            .insert_if_current(QueryKey::Chat(1), None::<Chat>, generation)
            .await;
        assert!(cache.get::<Option<Chat>>(&QueryKey::Chat(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_typed_lookup() {
        let cache = QueryCache::new();
        cache
            .insert_if_current(QueryKey::Chats, Vec::<Chat>::new(), 0)
            .await;
        assert!(cache.get::<Vec<Chat>>(&QueryKey::Chats).await.is_some());
        assert!(cache.get::<Option<Chat>>(&QueryKey::Chats).await.is_none());
    }
}
