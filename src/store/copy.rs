use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::lock;
use crate::models::MessageId;

type CopyKey = (MessageId, String);

#[derive(Debug)]
struct CopyTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct CopyState {
    timers: HashMap<CopyKey, CopyTimer>,
    next_generation: u64,
}

/// Tracks which code blocks were copied within the feedback window.
#[derive(Debug, Clone, Default)]
pub struct CopyTracker {
    inner: Arc<Mutex<CopyState>>,
}

impl CopyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag `(message_id, code_id)` as copied for `window`. Marking a block
    /// that is already flagged restarts its window.
    pub fn mark(&self, message_id: MessageId, code_id: &str, window: Duration) {
        let key = (message_id, code_id.to_string());
        let mut state = lock(&self.inner);
        state.next_generation += 1;
        let generation = state.next_generation;

        let inner = Arc::clone(&self.inner);
        let expiry_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut state = lock(&inner);
            // a newer mark owns the slot now
            if state
                .timers
                .get(&expiry_key)
                .is_some_and(|timer| timer.generation == generation)
            {
                state.timers.remove(&expiry_key);
            }
        });

        if let Some(previous) = state.timers.insert(key, CopyTimer { generation, handle }) {
            previous.handle.abort();
        }
    }

    pub fn is_copied(&self, message_id: MessageId, code_id: &str) -> bool {
        lock(&self.inner)
            .timers
            .contains_key(&(message_id, code_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_flag_expires() {
        let copies = CopyTracker::new();
        copies.mark(1, "code-0", Duration::from_secs(2));
        assert!(copies.is_copied(1, "code-0"));
        assert!(!copies.is_copied(1, "code-1"));
        assert!(!copies.is_copied(2, "code-0"));

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert!(!copies.is_copied(1, "code-0"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recopy_restarts_window() {
        let copies = CopyTracker::new();
        copies.mark(1, "code-0", Duration::from_secs(2));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        copies.mark(1, "code-0", Duration::from_secs(2));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(copies.is_copied(1, "code-0"));
        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert!(!copies.is_copied(1, "code-0"));
    }
}
