use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::lock;
use crate::models::{ChatId, Mode};

/// Snapshot of the UI state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    pub current_chat_id: Option<ChatId>,
    pub current_mode: Mode,
    pub is_typing: bool,
}

/// Observable UI state container.
///
/// Clones share the same state. Setters only notify subscribers when a value
/// actually changes.
///
/// # Example
///
/// ```rust
/// use nelson_gpt::models::Mode;
/// use nelson_gpt::store::UiStore;
///
/// let store = UiStore::new();
/// let mut updates = store.subscribe();
/// store.set_mode(Mode::Clinical);
/// assert!(updates.has_changed().unwrap());
/// assert_eq!(updates.borrow_and_update().current_mode, Mode::Clinical);
/// ```
#[derive(Debug, Clone)]
pub struct UiStore {
    state: Arc<watch::Sender<UiState>>,
    typing_timer: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self {
            state: Arc::new(state),
            typing_timer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn snapshot(&self) -> UiState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn current_chat_id(&self) -> Option<ChatId> {
        self.state.borrow().current_chat_id
    }

    pub fn current_mode(&self) -> Mode {
        self.state.borrow().current_mode
    }

    pub fn is_typing(&self) -> bool {
        self.state.borrow().is_typing
    }

    pub fn set_current_chat(&self, chat_id: Option<ChatId>) {
        self.state.send_if_modified(|state| {
            let changed = state.current_chat_id != chat_id;
            state.current_chat_id = chat_id;
            changed
        });
    }

    /// Clear the current chat if it is `chat_id`.
    pub fn clear_current_chat_if(&self, chat_id: ChatId) {
        self.state.send_if_modified(|state| {
            if state.current_chat_id == Some(chat_id) {
                state.current_chat_id = None;
                true
            } else {
                false
            }
        });
    }

    pub fn set_mode(&self, mode: Mode) {
        self.state.send_if_modified(|state| {
            let changed = state.current_mode != mode;
            state.current_mode = mode;
            changed
        });
    }

    pub fn set_typing(&self, is_typing: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.is_typing != is_typing;
            state.is_typing = is_typing;
            changed
        });
    }

    /// Show the typing indicator for `window`.
    ///
    /// A call while a window is open aborts the pending reset, so the flag
    /// stays set until `window` after the latest call. Must run inside a
    /// tokio runtime.
    pub fn start_typing(&self, window: Duration) {
        self.set_typing(true);
        let state = Arc::clone(&self.state);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            state.send_if_modified(|state| std::mem::replace(&mut state.is_typing, false));
            debug!(name: "ui.typing.stopped", "Typing indicator cleared");
        });
        if let Some(previous) = lock(&self.typing_timer).replace(timer) {
            previous.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let store = UiStore::new();
        assert_eq!(
            store.snapshot(),
            UiState {
                current_chat_id: None,
                current_mode: Mode::Academic,
                is_typing: false,
            }
        );
    }

    #[test]
    fn test_setters_notify_only_on_change() {
        let store = UiStore::new();
        let mut rx = store.subscribe();

        store.set_current_chat(Some(4));
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        store.set_current_chat(Some(4));
        assert!(!rx.has_changed().unwrap());

        store.clear_current_chat_if(5);
        assert_eq!(store.current_chat_id(), Some(4));
        store.clear_current_chat_if(4);
        assert_eq!(store.current_chat_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_window_expires() {
        let store = UiStore::new();
        store.start_typing(Duration::from_secs(2));
        assert!(store.is_typing());

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(store.is_typing());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!store.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_restart_extends_window() {
        let store = UiStore::new();
        store.start_typing(Duration::from_secs(2));
        tokio::time::sleep(Duration::from_secs(1)).await;
        store.start_typing(Duration::from_secs(2));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(store.is_typing(), "first timer must not clear the flag");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!store.is_typing());
    }
}
