//! Client-side UI state.
//!
//! - [`UiStore`]: current chat, answer mode and typing flag, observable
//!   through a `watch` channel
//! - [`CopyTracker`]: per code block "just copied" flags that expire

mod copy;
mod ui_state;

pub use copy::CopyTracker;
pub use ui_state::{UiState, UiStore};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a timer slot, recovering from poisoning. The guarded data is only
/// task handles, which stay valid if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
