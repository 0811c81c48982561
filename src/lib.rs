//! Nelson-GPT: a pediatric knowledge assistant served as htmx-enhanced,
//! server-rendered HTML.
//!
//! All persistent state (chats, messages, citations, follow-ups, user
//! settings) lives in a backend actor reached through [`backend::ChatBackend`].
//! This crate is the presentation and synchronization layer over that actor.
//!
//! # Architecture
//!
//! - **Server**: Axum router for pages, htmx actions, polled fragments and
//!   the embedded backend REST surface
//! - **Query layer**: cached reads with per-mutation invalidation
//! - **UI store**: current chat, answer mode and typing indicator
//! - **Markdown**: ordered rewrite pipeline producing sanitized HTML
//!
//! # Modules
//!
//! - [`markdown`]: escaping and markdown rendering for assistant messages
//! - [`models`]: chat, message and settings types in their wire format
//! - [`backend`]: actor contract with in-memory and HTTP providers
//! - [`query`]: `DataClient` and its read cache
//! - [`store`]: `UiStore` and `CopyTracker`
//! - [`ui`]: HTML templates for every screen
//! - [`api`]: request handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod backend;
pub mod config;
pub mod markdown;
pub mod models;
pub mod query;
pub mod server;
pub mod store;
pub mod ui;

use std::sync::Arc;

use crate::backend::ChatBackend;
use crate::config::AppConfig;
use crate::query::DataClient;
use crate::store::{CopyTracker, UiStore};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cached access to the backend actor.
    pub client: DataClient,
    /// Current chat, mode and typing flag.
    pub store: UiStore,
    /// "Just copied" flags for code blocks.
    pub copies: CopyTracker,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn ChatBackend>, config: Arc<AppConfig>) -> Self {
        Self {
            client: DataClient::new(backend),
            store: UiStore::new(),
            copies: CopyTracker::new(),
            config,
        }
    }

    /// The user whose settings and mode this instance shows.
    pub fn user_id(&self) -> &str {
        &self.config.ui.user_id
    }
}
