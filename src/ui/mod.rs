//! Server-rendered HTML for every screen.
//!
//! Pages are plain `format!` templates enhanced with htmx attributes. All
//! user-supplied text passes through [`escape`](crate::markdown::escape);
//! assistant text passes through [`render`](crate::markdown::render).
//!
//! # Structure
//!
//! - [`shell`]: document shell with theme and font size applied
//! - [`splash`], [`welcome`], [`chat`], [`settings`]: the screens
//! - [`sidebar`]: pinned and recent chats with per-chat actions
//! - [`components`]: buttons, notices, mode toggle, composer

pub mod chat;
pub mod components;
pub mod settings;
pub mod shell;
pub mod sidebar;
pub mod splash;
pub mod welcome;
