//! Full-page handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;
use crate::backend::BackendError;
use crate::models::{ChatId, UserSettings};
use crate::ui::chat::{ListContext, chat_not_found, chat_page};
use crate::ui::components::{NoticeKind, inline_error, toast};
use crate::ui::settings::settings_page;
use crate::ui::shell::html_shell;
use crate::ui::sidebar::{sidebar, sidebar_error};
use crate::ui::splash::splash_page;
use crate::ui::welcome::welcome_page;

/// Settings for the document shell. Falls back to defaults when the backend
/// cannot be read so pages still render.
pub(crate) async fn shell_settings(state: &AppState) -> UserSettings {
    match state.client.settings_or_default(state.user_id()).await {
        Ok(settings) => settings,
        Err(err) => {
            warn!(name: "settings.load.failed", error = %err, "Using default settings");
            UserSettings::default()
        }
    }
}

pub(crate) async fn render_sidebar(state: &AppState) -> String {
    let lists = async {
        let pinned = state.client.pinned_chats().await?;
        let all = state.client.chats().await?;
        Ok::<_, BackendError>((pinned, all))
    };
    match lists.await {
        Ok((pinned, all)) => sidebar(
            &pinned,
            &all,
            state.store.current_chat_id(),
            state.config.ui.recent_chats_limit,
        ),
        Err(err) => {
            warn!(name: "chats.load.failed", error = %err, "Failed to load chat lists");
            sidebar_error("Failed to load chats")
        }
    }
}

/// GET / - Splash screen.
pub async fn splash(State(state): State<AppState>) -> Html<String> {
    let settings = shell_settings(&state).await;
    Html(html_shell(
        "Welcome",
        &settings,
        &splash_page(state.config.ui.splash_ms),
    ))
}

#[derive(Debug, Deserialize)]
pub struct WelcomeQuery {
    notice: Option<String>,
}

/// GET /welcome - Title, mode toggle and the first composer.
pub async fn welcome(
    State(state): State<AppState>,
    Query(query): Query<WelcomeQuery>,
) -> Html<String> {
    let settings = shell_settings(&state).await;
    let sidebar = render_sidebar(&state).await;
    // only known keys, never reflected text
    let notice = match query.notice.as_deref() {
        Some("chat-deleted") => toast(NoticeKind::Success, "Chat deleted"),
        _ => String::new(),
    };
    Html(html_shell(
        "Welcome",
        &settings,
        &welcome_page(state.store.current_mode(), &sidebar, &notice),
    ))
}

/// GET /chat/{id} - Message history for one chat. Opening a chat makes it
/// the current one.
pub async fn chat(State(state): State<AppState>, Path(chat_id): Path<ChatId>) -> Response {
    let settings = shell_settings(&state).await;
    let chat = match state.client.chat(chat_id).await {
        Ok(Some(chat)) => chat,
        Ok(None) => {
            let body = chat_not_found(chat_id);
            return (
                StatusCode::NOT_FOUND,
                Html(html_shell("Chat not found", &settings, &body)),
            )
                .into_response();
        }
        Err(err) => {
            warn!(name: "chat.load.failed", chat_id, error = %err, "Failed to load chat");
            let body = inline_error("Failed to load chat");
            return (
                StatusCode::BAD_GATEWAY,
                Html(html_shell("Chat", &settings, &body)),
            )
                .into_response();
        }
    };

    state.store.set_current_chat(Some(chat_id));
    let sidebar = render_sidebar(&state).await;
    let list = ListContext {
        is_typing: state.store.is_typing(),
        copies: &state.copies,
        copy_feedback_ms: state.config.ui.copy_feedback_ms,
    };
    let body = chat_page(&chat, state.store.current_mode(), &sidebar, list);
    Html(html_shell(&chat.title, &settings, &body)).into_response()
}

/// GET /settings - Theme, font size and notifications.
pub async fn settings(State(state): State<AppState>) -> Html<String> {
    match state.client.settings_or_default(state.user_id()).await {
        Ok(settings) => Html(html_shell(
            "Settings",
            &settings,
            &settings_page(&settings, ""),
        )),
        Err(err) => {
            warn!(name: "settings.load.failed", error = %err, "Failed to load settings");
            let defaults = UserSettings::default();
            let notice = inline_error("Failed to load settings");
            Html(html_shell(
                "Settings",
                &defaults,
                &settings_page(&defaults, &notice),
            ))
        }
    }
}
