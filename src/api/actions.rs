//! htmx action handlers.
//!
//! Successful actions answer with out-of-band fragments or an `HX-Redirect`.
//! Failures answer with an error notice and leave the UI store untouched.

use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::pages::render_sidebar;
use super::{ActionFailure, hx_redirect};
use crate::AppState;
use crate::models::{ChatId, MessageId, Mode, ParseEnumError, Role, SettingsUpdate};
use crate::ui::chat::{ListContext, chat_title_oob, copy_label, message_list_oob};
use crate::ui::components::{NoticeKind, mode_toggle_oob, notice};
use crate::ui::sidebar;

/// Title given to every new chat.
pub const NEW_CHAT_TITLE: &str = "New Chat";

type ActionResult = Result<Response, ActionFailure>;

#[derive(Debug, Deserialize)]
pub struct ContentForm {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpForm {
    question: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeForm {
    mode: String,
}

/// Posted by a single settings control.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    /// Set by controls whose absence carries meaning (an unchecked switch).
    field: Option<String>,
    theme: Option<String>,
    font: Option<String>,
    notifications: Option<String>,
}

impl SettingsForm {
    fn into_update(self) -> Result<SettingsUpdate, ActionFailure> {
        let invalid = |_err: ParseEnumError| ActionFailure::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid setting");
        let notifications = if self.field.as_deref() == Some("notifications") {
            Some(matches!(self.notifications.as_deref(), Some("true" | "on")))
        } else {
            self.notifications.map(|value| value == "true" || value == "on")
        };
        Ok(SettingsUpdate {
            theme: self.theme.as_deref().map(str::parse).transpose().map_err(invalid)?,
            font: self.font.as_deref().map(str::parse).transpose().map_err(invalid)?,
            notifications,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CopyForm {
    message_id: MessageId,
    code_id: String,
}

/// POST /actions/start - Create a chat from the welcome composer.
pub async fn start(State(state): State<AppState>, Form(form): Form<ContentForm>) -> ActionResult {
    let content = form.content.trim();
    if content.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let failed = "Failed to start chat";
    let chat_id = state
        .client
        .create_chat(NEW_CHAT_TITLE)
        .await
        .map_err(ActionFailure::from_backend(failed))?;
    state
        .client
        .add_message(chat_id, Role::User, content)
        .await
        .map_err(ActionFailure::from_backend(failed))?;

    state.store.set_current_chat(Some(chat_id));
    state.store.start_typing(state.config.ui.typing_window());
    Ok(hx_redirect(&format!("/chat/{chat_id}")))
}

/// POST /actions/chats - Sidebar "New Chat".
pub async fn new_chat(State(state): State<AppState>) -> ActionResult {
    let chat_id = state
        .client
        .create_chat(NEW_CHAT_TITLE)
        .await
        .map_err(ActionFailure::from_backend("Failed to create new chat"))?;
    state.store.set_current_chat(Some(chat_id));
    Ok(hx_redirect(&format!("/chat/{chat_id}")))
}

/// POST /actions/chats/{id}/messages - Send from the chat dock.
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<ChatId>,
    Form(form): Form<ContentForm>,
) -> ActionResult {
    let content = form.content.trim();
    if content.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    send_user_message(&state, chat_id, content, "Failed to send message").await
}

/// POST /actions/chats/{id}/follow-ups - A follow-up chip was chosen.
pub async fn send_follow_up(
    State(state): State<AppState>,
    Path(chat_id): Path<ChatId>,
    Form(form): Form<FollowUpForm>,
) -> ActionResult {
    let question = form.question.trim();
    if question.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    send_user_message(&state, chat_id, question, "Failed to send follow-up question").await
}

async fn send_user_message(
    state: &AppState,
    chat_id: ChatId,
    content: &str,
    failed: &'static str,
) -> ActionResult {
    state
        .client
        .add_message(chat_id, Role::User, content)
        .await
        .map_err(ActionFailure::from_backend(failed))?;
    state.store.start_typing(state.config.ui.typing_window());

    // The write went through; a failed re-read is left to the next poll.
    let Ok(Some(chat)) = state.client.chat(chat_id).await else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    let list = ListContext {
        is_typing: state.store.is_typing(),
        copies: &state.copies,
        copy_feedback_ms: state.config.ui.copy_feedback_ms,
    };
    Ok(Html(message_list_oob(&chat, list)).into_response())
}

/// POST /actions/chats/{id}/pin
pub async fn pin(State(state): State<AppState>, Path(chat_id): Path<ChatId>) -> ActionResult {
    state
        .client
        .pin_chat(chat_id)
        .await
        .map_err(ActionFailure::from_backend("Failed to pin chat"))?;
    Ok(Html(sidebar::oob(&render_sidebar(&state).await)).into_response())
}

/// POST /actions/chats/{id}/unpin
pub async fn unpin(State(state): State<AppState>, Path(chat_id): Path<ChatId>) -> ActionResult {
    state
        .client
        .unpin_chat(chat_id)
        .await
        .map_err(ActionFailure::from_backend("Failed to unpin chat"))?;
    Ok(Html(sidebar::oob(&render_sidebar(&state).await)).into_response())
}

/// POST /actions/chats/{id}/rename
pub async fn rename(
    State(state): State<AppState>,
    Path(chat_id): Path<ChatId>,
    Form(form): Form<RenameForm>,
) -> ActionResult {
    let title = form.title.trim();
    if title.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    state
        .client
        .rename_chat(chat_id, title)
        .await
        .map_err(ActionFailure::from_backend("Failed to rename chat"))?;

    let mut body = sidebar::oob(&render_sidebar(&state).await);
    if state.store.current_chat_id() == Some(chat_id) {
        body.push_str(&chat_title_oob(title));
    }
    Ok(Html(body).into_response())
}

/// POST /actions/chats/{id}/delete
///
/// Deleting the current chat clears it and leaves the chat screen.
pub async fn delete(State(state): State<AppState>, Path(chat_id): Path<ChatId>) -> ActionResult {
    state
        .client
        .delete_chat(chat_id)
        .await
        .map_err(ActionFailure::from_backend("Failed to delete chat"))?;

    if state.store.current_chat_id() == Some(chat_id) {
        state.store.clear_current_chat_if(chat_id);
        return Ok(hx_redirect("/welcome?notice=chat-deleted"));
    }
    let mut body = sidebar::oob(&render_sidebar(&state).await);
    body.push_str(&notice(NoticeKind::Success, "Chat deleted"));
    Ok(Html(body).into_response())
}

/// POST /actions/back - Leave the chat screen.
pub async fn back(State(state): State<AppState>) -> Response {
    state.store.set_current_chat(None);
    hx_redirect("/welcome")
}

/// POST /actions/mode - Academic/Clinical toggle.
pub async fn set_mode(State(state): State<AppState>, Form(form): Form<ModeForm>) -> ActionResult {
    let mode: Mode = form
        .mode
        .parse()
        .map_err(|_err| ActionFailure::new(StatusCode::UNPROCESSABLE_ENTITY, "Unknown mode"))?;

    state
        .client
        .update_user_mode(state.user_id(), mode)
        .await
        .map_err(ActionFailure::from_backend("Failed to save mode"))?;
    state.store.set_mode(mode);
    info!(name: "mode.changed", mode = mode.as_str(), "Answer mode changed");
    Ok(Html(mode_toggle_oob(mode)).into_response())
}

/// POST /actions/settings - One settings control changed.
pub async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> ActionResult {
    let update = form.into_update()?;
    let settings = state
        .client
        .update_settings(state.user_id(), &update)
        .await
        .map_err(ActionFailure::from_backend("Failed to save settings"))?;

    // app.js applies these to <html> without a reload
    let applied = json!({
        "settings-applied": {
            "theme": settings.theme.as_str(),
            "fontPx": settings.font.root_px(),
        }
    });
    let mut response = Html(notice(NoticeKind::Success, "Settings saved")).into_response();
    if let Ok(value) = HeaderValue::from_str(&applied.to_string()) {
        response.headers_mut().insert("HX-Trigger", value);
    }
    Ok(response)
}

/// POST /actions/copy - A code block was copied in the browser.
pub async fn copy(State(state): State<AppState>, Form(form): Form<CopyForm>) -> Html<String> {
    state
        .copies
        .mark(form.message_id, &form.code_id, state.config.ui.copy_window());
    Html(copy_label(
        form.message_id,
        &form.code_id,
        true,
        state.config.ui.copy_feedback_ms,
    ))
}
