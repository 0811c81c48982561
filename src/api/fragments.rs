//! Polled partials.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;
use crate::models::{ChatId, MessageId};
use crate::ui::chat::{
    ListContext, chat_not_found, copy_label as render_copy_label, list_version, message_list,
    message_list_error,
};

/// htmx stops polling when it sees this status.
const STOP_POLLING: u16 = 286;

#[derive(Debug, Deserialize)]
pub struct PollQuery {
    /// Version the client currently shows.
    v: Option<String>,
}

/// GET /fragments/chats/{id}/messages - Message list, or 204 when the
/// client's version is current.
pub async fn messages(
    State(state): State<AppState>,
    Path(chat_id): Path<ChatId>,
    Query(query): Query<PollQuery>,
) -> Response {
    match state.client.refetch_chat(chat_id).await {
        Ok(Some(chat)) => {
            let is_typing = state.store.is_typing();
            if query.v.as_deref() == Some(list_version(&chat, is_typing).as_str()) {
                return StatusCode::NO_CONTENT.into_response();
            }
            let list = ListContext {
                is_typing,
                copies: &state.copies,
                copy_feedback_ms: state.config.ui.copy_feedback_ms,
            };
            Html(message_list(&chat, list)).into_response()
        }
        Ok(None) => {
            let status = StatusCode::from_u16(STOP_POLLING).unwrap_or(StatusCode::NOT_FOUND);
            (status, Html(chat_not_found(chat_id))).into_response()
        }
        Err(err) => {
            warn!(name: "chat.poll.failed", chat_id, error = %err, "Failed to refresh messages");
            Html(message_list_error(chat_id, "Failed to load messages")).into_response()
        }
    }
}

/// GET /fragments/copy/{message_id}/{code_id} - Copy button label.
pub async fn copy_label(
    State(state): State<AppState>,
    Path((message_id, code_id)): Path<(MessageId, String)>,
) -> Html<String> {
    Html(render_copy_label(
        message_id,
        &code_id,
        state.copies.is_copied(message_id, &code_id),
        state.config.ui.copy_feedback_ms,
    ))
}
