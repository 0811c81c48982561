//! HTTP handlers.
//!
//! - [`pages`]: full documents
//! - [`actions`]: htmx form posts that mutate state
//! - [`fragments`]: polled partials
//! - [`backend`]: REST surface of the backend actor

pub mod actions;
pub mod backend;
pub mod fragments;
pub mod pages;

use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tracing::warn;

use crate::AppState;
use crate::backend::BackendError;
use crate::ui::components::{NoticeKind, notice};

/// Routes for pages, actions and fragments.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(pages::splash))
        .route("/welcome", get(pages::welcome))
        .route("/chat/{id}", get(pages::chat))
        .route("/settings", get(pages::settings))
        // htmx actions
        .route("/actions/start", post(actions::start))
        .route("/actions/chats", post(actions::new_chat))
        .route("/actions/chats/{id}/messages", post(actions::send_message))
        .route("/actions/chats/{id}/follow-ups", post(actions::send_follow_up))
        .route("/actions/chats/{id}/pin", post(actions::pin))
        .route("/actions/chats/{id}/unpin", post(actions::unpin))
        .route("/actions/chats/{id}/rename", post(actions::rename))
        .route("/actions/chats/{id}/delete", post(actions::delete))
        .route("/actions/back", post(actions::back))
        .route("/actions/mode", post(actions::set_mode))
        .route("/actions/settings", post(actions::save_settings))
        .route("/actions/copy", post(actions::copy))
        // Fragments
        .route("/fragments/chats/{id}/messages", get(fragments::messages))
        .route(
            "/fragments/copy/{message_id}/{code_id}",
            get(fragments::copy_label),
        )
}

/// A failed action, answered with an error notice.
#[derive(Debug)]
pub struct ActionFailure {
    status: StatusCode,
    notice: &'static str,
}

impl ActionFailure {
    pub fn new(status: StatusCode, notice: &'static str) -> Self {
        Self { status, notice }
    }

    /// Adapter for `map_err` that logs the backend error.
    pub fn from_backend(notice: &'static str) -> impl FnOnce(BackendError) -> Self {
        move |err| {
            warn!(name: "action.failed", notice, error = %err, "Action failed");
            let status = if err.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            };
            Self { status, notice }
        }
    }
}

impl IntoResponse for ActionFailure {
    fn into_response(self) -> Response {
        (self.status, Html(notice(NoticeKind::Error, self.notice))).into_response()
    }
}

/// Full navigation triggered from an htmx request.
pub fn hx_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::OK.into_response();
            response.headers_mut().insert("HX-Redirect", value);
            response
        }
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
