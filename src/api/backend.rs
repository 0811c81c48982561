//! REST surface of the backend actor.
//!
//! Serves the same contract [`HttpBackend`](crate::backend::HttpBackend)
//! speaks. Reads go straight to the backend; writes go through the
//! [`DataClient`] so the pages never show a stale cache after an outside
//! write (for example an assistant process posting its reply).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::backend::{
    BackendError, CitationBody, FollowUpBody, IdBody, MessageBody, ModeBody, TitleBody,
};
use crate::models::{ChatId, MessageId, UserSettings};
use crate::query::DataClient;

pub fn build_router() -> Router<DataClient> {
    Router::new()
        .route("/chats", get(list_chats).post(create_chat))
        .route("/chats/pinned", get(list_pinned))
        .route("/chats/{id}", get(get_chat).delete(delete_chat))
        .route("/chats/{id}/title", put(rename_chat))
        .route("/chats/{id}/pin", post(pin_chat).delete(unpin_chat))
        .route("/chats/{id}/messages", post(add_message))
        .route(
            "/chats/{id}/messages/{message_id}/citations",
            post(add_citation),
        )
        .route(
            "/chats/{id}/messages/{message_id}/follow-ups",
            post(add_follow_up),
        )
        .route(
            "/users/{user_id}/settings",
            get(get_settings).put(save_settings),
        )
        .route("/users/{user_id}/mode", put(update_mode))
}

type ApiResult<T> = Result<T, ApiError>;

/// Backend error as a plain-text HTTP response.
#[derive(Debug)]
pub struct ApiError(BackendError);

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BackendError::NotFound(_) => StatusCode::NOT_FOUND,
            BackendError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            BackendError::Unavailable(_) | BackendError::Http(_) => StatusCode::BAD_GATEWAY,
            BackendError::InvalidUrl(_) | BackendError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.0.to_string()).into_response()
    }
}

async fn list_chats(State(client): State<DataClient>) -> ApiResult<impl IntoResponse> {
    Ok(Json(client.backend().get_all_chats().await?))
}

async fn list_pinned(State(client): State<DataClient>) -> ApiResult<impl IntoResponse> {
    Ok(Json(client.backend().get_pinned_chats().await?))
}

async fn get_chat(
    State(client): State<DataClient>,
    Path(chat_id): Path<ChatId>,
) -> ApiResult<Response> {
    Ok(match client.backend().get_chat(chat_id).await? {
        Some(chat) => Json(chat).into_response(),
        None => (StatusCode::NOT_FOUND, format!("chat {chat_id}")).into_response(),
    })
}

async fn create_chat(
    State(client): State<DataClient>,
    Json(body): Json<TitleBody>,
) -> ApiResult<impl IntoResponse> {
    let id = client.create_chat(&body.title).await?;
    Ok((StatusCode::CREATED, Json(IdBody { id })))
}

async fn rename_chat(
    State(client): State<DataClient>,
    Path(chat_id): Path<ChatId>,
    Json(body): Json<TitleBody>,
) -> ApiResult<StatusCode> {
    client.rename_chat(chat_id, &body.title).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pin_chat(
    State(client): State<DataClient>,
    Path(chat_id): Path<ChatId>,
) -> ApiResult<StatusCode> {
    client.pin_chat(chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unpin_chat(
    State(client): State<DataClient>,
    Path(chat_id): Path<ChatId>,
) -> ApiResult<StatusCode> {
    client.unpin_chat(chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_chat(
    State(client): State<DataClient>,
    Path(chat_id): Path<ChatId>,
) -> ApiResult<StatusCode> {
    client.delete_chat(chat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_message(
    State(client): State<DataClient>,
    Path(chat_id): Path<ChatId>,
    Json(body): Json<MessageBody>,
) -> ApiResult<impl IntoResponse> {
    let id = client.add_message(chat_id, body.role, &body.content).await?;
    Ok((StatusCode::CREATED, Json(IdBody { id })))
}

async fn add_citation(
    State(client): State<DataClient>,
    Path((chat_id, message_id)): Path<(ChatId, MessageId)>,
    Json(body): Json<CitationBody>,
) -> ApiResult<impl IntoResponse> {
    let id = client
        .add_citation(chat_id, message_id, &body.reference, &body.details)
        .await?;
    Ok((StatusCode::CREATED, Json(IdBody { id })))
}

async fn add_follow_up(
    State(client): State<DataClient>,
    Path((chat_id, message_id)): Path<(ChatId, MessageId)>,
    Json(body): Json<FollowUpBody>,
) -> ApiResult<impl IntoResponse> {
    let id = client
        .add_follow_up(chat_id, message_id, &body.question)
        .await?;
    Ok((StatusCode::CREATED, Json(IdBody { id })))
}

async fn get_settings(
    State(client): State<DataClient>,
    Path(user_id): Path<String>,
) -> ApiResult<Response> {
    Ok(match client.backend().get_user_settings(&user_id).await? {
        Some(settings) => Json(settings).into_response(),
        None => (StatusCode::NOT_FOUND, format!("settings for {user_id}")).into_response(),
    })
}

async fn save_settings(
    State(client): State<DataClient>,
    Path(user_id): Path<String>,
    Json(settings): Json<UserSettings>,
) -> ApiResult<StatusCode> {
    client.save_user_settings(&user_id, &settings).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_mode(
    State(client): State<DataClient>,
    Path(user_id): Path<String>,
    Json(body): Json<ModeBody>,
) -> ApiResult<StatusCode> {
    client.update_user_mode(&user_id, body.mode).await?;
    Ok(StatusCode::NO_CONTENT)
}
