//! HTTP client for a remote backend actor.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{BackendError, ChatBackend, Result};
use crate::models::{
    Chat, ChatId, CitationId, FollowUpId, MessageId, Mode, Role, UserSettings,
};

/// REST client for the backend actor.
///
/// # Example
///
/// ```rust,no_run
/// use nelson_gpt::backend::{ChatBackend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:3000/backend/")?;
/// let chats = backend.get_all_chats().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TitleBody {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdBody {
    pub id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MessageBody {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CitationBody {
    pub reference: String,
    pub details: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FollowUpBody {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ModeBody {
    pub mode: Mode,
}

impl HttpBackend {
    /// Create a client for the actor at `base_url`.
    ///
    /// A trailing slash is added when missing so relative paths join below it.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut raw = base_url.as_ref().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)?;
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|err| {
            if err.is_connect() {
                BackendError::Unavailable(err.to_string())
            } else {
                BackendError::Http(err)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".into());
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(message));
        }
        Err(BackendError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// GET that maps 404 to `None`.
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        match self.get_json(url).await {
            Ok(value) => Ok(Some(value)),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn post_for_id<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<u64> {
        let response = self.send(self.http.post(self.url(path)?).json(body)).await?;
        let created: IdBody = response.json().await?;
        Ok(created.id)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn get_all_chats(&self) -> Result<Vec<Chat>> {
        self.get_json(self.url("chats")?).await
    }

    async fn get_pinned_chats(&self) -> Result<Vec<Chat>> {
        self.get_json(self.url("chats/pinned")?).await
    }

    async fn get_chat(&self, chat_id: ChatId) -> Result<Option<Chat>> {
        self.get_optional(self.url(&format!("chats/{chat_id}"))?)
            .await
    }

    async fn get_user_settings(&self, user_id: &str) -> Result<Option<UserSettings>> {
        self.get_optional(self.user_url(user_id, "settings")?).await
    }

    async fn create_chat(&self, title: &str) -> Result<ChatId> {
        self.post_for_id(
            "chats",
            &TitleBody {
                title: title.to_string(),
            },
        )
        .await
    }

    async fn pin_chat(&self, chat_id: ChatId) -> Result<()> {
        self.send(self.http.post(self.url(&format!("chats/{chat_id}/pin"))?))
            .await?;
        Ok(())
    }

    async fn unpin_chat(&self, chat_id: ChatId) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("chats/{chat_id}/pin"))?))
            .await?;
        Ok(())
    }

    async fn rename_chat(&self, chat_id: ChatId, new_title: &str) -> Result<()> {
        let body = TitleBody {
            title: new_title.to_string(),
        };
        self.send(
            self.http
                .put(self.url(&format!("chats/{chat_id}/title"))?)
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn delete_chat(&self, chat_id: ChatId) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("chats/{chat_id}"))?))
            .await?;
        Ok(())
    }

    async fn add_message(&self, chat_id: ChatId, role: Role, content: &str) -> Result<MessageId> {
        self.post_for_id(
            &format!("chats/{chat_id}/messages"),
            &MessageBody {
                role,
                content: content.to_string(),
            },
        )
        .await
    }

    async fn add_citation(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        reference: &str,
        details: &str,
    ) -> Result<CitationId> {
        self.post_for_id(
            &format!("chats/{chat_id}/messages/{message_id}/citations"),
            &CitationBody {
                reference: reference.to_string(),
                details: details.to_string(),
            },
        )
        .await
    }

    async fn add_follow_up(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        question: &str,
    ) -> Result<FollowUpId> {
        self.post_for_id(
            &format!("chats/{chat_id}/messages/{message_id}/follow-ups"),
            &FollowUpBody {
                question: question.to_string(),
            },
        )
        .await
    }

    async fn save_user_settings(&self, user_id: &str, settings: &UserSettings) -> Result<()> {
        let url = self.user_url(user_id, "settings")?;
        self.send(self.http.put(url).json(settings)).await?;
        Ok(())
    }

    async fn update_user_mode(&self, user_id: &str, mode: Mode) -> Result<()> {
        let url = self.user_url(user_id, "mode")?;
        self.send(self.http.put(url).json(&ModeBody { mode })).await?;
        Ok(())
    }
}

impl HttpBackend {
    /// `users/{user_id}/{leaf}` with the user id percent-encoded as one segment.
    fn user_url(&self, user_id: &str, leaf: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Unavailable("base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["users", user_id, leaf]);
        Ok(url)
    }
}
