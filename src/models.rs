//! Domain types shared by the backend client, the query layer and the pages.
//!
//! Field names follow the backend actor's JSON (camelCase, lowercase enum
//! values) so the same types travel over the wire unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chat identifier.
pub type ChatId = u64;
/// Message identifier.
pub type MessageId = u64;
/// Citation identifier, unique within its message.
pub type CitationId = u64;
/// Follow-up identifier, unique within its message.
pub type FollowUpId = u64;

/// A conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub pinned: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
}

impl Message {
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Source reference attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: CitationId,
    /// Short label, e.g. "Nelson 22e, ch. 214".
    pub reference: String,
    /// Expanded text shown when the citation is opened.
    pub details: String,
}

/// Suggested next question attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: FollowUpId,
    pub question: String,
}

/// Error for enum values that arrive as free text (forms, headers).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError { kind: $kind, value: other.to_string() }),
                }
            }
        }
    };
}

string_enum!(
    /// Color scheme.
    Theme, "theme" { #[default] Light => "light", Dark => "dark", System => "system" }
);

string_enum!(
    /// Root font size.
    FontSize, "font size" { Small => "small", #[default] Medium => "medium", Large => "large" }
);

string_enum!(
    /// Answer style requested from the assistant.
    Mode, "mode" { #[default] Academic => "academic", Clinical => "clinical" }
);

impl FontSize {
    /// Root font size in pixels.
    #[must_use]
    pub fn root_px(self) -> u8 {
        match self {
            Self::Small => 14,
            Self::Medium => 16,
            Self::Large => 18,
        }
    }
}

impl Mode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::Clinical => "Clinical",
        }
    }
}

/// Per-user preferences. Last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: Theme,
    pub font: FontSize,
    pub notifications: bool,
    pub ai_tone: String,
    pub ai_depth: String,
    pub privacy: String,
    pub mode: Mode,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font: FontSize::Medium,
            notifications: true,
            ai_tone: "professional".to_string(),
            ai_depth: "detailed".to_string(),
            privacy: "standard".to_string(),
            mode: Mode::Academic,
        }
    }
}

/// Partial settings change coming from the settings panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub font: Option<FontSize>,
    #[serde(default)]
    pub notifications: Option<bool>,
}

impl UserSettings {
    /// Apply a partial update on top of these settings.
    #[must_use]
    pub fn merged(mut self, update: &SettingsUpdate) -> Self {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(font) = update.font {
            self.font = font;
        }
        if let Some(notifications) = update.notifications {
            self.notifications = notifications;
        }
        self
    }
}
