//! Chat list sidebar.

use super::components::{ButtonVariant, PIN_ICON, PLUS_ICON, inline_error};
use crate::markdown::escape;
use crate::models::{Chat, ChatId};

/// Sidebar with the "New Chat" button, pinned chats (when there are any) and
/// the first `recent_limit` unpinned chats in backend order.
pub fn sidebar(pinned: &[Chat], all: &[Chat], current: Option<ChatId>, recent_limit: usize) -> String {
    let mut sections = String::new();

    if !pinned.is_empty() {
        sections.push_str(r#"<section class="sidebar-section"><h2 class="sidebar-heading">Pinned</h2><ul class="sidebar-list">"#);
        for chat in pinned {
            sections.push_str(&chat_row(chat, current));
        }
        sections.push_str("</ul></section>");
    }

    sections.push_str(r#"<section class="sidebar-section"><h2 class="sidebar-heading">Recent</h2><ul class="sidebar-list">"#);
    for chat in all.iter().filter(|chat| !chat.pinned).take(recent_limit) {
        sections.push_str(&chat_row(chat, current));
    }
    sections.push_str("</ul></section>");

    wrap(&sections)
}

/// Sidebar shown when the chat lists could not be loaded.
pub fn sidebar_error(text: &str) -> String {
    wrap(&inline_error(text))
}

/// Any sidebar markup as an out-of-band replacement.
pub fn oob(sidebar_html: &str) -> String {
    sidebar_html.replacen("<nav ", r#"<nav hx-swap-oob="true" "#, 1)
}

fn wrap(sections: &str) -> String {
    format!(
        r#"<nav id="sidebar" class="sidebar" aria-label="Chats">
    <form hx-post="/actions/chats" hx-swap="none"><button type="submit" class="{new_class}">{PLUS_ICON}<span>New Chat</span></button></form>
    {sections}
</nav>"#,
        new_class = ButtonVariant::Outline.classes(),
    )
}

fn chat_row(chat: &Chat, current: Option<ChatId>) -> String {
    let id = chat.id;
    let title = escape(&chat.title);
    let active = if current == Some(id) { " active" } else { "" };
    let (pin_action, pin_label) = if chat.pinned {
        ("unpin", "Unpin")
    } else {
        ("pin", "Pin")
    };

    format!(
        r#"<li class="sidebar-item{active}" data-chat-id="{id}">
    <a href="/chat/{id}" class="sidebar-link">{title}</a>
    <div class="sidebar-actions">
        <form hx-post="/actions/chats/{id}/{pin_action}" hx-swap="none"><button type="submit" class="{ghost}" aria-label="{pin_label}" title="{pin_label}">{PIN_ICON}</button></form>
        <details class="sidebar-rename">
            <summary class="{ghost}">Rename</summary>
            <form hx-post="/actions/chats/{id}/rename" hx-swap="none"><input name="title" value="{title}" required aria-label="New title"><button type="submit" class="{primary}">Save</button></form>
        </details>
        <form hx-post="/actions/chats/{id}/delete" hx-swap="none" hx-confirm="Delete this chat?"><button type="submit" class="{destructive}">Delete</button></form>
    </div>
</li>"#,
        ghost = ButtonVariant::Ghost.classes(),
        primary = ButtonVariant::Primary.classes(),
        destructive = ButtonVariant::Destructive.classes(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(id: ChatId, title: &str, pinned: bool) -> Chat {
        Chat {
            id,
            title: title.to_string(),
            pinned,
            messages: Vec::new(),
        }
    }

    #[test]
    fn test_recent_is_unpinned_and_limited() {
        let all: Vec<Chat> = (1..=12).map(|id| chat(id, &format!("chat {id}"), id == 3)).collect();
        let pinned = vec![all[2].clone()];
        let html = sidebar(&pinned, &all, Some(5), 10);

        let (pinned_part, recent_part) = html.split_once(">Recent<").unwrap();
        assert!(pinned_part.contains(">Pinned<"));
        assert!(pinned_part.contains(r#"href="/chat/3""#));
        assert!(!recent_part.contains(r#"href="/chat/3""#));
        assert_eq!(recent_part.matches("sidebar-link").count(), 10);
        assert!(recent_part.contains(r#"href="/chat/11""#));
        assert!(!recent_part.contains(r#"href="/chat/12""#));
        assert!(html.contains(r#"class="sidebar-item active" data-chat-id="5""#));
        assert!(pinned_part.contains("/actions/chats/3/unpin"));
    }

    #[test]
    fn test_no_pinned_section_without_pins() {
        let all = vec![chat(1, "<script>", false)];
        let html = sidebar(&[], &all, None, 10);
        assert!(!html.contains(">Pinned<"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(oob(&html).starts_with(r#"<nav hx-swap-oob="true" id="sidebar""#));
    }
}
