//! Chat screen: header, message list, bubbles and the input dock.

use std::fmt::Write as _;

use super::components::{
    BACK_ICON, ButtonVariant, SETTINGS_ICON, composer, inline_error, mode_toggle,
};
use crate::markdown::{escape, render};
use crate::models::{Chat, ChatId, Citation, FollowUp, Message, MessageId, Mode};
use crate::store::CopyTracker;

/// How often an open chat asks for new messages.
pub const POLL_INTERVAL: &str = "every 1s";

/// Everything the message list needs besides the chat itself.
#[derive(Debug, Clone, Copy)]
pub struct ListContext<'a> {
    pub is_typing: bool,
    pub copies: &'a CopyTracker,
    pub copy_feedback_ms: u64,
}

/// Page body for `/chat/{id}`.
pub fn chat_page(chat: &Chat, mode: Mode, sidebar: &str, list: ListContext<'_>) -> String {
    format!(
        r#"<div class="layout">
    {sidebar}
    <main class="chat">
        {header}
        {messages}
        <footer class="chat-dock">
            {toggle}
            {composer}
        </footer>
    </main>
</div>"#,
        header = chat_header(&chat.title),
        messages = message_list(chat, list),
        toggle = mode_toggle(mode),
        composer = composer(
            &format!("/actions/chats/{}/messages", chat.id),
            "Ask a follow-up question..."
        ),
    )
}

/// Body shown for a chat id the backend does not know.
pub fn chat_not_found(chat_id: ChatId) -> String {
    format!(
        r#"<main class="chat-missing">
    <div class="notice notice-error notice-inline" role="alert">Chat {chat_id} was not found.</div>
    <a href="/welcome" class="{}">Back to start</a>
</main>"#,
        ButtonVariant::Outline.classes()
    )
}

fn chat_header(title: &str) -> String {
    format!(
        r#"<header class="chat-header">
    <form hx-post="/actions/back" hx-swap="none"><button type="submit" class="{ghost}" aria-label="Back">{BACK_ICON}</button></form>
    <h1 id="chat-title" class="chat-title">{title}</h1>
    <a href="/settings" class="{ghost}" aria-label="Settings">{SETTINGS_ICON}</a>
</header>"#,
        ghost = ButtonVariant::Ghost.classes(),
        title = escape(title),
    )
}

/// The chat title as an out-of-band replacement, after a rename.
pub fn chat_title_oob(title: &str) -> String {
    format!(
        r#"<h1 id="chat-title" class="chat-title" hx-swap-oob="true">{}</h1>"#,
        escape(title)
    )
}

/// Changes whenever the rendered list would change.
pub fn list_version(chat: &Chat, is_typing: bool) -> String {
    let extras: usize = chat
        .messages
        .iter()
        .map(|m| m.citations.len() + m.follow_ups.len())
        .sum();
    format!("{}.{}.{}", chat.messages.len(), extras, u8::from(is_typing))
}

/// The polled message list.
///
/// The poll carries the version it was rendered from; the server answers
/// 204 while nothing changed, so open citations stay open.
pub fn message_list(chat: &Chat, list: ListContext<'_>) -> String {
    let mut bubbles = String::new();
    for message in &chat.messages {
        bubbles.push_str(&message_bubble(chat.id, message, list));
    }
    if list.is_typing {
        bubbles.push_str(TYPING_INDICATOR);
    }
    format!(
        r#"<section id="messages" class="message-list" aria-live="polite" hx-get="/fragments/chats/{id}/messages?v={version}" hx-trigger="{POLL_INTERVAL}" hx-swap="outerHTML">{bubbles}</section>"#,
        id = chat.id,
        version = list_version(chat, list.is_typing),
    )
}

/// Stands in for the list after a failed read and keeps polling until a
/// read succeeds.
pub fn message_list_error(chat_id: ChatId, text: &str) -> String {
    format!(
        r#"<section id="messages" class="message-list" hx-get="/fragments/chats/{chat_id}/messages" hx-trigger="{POLL_INTERVAL}" hx-swap="outerHTML">{}</section>"#,
        inline_error(text)
    )
}

/// The message list as an out-of-band replacement.
pub fn message_list_oob(chat: &Chat, list: ListContext<'_>) -> String {
    message_list(chat, list).replacen("<section ", r#"<section hx-swap-oob="true" "#, 1)
}

const TYPING_INDICATOR: &str = r#"<div class="typing-indicator" role="status" aria-label="Assistant is typing"><span class="typing-dot"></span><span class="typing-dot"></span><span class="typing-dot"></span></div>"#;

/// One message. User text is shown verbatim; assistant text is rendered as
/// markdown with its citations and follow-up chips.
pub fn message_bubble(chat_id: ChatId, message: &Message, list: ListContext<'_>) -> String {
    if message.is_user() {
        return format!(
            r#"<article class="message message-user" data-message-id="{}"><p class="message-text">{}</p></article>"#,
            message.id,
            escape(&message.content)
        );
    }

    let rendered = render(&message.content);
    let mut html = rendered.html;
    for block in &rendered.code_blocks {
        if list.copies.is_copied(message.id, &block.id) {
            let idle = format!(
                r#"<span class="copy-icon" data-id="{}">Copy</span>"#,
                block.id
            );
            html = html.replacen(
                &idle,
                &copy_label(message.id, &block.id, true, list.copy_feedback_ms),
                1,
            );
        }
    }

    format!(
        r#"<article class="message message-assistant" data-message-id="{id}"><div class="message-content markdown">{html}</div>{citations}{follow_ups}</article>"#,
        id = message.id,
        citations = citations(&message.citations),
        follow_ups = follow_ups(chat_id, &message.follow_ups),
    )
}

/// Copy button label. While copied it asks the server again once the
/// feedback window has passed.
pub fn copy_label(message_id: MessageId, code_id: &str, copied: bool, feedback_ms: u64) -> String {
    let code_id = escape(code_id);
    if copied {
        format!(
            r#"<span class="copy-icon copied" data-id="{code_id}" hx-get="/fragments/copy/{message_id}/{code_id}" hx-trigger="load delay:{feedback_ms}ms" hx-swap="outerHTML">Copied!</span>"#
        )
    } else {
        format!(r#"<span class="copy-icon" data-id="{code_id}">Copy</span>"#)
    }
}

fn citations(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<div class="citations">"#);
    for citation in citations {
        let _ = write!(
            html,
            r#"<details class="citation"><summary class="citation-badge">[{id}]</summary><div class="citation-body"><p class="citation-reference">[{id}] {reference}</p><p class="citation-details">{details}</p></div></details>"#,
            id = citation.id,
            reference = escape(&citation.reference),
            details = escape(&citation.details),
        );
    }
    html.push_str("</div>");
    html
}

fn follow_ups(chat_id: ChatId, follow_ups: &[FollowUp]) -> String {
    if follow_ups.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        r#"<div class="follow-ups"><p class="follow-ups-heading">Follow-up questions</p>"#,
    );
    for follow_up in follow_ups {
        let question = escape(&follow_up.question);
        let _ = write!(
            html,
            r#"<form hx-post="/actions/chats/{chat_id}/follow-ups" hx-swap="none"><input type="hidden" name="question" value="{question}"><button type="submit" class="follow-up-chip">{question}</button></form>"#,
        );
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::Role;

    fn sample_chat() -> Chat {
        Chat {
            id: 7,
            title: "Fever <3".to_string(),
            pinned: false,
            messages: vec![
                Message {
                    id: 1,
                    role: Role::User,
                    content: "**not bold** <i>".to_string(),
                    citations: vec![],
                    follow_ups: vec![],
                },
                Message {
                    id: 2,
                    role: Role::Assistant,
                    content: "Use **paracetamol**.\n\n```\n15 mg/kg\n```".to_string(),
                    citations: vec![Citation {
                        id: 1,
                        reference: "Nelson ch. 202".to_string(),
                        details: "Fever without a focus".to_string(),
                    }],
                    follow_ups: vec![FollowUp {
                        id: 1,
                        question: "Max \"daily\" dose?".to_string(),
                    }],
                },
            ],
        }
    }

    fn context(copies: &CopyTracker, is_typing: bool) -> ListContext<'_> {
        ListContext {
            is_typing,
            copies,
            copy_feedback_ms: 2000,
        }
    }

    #[test]
    fn test_user_text_is_not_rendered_as_markdown() {
        let copies = CopyTracker::new();
        let chat = sample_chat();
        let html = message_bubble(chat.id, &chat.messages[0], context(&copies, false));
        assert!(html.contains("**not bold** &lt;i&gt;"));
        assert!(!html.contains("<strong"));
    }

    #[test]
    fn test_assistant_bubble_has_citations_and_chips() {
        let copies = CopyTracker::new();
        let chat = sample_chat();
        let html = message_bubble(chat.id, &chat.messages[1], context(&copies, false));
        assert!(html.contains(r#"<strong class="markdown-bold">paracetamol</strong>"#));
        assert!(html.contains(r#"<summary class="citation-badge">[1]</summary>"#));
        assert!(html.contains("[1] Nelson ch. 202"));
        assert!(html.contains(r#"hx-post="/actions/chats/7/follow-ups""#));
        assert!(html.contains(r#"value="Max &quot;daily&quot; dose?""#));
        assert!(html.contains(">Copy</span>"));
    }

    #[tokio::test]
    async fn test_copied_block_shows_feedback() {
        let copies = CopyTracker::new();
        copies.mark(2, "code-0", Duration::from_secs(2));
        let chat = sample_chat();
        let html = message_bubble(chat.id, &chat.messages[1], context(&copies, false));
        assert!(html.contains(">Copied!</span>"));
        assert!(html.contains(r#"hx-get="/fragments/copy/2/code-0""#));
    }

    #[test]
    fn test_typing_indicator_and_version() {
        let copies = CopyTracker::new();
        let chat = sample_chat();
        let idle = message_list(&chat, context(&copies, false));
        let typing = message_list(&chat, context(&copies, true));
        assert!(!idle.contains("typing-indicator"));
        assert!(typing.contains("typing-indicator"));
        assert!(idle.contains("?v=2.2.0"));
        assert!(typing.contains("?v=2.2.1"));
    }

    #[test]
    fn test_page_escapes_title() {
        let copies = CopyTracker::new();
        let html = chat_page(&sample_chat(), Mode::Academic, "", context(&copies, false));
        assert!(html.contains("Fever &lt;3"));
        assert!(html.contains(r#"hx-post="/actions/chats/7/messages""#));
        assert!(html.contains(r#"hx-post="/actions/back""#));
    }
}
