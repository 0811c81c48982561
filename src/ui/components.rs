//! Small HTML building blocks shared by the pages.

use std::fmt::Write as _;

use crate::markdown::escape;
use crate::models::Mode;

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Subtle ghost button.
    Ghost,
    /// Destructive action button.
    Destructive,
    /// Outline button.
    Outline,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Ghost => "btn btn-ghost",
            Self::Destructive => "btn btn-destructive",
            Self::Outline => "btn btn-outline",
        }
    }
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "notice notice-success",
            Self::Error => "notice notice-error",
        }
    }
}

/// A toast that removes itself after a few seconds.
pub fn toast(kind: NoticeKind, text: &str) -> String {
    format!(
        r#"<div class="{class}" role="status" hx-on::load="setTimeout(() => this.remove(), 4000)">{text}</div>"#,
        class = kind.class(),
        text = escape(text),
    )
}

/// A toast, appended out of band to the page's notice region.
pub fn notice(kind: NoticeKind, text: &str) -> String {
    format!(
        r#"<div id="notices" hx-swap-oob="beforeend">{}</div>"#,
        toast(kind, text)
    )
}

/// A notice rendered inline, in place of data that failed to load.
pub fn inline_error(text: &str) -> String {
    format!(
        r#"<div class="notice notice-error notice-inline" role="alert">{}</div>"#,
        escape(text)
    )
}

/// Academic/Clinical toggle. Every page renders at most one.
pub fn mode_toggle(current: Mode) -> String {
    let mut buttons = String::new();
    for mode in Mode::ALL {
        let pressed = *mode == current;
        let _ = write!(
            buttons,
            r#"<button type="submit" name="mode" value="{value}" class="{class}" aria-pressed="{pressed}">{label}</button>"#,
            value = mode.as_str(),
            class = if pressed {
                ButtonVariant::Primary.classes()
            } else {
                ButtonVariant::Ghost.classes()
            },
            label = mode.label(),
        );
    }
    format!(
        r#"<form id="mode-toggle" class="mode-toggle" hx-post="/actions/mode" hx-swap="none" role="group" aria-label="Answer mode">{buttons}</form>"#
    )
}

/// The mode toggle as an out-of-band replacement.
pub fn mode_toggle_oob(current: Mode) -> String {
    mode_toggle(current).replacen("<form ", r#"<form hx-swap-oob="true" "#, 1)
}

/// Composer used on the welcome and chat screens.
///
/// The submit button is disabled while the textarea is empty and while a
/// request is in flight, which rules out duplicate sends.
pub fn composer(action: &str, placeholder: &str) -> String {
    format!(
        r#"<form id="composer" class="composer" hx-post="{action}" hx-swap="none" hx-disabled-elt="find button[type=submit]" hx-on::after-request="if (event.detail.successful) {{ this.reset(); this.querySelector('button[type=submit]').disabled = true; }}">
    <textarea name="content" rows="1" placeholder="{placeholder}" class="composer-input" oninput="this.form.querySelector('button[type=submit]').disabled = !this.value.trim()" onkeydown="if (event.key === 'Enter' &amp;&amp; !event.shiftKey) {{ event.preventDefault(); if (this.value.trim()) this.form.requestSubmit(); }}"></textarea>
    <button type="submit" class="{button}" aria-label="Send" disabled>{icon}</button>
</form>"#,
        action = escape(action),
        placeholder = escape(placeholder),
        button = ButtonVariant::Primary.classes(),
        icon = SEND_ICON,
    )
}

pub const SEND_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="22" y1="2" x2="11" y2="13"/><polygon points="22 2 15 22 11 13 2 9 22 2"/></svg>"#;

pub const BACK_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="m15 18-6-6 6-6"/></svg>"#;

pub const PIN_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="12" y1="17" x2="12" y2="22"/><path d="M5 17h14v-1.76a2 2 0 0 0-1.11-1.79l-1.78-.9A2 2 0 0 1 15 10.76V6h1a2 2 0 0 0 0-4H8a2 2 0 0 0 0 4h1v4.76a2 2 0 0 1-1.11 1.79l-1.78.9A2 2 0 0 0 5 15.24Z"/></svg>"#;

pub const PLUS_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M5 12h14"/><path d="M12 5v14"/></svg>"#;

pub const SETTINGS_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><circle cx="12" cy="12" r="3"/><path d="M19.4 15a1.65 1.65 0 0 0 .33 1.82l.06.06a2 2 0 1 1-2.83 2.83l-.06-.06a1.65 1.65 0 0 0-1.82-.33 1.65 1.65 0 0 0-1 1.51V21a2 2 0 1 1-4 0v-.09A1.65 1.65 0 0 0 9 19.4a1.65 1.65 0 0 0-1.82.33l-.06.06a2 2 0 1 1-2.83-2.83l.06-.06A1.65 1.65 0 0 0 4.6 15a1.65 1.65 0 0 0-1.51-1H3a2 2 0 1 1 0-4h.09A1.65 1.65 0 0 0 4.6 9a1.65 1.65 0 0 0-.33-1.82l-.06-.06a2 2 0 1 1 2.83-2.83l.06.06A1.65 1.65 0 0 0 9 4.6a1.65 1.65 0 0 0 1-1.51V3a2 2 0 1 1 4 0v.09a1.65 1.65 0 0 0 1 1.51 1.65 1.65 0 0 0 1.82-.33l.06-.06a2 2 0 1 1 2.83 2.83l-.06.06A1.65 1.65 0 0 0 19.4 9a1.65 1.65 0 0 0 1.51 1H21a2 2 0 1 1 0 4h-.09a1.65 1.65 0 0 0-1.51 1Z"/></svg>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_is_escaped_and_out_of_band() {
        let html = notice(NoticeKind::Error, "<b>nope</b>");
        assert!(html.contains(r#"hx-swap-oob="beforeend""#));
        assert!(html.contains("&lt;b&gt;nope&lt;/b&gt;"));
        assert!(html.contains("notice-error"));
    }

    #[test]
    fn test_mode_toggle_marks_current() {
        let html = mode_toggle(Mode::Clinical);
        assert!(html.contains(r#"value="clinical" class="btn btn-primary" aria-pressed="true""#));
        assert!(html.contains(r#"value="academic" class="btn btn-ghost" aria-pressed="false""#));
        assert!(mode_toggle_oob(Mode::Academic).starts_with(r#"<form hx-swap-oob="true" id="mode-toggle""#));
    }

    #[test]
    fn test_composer_starts_disabled() {
        let html = composer("/actions/start", "Ask a question");
        assert!(html.contains(r#"hx-post="/actions/start""#));
        assert!(html.contains(r#"aria-label="Send" disabled"#));
        assert!(html.contains("hx-disabled-elt"));
    }
}
