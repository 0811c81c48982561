//! Welcome screen: title, tagline, mode toggle and the first composer.

use super::components::{ButtonVariant, SETTINGS_ICON, composer, mode_toggle};
use super::splash::APP_NAME;
use crate::models::Mode;

pub const WELCOME_TAGLINE: &str = "Your pediatric AI assistant";

/// Page body for `/welcome`. `sidebar` is already rendered HTML.
pub fn welcome_page(mode: Mode, sidebar: &str, notice: &str) -> String {
    format!(
        r#"<div class="layout">
    {sidebar}
    <main class="welcome">
        <header class="welcome-header">
            <h1 class="welcome-title">{APP_NAME}</h1>
            <p class="welcome-tagline">{WELCOME_TAGLINE}</p>
            <a href="/settings" class="{settings_class}" aria-label="Settings">{SETTINGS_ICON}</a>
        </header>
        {toggle}
        {notice}
        {composer}
    </main>
</div>"#,
        settings_class = ButtonVariant::Ghost.classes(),
        toggle = mode_toggle(mode),
        composer = composer("/actions/start", "Ask a pediatric question..."),
    )
}
