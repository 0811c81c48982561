//! Splash screen.

use std::fmt::Write as _;

pub const APP_NAME: &str = "Nelson-GPT";
pub const SPLASH_TAGLINE: &str = "Pediatric Knowledge at Your Finger Tips";

/// Delay between revealed letters of the app name.
pub const LETTER_DELAY_MS: u64 = 150;

/// The app name revealed one letter at a time, then the tagline; after
/// `splash_ms` the welcome screen replaces the shell.
pub fn splash_page(splash_ms: u64) -> String {
    let mut letters = String::new();
    let mut tagline_delay = 0;
    for (index, letter) in (0u64..).zip(APP_NAME.chars()) {
        let delay = index * LETTER_DELAY_MS;
        let _ = write!(
            letters,
            r#"<span class="splash-letter" style="animation-delay: {delay}ms">{letter}</span>"#,
        );
        tagline_delay = delay + LETTER_DELAY_MS;
    }

    format!(
        r##"<main class="splash" hx-get="/welcome" hx-trigger="load delay:{splash_ms}ms" hx-select="#app-shell" hx-target="#app-shell" hx-swap="outerHTML" hx-push-url="true">
    <h1 class="splash-title" aria-label="{APP_NAME}">{letters}</h1>
    <p class="splash-tagline" style="animation-delay: {tagline_delay}ms">{SPLASH_TAGLINE}</p>
</main>"##
    )
}
