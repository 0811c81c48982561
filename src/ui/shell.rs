//! Document shell shared by every page.

use crate::markdown::escape;
use crate::models::UserSettings;

/// Lets htmx swap 4xx/5xx bodies so failed actions can deliver notices.
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true}]}"#;

/// Generate the HTML document around `content`.
///
/// The theme becomes the `<html>` class and the font size the root font
/// size, so every page reflects the saved settings.
pub fn html_shell(title: &str, settings: &UserSettings, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{theme}" style="font-size: {font_px}px">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Pediatric knowledge assistant">
    <meta name="htmx-config" content='{config}'>
    <title>{title} - Nelson-GPT</title>
    <script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"></script>
    <script defer src="/static/app.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="app-body">
    <div id="app-shell" class="app-shell">
        {content}
    </div>
    <div id="notices" class="notice-region" aria-live="polite"></div>
</body>
</html>"#,
        theme = settings.theme.as_str(),
        font_px = settings.font.root_px(),
        config = HTMX_CONFIG,
        title = escape(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FontSize, Theme};

    #[test]
    fn test_shell_applies_settings() {
        let settings = UserSettings {
            theme: Theme::Dark,
            font: FontSize::Large,
            ..UserSettings::default()
        };
        let html = html_shell("A <b>", &settings, "<p>body</p>");
        assert!(html.contains(r#"<html lang="en" class="dark" style="font-size: 18px">"#));
        assert!(html.contains("<title>A &lt;b&gt; - Nelson-GPT</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(r#"id="notices""#));
    }
}
