//! Settings panel.
//!
//! Every control posts on change by itself (no enclosing form), so a request
//! carries only the field that changed.

use super::components::{BACK_ICON, ButtonVariant};
use crate::models::{FontSize, Theme, UserSettings};

pub fn settings_page(settings: &UserSettings, notice: &str) -> String {
    let mut themes = String::new();
    for theme in Theme::ALL {
        let label = title_case(theme.as_str());
        themes.push_str(&radio("theme", theme.as_str(), &label, *theme == settings.theme));
    }

    let mut fonts = String::new();
    for font in FontSize::ALL {
        let label = format!("{} ({}px)", title_case(font.as_str()), font.root_px());
        fonts.push_str(&radio("font", font.as_str(), &label, *font == settings.font));
    }

    let checked = if settings.notifications { " checked" } else { "" };

    format!(
        r#"<main class="settings">
    <header class="settings-header">
        <a href="/welcome" class="{ghost}" aria-label="Back">{BACK_ICON}</a>
        <h1 class="settings-title">Settings</h1>
    </header>
    {notice}
    <fieldset class="settings-group"><legend>Theme</legend>{themes}</fieldset>
    <fieldset class="settings-group"><legend>Font size</legend>{fonts}</fieldset>
    <fieldset class="settings-group"><legend>Notifications</legend>
        <label class="switch"><input type="checkbox" name="notifications" value="true" role="switch"{checked} hx-post="/actions/settings" hx-trigger="change" hx-vals='{{"field": "notifications"}}' hx-swap="none"><span>Enable notifications</span></label>
    </fieldset>
</main>"#,
        ghost = ButtonVariant::Ghost.classes(),
    )
}

fn radio(name: &str, value: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label class="radio"><input type="radio" name="{name}" value="{value}"{checked} hx-post="/actions/settings" hx-trigger="change" hx-swap="none"><span>{label}</span></label>"#,
        checked = if checked { " checked" } else { "" },
    )
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_values_are_checked() {
        let settings = UserSettings {
            theme: Theme::System,
            font: FontSize::Small,
            notifications: false,
            ..UserSettings::default()
        };
        let html = settings_page(&settings, "");
        assert!(html.contains(r#"name="theme" value="system" checked"#));
        assert!(html.contains(r#"name="theme" value="light" hx-post"#));
        assert!(html.contains(r#"name="font" value="small" checked"#));
        assert!(html.contains("Small (14px)"));
        assert!(html.contains(r#"role="switch" hx-post"#));
    }
}
