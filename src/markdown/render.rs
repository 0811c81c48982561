//! Ordered rewrite pipeline from assistant markdown to sanitized HTML.
//!
//! Every stage rewrites the whole document as one string. Stage order is
//! significant: later patterns must not re-match markup produced earlier, and
//! code has to be lifted out before anything else touches the text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::code_blocks::{CodeBlockRecord, CodeBlockRegistry, TOKEN_CLOSE, TOKEN_OPEN};
use super::escape::{escape, unescape};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static FENCE: LazyLock<Regex> = LazyLock::new(|| re(r"(?s)```([\w+#.\-]+)?\n(.*?)```"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| re(r"`([^`]+)`"));
static LINK_SOURCE: LazyLock<Regex> = LazyLock::new(|| re(r"\[([^\]]+)\]\(([^)\s]+)\)"));
static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?m)^(\|.+\|)\n(\|[-:| \t]+\|)\n((?:\|.+\|\n?)+)")
});
static H3: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^### (.+)$"));
static H2: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^## (.+)$"));
static H1: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^# (.+)$"));
static BOLD_STARS: LazyLock<Regex> = LazyLock::new(|| re(r"\*\*(.+?)\*\*"));
static BOLD_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| re(r"__(.+?)__"));
static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| re(r"\*([^*\s].*?)\*"));
static ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| re(r"_([^_\s].*?)_"));
static BULLET_STAR: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\* (.+)$"));
static BULLET_DASH: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^- (.+)$"));
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^\d+\. (.+)$"));
static UL_RUN: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?:<li class="markdown-li">.*</li>\n?)+"#));
static OL_RUN: LazyLock<Regex> =
    LazyLock::new(|| re(r#"(?:<li class="markdown-li-ordered">.*</li>\n?)+"#));
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^&gt; (.+)$"));
static RULE: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^(?:---|\*\*\*)$"));
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    re(&format!(
        r"\[([^\]]+)\]\({TOKEN_OPEN}u(\d+){TOKEN_CLOSE}\)"
    ))
});

const BR: &str = "<br class=\"markdown-br\" />";

/// Output of a single [`render`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Sanitized HTML.
    pub html: String,
    /// Fenced code blocks in id order.
    pub code_blocks: Vec<CodeBlockRecord>,
}

/// Render markdown source into sanitized HTML.
///
/// Never fails: unclosed fences and unmatched delimiters stay as literal,
/// escaped text.
///
/// # Example
///
/// ```rust
/// use nelson_gpt::markdown::render;
///
/// let out = render("**Dose** by weight");
/// assert_eq!(out.html, "<strong class=\"markdown-bold\">Dose</strong> by weight");
/// assert!(out.code_blocks.is_empty());
/// ```
#[must_use]
pub fn render(source: &str) -> Rendered {
    let mut registry = CodeBlockRegistry::new();

    let text: String = source
        .replace("\r\n", "\n")
        .chars()
        .filter(|ch| *ch != TOKEN_OPEN && *ch != TOKEN_CLOSE)
        .collect();

    // 1. fenced code, then escape everything that is left exactly once
    let text = FENCE
        .replace_all(&text, |caps: &Captures| {
            let language = caps.get(1).map(|m| m.as_str());
            registry.push_block(&caps[2], language)
        })
        .into_owned();
    let text = escape(&text);

    // 2. inline code; link targets are parked too so emphasis cannot split them
    let text = INLINE_CODE
        .replace_all(&text, |caps: &Captures| {
            registry.push_inline(format!("<code class=\"inline-code\">{}</code>", &caps[1]))
        })
        .into_owned();
    let mut urls: Vec<String> = Vec::new();
    let text = LINK_SOURCE
        .replace_all(&text, |caps: &Captures| {
            urls.push(caps[2].to_string());
            format!("[{}]({TOKEN_OPEN}u{}{TOKEN_CLOSE})", &caps[1], urls.len() - 1)
        })
        .into_owned();

    // 3. tables
    let text = TABLE.replace_all(&text, render_table).into_owned();

    // 4. headers, longest marker first
    let text = H3.replace_all(&text, "<h3 class=\"markdown-h3\">${1}</h3>");
    let text = H2.replace_all(&text, "<h2 class=\"markdown-h2\">${1}</h2>");
    let text = H1.replace_all(&text, "<h1 class=\"markdown-h1\">${1}</h1>");

    // 5-6. emphasis
    let text = BOLD_STARS.replace_all(&text, "<strong class=\"markdown-bold\">${1}</strong>");
    let text =
        BOLD_UNDERSCORES.replace_all(&text, "<strong class=\"markdown-bold\">${1}</strong>");
    let text = ITALIC_STAR.replace_all(&text, "<em class=\"markdown-italic\">${1}</em>");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "<em class=\"markdown-italic\">${1}</em>");

    // 7. lists
    let text = BULLET_STAR.replace_all(&text, "<li class=\"markdown-li\">${1}</li>");
    let text = BULLET_DASH.replace_all(&text, "<li class=\"markdown-li\">${1}</li>");
    let text = NUMBERED.replace_all(&text, "<li class=\"markdown-li-ordered\">${1}</li>");
    let text = UL_RUN.replace_all(&text, |caps: &Captures| {
        format!("<ul class=\"markdown-ul\">{}</ul>", caps[0].replace('\n', ""))
    });
    let text = OL_RUN.replace_all(&text, |caps: &Captures| {
        format!("<ol class=\"markdown-ol\">{}</ol>", caps[0].replace('\n', ""))
    });

    // 8-9. block markers
    let text = BLOCKQUOTE.replace_all(
        &text,
        "<blockquote class=\"markdown-blockquote\">${1}</blockquote>",
    );
    let text = RULE.replace_all(&text, "<hr class=\"markdown-hr\" />");

    // 10. links
    let text = LINK
        .replace_all(&text, |caps: &Captures| {
            let label = &caps[1];
            let url = caps[2]
                .parse::<usize>()
                .ok()
                .and_then(|index| urls.get(index))
                .map_or("", String::as_str);
            if is_unsafe_url(url) {
                format!("[{label}]({url})")
            } else {
                format!(
                    "<a href=\"{url}\" class=\"markdown-link\" target=\"_blank\" \
                     rel=\"noopener noreferrer\">{label}</a>"
                )
            }
        })
        .into_owned();

    // 11. line breaks
    let text = text
        .replace("\n\n", &format!("{BR}{BR}"))
        .replace('\n', BR);

    // 12. put code back
    let (html, code_blocks) = registry.restore(text);
    Rendered { html, code_blocks }
}

fn render_table(caps: &Captures) -> String {
    let header: String = cells(&caps[1])
        .map(|cell| format!("<th class=\"table-header\">{cell}</th>"))
        .collect();
    let body: String = caps[3]
        .trim()
        .lines()
        .map(|row| {
            let row_cells: String = cells(row)
                .map(|cell| format!("<td class=\"table-cell\">{cell}</td>"))
                .collect();
            format!("<tr class=\"table-row\">{row_cells}</tr>")
        })
        .collect();
    format!(
        "<div class=\"table-wrapper\"><table class=\"markdown-table\">\
         <thead><tr>{header}</tr></thead><tbody>{body}</tbody></table></div>"
    )
}

/// Split a pipe row, dropping cells that are empty after trimming.
fn cells(row: &str) -> impl Iterator<Item = &str> {
    row.split('|').map(str::trim).filter(|cell| !cell.is_empty())
}

/// Schemes that execute or embed content instead of navigating.
fn is_unsafe_url(escaped_url: &str) -> bool {
    let normalized: String = unescape(escaped_url)
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && !ch.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_with_language() {
        let out = render("```js\nconst x = 1;\n```");
        assert_eq!(out.code_blocks.len(), 1);
        assert_eq!(out.code_blocks[0].language, "js");
        assert_eq!(out.code_blocks[0].code, "const x = 1;");
        assert!(out.html.contains("<code class=\"language-js\">const x = 1;</code>"));
    }

    #[test]
    fn test_fence_without_language_defaults_to_text() {
        let out = render("```\nplain\n```");
        assert_eq!(out.code_blocks[0].language, "text");
        assert!(out.html.contains("<span class=\"code-block-language\">text</span>"));
    }

    #[test]
    fn test_fence_content_not_transformed() {
        let out = render("```md\n# not a header\n**not bold**\n- not a list\n| a | b |\n```");
        assert!(!out.html.contains("<h1"));
        assert!(!out.html.contains("<strong"));
        assert!(!out.html.contains("<li"));
        assert!(!out.html.contains("<table"));
        assert_eq!(
            out.code_blocks[0].code,
            "# not a header\n**not bold**\n- not a list\n| a | b |"
        );
    }

    #[test]
    fn test_unclosed_fence_is_literal() {
        let out = render("```js\nlet a = 1;");
        assert!(out.code_blocks.is_empty());
        assert!(out.html.contains("let a = 1;"));
    }

    #[test]
    fn test_inline_code_escaped() {
        let out = render("use `<div>` here");
        assert_eq!(
            out.html,
            "use <code class=\"inline-code\">&lt;div&gt;</code> here"
        );
    }

    #[test]
    fn test_inline_code_keeps_underscores() {
        let out = render("call `snake_case_name` now");
        assert!(out.html.contains("<code class=\"inline-code\">snake_case_name</code>"));
        assert!(!out.html.contains("<em"));
    }

    #[test]
    fn test_headers_by_level() {
        let out = render("### three\n## two\n# one");
        assert!(out.html.contains("<h3 class=\"markdown-h3\">three</h3>"));
        assert!(out.html.contains("<h2 class=\"markdown-h2\">two</h2>"));
        assert!(out.html.contains("<h1 class=\"markdown-h1\">one</h1>"));
    }

    #[test]
    fn test_header_needs_space() {
        let out = render("#hashtag");
        assert_eq!(out.html, "#hashtag");
    }

    #[test]
    fn test_bold_both_delimiters() {
        let out = render("**a** and __b__");
        assert_eq!(
            out.html,
            "<strong class=\"markdown-bold\">a</strong> and <strong class=\"markdown-bold\">b</strong>"
        );
    }

    #[test]
    fn test_bold_is_non_greedy() {
        let out = render("**a** x **b**");
        assert_eq!(out.html.matches("<strong").count(), 2);
    }

    #[test]
    fn test_italic_both_delimiters() {
        let out = render("*a* and _b_");
        assert_eq!(
            out.html,
            "<em class=\"markdown-italic\">a</em> and <em class=\"markdown-italic\">b</em>"
        );
    }

    #[test]
    fn test_italic_not_opened_by_whitespace() {
        let out = render("2 * 3 * 4");
        assert_eq!(out.html, "2 * 3 * 4");
    }

    #[test]
    fn test_unordered_list_wrapped_once() {
        let out = render("* one\n- two\n* three");
        assert_eq!(
            out.html,
            "<ul class=\"markdown-ul\"><li class=\"markdown-li\">one</li>\
             <li class=\"markdown-li\">two</li><li class=\"markdown-li\">three</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list_drops_numerals() {
        let out = render("1. first\n2. second");
        assert_eq!(
            out.html,
            "<ol class=\"markdown-ol\"><li class=\"markdown-li-ordered\">first</li>\
             <li class=\"markdown-li-ordered\">second</li></ol>"
        );
    }

    #[test]
    fn test_list_item_with_emphasis() {
        let out = render("* give *fluids*");
        assert_eq!(
            out.html,
            "<ul class=\"markdown-ul\"><li class=\"markdown-li\">give \
             <em class=\"markdown-italic\">fluids</em></li></ul>"
        );
    }

    #[test]
    fn test_separate_runs_get_separate_lists() {
        let out = render("- a\n\ntext\n\n- b");
        assert_eq!(out.html.matches("<ul class=\"markdown-ul\">").count(), 2);
    }

    #[test]
    fn test_blockquote() {
        let out = render("> quoted");
        assert_eq!(
            out.html,
            "<blockquote class=\"markdown-blockquote\">quoted</blockquote>"
        );
    }

    #[test]
    fn test_rules() {
        assert_eq!(render("---").html, "<hr class=\"markdown-hr\" />");
        assert_eq!(render("***").html, "<hr class=\"markdown-hr\" />");
    }

    #[test]
    fn test_link() {
        let out = render("[AAP](https://aap.org/guidelines_2024)");
        assert_eq!(
            out.html,
            "<a href=\"https://aap.org/guidelines_2024\" class=\"markdown-link\" \
             target=\"_blank\" rel=\"noopener noreferrer\">AAP</a>"
        );
    }

    #[test]
    fn test_script_link_not_linked() {
        let out = render("[click](javascript:alert(1)");
        assert!(!out.html.contains("<a "));

        let out = render("[click](JavaScript:void)");
        assert!(!out.html.contains("<a "));
        assert!(out.html.contains("[click](JavaScript:void)"));
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            render("a\nb\n\nc").html,
            format!("a{BR}b{BR}{BR}c")
        );
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(render("a\r\nb").html, format!("a{BR}b"));
    }

    #[test]
    fn test_table_empty_cells_dropped() {
        let out = render("| a || b |\n|---|---|\n| 1 | | 2 |");
        assert!(out.html.contains(
            "<thead><tr><th class=\"table-header\">a</th><th class=\"table-header\">b</th></tr></thead>"
        ));
        assert!(out.html.contains(
            "<tr class=\"table-row\"><td class=\"table-cell\">1</td><td class=\"table-cell\">2</td></tr>"
        ));
    }

    #[test]
    fn test_forged_placeholder_removed() {
        let out = render("x \u{E000}c0\u{E001} y");
        assert_eq!(out.html, "x c0 y");
    }

    #[test]
    fn test_markup_escaped_outside_code() {
        let out = render("<img src=x onerror=alert(1)> & more");
        assert_eq!(out.html, "&lt;img src=x onerror=alert(1)&gt; &amp; more");
    }
}
