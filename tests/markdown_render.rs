//! Rendering properties of assistant messages as seen through the public API.

use nelson_gpt::markdown::{escape, render};

const HOSTILE: &[&str] = &[
    "<script>alert(1)</script>",
    "<img src=x onerror=alert(1)>",
    "**<b>bold</b>**",
    "[click](javascript:alert(1))",
    "| <a> | b |\n|---|---|\n| <iframe> | d |",
    "```html\n<script>x</script>\n```",
    "`<svg onload=1>`",
    "> <style>body{}</style>",
    "[x](http://a\n onmouseover=alert(1) )",
    "[x](https://a.org/\n\" onclick=\"alert(1))",
];

#[test]
fn test_no_raw_tags_survive() {
    for source in HOSTILE {
        let html = render(source).html;
        for tag in ["<script", "<img", "<iframe", "<svg", "<style", "<b>", "<a>"] {
            assert!(!html.contains(tag), "{tag} leaked from {source:?}: {html}");
        }
        assert!(!html.contains("href=\"javascript:"), "{html}");
        for href in html.split("href=\"").skip(1) {
            let value = href.split('"').next().unwrap_or_default();
            assert!(!value.contains('<'), "markup inside href from {source:?}: {html}");
        }
    }
}

#[test]
fn test_link_target_stops_at_whitespace() {
    let html = render("[x](http://a\n onmouseover=alert(1) )").html;
    assert!(!html.contains("<a "), "{html}");
    assert!(html.starts_with("[x](http://a<br class=\"markdown-br\" /> onmouseover=alert(1) )"));
}

#[test]
fn test_render_is_deterministic() {
    let source = "# Fever\n\n- paracetamol\n- ibuprofen\n\n```text\n15 mg/kg\n```\n\n```\nq6h\n```";
    let first = render(source);
    let second = render(source);
    assert_eq!(first, second);
    let ids: Vec<&str> = first.code_blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["code-0", "code-1"]);
}

#[test]
fn test_code_ids_restart_each_call() {
    let _ = render("```\na\n```\n```\nb\n```");
    let out = render("```\nc\n```");
    assert_eq!(out.code_blocks.len(), 1);
    assert_eq!(out.code_blocks[0].id, "code-0");
}

#[test]
fn test_escape_is_applied_once() {
    let out = render("a & b < c");
    assert_eq!(out.html, "a &amp; b &lt; c");
    assert_eq!(escape("&amp;"), "&amp;amp;");
}

#[test]
fn test_copy_payload_is_raw_code() {
    let out = render("```sh\necho \"<ok>\" && exit\n```");
    assert_eq!(out.code_blocks[0].code, "echo \"<ok>\" && exit");
    assert_eq!(out.code_blocks[0].language, "sh");
    assert!(out.html.contains("data-code=\"echo &quot;&lt;ok&gt;&quot; &amp;&amp; exit\""));
}

#[test]
fn test_clinical_answer_layout() {
    let source = "## Dosing\n\n1. Weigh the child\n2. Give **15 mg/kg**\n\nSee [guideline](https://example.org/fever).";
    let html = render(source).html;
    assert!(html.contains("<h2 class=\"markdown-h2\">Dosing</h2>"));
    assert!(html.contains("<ol class=\"markdown-ol\">"));
    assert!(html.contains("<strong class=\"markdown-bold\">15 mg/kg</strong>"));
    assert!(html.contains("href=\"https://example.org/fever\""));
    assert!(html.contains("rel=\"noopener noreferrer\""));
}

fn visible_text(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            other if !in_tag => out.push(other),
            _ => {}
        }
    }
    nelson_gpt::markdown::unescape(&out)
}

#[test]
fn test_plain_text_only_escaped_and_broken() {
    let out = render("Temp 38.5 C\nrecheck in 2 h");
    assert_eq!(out.html, "Temp 38.5 C<br class=\"markdown-br\" />recheck in 2 h");
}

#[test]
fn test_bold_then_italic() {
    let html = render("**bold** and *italic*").html;
    assert_eq!(
        html,
        "<strong class=\"markdown-bold\">bold</strong> and <em class=\"markdown-italic\">italic</em>"
    );
}

#[test]
fn test_title_and_body() {
    let html = render("# Title\n\nBody").html;
    assert_eq!(
        html,
        "<h1 class=\"markdown-h1\">Title</h1><br class=\"markdown-br\" /><br class=\"markdown-br\" />Body"
    );
}

#[test]
fn test_simple_table() {
    let html = render("| a | b |\n|---|---|\n| 1 | 2 |").html;
    assert!(html.contains("<th class=\"table-header\">a</th><th class=\"table-header\">b</th>"));
    assert!(html.contains(
        "<tr class=\"table-row\"><td class=\"table-cell\">1</td><td class=\"table-cell\">2</td></tr>"
    ));
    assert_eq!(html.matches("<tr class=\"table-row\">").count(), 1);
}

#[test]
fn test_visible_text_recovered() {
    for (source, visible) in [
        ("**Dose** < 4 & > 1", "Dose < 4 & > 1"),
        ("see _Nelson_ ch. \"202\"", "see Nelson ch. \"202\""),
        ("use `x<y` here", "use x<y here"),
    ] {
        assert_eq!(visible_text(&render(source).html), visible);
    }
}
