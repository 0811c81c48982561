//! HTML entity escaping.

/// Escape text for inclusion in HTML text content or a quoted attribute.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with their entity forms. Apply it
/// once per user-supplied fragment; escaping already-escaped output turns
/// `&lt;` into `&amp;lt;`.
///
/// # Example
///
/// ```rust
/// use nelson_gpt::markdown::escape;
///
/// assert_eq!(escape("<b>\"hi\" & 'bye'</b>"), "&lt;b&gt;&quot;hi&quot; &amp; &#39;bye&#39;&lt;/b&gt;");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Reverse of [`escape`] for the five entities it produces.
///
/// Used when recovering the visible text of rendered output.
#[must_use]
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_characters() {
        assert_eq!(
            escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape("Fever in infants"), "Fever in infants");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_ampersand_escaped_once() {
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        let text = "if a < b && c > \"d\" then 'e'";
        assert_eq!(unescape(&escape(text)), text);
    }
}
