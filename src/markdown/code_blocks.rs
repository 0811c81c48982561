//! Per-render storage for fragments lifted out of the working text.
//!
//! Fenced code blocks are pulled out before any other stage runs and put back
//! at the very end, so markdown syntax inside them is never rewritten. The
//! registry hands out sequential ids and the placeholder tokens that stand in
//! for each block while the rest of the pipeline runs.

use serde::Serialize;

use super::escape::escape;

/// Opens a placeholder token. Private-use code point, stripped from input.
pub(crate) const TOKEN_OPEN: char = '\u{E000}';
/// Closes a placeholder token. Private-use code point, stripped from input.
pub(crate) const TOKEN_CLOSE: char = '\u{E001}';

/// Language recorded when a fence carries no tag.
pub const DEFAULT_LANGUAGE: &str = "text";

/// A fenced code block extracted during one render call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlockRecord {
    /// Sequential id within the render call (`code-0`, `code-1`, ...).
    pub id: String,
    /// Trimmed code text, unescaped.
    pub code: String,
    /// Language tag, `text` when the fence had none.
    pub language: String,
}

impl CodeBlockRecord {
    /// Render the display unit: language header, copy button, code body.
    #[must_use]
    pub fn to_html(&self) -> String {
        let id = &self.id;
        let language = escape(&self.language);
        let code = escape(&self.code);
        format!(
            "<div class=\"code-block-wrapper\" data-code-id=\"{id}\">\
             <div class=\"code-block-header\">\
             <span class=\"code-block-language\">{language}</span>\
             <button type=\"button\" class=\"code-block-copy\" data-code=\"{code}\" data-id=\"{id}\">\
             <span class=\"copy-icon\" data-id=\"{id}\">Copy</span>\
             </button>\
             </div>\
             <pre class=\"code-block\"><code class=\"language-{language}\">{code}</code></pre>\
             </div>"
        )
    }
}

/// Registry owned by a single render call.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockRegistry {
    blocks: Vec<CodeBlockRecord>,
    inline: Vec<String>,
}

impl CodeBlockRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a fenced block and return its placeholder token.
    pub(crate) fn push_block(&mut self, code: &str, language: Option<&str>) -> String {
        let index = self.blocks.len();
        let language = language
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);
        self.blocks.push(CodeBlockRecord {
            id: format!("code-{index}"),
            code: code.trim().to_string(),
            language: language.to_string(),
        });
        block_token(index)
    }

    /// Park an already rendered inline code element and return its token.
    pub(crate) fn push_inline(&mut self, html: String) -> String {
        let index = self.inline.len();
        self.inline.push(html);
        format!("{TOKEN_OPEN}i{index}{TOKEN_CLOSE}")
    }

    /// Substitute every token with its rendered HTML and hand back the records.
    pub(crate) fn restore(self, mut html: String) -> (String, Vec<CodeBlockRecord>) {
        for (index, span) in self.inline.iter().enumerate() {
            html = html.replace(&format!("{TOKEN_OPEN}i{index}{TOKEN_CLOSE}"), span);
        }
        for (index, block) in self.blocks.iter().enumerate() {
            html = html.replace(&block_token(index), &block.to_html());
        }
        (html, self.blocks)
    }
}

fn block_token(index: usize) -> String {
    format!("{TOKEN_OPEN}c{index}{TOKEN_CLOSE}")
}
