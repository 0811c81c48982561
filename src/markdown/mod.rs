//! Markdown rendering for assistant messages.
//!
//! Assistant replies arrive as markdown text and are turned into sanitized
//! HTML by a fixed sequence of pattern rewrites. There is no document tree:
//! nested constructs (a list inside a blockquote, for example) are not
//! supported, and backslash-escaped delimiters are not recognized.
//!
//! # Structure
//!
//! - [`escape`]: HTML entity escaping applied once per user fragment
//! - [`render`]: the ordered rewrite pipeline
//! - [`CodeBlockRecord`]: fenced code blocks extracted during one render call
//!
//! # Example
//!
//! ```rust
//! use nelson_gpt::markdown::render;
//!
//! let out = render("Give **10 mg/kg**.\n\n```text\nmax 4 doses/day\n```");
//! assert!(out.html.contains("<strong class=\"markdown-bold\">10 mg/kg</strong>"));
//! assert_eq!(out.code_blocks[0].id, "code-0");
//! assert_eq!(out.code_blocks[0].code, "max 4 doses/day");
//! ```

mod code_blocks;
mod escape;
mod render;

pub use code_blocks::{CodeBlockRecord, DEFAULT_LANGUAGE};
pub use escape::{escape, unescape};
pub use render::{Rendered, render};
