//! Highlight and snippet extraction for hitnorm.
//!
//! [`HighlightedDoc`] layers highlighting onto a [`NormalDoc`]: a highlighted title and
//! one display snippet per sub field. Snippets come from the engine's highlighting when
//! it has any and otherwise fall back to an escaped prefix of the field value.

#![warn(missing_docs)]

mod snippet;

pub use hitnorm_document::join_fragments;
pub use snippet::{DEFAULT_SNIPPET_LENGTH, HighlightedDoc};

/// Escapes text for safe inclusion in HTML.
///
/// Replaces `& < > " ' /` with entity references. Every other character is copied
/// unchanged.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
