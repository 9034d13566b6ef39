//! Per-document highlight snippets.

use hitnorm_document::{NormalDoc, display_string};
use serde_json::{Map, Value};
use tracing::trace;

use crate::escape_html;

/// Number of characters kept when a field has no engine highlighting.
pub const DEFAULT_SNIPPET_LENGTH: usize = 200;

/// Snippets computed for one pair of highlight tags.
#[derive(Debug, Clone)]
struct SnippetCache {
    /// Opening tag the snippets were built with.
    pre: String,
    /// Closing tag the snippets were built with.
    post: String,
    /// Field name → snippet text, or the structured value passed through.
    snippets: Map<String, Value>,
}

/// A normalized document with highlighting layered on.
///
/// Works over anything that can lend a [`NormalDoc`], so callers can wrap an owned
/// document, a reference, or a shared `Arc`.
#[derive(Debug, Clone)]
pub struct HighlightedDoc<D = NormalDoc> {
    /// The wrapped document.
    doc: D,
    /// Fallback snippet length in characters.
    snippet_length: usize,
    /// Snippets from the most recent `sub_snippets` call.
    cache: Option<SnippetCache>,
}

impl<D: AsRef<NormalDoc>> HighlightedDoc<D> {
    /// Wraps a document.
    pub fn new(doc: D) -> Self {
        Self {
            doc,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
            cache: None,
        }
    }

    /// Sets how many characters of a field are kept when falling back to plain text.
    pub fn with_snippet_length(mut self, length: usize) -> Self {
        self.snippet_length = length;
        self.cache = None;
        self
    }

    /// The wrapped document.
    pub fn doc(&self) -> &NormalDoc {
        self.doc.as_ref()
    }

    /// Unwraps the document.
    pub fn into_inner(self) -> D {
        self.doc
    }

    /// Returns the highlighted title, or `None` if the document has no title.
    pub fn highlighted_title(&self, pre: &str, post: &str) -> Option<String> {
        let doc = self.doc.as_ref();
        let title = doc.title.as_deref().filter(|title| !title.is_empty())?;
        Some(self.snippet(&doc.title_field, title, pre, post))
    }

    /// Returns one snippet per sub field.
    ///
    /// Objects (and nulls) pass through unchanged. The result is memoized and only
    /// recomputed when `pre` or `post` differ from the previous call.
    pub fn sub_snippets(&mut self, pre: &str, post: &str) -> &Map<String, Value> {
        let cache = match self.cache.take() {
            Some(cache) if cache.pre == pre && cache.post == post => cache,
            _ => {
                trace!(id = %self.doc.as_ref().id, pre, post, "building sub snippets");
                SnippetCache {
                    pre: pre.to_string(),
                    post: post.to_string(),
                    snippets: self.build_snippets(pre, post),
                }
            }
        };
        &self.cache.insert(cache).snippets
    }

    /// Computes snippets for every sub field.
    fn build_snippets(&self, pre: &str, post: &str) -> Map<String, Value> {
        self.doc
            .as_ref()
            .subs
            .iter()
            .map(|(field, value)| {
                let snippet = match value {
                    Value::Object(_) | Value::Null => value.clone(),
                    Value::String(text) => Value::String(self.snippet(field, text, pre, post)),
                    other => Value::String(self.snippet(field, &display_string(other), pre, post)),
                };
                (field.clone(), snippet)
            })
            .collect()
    }

    /// Asks the hit for a highlight, falling back to an escaped prefix of `value`.
    fn snippet(&self, field: &str, value: &str, pre: &str, post: &str) -> String {
        let doc = self.doc.as_ref();
        doc.hit()
            .highlight(&doc.id, field, pre, post)
            .filter(|snippet| !snippet.is_empty())
            .unwrap_or_else(|| {
                let prefix: String = value.chars().take(self.snippet_length).collect();
                escape_html(&prefix)
            })
    }
}

impl<D: AsRef<NormalDoc>> AsRef<NormalDoc> for HighlightedDoc<D> {
    fn as_ref(&self) -> &NormalDoc {
        self.doc.as_ref()
    }
}
