//! Raw search hits.
//!
//! Engine adapters hand the normalizer one [`SearchHit`] per result. The hit owns the
//! engine's source fields and answers highlight and explain lookups keyed by document id.

use std::{fmt, sync::Arc};

use serde_json::{Map, Value};

use crate::error::DocumentError;

/// Highlighting returned by an engine: document id → field → snippet or fragments.
pub type Highlighting = Map<String, Value>;

/// Explain payloads keyed by document id.
pub type ExplainMap = Map<String, Value>;

/// A raw result document as returned by a search engine adapter.
pub trait SearchHit: fmt::Debug + Send + Sync {
    /// The document's source fields.
    fn source(&self) -> &Map<String, Value>;

    /// Returns highlighted text for `field` of document `doc_id`, wrapping marked-up
    /// terms in `pre` and `post`. Returns `None` if the engine highlighted nothing.
    fn highlight(&self, doc_id: &str, field: &str, pre: &str, post: &str) -> Option<String>;

    /// Returns the raw explain payload for `doc_id`.
    ///
    /// Fails with [`DocumentError::ExplainNotSupported`] if the hit carries no explain
    /// information at all; returns `Ok(None)` if it does but not for this id.
    fn explain(&self, doc_id: &str) -> Result<Option<&Value>, DocumentError>;
}

/// Joins highlight fragments into one snippet.
///
/// Fragments that already contain markup (a `<`) are kept as-is; the rest are wrapped in
/// `pre` and `post`. Fragments are joined with a single space, in order.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S], pre: &str, post: &str) -> String {
    fragments
        .iter()
        .map(|fragment| {
            let fragment = fragment.as_ref();
            if fragment.contains('<') {
                fragment.to_string()
            } else {
                format!("{pre}{fragment}{post}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A generic search hit backed by plain JSON.
///
/// Highlighting and explain sections cover a whole response, so hits from one response
/// share them behind an [`Arc`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHit {
    /// Source fields.
    source: Map<String, Value>,
    /// Highlighting for this hit, if the engine returned any.
    highlighting: Option<Arc<Highlighting>>,
    /// Explain payloads, if the engine returned any.
    explain: Option<Arc<ExplainMap>>,
}

impl RawHit {
    /// Creates a hit from its source fields.
    pub fn new(source: Map<String, Value>) -> Self {
        Self {
            source,
            highlighting: None,
            explain: None,
        }
    }

    /// Creates a hit from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(source) => Ok(Self::new(source)),
            other => Err(DocumentError::InvalidHit {
                found: json_type(&other),
            }),
        }
    }

    /// Attaches engine highlighting.
    pub fn with_highlighting(mut self, highlighting: impl Into<Arc<Highlighting>>) -> Self {
        self.highlighting = Some(highlighting.into());
        self
    }

    /// Attaches explain payloads.
    pub fn with_explain(mut self, explain: impl Into<Arc<ExplainMap>>) -> Self {
        self.explain = Some(explain.into());
        self
    }

    /// The attached highlighting section.
    pub fn highlighting(&self) -> Option<&Arc<Highlighting>> {
        self.highlighting.as_ref()
    }

    /// The attached explain section.
    pub fn explain_map(&self) -> Option<&Arc<ExplainMap>> {
        self.explain.as_ref()
    }
}

impl SearchHit for RawHit {
    fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    fn highlight(&self, doc_id: &str, field: &str, pre: &str, post: &str) -> Option<String> {
        let value = self.highlighting.as_ref()?.get(doc_id)?.get(field)?;
        match value {
            Value::String(snippet) if !snippet.is_empty() => Some(snippet.clone()),
            Value::Array(fragments) if !fragments.is_empty() => {
                let fragments: Vec<String> = fragments
                    .iter()
                    .map(|f| match f {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                Some(join_fragments(&fragments, pre, post))
            }
            _ => None,
        }
    }

    fn explain(&self, doc_id: &str) -> Result<Option<&Value>, DocumentError> {
        let explain = self
            .explain
            .as_ref()
            .ok_or(DocumentError::ExplainNotSupported)?;
        Ok(explain.get(doc_id))
    }
}

/// Names the JSON type of a value for error messages.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
