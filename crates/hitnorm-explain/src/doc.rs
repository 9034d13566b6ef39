//! Explain features layered onto a normalized document.

use std::{collections::BTreeMap, sync::OnceLock};

use hitnorm_document::{DocumentError, NormalDoc, display_string};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{explanation::Explanation, vector::SparseVector};

/// One explain dimension expressed as a share of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotMatch {
    /// Dimension name, e.g. `title:rambo`.
    pub description: String,
    /// Explain text of the node that produced the dimension.
    pub metadata: Option<String>,
    /// Weight as a percentage of the reference score.
    pub percentage: f64,
}

/// Values derived from the explain payload on first access.
#[derive(Debug)]
struct ExplainState {
    /// The parsed explanation.
    explanation: Explanation,
    /// Weight per dimension.
    hot_matches: SparseVector,
    /// Explain text per dimension.
    match_details: BTreeMap<String, String>,
}

/// A normalized document with explain information layered on.
///
/// The explain payload is parsed lazily, once, on the first call to any accessor.
#[derive(Debug)]
pub struct ExplainedDoc<D = NormalDoc> {
    /// The wrapped document.
    doc: D,
    /// Raw explain payload, if any was found.
    payload: Option<Value>,
    /// Parsed explain data.
    state: OnceLock<ExplainState>,
    /// Hot matches from the last `hot_matches_out_of` call and the score they used.
    hot_out_of: Option<(f64, Vec<HotMatch>)>,
}

impl<D: AsRef<NormalDoc>> ExplainedDoc<D> {
    /// Wraps a document, looking its explain payload up on the originating hit.
    ///
    /// The hit is asked for the document id first and then for the source's literal `id`
    /// field. A hit without explain support yields an empty explanation.
    pub fn new(doc: D) -> Self {
        let payload = lookup_payload(doc.as_ref());
        Self::with_payload(doc, payload)
    }

    /// Wraps a document with an explain payload supplied by the caller.
    pub fn with_explain(doc: D, payload: Value) -> Self {
        Self::with_payload(doc, Some(payload))
    }

    /// Builds the wrapper around an already resolved payload.
    fn with_payload(doc: D, payload: Option<Value>) -> Self {
        Self {
            doc,
            payload,
            state: OnceLock::new(),
            hot_out_of: None,
        }
    }

    /// The wrapped document.
    pub fn doc(&self) -> &NormalDoc {
        self.doc.as_ref()
    }

    /// Unwraps the document.
    pub fn into_inner(self) -> D {
        self.doc
    }

    /// The parsed explanation.
    pub fn explain(&self) -> &Explanation {
        &self.state().explanation
    }

    /// Weight per explain dimension.
    pub fn hot_matches(&self) -> &SparseVector {
        &self.state().hot_matches
    }

    /// Explain text per dimension.
    pub fn match_details(&self) -> &BTreeMap<String, String> {
        &self.state().match_details
    }

    /// The score the explanation accounts for.
    pub fn score(&self) -> f64 {
        self.state().explanation.contribution()
    }

    /// Expresses every dimension as a percentage of `max_score`, heaviest first.
    ///
    /// The list is cached and rebuilt only when `max_score` changes.
    pub fn hot_matches_out_of(&mut self, max_score: f64) -> &[HotMatch] {
        let cached = match self.hot_out_of.take() {
            Some((score, matches)) if score.to_bits() == max_score.to_bits() => matches,
            _ => self.build_hot_matches(max_score),
        };
        &self.hot_out_of.insert((max_score, cached)).1
    }

    /// Computes the hot match list for a reference score.
    fn build_hot_matches(&self, max_score: f64) -> Vec<HotMatch> {
        let state = self.state();
        let mut matches: Vec<HotMatch> = state
            .hot_matches
            .iter()
            .map(|(dimension, weight)| HotMatch {
                description: dimension.to_string(),
                metadata: state.match_details.get(dimension).cloned(),
                percentage: weight / max_score * 100.0,
            })
            .collect();
        matches.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        matches
    }

    /// Parses the payload on first use.
    fn state(&self) -> &ExplainState {
        self.state.get_or_init(|| {
            let explanation = self
                .payload
                .as_ref()
                .and_then(|payload| match Explanation::from_value(payload) {
                    Ok(explanation) => Some(explanation),
                    Err(err) => {
                        warn!(id = %self.doc.as_ref().id, %err, "ignoring unreadable explain");
                        None
                    }
                })
                .unwrap_or_else(Explanation::empty);
            ExplainState {
                hot_matches: explanation.vectorize(),
                match_details: explanation.match_details(),
                explanation,
            }
        })
    }
}

impl<D: AsRef<NormalDoc>> AsRef<NormalDoc> for ExplainedDoc<D> {
    fn as_ref(&self) -> &NormalDoc {
        self.doc.as_ref()
    }
}

/// Finds the explain payload for a document on its hit.
fn lookup_payload(doc: &NormalDoc) -> Option<Value> {
    let hit = doc.hit();
    let found = hit.explain(&doc.id).and_then(|found| match found {
        Some(payload) => Ok(Some(payload)),
        None => match hit.source().get("id") {
            Some(id) => hit.explain(&display_string(id)),
            None => Ok(None),
        },
    });
    match found {
        Ok(payload) => payload.cloned(),
        Err(DocumentError::ExplainNotSupported) => {
            debug!(id = %doc.id, "hit has no explain information");
            None
        }
        Err(err) => {
            warn!(id = %doc.id, %err, "explain lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hitnorm_document::RawHit;
    use serde_json::{Map, json};

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn explain_payload() -> Value {
        json!({
            "value": 4.0,
            "description": "sum of:",
            "details": [
                {"value": 1.0, "description": "weight(overview:soldier in 0)"},
                {"value": 3.0, "description": "weight(title:rambo in 0)"},
            ],
        })
    }

    fn doc(spec: &str, source: Value, explain: Option<Value>) -> NormalDoc {
        let spec = hitnorm_fieldspec::parse(spec).unwrap();
        let mut hit = RawHit::new(object(source));
        if let Some(explain) = explain {
            hit = hit.with_explain(object(explain));
        }
        NormalDoc::new(&spec, Arc::new(hit))
    }

    #[test]
    fn explain_is_looked_up_by_document_id() {
        let doc = doc(
            "id:id title:title",
            json!({"id": 1, "title": "Rambo"}),
            Some(json!({"1": explain_payload()})),
        );
        let explained = ExplainedDoc::new(doc);
        assert_eq!(explained.score(), 4.0);
        assert_eq!(explained.hot_matches().get("title:rambo"), Some(3.0));
        assert!(explained.match_details().contains_key("overview:soldier"));
        assert_eq!(explained.explain().details.len(), 2);
    }

    #[test]
    fn explain_falls_back_to_source_id() {
        let doc = doc(
            "id:isbn title:title",
            json!({"id": "internal-7", "isbn": "978", "title": "Rambo"}),
            Some(json!({"internal-7": explain_payload()})),
        );
        assert_eq!(ExplainedDoc::new(doc).score(), 4.0);
    }

    #[test]
    fn missing_explain_support_is_empty() {
        let doc = doc("id:id title:title", json!({"id": 1, "title": "Rambo"}), None);
        let explained = ExplainedDoc::new(doc);
        assert_eq!(explained.score(), 0.0);
        assert!(explained.hot_matches().is_empty());
    }

    #[test]
    fn missing_explain_for_id_is_empty() {
        let doc = doc(
            "id:id title:title",
            json!({"id": 2, "title": "Rambo"}),
            Some(json!({"1": explain_payload()})),
        );
        assert_eq!(ExplainedDoc::new(doc).score(), 0.0);
    }

    #[test]
    fn unreadable_explain_is_empty() {
        let doc = NormalDoc::placeholder("1", "Rambo");
        let explained = ExplainedDoc::with_explain(doc, json!(42));
        assert_eq!(explained.score(), 0.0);
    }

    #[test]
    fn placeholder_with_explain() {
        let doc = NormalDoc::placeholder("1", "Rambo");
        let explained = ExplainedDoc::with_explain(doc, explain_payload());
        assert_eq!(explained.score(), 4.0);
    }

    #[test]
    fn hot_matches_are_sorted_descending() {
        let doc = NormalDoc::placeholder("1", "Rambo");
        let mut explained = ExplainedDoc::with_explain(doc, explain_payload());
        let matches = explained.hot_matches_out_of(4.0);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].description, "title:rambo");
        assert_eq!(matches[0].percentage, 75.0);
        assert_eq!(matches[1].percentage, 25.0);
        assert!(matches[0].metadata.as_deref().is_some_and(|m| m.contains("weight(title:rambo")));
    }

    #[test]
    fn hot_matches_cache_follows_max_score() {
        let doc = NormalDoc::placeholder("1", "Rambo");
        let mut explained = ExplainedDoc::with_explain(doc, explain_payload());
        let first = explained.hot_matches_out_of(4.0).to_vec();
        let again = explained.hot_matches_out_of(4.0).to_vec();
        assert_eq!(first, again);

        let rescaled = explained.hot_matches_out_of(8.0);
        assert_eq!(rescaled[0].percentage, 37.5);
        assert_eq!(rescaled[1].percentage, 12.5);
    }

    #[test]
    fn layers_over_shared_documents() {
        let doc = Arc::new(NormalDoc::placeholder("1", "Rambo"));
        let explained = ExplainedDoc::with_explain(Arc::clone(&doc), explain_payload());
        assert_eq!(explained.doc().id, "1");
        assert_eq!(explained.score(), 4.0);
    }
}
