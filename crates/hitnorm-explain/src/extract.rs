//! Explain payloads computed outside the main result list.
//!
//! Engines can explain arbitrary documents against a query ("explain other"). The
//! payloads come back keyed by document id and replace whatever the hit itself carries.

use std::sync::Arc;

use hitnorm_document::{NormalDoc, SearchHit, display_string};
use hitnorm_fieldspec::FieldSpec;
use serde_json::{Map, Value};

use crate::doc::ExplainedDoc;

/// Returns the explain payload for a source document from an explain-other map.
///
/// The document's id field must be present and non-empty.
pub fn overriding_explain<'a>(
    source: &Map<String, Value>,
    spec: &FieldSpec,
    explain_data: &'a Map<String, Value>,
) -> Option<&'a Value> {
    let id = match source.get(spec.id())? {
        Value::Null | Value::Bool(false) => return None,
        id => display_string(id),
    };
    if id.is_empty() || id == "0" {
        return None;
    }
    explain_data.get(&id)
}

/// Normalizes hits, taking each one's explain payload from `explain_data` when it has
/// an entry and from the hit otherwise.
pub fn docs_with_explain_other<I>(
    hits: I,
    spec: &FieldSpec,
    explain_data: &Map<String, Value>,
) -> Vec<ExplainedDoc>
where
    I: IntoIterator<Item = Arc<dyn SearchHit>>,
{
    hits.into_iter()
        .map(|hit| {
            let payload = overriding_explain(hit.source(), spec, explain_data).cloned();
            let doc = NormalDoc::new(spec, hit);
            match payload {
                Some(payload) => ExplainedDoc::with_explain(doc, payload),
                None => ExplainedDoc::new(doc),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use hitnorm_document::RawHit;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn spec() -> FieldSpec {
        hitnorm_fieldspec::parse("id:id title:title").unwrap()
    }

    fn explain_data() -> Map<String, Value> {
        object(json!({
            "1": {"value": 2.0, "description": "weight(title:rambo in 0)"},
            "2": {"value": 1.0, "description": "weight(title:blood in 0)"},
        }))
    }

    #[test]
    fn finds_payload_by_id() {
        let data = explain_data();
        let source = object(json!({"id": 1, "title": "Rambo"}));
        assert_eq!(
            overriding_explain(&source, &spec(), &data).map(|v| &v["value"]),
            Some(&json!(2.0))
        );
    }

    #[test]
    fn missing_or_empty_ids_have_no_payload() {
        let data = explain_data();
        for source in [
            json!({"title": "Rambo"}),
            json!({"id": null}),
            json!({"id": ""}),
            json!({"id": 3}),
        ] {
            assert_eq!(overriding_explain(&object(source), &spec(), &data), None);
        }
    }

    #[test]
    fn explain_other_overrides_hit_payload() {
        let own = object(json!({"1": {"value": 9.0, "description": "weight(own:term in 0)"}}));
        let hits: Vec<Arc<dyn SearchHit>> = vec![
            Arc::new(RawHit::new(object(json!({"id": 1, "title": "a"}))).with_explain(own)),
            Arc::new(RawHit::new(object(json!({"id": 5, "title": "b"})))),
        ];
        let docs = docs_with_explain_other(hits, &spec(), &explain_data());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].score(), 2.0);
        assert_eq!(docs[0].hot_matches().get("title:rambo"), Some(2.0));
        assert_eq!(docs[1].score(), 0.0);
        assert_eq!(docs[1].doc().title.as_deref(), Some("b"));
    }
}
