//! The canonical normalized document.

use std::{collections::BTreeMap, sync::Arc};

use hitnorm_fieldspec::{FieldOptions, FieldSpec, Subs, function_display_name};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    hit::{RawHit, SearchHit},
    value::{display_string, resolve_field},
};

/// One displayed sub field, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubField {
    /// Source field name.
    pub field: String,
    /// The value: display text, or structured JSON passed through.
    pub value: Value,
}

/// An engine-agnostic view of one search hit.
#[derive(Debug, Clone, Serialize)]
pub struct NormalDoc {
    /// Document id as display text. Empty if the hit had no id field.
    pub id: String,
    /// Title text, if the hit had a title field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Name of the field the title came from.
    pub title_field: String,
    /// Thumbnail URL or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    /// Options for the thumbnail field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_options: Option<FieldOptions>,
    /// Image URL or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Options for the image field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_options: Option<FieldOptions>,
    /// Embedded media fields.
    pub embeds: BTreeMap<String, String>,
    /// Fields offered for translation.
    pub translations: BTreeMap<String, String>,
    /// Fields shown without truncation.
    pub unabridgeds: BTreeMap<String, String>,
    /// Displayed sub fields, in insertion order.
    pub subs: Map<String, Value>,
    /// The same sub fields as an ordered list.
    pub subs_list: Vec<SubField>,
    #[serde(skip)]
    /// Whether a thumbnail was resolved at construction.
    has_thumb: bool,
    #[serde(skip)]
    /// Whether an image was resolved at construction.
    has_image: bool,
    #[serde(skip)]
    /// The hit this document was built from. Read-only.
    hit: Arc<dyn SearchHit>,
}

impl NormalDoc {
    /// Normalizes a hit according to a field spec.
    ///
    /// Never fails: dotted paths that do not resolve yield empty strings, and plain fields
    /// missing from the source are left unset.
    pub fn new(spec: &FieldSpec, hit: Arc<dyn SearchHit>) -> Self {
        let source = hit.source();

        let id = single_field(source, spec.id()).unwrap_or_else(|| {
            debug!(field = spec.id(), "hit has no id field");
            String::new()
        });
        let title = single_field(source, spec.title());
        let thumb = spec.thumb().and_then(|f| single_field(source, f));
        let image = spec.image().and_then(|f| single_field(source, f));

        let subs = collect_subs(source, spec);
        let subs_list = subs
            .iter()
            .map(|(field, value)| SubField {
                field: field.clone(),
                value: value.clone(),
            })
            .collect();

        Self {
            id,
            title,
            title_field: spec.title().to_string(),
            has_thumb: thumb.is_some(),
            has_image: image.is_some(),
            thumb,
            thumb_options: spec.thumb_options().cloned(),
            image,
            image_options: spec.image_options().cloned(),
            embeds: collect_plain(source, spec.embeds()),
            translations: collect_plain(source, spec.translations()),
            unabridgeds: collect_plain(source, spec.unabridgeds()),
            subs,
            subs_list,
            hit,
        }
    }

    /// Creates a stub for a result that was expected but not returned.
    pub fn placeholder(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            title: (!title.is_empty()).then_some(title),
            title_field: "title".into(),
            thumb: None,
            thumb_options: None,
            image: None,
            image_options: None,
            embeds: BTreeMap::new(),
            translations: BTreeMap::new(),
            unabridgeds: BTreeMap::new(),
            subs: Map::new(),
            subs_list: Vec::new(),
            has_thumb: false,
            has_image: false,
            hit: Arc::new(RawHit::default()),
        }
    }

    /// Whether a thumbnail was resolved when the document was built.
    pub fn has_thumb(&self) -> bool {
        self.has_thumb
    }

    /// Whether an image was resolved when the document was built.
    pub fn has_image(&self) -> bool {
        self.has_image
    }

    /// The raw hit this document was built from.
    pub fn hit(&self) -> &dyn SearchHit {
        self.hit.as_ref()
    }
}

impl AsRef<Self> for NormalDoc {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Resolves a single-valued field to display text.
///
/// Dotted names use broadcasting traversal and fall back to `""`; plain names that are
/// missing yield `None`.
fn single_field(source: &Map<String, Value>, field: &str) -> Option<String> {
    if field.contains('.') {
        let text = resolve_field(source, field).map_or_else(
            || {
                debug!(field, "path did not resolve, using empty value");
                String::new()
            },
            |value| value.display(),
        );
        Some(text)
    } else {
        source.get(field).map(display_string)
    }
}

/// Copies plain fields that are present, as display text.
fn collect_plain(source: &Map<String, Value>, fields: &[String]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|field| {
            source
                .get(field)
                .map(|value| (field.clone(), display_string(value)))
        })
        .collect()
}

/// Keeps structured values as-is and turns everything else into display text.
fn sub_value(value: &Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) | Value::Null => value.clone(),
        other => Value::String(display_string(other)),
    }
}

/// Builds the sub fields for a document.
fn collect_subs(source: &Map<String, Value>, spec: &FieldSpec) -> Map<String, Value> {
    let mut subs = Map::new();

    let Subs::List(names) = spec.subs() else {
        let reserved = [Some(spec.id()), Some(spec.title()), spec.thumb(), spec.image()];
        for (field, value) in source {
            if !reserved.contains(&Some(field.as_str())) {
                subs.insert(field.clone(), sub_value(value));
            }
        }
        return subs;
    };

    for name in names {
        if name.contains('.') {
            let value = resolve_field(source, name).map_or_else(
                || {
                    debug!(field = %name, "sub path did not resolve, using empty value");
                    Value::String(String::new())
                },
                |value| sub_value(&value.into_value()),
            );
            subs.insert(name.clone(), value);
        } else if let Some(value) = source.get(name) {
            subs.insert(name.clone(), sub_value(value));
        }
    }

    for function in spec.functions() {
        let name = function_display_name(function);
        if let Some(value) = source.get(name) {
            subs.insert(name.to_string(), sub_value(value));
        }
    }

    for name in spec.highlights() {
        if name != spec.title()
            && let Some(value) = source.get(name)
        {
            subs.insert(name.clone(), sub_value(value));
        }
    }

    subs
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn normalize(spec: &str, source: Value) -> NormalDoc {
        let spec = hitnorm_fieldspec::parse(spec).unwrap();
        let hit = RawHit::from_value(source).unwrap();
        NormalDoc::new(&spec, Arc::new(hit))
    }

    #[test]
    fn wildcard_subs_exclude_reserved_fields() {
        let doc = normalize(
            "id:id title:title hl:text sub:*",
            json!({"id": 1, "title": "Rambo", "text": "A soldier", "year": 1982}),
        );
        assert_eq!(doc.id, "1");
        assert_eq!(doc.title.as_deref(), Some("Rambo"));
        assert_eq!(doc.title_field, "title");
        assert_eq!(
            Value::Object(doc.subs.clone()),
            json!({"text": "A soldier", "year": "1982"})
        );
    }

    #[test]
    fn wildcard_subs_exclude_thumb_and_image() {
        let doc = normalize(
            "id:id title:name thumb:poster image:still sub:*",
            json!({"id": "a", "name": "n", "poster": "p.png", "still": "s.png", "genre": "war"}),
        );
        assert_eq!(Value::Object(doc.subs.clone()), json!({"genre": "war"}));
        assert_eq!(doc.thumb.as_deref(), Some("p.png"));
        assert!(doc.has_thumb());
        assert!(doc.has_image());
    }

    #[test]
    fn wildcard_subs_keep_structured_values() {
        let doc = normalize(
            "id:id title:t sub:*",
            json!({"id": 1, "t": "x", "cast": [{"name": "S"}], "meta": {"a": 1}, "n": null}),
        );
        assert_eq!(doc.subs["cast"], json!([{"name": "S"}]));
        assert_eq!(doc.subs["meta"], json!({"a": 1}));
        assert_eq!(doc.subs["n"], Value::Null);
    }

    #[test]
    fn subs_list_follows_subs_order() {
        let doc = normalize(
            "id:id title:t sub:b sub:a",
            json!({"id": 1, "t": "x", "a": "A", "b": "B"}),
        );
        let fields: Vec<&str> = doc.subs_list.iter().map(|s| s.field.as_str()).collect();
        assert_eq!(fields, ["b", "a"]);
        assert_eq!(doc.subs_list[0].value, json!("B"));
    }

    #[test]
    fn explicit_subs_with_paths_functions_and_highlights() {
        let doc = normalize(
            "id:id title:t sub:cast.name sub:missing.path f:$score hl:t hl:overview",
            json!({
                "id": 7,
                "t": "title",
                "cast": [{"name": "Stallone"}, {"name": "Dennehy"}],
                "score": 3.5,
                "overview": "A drifter",
            }),
        );
        assert_eq!(doc.subs["cast.name"], json!(["Stallone", "Dennehy"]));
        assert_eq!(doc.subs["missing.path"], json!(""));
        assert_eq!(doc.subs["score"], json!("3.5"));
        assert_eq!(doc.subs["overview"], json!("A drifter"));
        assert!(!doc.subs.contains_key("t"));
    }

    #[test]
    fn explicit_subs_skip_missing_plain_fields() {
        let doc = normalize("id:id title:t sub:absent", json!({"id": 1, "t": "x"}));
        assert!(doc.subs.is_empty());
    }

    #[test]
    fn dotted_single_fields() {
        let doc = normalize(
            "id:meta.id title:meta.names.first thumb:img.missing",
            json!({"meta": {"id": 42, "names": [{"first": "John"}, {"first": "Jack"}]}}),
        );
        assert_eq!(doc.id, "42");
        assert_eq!(doc.title.as_deref(), Some("John,Jack"));
        assert_eq!(doc.thumb.as_deref(), Some(""));
        assert!(doc.has_thumb());
    }

    #[test]
    fn missing_plain_fields_stay_unset() {
        let doc = normalize("id:id title:name thumb:poster", json!({"other": 1}));
        assert_eq!(doc.id, "");
        assert_eq!(doc.title, None);
        assert_eq!(doc.thumb, None);
        assert!(!doc.has_thumb());
        assert!(!doc.has_image());
    }

    #[test]
    fn has_thumb_is_fixed_at_construction() {
        let mut doc = normalize("id:id title:t", json!({"id": 1, "t": "x"}));
        doc.thumb = Some("later.png".into());
        assert!(!doc.has_thumb());
    }

    #[test]
    fn embeds_translations_unabridgeds() {
        let doc = normalize(
            "id:id title:t media:video translate:fr unabridged:body media:gone",
            json!({"id": 1, "t": "x", "video": "v.mp4", "fr": "bonjour", "body": "long"}),
        );
        assert_eq!(doc.embeds.get("video").map(String::as_str), Some("v.mp4"));
        assert!(!doc.embeds.contains_key("gone"));
        assert_eq!(doc.translations["fr"], "bonjour");
        assert_eq!(doc.unabridgeds["body"], "long");
    }

    #[test]
    fn options_are_copied() {
        let doc = normalize(
            r#"id:id title:t {"name":"poster","type":"thumb","prefix":"https://img/"}"#,
            json!({"id": 1, "t": "x", "poster": "a.png"}),
        );
        assert_eq!(
            doc.thumb_options.as_ref().and_then(|o| o.get("prefix")),
            Some(&json!("https://img/"))
        );
    }

    #[test]
    fn title_defaults_to_id_field() {
        let doc = normalize("id:isbn", json!({"isbn": "978"}));
        assert_eq!(doc.title.as_deref(), Some("978"));
        assert_eq!(doc.title_field, "isbn");
    }

    #[test]
    fn placeholder_doc() {
        let doc = NormalDoc::placeholder("missing-1", "Expected Title");
        assert_eq!(doc.id, "missing-1");
        assert_eq!(doc.title.as_deref(), Some("Expected Title"));
        assert!(doc.subs.is_empty());
        assert!(doc.hit().source().is_empty());
    }

    #[test]
    fn serializes_without_internal_state() {
        let doc = normalize("id:id title:t sub:a", json!({"id": 1, "t": "x", "a": 2}));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], json!("1"));
        assert_eq!(value["subs"], json!({"a": "2"}));
        assert!(value.get("hit").is_none());
        assert!(value.get("thumb").is_none());
    }

    #[test]
    fn documents_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NormalDoc>();
    }
}
