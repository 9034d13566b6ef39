//! The resolved field specification.

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeSeq};
use serde_json::{Map, Value};

/// Marker used in spec strings and field lists for "every field".
pub const WILDCARD: &str = "*";

/// Field options attached through a JSON field definition.
pub type FieldOptions = Map<String, Value>;

/// Sub fields to display for each document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subs {
    /// An explicit, ordered list of field names.
    List(Vec<String>),
    /// Every source field that is not id, title, thumb or image.
    Wildcard,
}

impl Default for Subs {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Subs {
    /// Returns true if this is the wildcard marker.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Returns the explicit sub fields, or an empty slice for the wildcard.
    pub fn names(&self) -> &[String] {
        match self {
            Self::List(names) => names,
            Self::Wildcard => &[],
        }
    }
}

impl Serialize for Subs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Wildcard => serializer.serialize_str(WILDCARD),
            Self::List(names) => {
                let mut seq = serializer.serialize_seq(Some(names.len()))?;
                for name in names {
                    seq.serialize_element(name)?;
                }
                seq.end()
            }
        }
    }
}

/// A single-valued field role such as `thumb:poster` or `url:link`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedField {
    /// The role token (`id`, `title`, `thumb`, `image`, or any other type).
    pub kind: String,
    /// The source field name.
    pub name: String,
    /// Options from a JSON field definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
}

/// The list of fields to request from a search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldList {
    /// Request every stored field.
    Wildcard,
    /// Request exactly these fields, id first.
    Fields(Vec<String>),
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Fields(names) => f.write_str(&names.join(" ")),
        }
    }
}

/// A parsed field specification.
///
/// Describes how raw engine fields map onto the canonical roles of a normalized document.
/// Built by [`parse`](crate::parse); immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// The normalized spec string this was parsed from.
    pub(crate) source: String,
    /// Every field name referenced, in resolution order.
    pub(crate) fields: Vec<String>,
    /// The id field.
    pub(crate) id: String,
    /// The title field.
    pub(crate) title: String,
    /// Single-valued typed fields, first occurrence per kind.
    pub(crate) typed: Vec<TypedField>,
    /// Media embed fields.
    pub(crate) embeds: Vec<String>,
    /// Fields offered for translation.
    pub(crate) translations: Vec<String>,
    /// Fields displayed without truncation.
    pub(crate) unabridgeds: Vec<String>,
    /// Fields to highlight.
    pub(crate) highlights: Vec<String>,
    /// Function queries, in `name:$name` form.
    pub(crate) functions: Vec<String>,
    /// Sub fields.
    pub(crate) subs: Subs,
}

impl FieldSpec {
    /// The normalized spec string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every field name referenced by the spec, in resolution order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The id field name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The title field name.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The thumbnail field name, if any.
    pub fn thumb(&self) -> Option<&str> {
        self.typed_field("thumb").map(|f| f.name.as_str())
    }

    /// Options attached to the thumbnail field.
    pub fn thumb_options(&self) -> Option<&FieldOptions> {
        self.typed_field("thumb").and_then(|f| f.options.as_ref())
    }

    /// The image field name, if any.
    pub fn image(&self) -> Option<&str> {
        self.typed_field("image").map(|f| f.name.as_str())
    }

    /// Options attached to the image field.
    pub fn image_options(&self) -> Option<&FieldOptions> {
        self.typed_field("image").and_then(|f| f.options.as_ref())
    }

    /// Looks up a single-valued field by its role token.
    pub fn typed_field(&self, kind: &str) -> Option<&TypedField> {
        self.typed.iter().find(|f| f.kind == kind)
    }

    /// All single-valued typed fields, in first-seen order.
    pub fn typed_fields(&self) -> &[TypedField] {
        &self.typed
    }

    /// Media embed fields.
    pub fn embeds(&self) -> &[String] {
        &self.embeds
    }

    /// Translation fields.
    pub fn translations(&self) -> &[String] {
        &self.translations
    }

    /// Unabridged fields.
    pub fn unabridgeds(&self) -> &[String] {
        &self.unabridgeds
    }

    /// Highlight fields.
    pub fn highlights(&self) -> &[String] {
        &self.highlights
    }

    /// Function query fields, in `name:$name` form.
    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    /// Sub fields.
    pub fn subs(&self) -> &Subs {
        &self.subs
    }

    /// Fields the engine should highlight.
    pub fn highlight_field_list(&self) -> &[String] {
        &self.highlights
    }

    /// Calls `visit` for each non-id field, in canonical order.
    ///
    /// The order is: title, thumb, image, embeds, translations, unabridgeds, highlights,
    /// subs, functions. Wildcard subs contribute nothing.
    pub fn for_each_field(&self, mut visit: impl FnMut(&str)) {
        visit(&self.title);
        if let Some(thumb) = self.thumb() {
            visit(thumb);
        }
        if let Some(image) = self.image() {
            visit(image);
        }
        let buckets = [
            &self.embeds,
            &self.translations,
            &self.unabridgeds,
            &self.highlights,
        ];
        for name in buckets.into_iter().flatten() {
            visit(name);
        }
        for name in self.subs.names() {
            visit(name);
        }
        for name in &self.functions {
            visit(name);
        }
    }

    /// Returns the list of fields to request from the engine.
    pub fn field_list(&self) -> FieldList {
        if self.subs.is_wildcard() {
            return FieldList::Wildcard;
        }
        let mut names = vec![self.id.clone()];
        self.for_each_field(|name| names.push(name.to_string()));
        FieldList::Fields(names)
    }
}

/// Strips a function query down to the field it displays (`foo:$foo` → `foo`).
pub fn function_display_name(function: &str) -> &str {
    function.split(':').next().unwrap_or(function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subs_serialize() {
        assert_eq!(serde_json::to_string(&Subs::Wildcard).unwrap(), "\"*\"");
        let list = Subs::List(vec!["a".into(), "b".into()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[\"a\",\"b\"]");
    }

    #[test]
    fn field_list_display() {
        assert_eq!(FieldList::Wildcard.to_string(), "*");
        let list = FieldList::Fields(vec!["id".into(), "title".into()]);
        assert_eq!(list.to_string(), "id title");
    }

    #[test]
    fn display_name_of_function() {
        assert_eq!(function_display_name("foo:$foo"), "foo");
        assert_eq!(function_display_name("plain"), "plain");
    }
}
