//! Field value lookup and display conversion.
//!
//! Source documents are arbitrary JSON. Dotted field names such as `cast.name` address
//! nested values, and arrays along the way broadcast the rest of the path over every
//! element:
//!
//! ```text
//! {"cast": [{"name": "Stallone"}, {"name": "Dennehy"}]}
//!   cast.name → Sequence[Scalar("Stallone"), Scalar("Dennehy")]
//! ```

use serde_json::{Map, Number, Value};

/// The result of a broadcasting path lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PathValue {
    /// The path ended on a single value.
    Scalar(Value),
    /// The path crossed an array; one result per element.
    Sequence(Vec<Self>),
}

impl PathValue {
    /// Converts back into plain JSON, turning sequences into arrays.
    pub fn into_value(self) -> Value {
        match self {
            Self::Scalar(value) => value,
            Self::Sequence(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
        }
    }

    /// Renders the value as display text. Sequences are comma-joined.
    pub fn display(&self) -> String {
        match self {
            Self::Scalar(value) => display_string(value),
            Self::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    Self::Scalar(Value::Null) => String::new(),
                    other => other.display(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Walks `path` from `value`, broadcasting over arrays.
///
/// Returns `None` if any key along the way is missing or a non-object is indexed. An
/// array anywhere in the walk maps the remaining path across each element; an element
/// the rest of the path misses becomes a null slot and displays as empty.
pub fn traverse(value: &Value, path: &[&str]) -> Option<PathValue> {
    let Some((key, rest)) = path.split_first() else {
        return Some(PathValue::Scalar(value.clone()));
    };
    match value {
        Value::Array(items) => Some(PathValue::Sequence(
            items
                .iter()
                .map(|item| traverse(item, path).unwrap_or(PathValue::Scalar(Value::Null)))
                .collect(),
        )),
        Value::Object(map) => traverse(map.get(*key)?, rest),
        _ => None,
    }
}

/// Resolves a possibly dotted field name against a source document.
///
/// A key that literally contains the dots wins over nested traversal.
pub fn resolve_field(source: &Map<String, Value>, field: &str) -> Option<PathValue> {
    if let Some(value) = source.get(field) {
        return Some(PathValue::Scalar(value.clone()));
    }
    let path: Vec<&str> = field.split('.').collect();
    let (first, rest) = path.split_first()?;
    traverse(source.get(*first)?, rest)
}

/// Converts a JSON value to display text using script-style string coercion.
///
/// Integral numbers print without a fractional part, arrays are comma-joined (nulls
/// become empty), objects print as `[object Object]`.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".into(),
    }
}

/// Formats a JSON number the way a script engine would print it.
fn display_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn nested_object_path() {
        let doc = source(json!({"a": {"b": {"c": "deep"}}}));
        assert_eq!(
            resolve_field(&doc, "a.b.c"),
            Some(PathValue::Scalar(json!("deep")))
        );
    }

    #[test]
    fn broadcasts_over_arrays() {
        let doc = source(json!({"cast": [{"name": "Stallone"}, {"name": "Dennehy"}]}));
        let value = resolve_field(&doc, "cast.name").unwrap();
        assert_eq!(
            value,
            PathValue::Sequence(vec![
                PathValue::Scalar(json!("Stallone")),
                PathValue::Scalar(json!("Dennehy")),
            ])
        );
        assert_eq!(value.display(), "Stallone,Dennehy");
        assert_eq!(value.into_value(), json!(["Stallone", "Dennehy"]));
    }

    #[test]
    fn broadcasts_over_nested_arrays() {
        let doc = source(json!({"a": [{"b": [{"c": 1}, {"c": 2}]}, {"b": [{"c": 3}]}]}));
        let value = resolve_field(&doc, "a.b.c").unwrap();
        assert_eq!(value.into_value(), json!([[1, 2], [3]]));
    }

    #[test]
    fn missing_key_fails() {
        let doc = source(json!({"a": {"b": 1}}));
        assert_eq!(resolve_field(&doc, "a.x"), None);
        assert_eq!(resolve_field(&doc, "x.b"), None);
        assert_eq!(resolve_field(&doc, "a.b.c"), None);
    }

    #[test]
    fn missing_key_in_one_element_leaves_a_gap() {
        let doc = source(json!({"cast": [{"name": "Stallone"}, {"role": "Teasle"}]}));
        let value = resolve_field(&doc, "cast.name").unwrap();
        assert_eq!(
            value,
            PathValue::Sequence(vec![
                PathValue::Scalar(json!("Stallone")),
                PathValue::Scalar(Value::Null),
            ])
        );
        assert_eq!(value.display(), "Stallone,");
        assert_eq!(value.into_value(), json!(["Stallone", null]));
    }

    #[test]
    fn missing_key_in_every_element_still_broadcasts() {
        let doc = source(json!({"cast": [{"role": "Rambo"}, {"role": "Teasle"}]}));
        assert_eq!(resolve_field(&doc, "cast.name").unwrap().display(), ",");
    }

    #[test]
    fn literal_dotted_key_wins() {
        let doc = source(json!({"a.b": "literal", "a": {"b": "nested"}}));
        assert_eq!(
            resolve_field(&doc, "a.b"),
            Some(PathValue::Scalar(json!("literal")))
        );
    }

    #[test]
    fn whole_array_at_end_of_path() {
        let doc = source(json!({"a": {"tags": ["x", "y"]}}));
        assert_eq!(
            resolve_field(&doc, "a.tags"),
            Some(PathValue::Scalar(json!(["x", "y"])))
        );
    }

    #[test]
    fn display_strings() {
        assert_eq!(display_string(&json!(1982)), "1982");
        assert_eq!(display_string(&json!(-3)), "-3");
        assert_eq!(display_string(&json!(2.0)), "2");
        assert_eq!(display_string(&json!(2.5)), "2.5");
        assert_eq!(display_string(&json!(true)), "true");
        assert_eq!(display_string(&json!(null)), "null");
        assert_eq!(display_string(&json!("text")), "text");
        assert_eq!(display_string(&json!(["a", null, 1])), "a,,1");
        assert_eq!(display_string(&json!([["a", "b"], "c"])), "a,b,c");
        assert_eq!(display_string(&json!({"a": 1})), "[object Object]");
    }
}
