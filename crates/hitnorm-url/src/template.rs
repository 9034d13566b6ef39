//! Query template hydration.
//!
//! Templates carry placeholders of the form `#$name##`:
//!
//! - `#$query##`: the full query text
//! - `#$keyword1##`, `#$keyword2##`, ...: the query's whitespace-separated words,
//!   1-based, or the default keyword when the query is shorter
//! - `#$qOption.some.path##`: a value from the query options object
//!
//! Placeholders that cannot be resolved are left as written.

use serde_json::Value;
use tracing::trace;

/// Options for [`hydrate`] and [`hydrate_str`].
#[derive(Debug, Clone, Default)]
pub struct HydrateOptions {
    /// Values reachable as `#$qOption.<path>##`.
    pub q_option: Option<Value>,
    /// Percent-encode substituted query text and keywords.
    pub encode_uri: bool,
    /// Substituted for keywords the query does not have.
    pub default_keyword: String,
}

/// Replaces placeholders in a string template.
pub fn hydrate_str(template: &str, query: &str, options: &HydrateOptions) -> String {
    let mut hydrated = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("#$") {
        hydrated.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("##") else {
            hydrated.push_str(&rest[start..]);
            return hydrated;
        };
        let name = &after[..end];
        match resolve(name, query, options) {
            Some(value) => hydrated.push_str(&value),
            None => {
                trace!(placeholder = name, "leaving unresolved placeholder");
                hydrated.push_str(&rest[start..start + end + 4]);
            }
        }
        rest = &after[end + 2..];
    }
    hydrated.push_str(rest);
    hydrated
}

/// Replaces placeholders in every string of a JSON template. Keys are left alone.
pub fn hydrate(template: &Value, query: &str, options: &HydrateOptions) -> Value {
    match template {
        Value::String(s) => Value::String(hydrate_str(s, query, options)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| hydrate(item, query, options))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), hydrate(value, query, options)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Resolves one placeholder name.
fn resolve(name: &str, query: &str, options: &HydrateOptions) -> Option<String> {
    if name == "query" {
        return Some(encode(query, options));
    }
    if let Some(index) = name.strip_prefix("keyword") {
        let index: usize = index.parse().ok().filter(|&i| i > 0)?;
        return Some(
            query
                .split_whitespace()
                .nth(index - 1)
                .map_or_else(|| options.default_keyword.clone(), |kw| encode(kw, options)),
        );
    }
    let path = name.strip_prefix("qOption.")?;
    let value = path
        .split('.')
        .try_fold(options.q_option.as_ref()?, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })?;
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Applies the URI encoding option.
fn encode(text: &str, options: &HydrateOptions) -> String {
    if options.encode_uri {
        urlencoding::encode(text).into_owned()
    } else {
        text.to_string()
    }
}
