//! Query argument multimaps.
//!
//! Solr-style query strings repeat keys freely (`fq=a&fq=b`), so arguments are kept as
//! an insertion-ordered map from key to a non-empty list of values.

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// An insertion-ordered multimap of query arguments.
///
/// A key is never stored with an empty value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Keys and their values, in insertion order.
    entries: Vec<(String, Vec<String>)>,
}

impl Args {
    /// Creates an empty multimap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `key`, creating the key if needed.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Replaces all values of `key`. An empty list removes the key.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        if values.is_empty() {
            self.remove(&key);
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Removes a key, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns all values of `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the first value of `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first().map(String::as_str)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over keys and their values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds arguments from a JSON object.
    ///
    /// Strings are taken as-is, other scalars by their JSON text, arrays contribute one
    /// value per element, and nulls are skipped.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut args = Self::new();
        for (key, value) in object {
            let values = match value {
                Value::Array(items) => items.iter().filter_map(json_arg).collect(),
                other => json_arg(other).into_iter().collect(),
            };
            args.set(key.clone(), values);
        }
        args
    }
}

/// Converts one JSON value into argument text.
fn json_arg(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Args {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = Self::new();
        for (key, value) in iter {
            args.append(key, value);
        }
        args
    }
}

impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_solr_args(self))
    }
}

/// Formats arguments as a query string: one `key=value` pair per value, in order.
///
/// Characters that would change how the string splits back apart (`& = + # %`, spaces,
/// non-ASCII, ...) are percent-encoded; common query syntax such as `*:*` is kept
/// readable.
pub fn format_solr_args(args: &Args) -> String {
    args.iter()
        .flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| format!("{}={}", encode_component(key), encode_component(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Parses a query string into arguments.
///
/// A leading `?` is ignored, as are empty pairs and pairs without `=`. A component that
/// fails to decode is kept as written.
pub fn parse_solr_args(query: &str) -> Args {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut args = Args::new();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            if !pair.is_empty() {
                trace!(pair, "skipping argument without a value");
            }
            continue;
        };
        args.append(decode_component(key), decode_component(value));
    }
    args
}

/// Arguments the searcher sets itself, with the reason each is dropped from user input.
pub const UNSUPPORTED_ARGS: &[(&str, &str)] = &[
    ("json.wrf", "JSONP callbacks are handled by the transport"),
    ("facet", "faceting is not supported"),
    ("facet.field", "faceting is not supported"),
    ("fl", "the field list comes from the field spec"),
    ("hl", "highlighting is configured by the searcher"),
    ("hl.simple.pre", "highlight markers are set by the searcher"),
    ("hl.simple.post", "highlight markers are set by the searcher"),
    ("wt", "responses are always requested as JSON"),
    ("debug", "explain output is requested by the searcher"),
];

/// Strips the arguments listed in [`UNSUPPORTED_ARGS`] from `args`.
///
/// Returns one warning per removed key, in [`UNSUPPORTED_ARGS`] order.
pub fn remove_unsupported(args: &mut Args) -> Vec<String> {
    UNSUPPORTED_ARGS
        .iter()
        .filter_map(|&(key, reason)| {
            args.remove(key)?;
            debug!(key, "removed unsupported argument");
            Some(format!("{key} removed: {reason}"))
        })
        .collect()
}

/// Whether a character is written literally by [`format_solr_args`].
fn is_literal(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '_' | '.' | '~' | '!' | '*' | '\'' | '(' | ')' | ':' | '@' | ',' | ';' | '$'
                | '/' | '?'
        )
}

/// Percent-encodes everything outside the literal set.
fn encode_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    let mut buf = [0; 4];
    for c in text.chars() {
        if is_literal(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}

/// Percent-decodes a component, leaving it untouched if it does not decode.
fn decode_component(text: &str) -> String {
    match urlencoding::decode(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            trace!(text, %err, "keeping undecodable argument as written");
            text.to_string()
        }
    }
}
