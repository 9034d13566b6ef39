//! Explain trees and their decomposition into weighted dimensions.
//!
//! Engines explain a score as a tree of `value = description` nodes. Lucene-based
//! engines produce either JSON (`{"value", "description", "details"}`, optionally with a
//! `"match"` flag) or the indented text form:
//!
//! ```text
//! 2.5 = sum of:
//!   1.5 = weight(title:rambo in 0) [BM25Similarity], result of:
//!     1.5 = score(freq=1.0)
//!   1.0 = weight(overview:soldier in 0) [BM25Similarity], result of:
//!     1.0 = score(freq=1.0)
//! ```
//!
//! [`Explanation::vectorize`] turns such a tree into a [`SparseVector`] with one dimension
//! per matched term (`title:rambo` → 1.5, `overview:soldier` → 1.0).

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::ExplainError,
    vector::{SparseVector, format_number},
};

/// One node of an explain tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Score contributed by this node.
    pub value: f64,
    /// Engine description, e.g. `sum of:` or `weight(title:rambo in 0) ...`.
    pub description: String,
    /// Whether the node matched. Non-matching nodes contribute nothing.
    pub matched: bool,
    /// Child nodes.
    pub details: Vec<Self>,
}

/// Dimensions and their explain text, built together.
#[derive(Debug, Default)]
struct Decomposition {
    /// Weight per dimension.
    vector: SparseVector,
    /// Explain text per dimension, first occurrence wins.
    details: BTreeMap<String, String>,
}

impl Decomposition {
    /// A single dimension produced by `node`.
    fn leaf(dimension: &str, node: &Explanation) -> Self {
        let mut decomposition = Self::default();
        decomposition.vector.set(dimension, node.value);
        decomposition
            .details
            .insert(dimension.to_string(), node.to_string());
        decomposition
    }

    /// Adds another decomposition's weights into this one.
    fn absorb(&mut self, other: Self) {
        for (dimension, weight) in other.vector.iter() {
            self.vector.add(dimension, weight);
        }
        for (dimension, text) in other.details {
            self.details.entry(dimension).or_insert(text);
        }
    }

    /// Scales every weight.
    fn scaled(mut self, scalar: f64) -> Self {
        self.vector.scale(scalar);
        self
    }
}

impl Explanation {
    /// Creates a matching leaf node.
    pub fn new(value: f64, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
            matched: true,
            details: Vec::new(),
        }
    }

    /// An explanation with no score, used when a document has no explain payload.
    pub fn empty() -> Self {
        Self::new(0.0, "")
    }

    /// Adds a child node.
    pub fn with_detail(mut self, detail: Self) -> Self {
        self.details.push(detail);
        self
    }

    /// Parses an engine explain payload.
    ///
    /// Accepts a JSON object, a string holding JSON, or a string in the indented text
    /// form.
    pub fn from_value(payload: &Value) -> Result<Self, ExplainError> {
        match payload {
            Value::Object(map) => Self::from_map(map),
            Value::String(text) => text.parse(),
            other => Err(ExplainError::Malformed(format!(
                "expected an object or string, found {other}"
            ))),
        }
    }

    /// Parses one JSON explain node.
    fn from_map(map: &Map<String, Value>) -> Result<Self, ExplainError> {
        let value = match map.get("value") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| ExplainError::Malformed("node has no numeric value".into()))?;
        let description = map
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let matched = map.get("match").and_then(Value::as_bool).unwrap_or(true);
        let details = match map.get("details") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(child) => Self::from_map(child),
                    _ => Err(ExplainError::Malformed("detail is not an object".into())),
                })
                .collect::<Result<_, _>>()?,
            _ => Vec::new(),
        };
        Ok(Self {
            value,
            description: description.to_string(),
            matched,
            details,
        })
    }

    /// Parses the indented text form. Each nesting level is indented further than its
    /// parent.
    fn parse_text(text: &str) -> Result<Self, ExplainError> {
        let mut stack: Vec<(usize, Self)> = Vec::new();
        let mut root = None;
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            let (value, description) =
                trimmed.split_once(" = ").ok_or_else(|| ExplainError::Text {
                    line: index + 1,
                    message: "expected `<value> = <description>`".into(),
                })?;
            let value = value.parse::<f64>().map_err(|_| ExplainError::Text {
                line: index + 1,
                message: format!("invalid value `{value}`"),
            })?;
            fold_stack(&mut stack, &mut root, indent)?;
            stack.push((indent, Self::new(value, description)));
        }
        fold_stack(&mut stack, &mut root, 0)?;
        root.ok_or(ExplainError::Empty)
    }

    /// The score this explanation accounts for.
    pub fn contribution(&self) -> f64 {
        if self.matched { self.value } else { 0.0 }
    }

    /// Decomposes the tree into one weight per matched dimension.
    pub fn vectorize(&self) -> SparseVector {
        self.decompose().vector
    }

    /// Maps each dimension of [`vectorize`](Self::vectorize) to the explain text of the
    /// node that produced it.
    pub fn match_details(&self) -> BTreeMap<String, String> {
        self.decompose().details
    }

    /// Whether this node adds anything to a decomposition.
    fn contributes(&self) -> bool {
        self.matched && self.value != 0.0
    }

    /// Whether this node carries structure of its own, as opposed to a constant factor.
    fn is_structured(&self) -> bool {
        !self.details.is_empty() || weight_dimension(&self.description).is_some()
    }

    /// Recursively decomposes this node.
    fn decompose(&self) -> Decomposition {
        if !self.contributes() {
            return Decomposition::default();
        }
        let description = self.description.trim();
        if let Some(dimension) = weight_dimension(description) {
            return Decomposition::leaf(dimension, self);
        }
        if self.details.is_empty() {
            if description.is_empty() {
                return Decomposition::default();
            }
            return Decomposition::leaf(description, self);
        }

        let children: Vec<&Self> = self.details.iter().filter(|c| c.contributes()).collect();
        let best = children
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.value.total_cmp(&b.value))
            .map(|(i, _)| i);

        if description.starts_with("max of") {
            return best.map_or_else(Decomposition::default, |i| children[i].decompose());
        }

        if let Some(tie) = tie_breaker(description) {
            let mut decomposition = Decomposition::default();
            for (i, child) in children.iter().enumerate() {
                let part = child.decompose();
                decomposition.absorb(if Some(i) == best { part } else { part.scaled(tie) });
            }
            return decomposition;
        }

        if description.starts_with("product of") {
            let (structured, factors): (Vec<&Self>, Vec<&Self>) =
                self.details.iter().partition(|c| c.is_structured());
            if structured.is_empty() {
                return Decomposition::leaf(description, self);
            }
            let factor: f64 = factors.iter().map(|c| c.value).product();
            let mut decomposition = Decomposition::default();
            for child in structured {
                decomposition.absorb(child.decompose());
            }
            return decomposition.scaled(factor);
        }

        let mut decomposition = Decomposition::default();
        for child in children {
            decomposition.absorb(child.decompose());
        }
        decomposition
    }

    /// Writes this node and its children at the given depth.
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} = {}",
            "",
            format_number(self.value),
            self.description,
            indent = depth * 2
        )?;
        for detail in &self.details {
            detail.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl FromStr for Explanation {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim_start().starts_with('{') {
            let value: Value = serde_json::from_str(s)?;
            Self::from_value(&value)
        } else {
            Self::parse_text(s)
        }
    }
}

/// Pops every node indented at least `indent` deep, attaching each to its parent.
fn fold_stack(
    stack: &mut Vec<(usize, Explanation)>,
    root: &mut Option<Explanation>,
    indent: usize,
) -> Result<(), ExplainError> {
    while stack.last().is_some_and(|(depth, _)| *depth >= indent) {
        let Some((_, node)) = stack.pop() else { break };
        match stack.last_mut() {
            Some((_, parent)) => parent.details.push(node),
            None => {
                if root.replace(node).is_some() {
                    return Err(ExplainError::Malformed("more than one root node".into()));
                }
            }
        }
    }
    Ok(())
}

/// Extracts `field:term` from a `weight(field:term in doc) ...` description.
fn weight_dimension(description: &str) -> Option<&str> {
    let inner = description.strip_prefix("weight(")?;
    match inner.find(" in ") {
        Some(end) => Some(&inner[..end]),
        None => inner.rfind(')').map(|end| &inner[..end]),
    }
}

/// Parses the tie breaker from `max plus <T> times others of:`.
fn tie_breaker(description: &str) -> Option<f64> {
    let rest = description.strip_prefix("max plus ")?;
    let (tie, _) = rest.split_once(" times others of")?;
    tie.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn weight(field_term: &str, value: f64) -> Explanation {
        Explanation::new(
            value,
            format!("weight({field_term} in 0) [BM25Similarity], result of:"),
        )
        .with_detail(Explanation::new(value, "score(freq=1.0)"))
    }

    #[test]
    fn sum_of_weights() {
        let explain = Explanation::new(2.5, "sum of:")
            .with_detail(weight("title:rambo", 1.5))
            .with_detail(weight("overview:soldier", 1.0));
        let vector = explain.vectorize();
        assert_eq!(vector.get("title:rambo"), Some(1.5));
        assert_eq!(vector.get("overview:soldier"), Some(1.0));
        assert_eq!(vector.len(), 2);
        assert_eq!(explain.contribution(), 2.5);
    }

    #[test]
    fn repeated_dimensions_accumulate() {
        let explain = Explanation::new(3.0, "sum of:")
            .with_detail(weight("title:rambo", 1.0))
            .with_detail(Explanation::new(2.0, "sum of:").with_detail(weight("title:rambo", 2.0)));
        assert_eq!(explain.vectorize().get("title:rambo"), Some(3.0));
    }

    #[test]
    fn max_of_keeps_best_child() {
        let explain = Explanation::new(2.0, "max of:")
            .with_detail(weight("title:rambo", 2.0))
            .with_detail(weight("overview:rambo", 0.5));
        let vector = explain.vectorize();
        assert_eq!(vector.get("title:rambo"), Some(2.0));
        assert_eq!(vector.get("overview:rambo"), None);
    }

    #[test]
    fn max_plus_scales_others() {
        let explain = Explanation::new(2.05, "max plus 0.1 times others of:")
            .with_detail(weight("title:rambo", 2.0))
            .with_detail(weight("overview:rambo", 0.5));
        let vector = explain.vectorize();
        assert_eq!(vector.get("title:rambo"), Some(2.0));
        assert_eq!(vector.get("overview:rambo"), Some(0.05));
    }

    #[test]
    fn product_scales_by_constant_factors() {
        let explain = Explanation::new(1.0, "product of:")
            .with_detail(
                Explanation::new(2.0, "sum of:")
                    .with_detail(weight("title:rambo", 1.5))
                    .with_detail(weight("title:blood", 0.5)),
            )
            .with_detail(Explanation::new(0.5, "coord(1/2)"));
        let vector = explain.vectorize();
        assert_eq!(vector.get("title:rambo"), Some(0.75));
        assert_eq!(vector.get("title:blood"), Some(0.25));
    }

    #[test]
    fn product_of_constants_is_a_leaf() {
        let explain = Explanation::new(6.0, "product of:")
            .with_detail(Explanation::new(2.0, "boost"))
            .with_detail(Explanation::new(3.0, "queryNorm"));
        assert_eq!(explain.vectorize().get("product of:"), Some(6.0));
    }

    #[test]
    fn non_matching_and_zero_nodes_are_ignored() {
        let mut miss = weight("title:other", 1.0);
        miss.matched = false;
        let explain = Explanation::new(1.0, "sum of:")
            .with_detail(weight("title:rambo", 1.0))
            .with_detail(miss)
            .with_detail(Explanation::new(0.0, "no match on required clause"));
        let vector = explain.vectorize();
        assert_eq!(vector.len(), 1);
        assert!(Explanation::empty().vectorize().is_empty());
        assert_eq!(Explanation::empty().contribution(), 0.0);
    }

    #[test]
    fn generic_leaf_uses_description() {
        let explain = Explanation::new(1.0, "ConstantScore(genre:war)");
        assert_eq!(explain.vectorize().get("ConstantScore(genre:war)"), Some(1.0));
    }

    #[test]
    fn match_details_hold_node_text() {
        let explain = Explanation::new(1.5, "sum of:").with_detail(weight("title:rambo", 1.5));
        let details = explain.match_details();
        assert_eq!(
            details["title:rambo"],
            "1.5 = weight(title:rambo in 0) [BM25Similarity], result of:\n  1.5 = score(freq=1.0)\n"
        );
    }

    #[test]
    fn parses_json_payload() {
        let payload = json!({
            "value": 2.5,
            "description": "sum of:",
            "details": [
                {"value": 1.5, "description": "weight(title:rambo in 0)", "details": []},
                {"value": 1.0, "description": "weight(overview:soldier in 0)"},
            ],
        });
        let explain = Explanation::from_value(&payload).unwrap();
        assert_eq!(explain.details.len(), 2);
        assert_eq!(explain.vectorize().get("overview:soldier"), Some(1.0));
    }

    #[test]
    fn parses_structured_solr_payload() {
        let payload = json!({
            "match": true,
            "value": 1.0,
            "description": "sum of:",
            "details": [
                {"match": true, "value": 1.0, "description": "weight(title:rambo in 0)"},
                {"match": false, "value": 0.0, "description": "no matching term"},
            ],
        });
        let explain = Explanation::from_value(&payload).unwrap();
        assert!(!explain.details[1].matched);
        assert_eq!(explain.vectorize().len(), 1);
    }

    #[test]
    fn parses_json_string_payload() {
        let payload = json!(r#"{"value": 1.0, "description": "weight(title:rambo in 0)"}"#);
        let explain = Explanation::from_value(&payload).unwrap();
        assert_eq!(explain.value, 1.0);
    }

    #[test]
    fn parses_text_payload() {
        let text = "\n2.5 = sum of:\n  1.5 = weight(title:rambo in 0) [BM25Similarity], result of:\n    1.5 = score(freq=1.0)\n  1 = weight(overview:soldier in 0) [BM25Similarity], result of:\n    1 = score(freq=1.0)\n";
        let explain: Explanation = text.parse().unwrap();
        assert_eq!(explain.value, 2.5);
        assert_eq!(explain.details.len(), 2);
        assert_eq!(explain.details[0].details.len(), 1);
        assert_eq!(explain.to_string(), text.trim_start());
    }

    #[test]
    fn text_errors_carry_line_numbers() {
        let err = "1.0 = sum of:\n  oops".parse::<Explanation>().unwrap_err();
        assert!(matches!(err, ExplainError::Text { line: 2, .. }));
        let err = "abc = sum of:".parse::<Explanation>().unwrap_err();
        assert!(matches!(err, ExplainError::Text { line: 1, .. }));
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(
            Explanation::from_value(&json!(3)),
            Err(ExplainError::Malformed(_))
        ));
        assert!(matches!(
            Explanation::from_value(&json!({"description": "x"})),
            Err(ExplainError::Malformed(_))
        ));
        assert!(matches!(
            "1.0 = a\n2.0 = b".parse::<Explanation>(),
            Err(ExplainError::Malformed(_))
        ));
        assert!(matches!("   ".parse::<Explanation>(), Err(ExplainError::Empty)));
        assert!(matches!(
            Explanation::from_value(&json!("{not json")),
            Err(ExplainError::Json(_))
        ));
    }

    #[test]
    fn dimension_names() {
        assert_eq!(weight_dimension("weight(title:rambo in 12) [x]"), Some("title:rambo"));
        assert_eq!(weight_dimension("weight(title:rambo)"), Some("title:rambo"));
        assert_eq!(weight_dimension("sum of:"), None);
        assert_eq!(tie_breaker("max plus 0.3 times others of:"), Some(0.3));
    }
}
