//! Sparse weight vectors over named dimensions.

use std::{collections::HashMap, fmt, sync::OnceLock};

/// A sparse vector mapping dimension names to weights.
///
/// Dimensions keep their insertion order. The rendered form is memoized and cleared by
/// every mutation.
#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    /// Dimensions and weights in insertion order.
    entries: Vec<(String, f64)>,
    /// Dimension name → index into `entries`.
    index: HashMap<String, usize>,
    /// Memoized rendering.
    rendered: OnceLock<String>,
}

impl SparseVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a dimension, overwriting any existing weight.
    pub fn set(&mut self, dimension: &str, weight: f64) {
        match self.index.get(dimension) {
            Some(&i) => self.entries[i].1 = weight,
            None => self.push(dimension, weight),
        }
        self.invalidate();
    }

    /// Adds to a dimension, initializing it if absent.
    pub fn add(&mut self, dimension: &str, weight: f64) {
        match self.index.get(dimension) {
            Some(&i) => self.entries[i].1 += weight,
            None => self.push(dimension, weight),
        }
        self.invalidate();
    }

    /// Returns the weight of a dimension.
    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.index.get(dimension).map(|&i| self.entries[i].1)
    }

    /// Multiplies every weight by `scalar`.
    pub fn scale(&mut self, scalar: f64) {
        for (_, weight) in &mut self.entries {
            *weight *= scalar;
        }
        self.invalidate();
    }

    /// Returns a scaled copy, leaving `self` untouched.
    pub fn scaled(&self, scalar: f64) -> Self {
        let mut scaled = self.clone();
        scaled.scale(scalar);
        scaled
    }

    /// Iterates over dimensions and weights in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(d, w)| (d.as_str(), *w))
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vector has no dimensions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the vector as `"<weight> <dimension>\n"` lines, heaviest first.
    ///
    /// Equal weights keep insertion order. The result is cached until the next mutation.
    pub fn as_str(&self) -> &str {
        self.rendered.get_or_init(|| {
            let mut sorted: Vec<&(String, f64)> = self.entries.iter().collect();
            sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
            sorted
                .into_iter()
                .map(|(dimension, weight)| format!("{} {dimension}\n", format_number(*weight)))
                .collect()
        })
    }

    /// Appends a new dimension.
    fn push(&mut self, dimension: &str, weight: f64) {
        self.index.insert(dimension.to_string(), self.entries.len());
        self.entries.push((dimension.to_string(), weight));
    }

    /// Drops the memoized rendering.
    fn invalidate(&mut self) {
        self.rendered = OnceLock::new();
    }
}

impl PartialEq for SparseVector {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for SparseVector {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        let mut vector = Self::new();
        for (dimension, weight) in iter {
            vector.set(dimension, weight);
        }
        vector
    }
}

/// Unions two vectors; on a shared dimension the weight from `rhs` wins.
pub fn combine_overwrite(lhs: &SparseVector, rhs: &SparseVector) -> SparseVector {
    let mut combined = lhs.clone();
    for (dimension, weight) in rhs.iter() {
        combined.set(dimension, weight);
    }
    combined
}

/// Unions two vectors; weights on a shared dimension are summed.
pub fn combine_additive(lhs: &SparseVector, rhs: &SparseVector) -> SparseVector {
    let mut combined = lhs.clone();
    for (dimension, weight) in rhs.iter() {
        combined.add(dimension, weight);
    }
    combined
}

/// Formats a number the way a script engine prints it: integral values have no
/// fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".into()
    } else if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
