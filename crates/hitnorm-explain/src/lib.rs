//! Explain decomposition for hitnorm.
//!
//! Turns engine explain payloads into a [`SparseVector`] of per-term contributions and
//! ranks them as [`HotMatch`]es against a reference score. [`ExplainedDoc`] layers this
//! onto a normalized document, parsing the payload lazily on first use.
//!
//! # Example
//!
//! ```
//! use hitnorm_explain::{SparseVector, combine_additive, combine_overwrite};
//!
//! let mut lhs = SparseVector::new();
//! lhs.set("a", 1.0);
//! let mut rhs = SparseVector::new();
//! rhs.set("a", 2.0);
//!
//! assert_eq!(combine_overwrite(&lhs, &rhs).get("a"), Some(2.0));
//! assert_eq!(combine_additive(&lhs, &rhs).get("a"), Some(3.0));
//! ```

#![warn(missing_docs)]

mod doc;
mod error;
mod explanation;
mod extract;
mod vector;

pub use doc::{ExplainedDoc, HotMatch};
pub use error::ExplainError;
pub use explanation::Explanation;
pub use extract::{docs_with_explain_other, overriding_explain};
pub use vector::{SparseVector, combine_additive, combine_overwrite};
