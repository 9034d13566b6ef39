//! Document normalization for hitnorm.
//!
//! This crate maps raw engine hits onto one canonical shape. It supports:
//! - A [`SearchHit`] seam that engine adapters implement, with [`RawHit`] as the plain
//!   JSON-backed default
//! - Broadcasting traversal of dotted field paths over nested objects and arrays
//! - [`NormalDoc`] construction from a parsed field spec, tolerant of malformed sources

#![warn(missing_docs)]

mod error;
mod hit;
mod normal;
mod value;

pub use error::DocumentError;
pub use hit::{ExplainMap, Highlighting, RawHit, SearchHit, join_fragments};
pub use normal::{NormalDoc, SubField};
pub use value::{PathValue, display_string, resolve_field, traverse};
