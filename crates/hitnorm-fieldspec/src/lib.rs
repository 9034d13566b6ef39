//! Field specification mini-language for hitnorm.
//!
//! A field spec tells the normalizer which raw engine fields play which canonical role:
//!
//! - **Typed fields**: `id:isbn`, `title:name`, `thumb:poster`, `image:still`
//! - **Bare names**: `name` - the title if none is set yet, otherwise a sub field
//! - **Subs**: `sub:year`, or `sub:*` for every unclassified field
//! - **Highlights**: `hl:overview`
//! - **Functions**: `f:popularity` - sent as `popularity:$popularity`
//! - **Media/translations/unabridged**: `media:trailer`, `translate:fr`, `unabridged:body`
//! - **JSON definitions**: `{"name": "poster", "type": "thumb", "prefix": "https://img/"}`
//!
//! Roles can be chained (`hl:sub:overview`) and tokens are separated by whitespace,
//! commas, or `+`.
//!
//! # Example
//!
//! ```
//! use hitnorm_fieldspec::{FieldList, parse};
//!
//! let spec = parse("id:isbn title:name hl:sub:overview").unwrap();
//! assert_eq!(spec.id(), "isbn");
//! assert_eq!(spec.highlights(), ["overview"]);
//! assert_eq!(spec.field_list().to_string(), "isbn name overview overview");
//! assert_ne!(spec.field_list(), FieldList::Wildcard);
//! ```

#![warn(missing_docs)]

mod error;
mod lexer;
mod parser;
mod spec;

use std::str::FromStr;

pub use error::FieldSpecError;
pub use lexer::{Token, tokenize};
pub use parser::{DEFAULT_SPEC, normalize_spec, parse};
pub use spec::{
    FieldList, FieldOptions, FieldSpec, Subs, TypedField, WILDCARD, function_display_name,
};

impl FromStr for FieldSpec {
    type Err = FieldSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
