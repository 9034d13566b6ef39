//! hitnorm: search hit normalization from the shell.
//!
//! Reads raw hits exported from a search engine as JSON and prints them in the
//! canonical document shape, with highlighted snippets and explain breakdowns. Also
//! exposes the field spec parser and the query URL codec for inspection. The tool only
//! reads local files and never contacts a search engine.

#![warn(missing_docs)]

pub mod cli;
