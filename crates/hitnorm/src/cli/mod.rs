//! CLI support for the `hitnorm` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod input;
pub mod output;

pub use context::CommandContext;
