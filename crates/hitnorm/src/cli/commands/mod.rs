//! Command implementations and dispatch.

pub mod config;
pub mod escape;
pub mod fields;
pub mod hydrate;
pub mod init;
pub mod normalize;
pub mod url;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Fields(cmd) => fields::run(ctx, &cmd),
        Commands::Normalize(cmd) => normalize::run(ctx, &cmd),
        Commands::Url { what } => url::run(&what),
        Commands::Escape(cmd) => escape::run(&cmd),
        Commands::Hydrate(cmd) => hydrate::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, cmd),
        Commands::Config => config::run(ctx),
    }
}
