//! Implementation of `hitnorm config`.

use std::process::ExitCode;

use crate::cli::{
    context::CommandContext,
    output::{dim, print_highlighted, stdout_is_terminal, warning},
};

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match &config.config_root {
        Some(root) => format!("# from {}", root.display()),
        None => "# defaults (no configuration files found)".to_string(),
    };
    if stdout_is_terminal() {
        println!("{}", dim(&source));
    } else {
        println!("{source}");
    }
    print_highlighted(&toml, "toml");

    for w in config.validate() {
        eprintln!("{}", warning(&format!("warning: {w}")));
    }

    ExitCode::SUCCESS
}
