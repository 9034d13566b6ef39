//! Implementation of `hitnorm hydrate`.

use std::process::ExitCode;

use hitnorm_url::{HydrateOptions, hydrate, hydrate_str};
use serde_json::Value;

use crate::cli::{
    args::HydrateCommand,
    context::CommandContext,
    input::read_json,
    output::print_json,
};

/// Fills a string or JSON template with the query.
pub fn run(ctx: &CommandContext, cmd: &HydrateCommand) -> ExitCode {
    let q_option = match cmd.q_option.as_deref().map(serde_json::from_str::<Value>) {
        Some(Ok(value)) => Some(value),
        Some(Err(e)) => {
            eprintln!("error: invalid --q-option JSON: {e}");
            return ExitCode::FAILURE;
        }
        None => None,
    };
    let options = HydrateOptions {
        q_option,
        encode_uri: cmd.encode_uri || ctx.config.query.encode_uri,
        default_keyword: cmd
            .default_keyword
            .clone()
            .unwrap_or_else(|| ctx.config.query.default_keyword.clone()),
    };

    if let Some(template) = &cmd.template {
        println!("{}", hydrate_str(template, &cmd.query, &options));
        return ExitCode::SUCCESS;
    }

    let Some(path) = &cmd.file else {
        eprintln!("error: either --template or --file is required");
        return ExitCode::FAILURE;
    };
    match read_json(path) {
        Ok(template) => print_json(&hydrate(&template, &cmd.query, &options)),
        Err(code) => code,
    }
}
