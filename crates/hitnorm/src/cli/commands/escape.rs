//! Implementation of `hitnorm escape`.

use std::process::ExitCode;

use hitnorm_highlight::escape_html;
use hitnorm_url::escape_user_query;

use crate::cli::args::EscapeCommand;

/// Prints the escaped text.
pub fn run(cmd: &EscapeCommand) -> ExitCode {
    let escaped = if cmd.html {
        escape_html(&cmd.text)
    } else {
        escape_user_query(&cmd.text)
    };
    println!("{escaped}");
    ExitCode::SUCCESS
}
