//! Rendering and JSON serialization for CLI output.

mod highlight;

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
pub use highlight::{
    Highlighter, colors, dim, emphasize, header, indent_content, subheader, warning,
};
use serde::Serialize;

/// Whether stdout is an interactive terminal.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Prints a value as pretty JSON, syntax highlighted on terminals.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            print_highlighted(&format!("{json}\n"), "json");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints content, highlighted with `syntax` when stdout is a terminal.
pub fn print_highlighted(content: &str, syntax: &str) {
    if stdout_is_terminal() {
        print!("{}", Highlighter::new().highlight(content, syntax));
    } else {
        print!("{content}");
    }
}

/// Creates a table with the house style and the given header row.
pub fn table<const N: usize>(headers: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.map(Cell::new));
    table
}

/// Builds a two-column name/value table.
pub fn key_value_table<'a, I>(rows: I) -> Table
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut table = table(["Field", "Value"]);
    for (key, value) in rows {
        table.add_row([Cell::new(key), Cell::new(value)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_table_renders_rows() {
        let rendered = key_value_table([("id", "1".to_string()), ("title", "Rambo".to_string())])
            .to_string();
        assert!(rendered.contains("Field"));
        assert!(rendered.contains("Rambo"));
    }
}
