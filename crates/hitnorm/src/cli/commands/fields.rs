//! Implementation of `hitnorm fields`.

use std::process::ExitCode;

use hitnorm_fieldspec::{FieldSpec, Subs, TypedField};
use serde::Serialize;

use crate::cli::{
    args::FieldsCommand,
    context::CommandContext,
    output::{key_value_table, print_json},
};

/// JSON output for `hitnorm fields`.
#[derive(Serialize)]
struct JsonFields<'a> {
    /// The resolved spec.
    spec: &'a FieldSpec,
    /// Fields to request from the engine.
    field_list: String,
    /// Fields to request highlighting for.
    highlight_fields: &'a [String],
}

/// Resolves a field spec and shows the role of every field.
pub fn run(ctx: &CommandContext, cmd: &FieldsCommand) -> ExitCode {
    let spec = match ctx.field_spec(cmd.spec.as_deref()) {
        Ok(spec) => spec,
        Err(code) => return code,
    };

    if cmd.output.json {
        return print_json(&JsonFields {
            spec: &spec,
            field_list: spec.field_list().to_string(),
            highlight_fields: spec.highlight_field_list(),
        });
    }

    println!("{}", key_value_table(rows(&spec)));
    ExitCode::SUCCESS
}

/// One row per populated role, in display order.
fn rows(spec: &FieldSpec) -> Vec<(&str, String)> {
    let mut rows = vec![("id", spec.id().to_string()), ("title", spec.title().to_string())];
    for typed in spec.typed_fields() {
        if !matches!(typed.kind.as_str(), "id" | "title") {
            rows.push((typed.kind.as_str(), describe_typed(typed)));
        }
    }
    let subs = match spec.subs() {
        Subs::Wildcard => "* (every other field)".to_string(),
        Subs::List(names) => names.join(", "),
    };
    rows.push(("subs", subs));
    for (role, names) in [
        ("highlights", spec.highlights()),
        ("functions", spec.functions()),
        ("embeds", spec.embeds()),
        ("translations", spec.translations()),
        ("unabridged", spec.unabridgeds()),
    ] {
        if !names.is_empty() {
            rows.push((role, names.join(", ")));
        }
    }
    rows.push(("field list", spec.field_list().to_string()));
    rows
}

/// Field name plus its options, if any.
fn describe_typed(typed: &TypedField) -> String {
    match &typed.options {
        Some(options) => format!(
            "{} {}",
            typed.name,
            serde_json::Value::Object(options.clone())
        ),
        None => typed.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use hitnorm_fieldspec::parse;

    use super::*;

    #[test]
    fn rows_cover_populated_roles() {
        let spec = parse("id:isbn title:name thumb:cover hl:overview f:popularity").unwrap();
        let rows = rows(&spec);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            ["id", "title", "thumb", "subs", "highlights", "functions", "field list"]
        );
        assert_eq!(rows[2].1, "cover");
    }

    #[test]
    fn wildcard_subs_are_described() {
        let spec = parse("id:id title:name *").unwrap();
        assert!(rows(&spec).iter().any(|(k, v)| *k == "subs" && v.starts_with('*')));
    }
}
