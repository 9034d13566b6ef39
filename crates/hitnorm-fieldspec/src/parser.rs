//! Field spec resolution.
//!
//! Turns a token stream into a [`FieldSpec`]. Each token names a field and one or more
//! roles for it:
//!
//! ```text
//! token  → object | chain
//! object → "{" "name": NAME, "type": TYPE, OPTION* "}"
//! chain  → (TYPE ":")* NAME
//! ```
//!
//! Bucketed roles (`sub`, `hl`, `media`, `translate`, `unabridged`, `function`) append
//! to a list. Every other role is single-valued and the first occurrence wins.

use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

use crate::{
    error::FieldSpecError,
    lexer::{Token, tokenize},
    spec::{FieldOptions, FieldSpec, Subs, TypedField, WILDCARD},
};

/// Spec used when none is given, or when the spec starts with a bare `*`.
pub const DEFAULT_SPEC: &str = "id:id title:id *";

/// The role a type token assigns to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRole<'a> {
    /// `f`, `func`, `function`: a function query.
    Function,
    /// `hl`, `highlight`: a highlighted field.
    Highlight,
    /// `media`: an embedded media field.
    Embed,
    /// `translate`: a field offered for translation.
    Translation,
    /// `unabridged`: a field shown without truncation.
    Unabridged,
    /// `sub`: a displayed sub field.
    Sub,
    /// Any other type: a single-valued role, first occurrence wins.
    Single(&'a str),
}

impl<'a> FieldRole<'a> {
    /// Maps a type token onto its role.
    fn from_type(kind: &'a str) -> Self {
        match kind {
            "f" | "func" | "function" => Self::Function,
            "hl" | "highlight" => Self::Highlight,
            "media" => Self::Embed,
            "translate" => Self::Translation,
            "unabridged" => Self::Unabridged,
            "sub" => Self::Sub,
            other => Self::Single(other),
        }
    }
}

/// Accumulates roles while tokens are resolved.
#[derive(Default)]
struct Resolver {
    /// Every field name seen.
    fields: Vec<String>,
    /// Single-valued roles.
    typed: Vec<TypedField>,
    /// Media embeds.
    embeds: Vec<String>,
    /// Translations.
    translations: Vec<String>,
    /// Unabridged fields.
    unabridgeds: Vec<String>,
    /// Highlights.
    highlights: Vec<String>,
    /// Function queries.
    functions: Vec<String>,
    /// Sub fields.
    subs: Subs,
}

impl Resolver {
    /// Returns true once a title role has been assigned.
    fn has_title(&self) -> bool {
        self.typed.iter().any(|f| f.kind == "title")
    }

    /// Resolves one token.
    fn resolve(&mut self, token: Token) -> Result<(), FieldSpecError> {
        match token {
            Token::Object { json, position } => self.resolve_object(&json, position),
            Token::Chain(mut parts) => {
                let name = parts.pop().unwrap_or_default();
                if name.is_empty() {
                    return Ok(());
                }
                if parts.is_empty() {
                    self.add_bare(name, None);
                } else {
                    for kind in parts.iter().filter(|k| !k.is_empty()) {
                        self.add(FieldRole::from_type(kind), name.clone(), None);
                    }
                }
                Ok(())
            }
        }
    }

    /// Resolves a JSON field definition.
    fn resolve_object(&mut self, json: &str, position: usize) -> Result<(), FieldSpecError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| FieldSpecError::InvalidObject {
                position,
                message: e.to_string(),
            })?;
        let Value::Object(mut options) = value else {
            return Err(FieldSpecError::InvalidObject {
                position,
                message: "expected a JSON object".into(),
            });
        };

        let name = match options.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => {
                trace!(position, "field definition without a name ignored");
                return Ok(());
            }
        };
        let kind = options.remove("type");

        match kind {
            Some(Value::String(kind)) if !kind.is_empty() => {
                self.add(FieldRole::from_type(&kind), name, Some(options));
            }
            _ => self.add_bare(name, Some(options)),
        }
        Ok(())
    }

    /// A name with no type becomes the title, or a sub once a title exists.
    fn add_bare(&mut self, name: String, options: Option<FieldOptions>) {
        if self.has_title() {
            self.add(FieldRole::Sub, name, options);
        } else {
            self.add(FieldRole::Single("title"), name, options);
        }
    }

    /// Assigns a role to a field.
    fn add(&mut self, role: FieldRole<'_>, name: String, options: Option<FieldOptions>) {
        let name = match role {
            FieldRole::Function => {
                let bare = name.strip_prefix('$').unwrap_or(&name);
                let function = format!("{bare}:${bare}");
                self.functions.push(function.clone());
                function
            }
            FieldRole::Highlight => push_returning(&mut self.highlights, name),
            FieldRole::Embed => push_returning(&mut self.embeds, name),
            FieldRole::Translation => push_returning(&mut self.translations, name),
            FieldRole::Unabridged => push_returning(&mut self.unabridgeds, name),
            FieldRole::Sub => {
                if name == WILDCARD {
                    self.subs = Subs::Wildcard;
                } else if let Subs::List(subs) = &mut self.subs {
                    subs.push(name.clone());
                }
                name
            }
            FieldRole::Single(kind) => {
                if self.typed.iter().any(|f| f.kind == kind) {
                    trace!(kind, field = %name, "duplicate field type ignored");
                } else {
                    self.typed.push(TypedField {
                        kind: kind.to_string(),
                        name: name.clone(),
                        options,
                    });
                }
                name
            }
        };
        self.fields.push(name);
    }

    /// Applies the id and title defaults and produces the spec.
    fn finish(mut self, source: String) -> FieldSpec {
        let id = match self.typed.iter().find(|f| f.kind == "id") {
            Some(field) => field.name.clone(),
            None => {
                self.fields.push("id".into());
                "id".into()
            }
        };
        let title = self
            .typed
            .iter()
            .find(|f| f.kind == "title")
            .map_or_else(|| id.clone(), |f| f.name.clone());

        FieldSpec {
            source,
            fields: self.fields,
            id,
            title,
            typed: self.typed,
            embeds: self.embeds,
            translations: self.translations,
            unabridgeds: self.unabridgeds,
            highlights: self.highlights,
            functions: self.functions,
            subs: self.subs,
        }
    }
}

/// Pushes a name onto a bucket and hands it back for the field list.
fn push_returning(bucket: &mut Vec<String>, name: String) -> String {
    bucket.push(name.clone());
    name
}

/// Rewrites empty specs and specs starting with a bare `*` to [`DEFAULT_SPEC`].
pub fn normalize_spec(spec: &str) -> Cow<'_, str> {
    let first = spec
        .split(|c: char| c.is_whitespace() || c == ',')
        .find(|part| !part.is_empty());
    match first {
        None | Some(WILDCARD) => Cow::Borrowed(DEFAULT_SPEC),
        Some(_) => Cow::Borrowed(spec),
    }
}

/// Parses a field spec string.
///
/// # Example
///
/// ```
/// let spec = hitnorm_fieldspec::parse("id:id title:name sub:year").unwrap();
/// assert_eq!(spec.title(), "name");
/// ```
pub fn parse(spec: &str) -> Result<FieldSpec, FieldSpecError> {
    let spec = normalize_spec(spec);
    let mut resolver = Resolver::default();
    for token in tokenize(&spec)? {
        resolver.resolve(token)?;
    }
    Ok(resolver.finish(spec.into_owned()))
}
