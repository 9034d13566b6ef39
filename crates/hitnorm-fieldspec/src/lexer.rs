//! Field spec lexer.
//!
//! Splits a field spec string into tokens. Tokens are separated by whitespace, commas, or
//! `+`. A token starting with `{` runs to its matching `}` and may contain separators.

use std::{iter::Peekable, str::CharIndices};

use crate::error::FieldSpecError;

/// A token in a field spec string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A JSON object literal, braces included.
    Object {
        /// Raw JSON text.
        json: String,
        /// Byte position of the opening brace.
        position: usize,
    },

    /// A colon chain: zero or more field types followed by a field name.
    ///
    /// `hl:sub:text` produces `Chain(["hl", "sub", "text"])`; a bare `title` produces
    /// `Chain(["title"])`.
    Chain(Vec<String>),
}

/// Returns true for characters that separate tokens.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ',' || ch == '+'
}

/// Tokenizes a field spec string.
struct Lexer<'a> {
    /// Character iterator with byte offsets.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenizes the entire input.
    fn tokenize(mut self) -> Result<Vec<Token>, FieldSpecError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, FieldSpecError> {
        self.skip_separators();

        let Some(&(position, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        if ch == '{' {
            return self.read_object(position).map(Some);
        }
        Ok(Some(self.read_chain()))
    }

    /// Reads a `{...}` literal, honouring nested braces and JSON strings.
    fn read_object(&mut self, position: usize) -> Result<Token, FieldSpecError> {
        let mut json = String::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (_, ch) in self.chars.by_ref() {
            json.push(ch);
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Token::Object { json, position });
                    }
                }
                _ => {}
            }
        }

        Err(FieldSpecError::UnclosedObject { position })
    }

    /// Reads a colon chain up to the next separator.
    fn read_chain(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if is_separator(ch) {
                break;
            }
            word.push(ch);
            self.chars.next();
        }
        Token::Chain(word.split(':').map(str::to_string).collect())
    }

    /// Skips separator characters.
    fn skip_separators(&mut self) {
        while self.chars.next_if(|&(_, ch)| is_separator(ch)).is_some() {}
    }
}

/// Tokenizes a field spec string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, FieldSpecError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(parts: &[&str]) -> Token {
        Token::Chain(parts.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("  , + ").unwrap(), vec![]);
    }

    #[test]
    fn bare_names() {
        assert_eq!(
            tokenize("title body").unwrap(),
            vec![chain(&["title"]), chain(&["body"])]
        );
    }

    #[test]
    fn all_separators() {
        assert_eq!(
            tokenize("id:id+title:name,  sub:year\tsub:genre").unwrap(),
            vec![
                chain(&["id", "id"]),
                chain(&["title", "name"]),
                chain(&["sub", "year"]),
                chain(&["sub", "genre"]),
            ]
        );
    }

    #[test]
    fn multi_type_chain() {
        assert_eq!(
            tokenize("hl:sub:overview").unwrap(),
            vec![chain(&["hl", "sub", "overview"])]
        );
    }

    #[test]
    fn object_with_internal_whitespace() {
        let tokens = tokenize(r#"id:id {"name": "poster", "type": "thumb", "width": 100} sub:a"#)
            .unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[1],
            Token::Object {
                json: r#"{"name": "poster", "type": "thumb", "width": 100}"#.into(),
                position: 6,
            }
        );
        assert_eq!(tokens[2], chain(&["sub", "a"]));
    }

    #[test]
    fn object_with_nested_braces_and_strings() {
        let tokens = tokenize(r#"{"name":"a","type":"image","style":{"x":"}{"}}"#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], Token::Object { json, .. } if json.ends_with("}}")));
    }

    #[test]
    fn object_keeps_plus_inside_strings() {
        let tokens = tokenize(r#"{"name":"a+b","type":"thumb"}"#).unwrap();
        assert!(matches!(&tokens[0], Token::Object { json, .. } if json.contains("a+b")));
    }

    #[test]
    fn unclosed_object() {
        let err = tokenize(r#"id:id {"name":"x""#).unwrap_err();
        assert_eq!(err, FieldSpecError::UnclosedObject { position: 6 });
    }
}
