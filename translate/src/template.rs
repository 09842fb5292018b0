// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Command templates.
//!
//! A template is FRR command text with embedded references to other nodes of the tree:
//!
//! | token          | meaning                                                        |
//! |----------------|----------------------------------------------------------------|
//! | `{REF}`        | value of `REF`; if `REF` has no value the command is dropped    |
//! | `{?REF}`       | value of `REF`, or nothing                                      |
//! | `{REF?TEXT}`   | `TEXT` if `REF` has a value other than empty or `false`         |
//! | `{{` and `}}`  | literal braces                                                  |
//!
//! e.g. `" neighbor {../../@text} remote-as {remote-as/@text}"`. After filling, the
//! indentation of the command is kept, inner runs of whitespace are collapsed and
//! trailing whitespace is removed.

use std::collections::HashMap;
use tracing::debug;

/// Fills command templates with the values of the references they contain
pub trait CommandFiller {
    /// The references embedded in `template`, each listed once, in order of appearance.
    fn references(&self, template: &str) -> Vec<String>;

    /// Render `template` with the resolved `values`. References missing from `values`
    /// have no value. An empty result means that the command must not be emitted.
    fn fill(&self, template: &str, values: &HashMap<String, String>) -> String;
}

#[derive(Debug, Clone, PartialEq)]
enum Piece<'t> {
    Literal(String),
    Mandatory(&'t str),
    Optional(&'t str),
    Conditional(&'t str, &'t str),
}

impl<'t> Piece<'t> {
    fn from_token(token: &'t str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            Piece::Literal("{}".to_owned())
        } else if let Some(reference) = token.strip_prefix('?') {
            Piece::Optional(reference.trim())
        } else if let Some((reference, text)) = token.split_once('?') {
            Piece::Conditional(reference.trim(), text)
        } else {
            Piece::Mandatory(token)
        }
    }
    fn reference(&self) -> Option<&'t str> {
        match self {
            Piece::Literal(_) => None,
            Piece::Mandatory(r) | Piece::Optional(r) | Piece::Conditional(r, _) => Some(*r),
        }
    }
}

fn parse(template: &str) -> Vec<Piece<'_>> {
    let mut pieces = vec![];
    let mut literal = String::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        let brace = if rest[pos..].starts_with('{') { '{' } else { '}' };
        let after = &rest[pos + 1..];

        if let Some(escaped) = after.strip_prefix(brace) {
            literal.push(brace);
            rest = escaped;
            continue;
        }
        if brace == '}' {
            literal.push(brace);
            rest = after;
            continue;
        }
        let Some(end) = after.find('}') else {
            // unterminated: literal text
            literal.push(brace);
            rest = after;
            continue;
        };
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        pieces.push(Piece::from_token(&after[..end]));
        rest = &after[end + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    pieces
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "false"
}

/// Keep the indentation, collapse inner whitespace, drop trailing whitespace
fn normalize(command: &str) -> String {
    let body = command.trim_start();
    let indent = &command[..command.len() - body.len()];
    let body = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if body.is_empty() {
        return String::new();
    }
    format!("{indent}{body}")
}

/// [`CommandFiller`] for the brace template syntax
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateFiller;

impl TemplateFiller {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandFiller for TemplateFiller {
    fn references(&self, template: &str) -> Vec<String> {
        let mut refs: Vec<String> = vec![];
        for reference in parse(template).iter().filter_map(Piece::reference) {
            if !refs.iter().any(|r| r == reference) {
                refs.push(reference.to_owned());
            }
        }
        refs
    }

    fn fill(&self, template: &str, values: &HashMap<String, String>) -> String {
        let mut command = String::with_capacity(template.len());
        for piece in parse(template) {
            match piece {
                Piece::Literal(text) => command.push_str(&text),
                Piece::Mandatory(reference) => {
                    let Some(value) = values.get(reference) else {
                        debug!("Dropping '{template}': '{reference}' has no value");
                        return String::new();
                    };
                    command.push_str(value);
                }
                Piece::Optional(reference) => {
                    if let Some(value) = values.get(reference) {
                        command.push_str(value);
                    }
                }
                Piece::Conditional(reference, text) => {
                    if values.get(reference).is_some_and(|v| is_truthy(v)) {
                        command.push_str(text);
                    }
                }
            }
        }
        normalize(&command)
    }
}
