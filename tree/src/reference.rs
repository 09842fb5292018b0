// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Relative references and their resolution.
//!
//! A reference is a `/`-separated relative path found inside a command template, such as
//! `../../neighbor/@text`. Leading `..` segments escape to ancestors of the node the
//! template belongs to, the following segments descend through mapping keys and the last
//! segment says how the value is rendered: `@text` for a leaf, `@dict` for a container
//! flattened into a single token.

use std::str::FromStr;
use tracing::debug;

use crate::errors::ReferenceError;
use crate::node::ConfigNode;
use crate::path::{COMPOUND, ESCAPE, SEPARATOR, TEXT};

/// How the node reached by a reference is turned into a value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    /// The node as-is (expected to be a scalar)
    Leaf,
    /// The node flattened with [`ConfigNode::compound`]
    Compound,
}

/// A parsed relative reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    escapes: usize,
    descent: Vec<String>,
    terminal: Terminal,
}

impl Reference {
    #[must_use]
    pub fn escapes(&self) -> usize {
        self.escapes
    }
    #[must_use]
    pub fn descent(&self) -> &[String] {
        &self.descent
    }
    #[must_use]
    pub fn terminal(&self) -> Terminal {
        self.terminal
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut segments = input.split(SEPARATOR).filter(|s| !s.is_empty()).peekable();
        if segments.peek().is_none() {
            return Err(ReferenceError::Empty);
        }

        let mut escapes = 0;
        while segments.next_if_eq(&ESCAPE).is_some() {
            escapes += 1;
        }

        let mut descent = vec![];
        let mut terminal = None;
        for segment in segments.by_ref() {
            match segment {
                TEXT => terminal = Some(Terminal::Leaf),
                COMPOUND => terminal = Some(Terminal::Compound),
                ESCAPE => return Err(ReferenceError::EscapeAfterDescent(input.to_owned())),
                key => descent.push(key.to_owned()),
            }
            if terminal.is_some() {
                break;
            }
        }
        if segments.next().is_some() {
            return Err(ReferenceError::TrailingSegments(input.to_owned()));
        }
        let terminal = terminal.ok_or_else(|| ReferenceError::NoTerminal(input.to_owned()))?;
        Ok(Self {
            escapes,
            descent,
            terminal,
        })
    }
}

/// A value obtained by resolving a [`Reference`]
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<'a> {
    /// A node of the tree, rendered with its [`std::fmt::Display`] form
    Node(&'a ConfigNode),
    /// A container already flattened into a single token
    Flattened(String),
}

impl Resolved<'_> {
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Resolved::Node(node) => node.to_string(),
            Resolved::Flattened(token) => token,
        }
    }
}

/// The nodes whose children are being visited, root first. The stack holds the
/// ancestors of the node whose commands are emitted, but never that node itself.
#[derive(Debug, Default)]
pub struct AncestorStack<'a> {
    frames: Vec<&'a ConfigNode>,
}

impl<'a> AncestorStack<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![] }
    }
    pub fn push(&mut self, node: &'a ConfigNode) {
        self.frames.push(node);
    }
    pub fn pop(&mut self) -> Option<&'a ConfigNode> {
        self.frames.pop()
    }
    pub fn clear(&mut self) {
        self.frames.clear();
    }
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The `k`-th ancestor: 1 is the parent, 2 the grand-parent and so on.
    #[must_use]
    pub fn ancestor(&self, k: usize) -> Option<&'a ConfigNode> {
        if k == 0 {
            return None;
        }
        let index = self.frames.len().checked_sub(k)?;
        self.frames.get(index).copied()
    }

    /// Resolve the textual `reference` relative to `node`. Anything that can not be
    /// resolved (missing keys, descent through a non-mapping, escaping above the root or
    /// a malformed reference) yields `None`.
    #[must_use]
    pub fn resolve(&self, node: &'a ConfigNode, reference: &str) -> Option<Resolved<'a>> {
        match reference.parse::<Reference>() {
            Ok(parsed) => self.resolve_parsed(node, &parsed),
            Err(e) => {
                debug!("Unusable reference: {e}");
                None
            }
        }
    }

    #[must_use]
    pub fn resolve_parsed(&self, node: &'a ConfigNode, reference: &Reference) -> Option<Resolved<'a>> {
        let mut current = node;
        if reference.escapes > 0 {
            let Some(ancestor) = self.ancestor(reference.escapes) else {
                debug!(
                    "Can't escape {} levels from depth {}",
                    reference.escapes,
                    self.depth()
                );
                return None;
            };
            current = ancestor;
        }
        for key in &reference.descent {
            let Some(child) = current.get(key) else {
                debug!("Couldn't find '{key}' in {current}");
                return None;
            };
            current = child;
        }
        match reference.terminal {
            Terminal::Leaf => {
                if current.is_container() {
                    debug!("{current} is not a leaf");
                }
                Some(Resolved::Node(current))
            }
            Terminal::Compound => Some(Resolved::Flattened(current.compound())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn tree() -> ConfigNode {
        ConfigNode::from_json(
            r#"{"a": {"b": "x", "list": [{"k": "v", "m": "w"}, {"k": "v2"}]}, "n": 3}"#,
        )
        .expect("Should decode")
    }

    #[test]
    fn test_parse_reference() {
        let r: Reference = "../../neighbor/remote-as/@text".parse().unwrap();
        assert_eq!(r.escapes(), 2);
        assert_eq!(r.descent(), ["neighbor", "remote-as"]);
        assert_eq!(r.terminal(), Terminal::Leaf);

        let r: Reference = "/@dict".parse().unwrap();
        assert_eq!(r.escapes(), 0);
        assert!(r.descent().is_empty());
        assert_eq!(r.terminal(), Terminal::Compound);

        // empty segments are dropped
        let r: Reference = "..//a//@text/".parse().unwrap();
        assert_eq!(r.escapes(), 1);
        assert_eq!(r.descent(), ["a"]);
    }

    #[test]
    fn test_parse_malformed_reference() {
        assert_eq!("".parse::<Reference>(), Err(ReferenceError::Empty));
        assert_eq!("//".parse::<Reference>(), Err(ReferenceError::Empty));
        assert!(matches!(
            "a/b".parse::<Reference>(),
            Err(ReferenceError::NoTerminal(_))
        ));
        assert!(matches!(
            "..".parse::<Reference>(),
            Err(ReferenceError::NoTerminal(_))
        ));
        assert!(matches!(
            "a/../@text".parse::<Reference>(),
            Err(ReferenceError::EscapeAfterDescent(_))
        ));
        assert!(matches!(
            "a/@text/b".parse::<Reference>(),
            Err(ReferenceError::TrailingSegments(_))
        ));
    }

    #[test]
    fn test_resolve_descent() {
        let tree = tree();
        let stack = AncestorStack::new();
        let value = stack.resolve(&tree, "/a/b/@text").map(Resolved::into_text);
        assert_eq!(value.as_deref(), Some("x"));
        assert_eq!(stack.resolve(&tree, "/a/c/@text"), None);
        assert_eq!(
            stack.resolve(&tree, "n/@text").map(Resolved::into_text).as_deref(),
            Some("3")
        );
    }

    #[test]
    fn test_resolve_type_mismatch() {
        let tree = tree();
        let stack = AncestorStack::new();
        // descending through a scalar and through a sequence
        assert_eq!(stack.resolve(&tree, "a/b/c/@text"), None);
        assert_eq!(stack.resolve(&tree, "a/list/k/@text"), None);
    }

    #[traced_test]
    #[test]
    fn test_resolve_leaf_on_container() {
        let tree = tree();
        let stack = AncestorStack::new();
        let value = stack.resolve(&tree, "a/@text");
        assert_eq!(value, Some(Resolved::Node(tree.get("a").unwrap())));
        assert!(logs_contain("is not a leaf"));
    }

    #[test]
    fn test_resolve_compound() {
        let tree = tree();
        let stack = AncestorStack::new();
        let ConfigNode::Sequence(list) = tree.get("a").unwrap().get("list").unwrap() else {
            panic!("Should be a sequence");
        };
        let token = stack.resolve(&list[0], "@dict").map(Resolved::into_text);
        assert_eq!(token.as_deref(), Some("{'k':'v'&'m':'w'}"));
        let token = stack.resolve(&tree, "a/list/@dict").map(Resolved::into_text).unwrap();
        assert_eq!(token, "[{'k':'v'&'m':'w'}&{'k':'v2'}]");
        assert!(!token.contains(' '));
        assert!(!token.contains(','));
    }

    #[test]
    fn test_resolve_escapes() {
        let tree = tree();
        let a = tree.get("a").unwrap();
        let b = a.get("b").unwrap();

        let mut stack = AncestorStack::new();
        stack.push(&tree);
        stack.push(a);
        assert_eq!(stack.depth(), 2);

        let value = stack.resolve(b, "../b/@text").map(Resolved::into_text);
        assert_eq!(value.as_deref(), Some("x"));
        let value = stack.resolve(b, "../../n/@text").map(Resolved::into_text);
        assert_eq!(value.as_deref(), Some("3"));
    }

    #[traced_test]
    #[test]
    fn test_resolve_escape_beyond_root() {
        let tree = tree();
        let mut stack = AncestorStack::new();
        assert_eq!(stack.resolve(&tree, "../n/@text"), None);

        stack.push(&tree);
        let a = tree.get("a").unwrap();
        assert!(stack.resolve(a, "../n/@text").is_some());
        assert_eq!(stack.resolve(a, "../../n/@text"), None);
        assert_eq!(stack.resolve(a, "../../../../../@text"), None);
        assert!(logs_contain("Can't escape"));

        stack.clear();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.ancestor(0), None);
        assert_eq!(stack.ancestor(1), None);
    }

    #[test]
    fn test_resolve_malformed() {
        let tree = tree();
        let stack = AncestorStack::new();
        assert_eq!(stack.resolve(&tree, "a/b"), None);
        assert_eq!(stack.resolve(&tree, ""), None);
    }
}
