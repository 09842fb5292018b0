// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Canonical addressing of tree positions.
//!
//! A [`NodePath`] is built while walking the tree: the root is `/`, a mapping child
//! appends `/<key>` and a sequence element appends `/@element`, so that every element
//! of a sequence shares one path. Hooks are addressed with the `/@enter` and `/@exit`
//! suffixes.

use std::fmt::{self, Display};

/// Path separator
pub const SEPARATOR: char = '/';
/// Shared path segment of all the elements of a sequence
pub const ELEMENT: &str = "@element";
/// Hook suffix fired before the children of a node are visited
pub const ENTER: &str = "@enter";
/// Hook suffix fired after the children of a node are visited
pub const EXIT: &str = "@exit";
/// Terminal reference segment: the value of a leaf
pub const TEXT: &str = "@text";
/// Terminal reference segment: a container flattened into one token
pub const COMPOUND: &str = "@dict";
/// Reference segment escaping to the parent of the current origin
pub const ESCAPE: &str = "..";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(String);

impl NodePath {
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        Self(format!("{}{SEPARATOR}{key}", self.0))
    }
    #[must_use]
    pub fn element(&self) -> Self {
        self.child(ELEMENT)
    }
    #[must_use]
    pub fn enter(&self) -> Self {
        self.child(ENTER)
    }
    #[must_use]
    pub fn exit(&self) -> Self {
        self.child(EXIT)
    }
    #[must_use]
    pub fn as_str(&self) -> &str {
        if self.is_root() { "/" } else { &self.0 }
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        let root = NodePath::root();
        assert_eq!(root.as_str(), "/");
        assert_eq!(root.enter().as_str(), "/@enter");
        assert_eq!(root.exit().as_str(), "/@exit");

        let intf = root.child("interfaces").child("dataplane");
        assert_eq!(intf.to_string(), "/interfaces/dataplane");
        assert_eq!(intf.element().as_str(), "/interfaces/dataplane/@element");
        assert_eq!(
            intf.element().child("address").enter().as_str(),
            "/interfaces/dataplane/@element/address/@enter"
        );
    }

    #[test]
    fn test_sequence_elements_share_path() {
        let seq = NodePath::root().child("list");
        assert_eq!(seq.element(), seq.element());
    }
}
