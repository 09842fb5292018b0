// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The ordered configuration tree.
//!
//! A [`ConfigNode`] is what the configuration store hands us: a JSON document where the
//! order of the keys of every object matters. Key order drives both the order in which
//! commands are emitted and the priority-based reordering, so objects are kept in an
//! [`OrderMap`] and never in a hashed map.

use ordermap::OrderMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::TreeError;

/// Marker replacing `", "` when a container is flattened into a single token.
pub const COMPOUND_SEPARATOR: &str = "&";

/// A leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    /// Numbers keep the spelling they had in the source document.
    Number(String),
    Text(String),
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A node of the configuration tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNode {
    Scalar(Scalar),
    /// Object. Sibling order is significant.
    Mapping(OrderMap<String, ConfigNode>),
    /// Array. Elements are anonymous.
    Sequence(Vec<ConfigNode>),
}

impl ConfigNode {
    /// Decode a tree from a JSON string, preserving the order of object keys.
    ///
    /// # Errors
    ///
    /// Fails if the input is not valid JSON.
    pub fn from_json(input: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and decode a tree from the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid JSON.
    pub fn read_from(path: &Path) -> Result<Self, TreeError> {
        debug!("Reading config tree from {}", path.display());
        let data = fs::read_to_string(path).map_err(|e| TreeError::Io(path.to_path_buf(), e))?;
        Self::from_json(&data)
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        !matches!(self, ConfigNode::Scalar(_))
    }

    /// Look up a child by key. Only mappings have keyed children.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&OrderMap<String, ConfigNode>> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The keys of a mapping in their current order. Empty for other nodes.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_mapping()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            ConfigNode::Scalar(Scalar::Text(s)) => {
                out.push('\'');
                out.push_str(s);
                out.push('\'');
            }
            ConfigNode::Scalar(Scalar::Null) => out.push_str("null"),
            ConfigNode::Scalar(scalar) => out.push_str(&scalar.to_string()),
            ConfigNode::Mapping(map) => {
                out.push('{');
                for (n, (key, value)) in map.iter().enumerate() {
                    if n > 0 {
                        out.push_str(", ");
                    }
                    out.push('\'');
                    out.push_str(key);
                    out.push_str("': ");
                    value.write_canonical(out);
                }
                out.push('}');
            }
            ConfigNode::Sequence(seq) => {
                out.push('[');
                for (n, value) in seq.iter().enumerate() {
                    if n > 0 {
                        out.push_str(", ");
                    }
                    value.write_canonical(out);
                }
                out.push(']');
            }
        }
    }

    /// Canonical text form of the node, e.g. `{'k': 'v', 'l': ['a', 1]}`.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    /// The node flattened into a single token that contains neither `", "` nor spaces,
    /// so that it can travel as one field of a generated command.
    #[must_use]
    pub fn compound(&self) -> String {
        self.canonical()
            .replace(", ", COMPOUND_SEPARATOR)
            .replace(' ', "")
    }
}

/// Scalars display as their text, containers in canonical form.
impl Display for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigNode::Scalar(scalar) => scalar.fmt(f),
            _ => write!(f, "{}", self.canonical()),
        }
    }
}

/// Objects decode in document order and numbers with their source text. This relies on
/// the `preserve_order` and `arbitrary_precision` features of `serde_json`.
impl From<Value> for ConfigNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigNode::Scalar(Scalar::Null),
            Value::Bool(b) => ConfigNode::Scalar(Scalar::Bool(b)),
            Value::Number(n) => ConfigNode::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => ConfigNode::Scalar(Scalar::Text(s)),
            Value::Array(elements) => {
                ConfigNode::Sequence(elements.into_iter().map(ConfigNode::from).collect())
            }
            Value::Object(map) => ConfigNode::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigNode::from(value)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ConfigNode::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_order_preserved() {
        let tree = ConfigNode::from_json(r#"{"z": 1, "a": {"y": "x", "b": "c"}, "m": []}"#)
            .expect("Should decode");
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        let inner: Vec<_> = tree.get("a").unwrap().keys().collect();
        assert_eq!(inner, vec!["y", "b"]);
    }

    #[test]
    fn test_scalars() {
        let tree = ConfigNode::from_json(r#"{"s": "txt", "n": 65000, "f": 1.5, "b": true, "z": null}"#)
            .unwrap();
        assert_eq!(tree.get("s").unwrap().to_string(), "txt");
        assert_eq!(tree.get("n").unwrap().to_string(), "65000");
        assert_eq!(tree.get("f").unwrap().to_string(), "1.5");
        assert_eq!(tree.get("b").unwrap().to_string(), "true");
        assert_eq!(tree.get("z").unwrap().to_string(), "");
        assert!(!tree.get("s").unwrap().is_container());
        assert!(tree.get("nope").is_none());
    }

    #[test]
    fn test_number_spelling() {
        let tree =
            ConfigNode::from_json(r#"{"a": 1.0, "b": 1e3, "c": 0.10, "d": 18446744073709551616}"#)
                .unwrap();
        let numbers: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|key| tree.get(key).unwrap().to_string())
            .collect();
        assert_eq!(numbers, vec!["1.0", "1e3", "0.10", "18446744073709551616"]);
        assert_eq!(
            tree.compound(),
            "{'a':1.0&'b':1e3&'c':0.10&'d':18446744073709551616}"
        );
    }

    #[test]
    fn test_get_on_non_mapping() {
        let tree = ConfigNode::from_json(r#"["a", {"k": "v"}]"#).unwrap();
        assert!(tree.get("k").is_none());
        assert_eq!(tree.keys().count(), 0);
    }

    #[test]
    fn test_canonical_and_compound() {
        let tree = ConfigNode::from_json(r#"{"k": "v", "m": "w", "l": ["a b", 2, false, null]}"#)
            .unwrap();
        assert_eq!(
            tree.canonical(),
            "{'k': 'v', 'm': 'w', 'l': ['a b', 2, false, null]}"
        );
        assert_eq!(tree.compound(), "{'k':'v'&'m':'w'&'l':['ab'&2&false&null]}");
        assert_eq!(tree.to_string(), tree.canonical());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ConfigNode::from_json(r#"{"a": "#),
            Err(TreeError::Decode(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let result = ConfigNode::read_from(Path::new("/nonexistent/frrcfg/tree.json"));
        assert!(matches!(result, Err(TreeError::Io(_, _))));
    }
}
