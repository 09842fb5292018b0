// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Priority-based reordering of sibling keys.
//!
//! Some FRR commands must appear before others (e.g. a VRF must be declared before it
//! is used). The priority table names, per tree path, the keys that must be visited
//! first and the keys that must be visited last. Sorting is a single pass over the
//! tree, done once before any command is emitted.

use ordermap::OrderMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use tree::{ConfigNode, NodePath};

use crate::errors::TranslateError;

/// The keys to move to the front (`first`) and to the back (`last`) of a mapping
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Priority {
    #[serde(default)]
    pub first: Vec<String>,
    #[serde(default)]
    pub last: Vec<String>,
}

impl Priority {
    #[must_use]
    pub fn new(first: &[&str], last: &[&str]) -> Self {
        Self {
            first: first.iter().map(ToString::to_string).collect(),
            last: last.iter().map(ToString::to_string).collect(),
        }
    }

    /// Reorder the keys of `map`. The keys in `first` end up at the front in the order
    /// they are listed; the keys in `last` end up at the back, also in listed order.
    /// Keys that the mapping does not have are ignored.
    fn apply(&self, map: &mut OrderMap<String, ConfigNode>) {
        for key in self.first.iter().rev() {
            if let Some(index) = map.get_index_of(key.as_str()) {
                map.move_index(index, 0);
            }
        }
        for key in &self.last {
            if let Some(index) = map.get_index_of(key.as_str()) {
                map.move_index(index, map.len() - 1);
            }
        }
    }
}

/// Priorities for each tree path
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct PriorityTable(HashMap<String, Priority>);

impl PriorityTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(input: &str) -> Result<Self, TranslateError> {
        serde_json::from_str(input).map_err(TranslateError::Priorities)
    }

    pub fn read_from(path: &Path) -> Result<Self, TranslateError> {
        debug!("Reading priorities from {}", path.display());
        let data = fs::read_to_string(path).map_err(|e| TranslateError::Io(path.to_path_buf(), e))?;
        Self::from_json(&data)
    }

    pub fn insert(&mut self, path: &str, priority: Priority) {
        self.0.insert(path.to_owned(), priority);
    }

    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&Priority> {
        self.0.get(path.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reorder, in place, the keys of every mapping of `tree` that has priorities.
    /// Parents are sorted before their children are visited. Sorting twice with the same
    /// table gives the same tree as sorting once.
    pub fn sort(&self, tree: &mut ConfigNode) {
        self.sort_node(tree, &NodePath::root());
    }

    fn sort_node(&self, node: &mut ConfigNode, path: &NodePath) {
        match node {
            ConfigNode::Mapping(map) => {
                if let Some(priority) = self.get(path) {
                    debug!("Sorting keys of {path}");
                    priority.apply(map);
                }
                for (key, child) in map.iter_mut() {
                    self.sort_node(child, &path.child(key));
                }
            }
            ConfigNode::Sequence(elements) => {
                let path = path.element();
                for element in elements {
                    self.sort_node(element, &path);
                }
            }
            ConfigNode::Scalar(_) => {}
        }
    }
}
