// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Command files (rule sets).
//!
//! A command file maps tree paths to one or more command templates. The files found in
//! the commands directory are registered without being read; a file is parsed the first
//! time a step needs it, and is then marked as consumed so that no later step uses it.

use ordermap::OrderMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tree::NodePath;

use crate::errors::TranslateError;

/// Extension of the command files, compared case-insensitively
pub const RULESET_EXTENSION: &str = ".json";

/// The template(s) registered at a path: a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Templates {
    One(String),
    Many(Vec<String>),
}

impl Templates {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Templates::One(template) => std::slice::from_ref(template),
            Templates::Many(templates) => templates,
        }
    }
}

/// Path to templates mapping
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RuleMap(HashMap<String, Templates>);

impl RuleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_json(name: &str, input: &str) -> Result<Self, TranslateError> {
        serde_json::from_str(input).map_err(|e| TranslateError::RuleSet(name.to_owned(), e))
    }
    pub fn insert(&mut self, path: &str, templates: Templates) {
        self.0.insert(path.to_owned(), templates);
    }
    /// Merge `other` into this mapping. Templates of `other` replace those registered at
    /// the same path.
    pub fn merge(&mut self, other: &RuleMap) {
        self.0
            .extend(other.0.iter().map(|(path, t)| (path.clone(), t.clone())));
    }
    /// The templates registered at `path`, if any
    #[must_use]
    pub fn templates(&self, path: &NodePath) -> &[String] {
        self.0
            .get(path.as_str())
            .map(Templates::as_slice)
            .unwrap_or_default()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One command file
#[derive(Debug)]
pub struct RuleSet {
    name: String,
    source: Option<PathBuf>,
    consumed: bool,
    rules: Option<RuleMap>,
}

impl RuleSet {
    /// A command file named `name` in directory `dir`. Nothing is read yet.
    #[must_use]
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            source: Some(dir.join(name)),
            consumed: false,
            rules: None,
        }
    }
    /// A rule set whose rules are already known
    #[must_use]
    pub fn from_rules(name: &str, rules: RuleMap) -> Self {
        Self {
            name: name.to_owned(),
            source: None,
            consumed: false,
            rules: Some(rules),
        }
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.rules.is_some()
    }
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
    pub(crate) fn set_consumed(&mut self) {
        self.consumed = true;
    }

    fn read(&self) -> Result<RuleMap, TranslateError> {
        let Some(path) = &self.source else {
            return Ok(RuleMap::new());
        };
        debug!("Loading command file {}", path.display());
        let data = fs::read_to_string(path).map_err(|e| TranslateError::Io(path.clone(), e))?;
        RuleMap::from_json(&self.name, &data)
    }

    /// The rules of this file. The file is parsed on the first call only.
    pub fn load(&mut self) -> Result<&RuleMap, TranslateError> {
        if self.rules.is_none() {
            self.rules = Some(self.read()?);
        }
        Ok(self.rules.get_or_insert_default())
    }
}

/// The known command files, by file name
#[derive(Debug, Default)]
pub struct RuleSetRegistry {
    sets: OrderMap<String, RuleSet>,
}

impl RuleSetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every command file in `dir`, in file name order.
    pub fn discover(dir: &Path) -> Result<Self, TranslateError> {
        let entries = fs::read_dir(dir).map_err(|e| TranslateError::Discovery(dir.to_path_buf(), e))?;
        let mut names = vec![];
        for entry in entries {
            let entry = entry.map_err(|e| TranslateError::Discovery(dir.to_path_buf(), e))?;
            let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
                warn!("Ignoring command file with a non UTF-8 name in {}", dir.display());
                continue;
            };
            if name.to_lowercase().ends_with(RULESET_EXTENSION) {
                names.push(name);
            }
        }
        names.sort();

        let mut registry = Self::new();
        for name in &names {
            registry.insert(RuleSet::new(dir, name));
        }
        debug!("Discovered {} command files in {}", registry.len(), dir.display());
        Ok(registry)
    }

    pub fn insert(&mut self, set: RuleSet) {
        self.sets.insert(set.name.clone(), set);
    }
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.sets.get(name)
    }
    pub fn get_mut(&mut self, name: &str) -> Option<&mut RuleSet> {
        self.sets.get_mut(name)
    }
    /// Names of the sets that no step has used yet, in registration order
    #[must_use]
    pub fn unconsumed(&self) -> Vec<String> {
        self.sets
            .values()
            .filter(|set| !set.is_consumed())
            .map(|set| set.name.clone())
            .collect()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
