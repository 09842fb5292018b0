// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The errors that stop a translation.

use std::path::PathBuf;
use thiserror::Error;
use tree::TreeError;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Failed to read '{}': {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid priorities: {0}")]
    Priorities(#[source] serde_json::Error),

    #[error("Invalid steps: {0}")]
    Steps(#[source] serde_json::Error),

    #[error("Invalid translate selector '{0}': expected a list of files or \"remaining\"")]
    BadSelector(String),

    #[error("Step {0} refers to unknown command file '{1}'")]
    UnknownRuleSet(usize, String),

    #[error("Invalid command file '{0}': {1}")]
    RuleSet(String, #[source] serde_json::Error),

    #[error("Failed to list command files in '{}': {}", .0.display(), .1)]
    Discovery(PathBuf, #[source] std::io::Error),
}
