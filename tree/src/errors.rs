// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors of the config tree crate

use std::path::PathBuf;
use thiserror::Error;

/// Failures to obtain a config tree
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Failed to read '{}': {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid config tree: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Malformed relative references. These never abort a translation: a reference that
/// does not parse simply resolves to nothing.
#[derive(Debug, Error, PartialEq)]
pub enum ReferenceError {
    #[error("Empty reference")]
    Empty,

    #[error("Reference '{0}' does not end with a terminal marker")]
    NoTerminal(String),

    #[error("Reference '{0}' escapes to an ancestor after descending")]
    EscapeAfterDescent(String),

    #[error("Reference '{0}' has segments after its terminal marker")]
    TrailingSegments(String),
}
