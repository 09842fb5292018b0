// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ordered configuration trees and the addressing scheme used to translate them.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod errors;
pub mod node;
pub mod path;
pub mod reference;

pub use errors::{ReferenceError, TreeError};
pub use node::{COMPOUND_SEPARATOR, ConfigNode, Scalar};
pub use path::NodePath;
pub use reference::{AncestorStack, Reference, Resolved, Terminal};

use tracectl::trace_target;
use tracing::level_filters::LevelFilter;

trace_target!("config-tree", LevelFilter::INFO, &["translate"]);
