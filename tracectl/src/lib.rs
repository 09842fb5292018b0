// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Logging control for the translator.
//!
//! Crates declare their log targets with [`trace_target!`]; the declarations are gathered
//! at link time so that the levels of all of them can be set from the command line.

pub mod control;
pub mod display;
pub mod targets;

// re-exports
pub use control::{TraceCtlError, TracingControl, get_trace_ctl};
pub use tracing::level_filters::LevelFilter;
