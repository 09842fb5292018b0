// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Translation of configuration trees into FRR configurations

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

/* Output assembly */
pub mod builder;

/* Tree traversal and command emission */
pub mod engine;

pub mod errors;

/* Inputs */
pub mod priority;
pub mod ruleset;
pub mod steps;

/* Command templates */
pub mod template;

/* Full runs */
pub mod translator;

pub use builder::{ConfigBuilder, MARKER};
pub use engine::{Emitter, translate};
pub use errors::TranslateError;
pub use priority::{Priority, PriorityTable};
pub use ruleset::{RuleMap, RuleSet, RuleSetRegistry, Templates};
pub use steps::{Pipeline, Selector, Step, StepDescriptor};
pub use template::{CommandFiller, TemplateFiller};
pub use translator::{Translator, TranslatorParams, TranslatorParamsBuilder, translate_tree};

use tracectl::trace_target;
use tracing::level_filters::LevelFilter;

trace_target!("translate", LevelFilter::INFO, &["translate"]);
