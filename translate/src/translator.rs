// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Module that implements a full translation run

use derive_builder::Builder;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, info};
use tree::ConfigNode;

use crate::builder::ConfigBuilder;
use crate::errors::TranslateError;
use crate::priority::PriorityTable;
use crate::ruleset::RuleSetRegistry;
use crate::steps::Pipeline;
use crate::template::{CommandFiller, TemplateFiller};

pub const DEFAULT_INPUT: &str = "/etc/vyatta-routing/frr.json";
pub const DEFAULT_CONFIG_DIR: &str = "/etc/vyatta-routing/configs";

/// Files and directories of the configuration directory
pub const PRIORITIES_FILE: &str = "priorities.json";
pub const STEPS_FILE: &str = "steps.json";
pub const COMMANDS_DIR: &str = "commands";

/// Struct to configure a translation. N.B we derive a builder type
/// `TranslatorParamsBuilder` and provide defaults for each field.
#[derive(Builder, Debug, Clone)]
pub struct TranslatorParams {
    /// The configuration tree to translate
    #[builder(setter(into), default = PathBuf::from(DEFAULT_INPUT))]
    pub input: PathBuf,

    /// Directory with the priorities, the steps and the command files
    #[builder(setter(into), default = PathBuf::from(DEFAULT_CONFIG_DIR))]
    pub config_dir: PathBuf,
}

impl TranslatorParams {
    #[must_use]
    pub fn priorities_path(&self) -> PathBuf {
        self.config_dir.join(PRIORITIES_FILE)
    }
    #[must_use]
    pub fn steps_path(&self) -> PathBuf {
        self.config_dir.join(STEPS_FILE)
    }
    #[must_use]
    pub fn commands_dir(&self) -> PathBuf {
        self.config_dir.join(COMMANDS_DIR)
    }
}

impl Display for TranslatorParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(f, "Translator config")?;
        writeln!(f, "  input     : {}", self.input.display())?;
        writeln!(f, "  priorities: {}", self.priorities_path().display())?;
        writeln!(f, "  steps     : {}", self.steps_path().display())?;
        writeln!(f, "  commands  : {}", self.commands_dir().display())
    }
}

/// Translate an already loaded tree. The tree is sorted in place, then the pipeline is
/// executed. The returned configuration is closed with the final marker.
pub fn translate_tree<F: CommandFiller + ?Sized>(
    tree: &mut ConfigNode,
    priorities: &PriorityTable,
    registry: &mut RuleSetRegistry,
    pipeline: &Pipeline,
    filler: &F,
) -> Result<ConfigBuilder, TranslateError> {
    priorities.sort(tree);

    let mut config = ConfigBuilder::new();
    pipeline.execute_all(tree, registry, filler, &mut config)?;
    config.finish();
    Ok(config)
}

/// Object that reads its inputs from files and translates them
#[derive(Debug)]
pub struct Translator {
    params: TranslatorParams,
}

impl Translator {
    #[must_use]
    pub fn new(params: TranslatorParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &TranslatorParams {
        &self.params
    }

    /// Read every input and translate. All inputs are read before anything is generated;
    /// the command files are read only if some step uses them.
    pub fn translate(&self) -> Result<ConfigBuilder, TranslateError> {
        debug!("{}", self.params);
        let params = &self.params;

        let mut tree = ConfigNode::read_from(&params.input)?;
        let priorities = PriorityTable::read_from(&params.priorities_path())?;
        let mut registry = RuleSetRegistry::discover(&params.commands_dir())?;
        let pipeline = Pipeline::read_from(&params.steps_path(), &registry)?;

        let config = translate_tree(
            &mut tree,
            &priorities,
            &mut registry,
            &pipeline,
            &TemplateFiller::new(),
        )?;
        info!(
            "Translated {} into {} lines",
            params.input.display(),
            config.len()
        );
        debug!("Generated configuration:\n{config}");
        Ok(config)
    }
}
