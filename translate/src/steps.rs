// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The translation steps.
//!
//! A translation is a sequence of steps. Each step contributes some static lines and
//! then, if it selects command files, walks the whole tree with the commands of those
//! files. A command file is used by one step at most.

use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tree::ConfigNode;

use crate::builder::ConfigBuilder;
use crate::engine::translate;
use crate::errors::TranslateError;
use crate::ruleset::{RuleMap, RuleSetRegistry};
use crate::template::CommandFiller;

/// Selector keyword for the command files no earlier step used
pub const REMAINING: &str = "remaining";

/// The command files a step uses
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSelector")]
pub enum Selector {
    Files(Vec<String>),
    Remaining,
}

impl Default for Selector {
    fn default() -> Self {
        Selector::Files(vec![])
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelector {
    Keyword(String),
    Files(Vec<String>),
}

impl TryFrom<RawSelector> for Selector {
    type Error = TranslateError;
    fn try_from(raw: RawSelector) -> Result<Self, Self::Error> {
        match raw {
            RawSelector::Keyword(keyword) if keyword == REMAINING => Ok(Selector::Remaining),
            RawSelector::Keyword(keyword) => Err(TranslateError::BadSelector(keyword)),
            RawSelector::Files(files) => Ok(Selector::Files(files)),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Files(files) => write!(f, "[{}]", files.join(", ")),
            Selector::Remaining => write!(f, "{REMAINING}"),
        }
    }
}

/// A step, as described in the steps file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepDescriptor {
    #[serde(default)]
    pub config: Vec<String>,
    #[serde(default)]
    pub translate: Selector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    number: usize,
    lines: Vec<String>,
    selector: Selector,
}

impl Step {
    #[must_use]
    pub fn new(number: usize, lines: Vec<String>, selector: Selector) -> Self {
        Self {
            number,
            lines,
            selector,
        }
    }
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The names of the command files this step uses. `remaining` is resolved
    /// against the registry at the time of the call.
    fn rule_sets(&self, registry: &RuleSetRegistry) -> Vec<String> {
        match &self.selector {
            Selector::Files(files) => files.clone(),
            Selector::Remaining => registry.unconsumed(),
        }
    }

    /// Merge the commands of the files of this step that are not consumed yet, in
    /// selection order, and mark those files as consumed.
    fn merge_rules(&self, registry: &mut RuleSetRegistry) -> Result<RuleMap, TranslateError> {
        let mut rules = RuleMap::new();
        for name in self.rule_sets(registry) {
            let set = registry
                .get_mut(&name)
                .ok_or_else(|| TranslateError::UnknownRuleSet(self.number, name.clone()))?;
            if set.is_consumed() {
                debug!("Step {}: skipping {name}, already used", self.number);
                continue;
            }
            rules.merge(set.load()?);
            set.set_consumed();
            debug!("Step {}: using {name}", self.number);
        }
        Ok(rules)
    }

    /// Execute this step, appending its output to `output`
    pub fn execute<F: CommandFiller + ?Sized>(
        &self,
        tree: &ConfigNode,
        registry: &mut RuleSetRegistry,
        filler: &F,
        output: &mut ConfigBuilder,
    ) -> Result<(), TranslateError> {
        output.extend(&self.lines);
        if self.selector == Selector::default() {
            return Ok(());
        }
        let rules = self.merge_rules(registry)?;
        if rules.is_empty() {
            debug!("Step {}: no commands to apply", self.number);
            return Ok(());
        }
        let emitted = translate(tree, &rules, filler, output);
        debug!("Step {}: emitted {emitted} commands", self.number);
        Ok(())
    }
}

/// The ordered sequence of translation steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// Build a pipeline out of step descriptors. Every command file named explicitly
    /// must be known to the registry.
    pub fn new(
        descriptors: Vec<StepDescriptor>,
        registry: &RuleSetRegistry,
    ) -> Result<Self, TranslateError> {
        let mut steps = Vec::with_capacity(descriptors.len());
        for (number, descriptor) in descriptors.into_iter().enumerate() {
            let unknown = match &descriptor.translate {
                Selector::Files(files) => files.iter().find(|name| !registry.contains(name)),
                Selector::Remaining => None,
            };
            if let Some(unknown) = unknown {
                return Err(TranslateError::UnknownRuleSet(number, unknown.clone()));
            }
            steps.push(Step::new(number, descriptor.config, descriptor.translate));
        }
        Ok(Self { steps })
    }

    pub fn from_json(input: &str, registry: &RuleSetRegistry) -> Result<Self, TranslateError> {
        let descriptors: Vec<StepDescriptor> =
            serde_json::from_str(input).map_err(TranslateError::Steps)?;
        Self::new(descriptors, registry)
    }

    pub fn read_from(path: &Path, registry: &RuleSetRegistry) -> Result<Self, TranslateError> {
        debug!("Reading steps from {}", path.display());
        let data = fs::read_to_string(path).map_err(|e| TranslateError::Io(path.to_path_buf(), e))?;
        Self::from_json(&data, registry)
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Execute all of the steps, in order
    pub fn execute_all<F: CommandFiller + ?Sized>(
        &self,
        tree: &ConfigNode,
        registry: &mut RuleSetRegistry,
        filler: &F,
        output: &mut ConfigBuilder,
    ) -> Result<(), TranslateError> {
        for step in &self.steps {
            debug!("Executing step {} ({})", step.number, step.selector);
            step.execute(tree, registry, filler, output)?;
        }
        info!("Executed {} steps", self.steps.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::RuleSet;
    use crate::template::TemplateFiller;
    use pretty_assertions::assert_eq;

    fn registry(sets: &[(&str, &str)]) -> RuleSetRegistry {
        let mut registry = RuleSetRegistry::new();
        for (name, rules) in sets {
            let rules = RuleMap::from_json(name, rules).expect("Should parse");
            registry.insert(RuleSet::from_rules(name, rules));
        }
        registry
    }

    fn execute(steps: &str, registry: &mut RuleSetRegistry, tree: &str) -> Vec<String> {
        let pipeline = Pipeline::from_json(steps, registry).expect("Should load steps");
        let tree = ConfigNode::from_json(tree).expect("Should decode");
        let mut output = ConfigBuilder::new();
        pipeline
            .execute_all(&tree, registry, &TemplateFiller::new(), &mut output)
            .expect("Should execute");
        output.lines().to_vec()
    }

    #[test]
    fn test_descriptors() {
        let registry = registry(&[("a.json", "{}")]);
        let pipeline = Pipeline::from_json(
            r#"[
                {"config": ["frr defaults traditional"]},
                {"translate": ["a.json"]},
                {"config": ["!"], "translate": "remaining"},
                {}
            ]"#,
            &registry,
        )
        .unwrap();
        let steps = pipeline.steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].lines(), ["frr defaults traditional"]);
        assert_eq!(steps[0].selector(), &Selector::default());
        assert_eq!(steps[1].selector(), &Selector::Files(vec!["a.json".into()]));
        assert_eq!(steps[2].selector(), &Selector::Remaining);
        assert!(steps[3].lines().is_empty());
    }

    #[test]
    fn test_bad_descriptors() {
        let registry = registry(&[("a.json", "{}")]);
        assert!(matches!(
            Pipeline::from_json(r#"[{"translate": "everything"}]"#, &registry),
            Err(TranslateError::Steps(_))
        ));
        assert!(matches!(
            Pipeline::from_json(r#"{"translate": "remaining"}"#, &registry),
            Err(TranslateError::Steps(_))
        ));
        assert!(matches!(
            Pipeline::from_json(r#"[{}, {"translate": ["a.json", "b.json"]}]"#, &registry),
            Err(TranslateError::UnknownRuleSet(1, name)) if name == "b.json"
        ));
    }

    #[test]
    fn test_static_lines_only() {
        let mut registry = registry(&[("a.json", r#"{"/x/@enter": "x {@text}"}"#)]);
        let out = execute(
            r#"[{"config": ["frr version 8", "service integrated-vtysh-config"]}]"#,
            &mut registry,
            r#"{"x": "1"}"#,
        );
        assert_eq!(out, vec!["frr version 8", "service integrated-vtysh-config"]);
        assert!(!registry.get("a.json").unwrap().is_consumed());
    }

    #[test]
    fn test_file_used_once() {
        let mut registry = registry(&[
            ("a.json", r#"{"/x/@enter": "a {@text}"}"#),
            ("b.json", r#"{"/x/@enter": "b {@text}"}"#),
        ]);
        let out = execute(
            r#"[
                {"config": ["! one"], "translate": ["a.json"]},
                {"config": ["! two"], "translate": ["a.json", "b.json"]},
                {"config": ["! three"], "translate": "remaining"}
            ]"#,
            &mut registry,
            r#"{"x": "1"}"#,
        );
        assert_eq!(out, vec!["! one", "a 1", "! two", "b 1", "! three"]);
        assert!(registry.unconsumed().is_empty());
    }

    #[test]
    fn test_remaining() {
        let mut registry = registry(&[
            ("10-a.json", r#"{"/x/@enter": "a {@text}", "/y/@enter": "a-y"}"#),
            ("20-b.json", r#"{"/x/@enter": "b {@text}"}"#),
            ("30-c.json", r#"{"/x/@exit": "c"}"#),
        ]);
        let out = execute(
            r#"[{"translate": ["20-b.json"]}, {"translate": "remaining"}]"#,
            &mut registry,
            r#"{"x": "1", "y": "2"}"#,
        );
        // the second step merges 10-a and 30-c
        assert_eq!(out, vec!["b 1", "a 1", "c", "a-y"]);
    }

    #[test]
    fn test_merge_order_follows_selection() {
        let mut registry = registry(&[
            ("a.json", r#"{"/x/@enter": "a"}"#),
            ("b.json", r#"{"/x/@enter": "b"}"#),
        ]);
        let out = execute(
            r#"[{"translate": ["b.json", "a.json"]}]"#,
            &mut registry,
            r#"{"x": "1"}"#,
        );
        assert_eq!(out, vec!["a"]);
    }

    #[test]
    fn test_lazy_loading() {
        let mut registry = RuleSetRegistry::new();
        registry.insert(RuleSet::new(Path::new("/nonexistent/frrcfg"), "unused.json"));
        registry.insert(RuleSet::from_rules(
            "used.json",
            RuleMap::from_json("used.json", r#"{"/@enter": "root"}"#).unwrap(),
        ));
        let out = execute(r#"[{"translate": ["used.json"]}]"#, &mut registry, "{}");
        assert_eq!(out, vec!["root"]);
        assert!(!registry.get("unused.json").unwrap().is_loaded());

        let pipeline = Pipeline::from_json(r#"[{"translate": "remaining"}]"#, &registry).unwrap();
        let result = pipeline.execute_all(
            &ConfigNode::from_json("{}").unwrap(),
            &mut registry,
            &TemplateFiller::new(),
            &mut ConfigBuilder::new(),
        );
        assert!(matches!(result, Err(TranslateError::Io(_, _))));
    }
}
