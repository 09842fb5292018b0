// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Traversal of the config tree and emission of commands.
//!
//! The tree is walked depth-first. For each node, the commands registered at
//! `<path>/@enter` and at `<path>` are emitted before its children are visited and those
//! registered at `<path>/@exit` after them. Templates are filled with values resolved
//! relative to the node the commands belong to. Escapes count from the parent of that
//! node on enter, and from the node itself on exit.

use std::collections::HashMap;
use tracing::debug;
use tree::{AncestorStack, ConfigNode, NodePath};

use crate::builder::ConfigBuilder;
use crate::ruleset::RuleMap;
use crate::template::CommandFiller;

/// Walks a tree, emitting the commands of a [`RuleMap`] into a [`ConfigBuilder`]
pub struct Emitter<'a, 'o, F: CommandFiller + ?Sized> {
    rules: &'a RuleMap,
    filler: &'a F,
    ancestors: AncestorStack<'a>,
    output: &'o mut ConfigBuilder,
    emitted: usize,
}

impl<'a, 'o, F: CommandFiller + ?Sized> Emitter<'a, 'o, F> {
    pub fn new(rules: &'a RuleMap, filler: &'a F, output: &'o mut ConfigBuilder) -> Self {
        Self {
            rules,
            filler,
            ancestors: AncestorStack::new(),
            output,
            emitted: 0,
        }
    }

    /// Walk `tree` from its root. Returns the number of commands emitted so far.
    pub fn run(&mut self, tree: &'a ConfigNode) -> usize {
        self.ancestors.clear();
        self.visit(tree, &NodePath::root());
        self.emitted
    }

    fn visit(&mut self, node: &'a ConfigNode, path: &NodePath) {
        self.emit(node, &path.enter());
        self.emit(node, path);

        self.ancestors.push(node);
        match node {
            ConfigNode::Mapping(children) => {
                for (key, child) in children {
                    self.visit(child, &path.child(key));
                }
            }
            ConfigNode::Sequence(elements) => {
                let path = path.element();
                for element in elements {
                    self.visit(element, &path);
                }
            }
            ConfigNode::Scalar(_) => {}
        }
        /* the node is still on the stack: `..` of an exit hook is the node itself */
        self.emit(node, &path.exit());
        self.ancestors.pop();
    }

    fn emit(&mut self, node: &'a ConfigNode, path: &NodePath) {
        let rules = self.rules;
        for template in rules.templates(path) {
            let values: HashMap<String, String> = self
                .filler
                .references(template)
                .into_iter()
                .filter_map(|reference| {
                    let value = self.ancestors.resolve(node, &reference)?;
                    Some((reference, value.into_text()))
                })
                .collect();

            let command = self.filler.fill(template, &values);
            if command.is_empty() {
                debug!("No command for '{template}' at {path}");
                continue;
            }
            *self.output += command;
            self.emitted += 1;
        }
    }
}

/// Emit the commands of `rules` for the whole `tree`. Returns the number of commands
/// appended to `output`.
pub fn translate<F: CommandFiller + ?Sized>(
    tree: &ConfigNode,
    rules: &RuleMap,
    filler: &F,
    output: &mut ConfigBuilder,
) -> usize {
    Emitter::new(rules, filler, output).run(tree)
}
