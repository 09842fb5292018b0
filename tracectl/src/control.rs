// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tracing runtime control.

use ordermap::OrderMap;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, Registry, filter::LevelFilter, prelude::*, reload};

use crate::targets::TRACING_TARGETS;
use crate::trace_target;

trace_target!("tracectl", LevelFilter::INFO, &[]);

/// Special tag setting the level of everything that has no target of its own
pub const TAG_DEFAULT: &str = "default";
/// Special tag setting the level of all the registered targets
pub const TAG_ALL: &str = "all";

#[derive(Debug, Error, PartialEq)]
pub enum TraceCtlError {
    #[error("Invalid syntax '{0}': it should be tag=level")]
    Syntax(String),
    #[error("Invalid level '{0}'")]
    Level(String),
}

#[derive(Debug, Clone)]
pub struct TargetCfg {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: Vec<&'static str>,
}
impl TargetCfg {
    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }
    #[must_use]
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

#[derive(Debug)]
pub(crate) struct TargetCfgDb {
    pub(crate) level: LevelFilter,
    pub(crate) targets: OrderMap<&'static str, TargetCfg>,
}

impl TargetCfgDb {
    fn new(level: LevelFilter) -> Self {
        let mut targets = OrderMap::new();
        for declared in TRACING_TARGETS {
            // the name of a target is always one of its tags
            let mut tags = declared.tags.to_vec();
            if !tags.contains(&declared.name) {
                tags.push(declared.name);
            }
            let cfg = TargetCfg {
                target: declared.target,
                name: declared.name,
                level: declared.level,
                tags,
            };
            if let Some(dup) = targets.insert(declared.target, cfg) {
                warn!("Target {} has been multiply defined!", dup.target);
            }
        }
        Self { level, targets }
    }
    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(self.level.to_string());
        for target in self.targets.values() {
            match format!("{}={}", target.target, target.level).parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => error!("Bad directive for target {}: {e}", target.target),
            }
        }
        filter
    }
    fn tagged_mut(&mut self, tag: &str) -> impl Iterator<Item = &mut TargetCfg> {
        self.targets
            .values_mut()
            .filter(move |target| target.tags.iter().any(|t| *t == tag))
    }
}

#[derive(Debug)]
pub struct TracingControl {
    db: Mutex<TargetCfgDb>,
    reload_filter: reload::Handle<EnvFilter, Registry>,
}

static TRACING_CTL: OnceLock<TracingControl> = OnceLock::new();

/// Get the process-wide [`TracingControl`], installing the subscriber on first use.
/// Logs go to stderr so that they never mix with generated configurations.
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACING_CTL.get_or_init(|| TracingControl::new(LevelFilter::WARN))
}

impl TracingControl {
    fn new(level: LevelFilter) -> Self {
        let db = TargetCfgDb::new(level);
        let (filter, reload_filter) = reload::Layer::new(db.env_filter());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true)
            .with_level(true);

        // a subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();

        Self {
            db: Mutex::new(db),
            reload_filter,
        }
    }
    fn db(&self) -> MutexGuard<'_, TargetCfgDb> {
        // the database stays consistent even if a holder panicked
        self.db.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
    fn reload(&self, db: &TargetCfgDb) {
        if let Err(e) = self.reload_filter.reload(db.env_filter()) {
            error!("Failed to reload tracing filter: {e}");
        }
    }

    /// Make sure that the subscriber is installed
    pub fn init() {
        get_trace_ctl();
    }
    #[must_use]
    pub fn get_default_level(&self) -> LevelFilter {
        self.db().level
    }
    pub fn set_default_level(&self, level: LevelFilter) {
        let mut db = self.db();
        if db.level != level {
            db.level = level;
            self.reload(&db);
        }
    }
    pub fn set_level_all(&self, level: LevelFilter) {
        let mut db = self.db();
        db.targets.values_mut().for_each(|t| t.level = level);
        self.reload(&db);
    }
    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) {
        let mut db = self.db();
        let mut changed = 0;
        for target in db.tagged_mut(tag) {
            if target.level != level {
                target.level = level;
                changed += 1;
            }
        }
        if changed > 0 {
            self.reload(&db);
        }
        debug!("Set level of tag '{tag}' to {level}. Targets changed: {changed}");
    }

    /// Verbose mode: everything at DEBUG
    pub fn set_verbose(&self) {
        self.set_default_level(LevelFilter::DEBUG);
        self.set_level_all(LevelFilter::DEBUG);
    }

    /// Parse comma-separated `tag=level` items, with level one of off, error, warn,
    /// info, debug or trace.
    fn parse_tracing_config(input: &str) -> Result<OrderMap<String, LevelFilter>, TraceCtlError> {
        let mut result = OrderMap::new();
        for item in input.split(',') {
            let item = item.trim();
            let Some((tag, level)) = item.split_once('=') else {
                return Err(TraceCtlError::Syntax(item.to_owned()));
            };
            let level = LevelFilter::from_str(level.trim())
                .map_err(|_| TraceCtlError::Level(level.trim().to_owned()))?;
            result.insert(tag.trim().to_owned(), level);
        }
        Ok(result)
    }

    /// Apply a config string like `default=error,all=info,translate=debug`. The special
    /// tags are applied first so that explicit tags can override them.
    pub fn setup_from_string(&self, input: &str) -> Result<(), TraceCtlError> {
        let config = Self::parse_tracing_config(input)?;
        if let Some(level) = config.get(TAG_DEFAULT) {
            self.set_default_level(*level);
        }
        if let Some(level) = config.get(TAG_ALL) {
            self.set_level_all(*level);
        }
        config
            .iter()
            .filter(|(tag, _)| *tag != TAG_DEFAULT && *tag != TAG_ALL)
            .for_each(|(tag, level)| self.set_tag_level(tag, *level));
        Ok(())
    }

    #[must_use]
    pub fn get_target(&self, target: &str) -> Option<TargetCfg> {
        self.db().targets.get(target).cloned()
    }
    /// Log the table of targets at INFO
    pub fn dump(&self) {
        let db = self.db();
        info!("{db}");
    }
    /// Table of the registered targets with their levels and tags
    #[must_use]
    pub fn summary(&self) -> String {
        self.db().to_string()
    }
}
