// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display implementations

use crate::control::{TargetCfg, TargetCfgDb};
use std::fmt::Display;

macro_rules! TARGET_FMT {
    () => {
        "{:>40} │ {:>20} │ {:>8} │ {}"
    };
}

impl Display for TargetCfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            format_args!(
                TARGET_FMT!(),
                self.target,
                self.name,
                self.level,
                self.tags.join(",")
            )
        )
    }
}

impl Display for TargetCfgDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", format_args!(TARGET_FMT!(), "TARGET", "NAME", "LEVEL", "TAGS"))?;
        for target in self.targets.values() {
            writeln!(f, "{target}")?;
        }
        write!(
            f,
            "{}",
            format_args!(TARGET_FMT!(), "(default)", "--", self.level, "--")
        )
    }
}
