// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link-time registry of the log targets declared by every linked crate

use crate::LevelFilter;
use linkme::distributed_slice;

/// A log target as declared by [`trace_target!`](crate::trace_target)
pub struct STarget {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: &'static [&'static str],
}
impl STarget {
    #[must_use]
    pub const fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            target,
            name,
            level,
            tags,
        }
    }
}

#[distributed_slice]
pub static TRACING_TARGETS: [STarget];

#[macro_export]
/// Declare the log target of the calling module with a name, a default level and tags.
/// The calling crate must depend on `linkme`.
macro_rules! trace_target {
    // Wrapped in an anonymous const so that the macro can be used several times in one
    // crate without the statics clashing.
    ($name:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use linkme::distributed_slice;
            use $crate::targets::{STarget, TRACING_TARGETS};

            #[distributed_slice(TRACING_TARGETS)]
            static TRACE_TGT: STarget = STarget::new(module_path!(), $name, $level, $tags);
        };
    };
}
