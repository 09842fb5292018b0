// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;
use translate::translator::{DEFAULT_CONFIG_DIR, DEFAULT_INPUT};

pub const DEFAULT_OUTPUT: &str = "/etc/vyatta-routing/frr.conf";
pub const DEFAULT_OWNER: &str = "routing";
pub const DEFAULT_RELOAD_BIN: &str = "/usr/bin/vtysh";

#[derive(Parser, Debug)]
#[command(name = "frrcfg")]
#[command(version = "1.0")]
#[command(about = "Translates a JSON configuration tree into an FRR configuration", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct CmdArgs {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_INPUT,
        help = "Configuration tree to translate, in JSON"
    )]
    input: PathBuf,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT,
        help = "Where to write the FRR configuration"
    )]
    output: PathBuf,

    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = DEFAULT_CONFIG_DIR,
        help = "Directory with priorities.json, steps.json and the commands/ directory"
    )]
    config_dir: PathBuf,

    #[arg(short, long, help = "Log everything, including the generated configuration")]
    debug: bool,

    #[arg(long, help = "Do not ask FRR to reload the generated configuration")]
    no_reload: bool,

    #[arg(
        long,
        value_name = "ACCOUNT",
        default_value = DEFAULT_OWNER,
        help = "User and group owning the generated configuration"
    )]
    owner: String,

    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_RELOAD_BIN,
        help = "Program run as `PATH -f OUTPUT` to reload FRR"
    )]
    reload_bin: PathBuf,

    #[arg(
        long,
        default_value_t = false,
        help = "Show configurable tracing targets and exit"
    )]
    show_tracing_targets: bool,

    #[arg(
        long,
        value_name = "tracing configuration",
        help = "Tracing config string as comma-separated sequence of tag=level, with level one in [off,error,warn,info,debug,trace].
Passing default=level sets the default log-level.
Passing all=level allows setting the log-level of all targets to level.
E.g. default=error,all=info,translate=debug"
    )]
    tracing: Option<String>,
}

impl CmdArgs {
    pub fn input(&self) -> &Path {
        &self.input
    }
    pub fn output(&self) -> &Path {
        &self.output
    }
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
    pub fn debug(&self) -> bool {
        self.debug
    }
    pub fn reload(&self) -> bool {
        !self.no_reload
    }
    pub fn owner(&self) -> &str {
        &self.owner
    }
    pub fn reload_bin(&self) -> &Path {
        &self.reload_bin
    }
    pub fn show_tracing_targets(&self) -> bool {
        self.show_tracing_targets
    }
    pub fn tracing(&self) -> Option<&String> {
        self.tracing.as_ref()
    }

    /// Log the arguments in use
    pub fn log(&self) {
        debug!(
            "input: {}, output: {}, config dir: {}, owner: {}, reload: {}",
            self.input.display(),
            self.output.display(),
            self.config_dir.display(),
            self.owner,
            if self.no_reload {
                "no".to_owned()
            } else {
                self.reload_bin.display().to_string()
            }
        );
    }
}
