// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic)]

mod reload;
mod writer;

use crate::reload::Reloader;
use crate::writer::ConfigWriter;

use args::{CmdArgs, Parser};
use tracectl::{TraceCtlError, get_trace_ctl, trace_target};
use tracing::{error, info, level_filters::LevelFilter};
use translate::{Translator, TranslatorParamsBuilder};

trace_target!("frrcfg", LevelFilter::INFO, &[]);

fn init_logging(args: &CmdArgs) -> Result<(), TraceCtlError> {
    let tctl = get_trace_ctl();
    if args.debug() {
        tctl.set_verbose();
    }
    if let Some(tracing) = args.tracing() {
        tctl.setup_from_string(tracing)?;
    }
    Ok(())
}

fn main() {
    /* parse cmd line args */
    let args = CmdArgs::parse();
    if let Err(e) = init_logging(&args) {
        error!("Invalid tracing configuration: {e}");
        std::process::exit(1);
    }
    if args.show_tracing_targets() {
        println!("{}", get_trace_ctl().summary());
        std::process::exit(0);
    }
    if args.debug() {
        get_trace_ctl().dump();
    }
    args.log();

    /* translator parameters */
    let params = match TranslatorParamsBuilder::default()
        .input(args.input())
        .config_dir(args.config_dir())
        .build()
    {
        Ok(params) => params,
        Err(e) => {
            error!("Bad translator configuration: {e}");
            std::process::exit(1);
        }
    };

    /* translate: nothing is written if any input is invalid */
    let config = match Translator::new(params).translate() {
        Ok(config) => config,
        Err(e) => {
            error!("Translation failed: {e}");
            std::process::exit(1);
        }
    };

    ConfigWriter::new(args.output(), args.owner()).persist(&config);

    if !args.reload() {
        info!("Reload disabled, done");
        return;
    }
    let code = match Reloader::new(args.reload_bin()).reload(args.output()) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            1
        }
    };
    std::process::exit(code);
}
