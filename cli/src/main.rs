// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Trisolaris CLI Entry Point
//!
//! Parses arguments, installs logging, maps flags onto [`Config`] and
//! dispatches to a command. Errors propagated from a command are logged here
//! and turned into a non-zero `ExitCode`.

mod commands;
mod terminal;

use std::process::ExitCode;

use trisolaris_common::{config::Config, error};

use crate::commands::{CommandLine, Commands, inspect, resolve, watch};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    terminal::logging::init_logging(commands.verbosity);

    let cfg = Config::from(&commands);

    let result = match &commands.command {
        Commands::Inspect { topology } => inspect::inspect(topology, &cfg),
        Commands::Resolve { topology, agents } => resolve::resolve(topology, agents, &cfg),
        Commands::Watch {
            topology,
            agents,
            interval,
            cycles,
        } => watch::watch(topology.clone(), agents.clone(), *interval, *cycles, &cfg).await,
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical failure: {e:#}");
            ExitCode::FAILURE
        }
    }
}
