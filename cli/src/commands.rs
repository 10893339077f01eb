// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! Argument schema for the `trisolaris` binary. Execution of each command
//! lives in its own submodule; this module only defines flags and maps them
//! onto [`Config`].

pub mod inspect;
pub mod resolve;
pub mod watch;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use trisolaris_common::config::Config;
use trisolaris_common::models::topology::PlatformRawData;
use trisolaris_core::dispatch::AgentRequest;

#[derive(Parser)]
#[command(name = "trisolaris")]
#[command(about = "Resolves per-agent interface segments from a topology snapshot.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output
    #[arg(long = "pretty", global = true)]
    pub pretty: bool,

    /// Suppress the summary printed after the JSON output
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Mask the device part of MAC addresses
    #[arg(long = "redact", global = true)]
    pub redact: bool,

    /// Do not compute the catch-all segment for dedicated agents
    #[arg(long = "skip-catch-all", global = true)]
    pub skip_catch_all: bool,

    /// Increase logging detail (-v: debug logs)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the indices and print how many entities each dimension holds
    #[command(alias = "i")]
    Inspect {
        #[arg(short = 't', long = "topology", value_name = "FILE")]
        topology: PathBuf,
    },

    /// Run one cycle for a list of agents
    #[command(alias = "r")]
    Resolve {
        #[arg(short = 't', long = "topology", value_name = "FILE")]
        topology: PathBuf,
        #[arg(short = 'a', long = "agents", value_name = "FILE")]
        agents: PathBuf,
    },

    /// Reload the topology periodically and run a cycle after each reload
    #[command(alias = "w")]
    Watch {
        #[arg(short = 't', long = "topology", value_name = "FILE")]
        topology: PathBuf,
        #[arg(short = 'a', long = "agents", value_name = "FILE")]
        agents: PathBuf,
        /// Seconds between two refreshes
        #[arg(long = "interval", default_value_t = 60)]
        interval: u64,
        /// Stop after this many cycles
        #[arg(long = "cycles")]
        cycles: Option<u64>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&CommandLine> for Config {
    fn from(cmd: &CommandLine) -> Self {
        Self {
            quiet: cmd.quiet,
            pretty: cmd.pretty,
            redact: cmd.redact,
            skip_catch_all: cmd.skip_catch_all,
        }
    }
}

pub(crate) fn load_topology(path: &Path) -> anyhow::Result<PlatformRawData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read topology {}", path.display()))?;
    PlatformRawData::from_json(&raw)
        .with_context(|| format!("invalid topology {}", path.display()))
}

pub(crate) fn load_agents(path: &Path) -> anyhow::Result<Vec<AgentRequest>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read agents {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid agent list {}", path.display()))
}
