// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Periodic refresh driver.
//!
//! Every tick reloads the topology, publishes new indices and runs one cycle
//! for the agent list. A failed reload keeps the previously published indices.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use trisolaris_common::config::Config;
use trisolaris_common::{error, info};
use trisolaris_core::dispatch;
use trisolaris_core::segment::SharedSegment;

use crate::commands::{load_agents, load_topology};
use crate::terminal::output;

pub async fn watch(
    topology: PathBuf,
    agents: PathBuf,
    interval: u64,
    cycles: Option<u64>,
    cfg: &Config,
) -> anyhow::Result<()> {
    if interval == 0 {
        anyhow::bail!("--interval must be at least one second");
    }
    if cycles == Some(0) {
        anyhow::bail!("--cycles must be at least one");
    }
    let requests = load_agents(&agents)?;
    let shared = Arc::new(SharedSegment::new());
    let mut ticker = tokio::time::interval(Duration::from_secs(interval));
    let mut completed = 0u64;

    loop {
        ticker.tick().await;

        match load_topology(&topology) {
            Ok(raw) => {
                let raw = Arc::new(raw);
                let publisher = Arc::clone(&shared);
                let snapshot = Arc::clone(&raw);
                let stats =
                    tokio::task::spawn_blocking(move || publisher.publish(&snapshot)).await?;
                info!(verbosity = 1, "Published topology: {:?}", stats);

                let resolved = shared.cycle(|cycle| {
                    dispatch::resolve_agents(cycle, &raw, &requests, cfg)
                });
                let resolved = output::prepare(resolved, cfg);
                output::json(&resolved, cfg)?;
                output::summary(&resolved, cfg);
            }
            Err(e) => error!("Refresh skipped: {e:#}"),
        }

        completed += 1;
        if cycles.is_some_and(|limit| completed >= limit) {
            return Ok(());
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
