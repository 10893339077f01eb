// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::io::Write;

use serde::Serialize;
use trisolaris_common::config::Config;
use trisolaris_common::info;
use trisolaris_common::utils::redact;
use trisolaris_core::dispatch::AgentSegments;

/// Writes `value` to stdout as one JSON document.
pub fn json<T: Serialize>(value: &T, cfg: &Config) -> anyhow::Result<()> {
    let rendered = if cfg.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}

/// Applies `--redact` to resolved agent segments.
pub fn prepare(agents: Vec<AgentSegments>, cfg: &Config) -> Vec<AgentSegments> {
    if !cfg.redact {
        return agents;
    }
    agents
        .into_iter()
        .map(|agent| AgentSegments {
            name: agent.name,
            segments: agent.segments.iter().map(redact::segment).collect(),
        })
        .collect()
}

pub fn summary(agents: &[AgentSegments], cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    for agent in agents {
        let vifs: usize = agent.segments.iter().map(|s| s.len()).sum();
        info!(
            "{}: {} segments, {} interfaces",
            agent.name,
            agent.segments.len(),
            vifs
        );
    }
}
