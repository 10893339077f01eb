// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::Path;

use trisolaris_common::config::Config;
use trisolaris_core::dispatch;
use trisolaris_core::segment::Segment;

use crate::commands::{load_agents, load_topology};
use crate::terminal::output;

pub fn resolve(topology: &Path, agents: &Path, cfg: &Config) -> anyhow::Result<()> {
    let raw = load_topology(topology)?;
    let requests = load_agents(agents)?;

    let mut segment = Segment::new();
    segment.rebuild(&raw);
    let resolved = dispatch::resolve_agents(segment.begin_cycle(), &raw, &requests, cfg);

    let resolved = output::prepare(resolved, cfg);
    output::json(&resolved, cfg)?;
    output::summary(&resolved, cfg);
    Ok(())
}
