// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::path::Path;

use trisolaris_common::config::Config;
use trisolaris_common::success;
use trisolaris_core::segment::Segment;

use crate::commands::load_topology;
use crate::terminal::output;

pub fn inspect(topology: &Path, cfg: &Config) -> anyhow::Result<()> {
    let raw = load_topology(topology)?;
    let mut segment = Segment::new();
    segment.rebuild(&raw);

    let stats = segment.stats();
    output::json(&stats, cfg)?;
    success!(
        "Indexed {} interfaces from {}",
        raw.device_vifs().len(),
        topology.display()
    );
    Ok(())
}
