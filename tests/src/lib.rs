// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

mod segment;

pub mod utils {
    use std::path::PathBuf;

    use trisolaris_common::models::topology::PlatformRawData;
    use trisolaris_core::dispatch::AgentRequest;

    fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
    }

    /// Loads a topology document from `tests/fixtures`.
    pub fn topology(name: &str) -> anyhow::Result<PlatformRawData> {
        let raw = std::fs::read_to_string(fixture_path(name))?;
        PlatformRawData::from_json(&raw)
    }

    pub fn agents(name: &str) -> anyhow::Result<Vec<AgentRequest>> {
        let raw = std::fs::read_to_string(fixture_path(name))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
