// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// Id used by every segment that merges several networks into one.
pub const MERGED_SEGMENT_ID: u32 = 1;

/// One segment as pushed to a capture agent.
///
/// Serialized as `{ "id": .., "mac": [..], "interface_id": [..] }`, the field
/// names the agent side expects. `mac` and `interface_id` are parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentView {
    pub id: u32,
    #[serde(rename = "mac")]
    pub macs: Vec<String>,
    #[serde(rename = "interface_id")]
    pub interface_ids: Vec<u32>,
}

impl SegmentView {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn push(&mut self, mac: &str, interface_id: u32) {
        self.macs.push(mac.to_string());
        self.interface_ids.push(interface_id);
    }

    pub fn len(&self) -> usize {
        self.interface_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interface_ids.is_empty()
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
