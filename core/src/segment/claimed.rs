// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::collections::HashSet;

/// Interface ids already handed to some agent during the current cycle.
///
/// Grows monotonically until [`ClaimedSet::clear`]; the catch-all segment is
/// everything in the snapshot that is not in here.
#[derive(Debug, Clone, Default)]
pub struct ClaimedSet {
    ids: HashSet<u32>,
}

impl ClaimedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, id: u32) {
        self.ids.insert(id);
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
