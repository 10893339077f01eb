// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! A [`Segment`] shared between the refresh driver and agent handlers.
//!
//! The claimed-interface set is only correct under serialized access, so every
//! query pass runs under one lock. Index construction happens before the lock
//! is taken; handlers see either the old indices or the new ones, never a mix.

use parking_lot::Mutex;
use trisolaris_common::models::segment::SegmentView;
use trisolaris_common::models::topology::PlatformRawData;

use super::{Cycle, CycleState, IndexStats, Segment, SegmentIndex};

#[derive(Debug, Default)]
pub struct SharedSegment {
    inner: Mutex<Segment>,
}

impl SharedSegment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds indices for `raw` and swaps them in.
    pub fn publish(&self, raw: &PlatformRawData) -> IndexStats {
        let index = SegmentIndex::build(raw);
        let stats = index.stats();
        self.inner.lock().install(index);
        stats
    }

    /// Runs one query pass with exclusive access to the engine.
    pub fn cycle<R>(&self, f: impl FnOnce(Cycle<'_>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(guard.begin_cycle())
    }

    /// Exclusive access outside the cycle helper, for callers that drive the
    /// steps themselves.
    pub fn with_segment<R>(&self, f: impl FnOnce(&mut Segment) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn all_gateway_segments(&self) -> Vec<SegmentView> {
        self.inner.lock().all_gateway_segments().to_vec()
    }

    pub fn not_yet_claimed_segments(&self) -> Vec<SegmentView> {
        self.inner.lock().not_yet_claimed_segments().to_vec()
    }

    pub fn state(&self) -> CycleState {
        self.inner.lock().state()
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
