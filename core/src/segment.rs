// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Network Segment Resolution
//!
//! Turns a topology snapshot into the interface segments each capture agent
//! treats as local, while tracking which interfaces have been handed out so
//! the leftovers can be pushed as one catch-all segment.
//!
//! ## Cycle
//! Each refresh runs the same sequence:
//!
//! 1. [`Segment::rebuild`] swaps in indices built from the new snapshot.
//! 2. [`Segment::clear_claimed`] empties the claimed-interface set.
//! 3. Per-agent queries (`by_*`) return segments and claim what they return.
//! 4. [`Segment::generate_not_yet_claimed`] computes the catch-all.
//!
//! [`Segment::begin_cycle`] wraps steps 2 to 4 in a [`Cycle`] handle so the order
//! cannot be got wrong. Calling the raw methods out of order still works but is
//! logged.
//!
//! ## Segment ids
//! Single-entity queries emit one segment per network, with the network id as
//! segment id. The combined VM query, the gateway list and the catch-all all use
//! [`MERGED_SEGMENT_ID`] regardless of how many networks they merge.

mod claimed;
mod closure;
mod index;
mod network_macs;
pub mod shared;

pub use claimed::ClaimedSet;
pub use closure::IdToVifs;
pub use index::{IndexStats, SegmentIndex};
pub use network_macs::{EntityIndex, NetworkMacs};
pub use shared::SharedSegment;

use serde::Serialize;
use trisolaris_common::models::segment::{MERGED_SEGMENT_ID, SegmentView};
use trisolaris_common::models::topology::PlatformRawData;
use trisolaris_common::{debug, info, warn};

/// Where the engine is within the current refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CycleState {
    /// Nothing built yet.
    Empty,
    /// Indices present, nothing claimed since the last clear.
    Built,
    /// At least one claiming query ran.
    Queried,
    /// The catch-all segment has been computed.
    Finalized,
}

#[derive(Debug)]
pub struct Segment {
    index: SegmentIndex,
    claimed: ClaimedSet,
    not_claimed: Vec<SegmentView>,
    state: CycleState,
    cleared: bool,
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}

impl Segment {
    pub fn new() -> Self {
        Self {
            index: SegmentIndex::default(),
            claimed: ClaimedSet::new(),
            not_claimed: Vec::new(),
            state: CycleState::Empty,
            cleared: false,
        }
    }

    /// Rebuilds every index from `raw`.
    ///
    /// The claimed set is left alone; clear it before the next query pass.
    /// The cached catch-all belongs to the old indices and is dropped.
    pub fn rebuild(&mut self, raw: &PlatformRawData) {
        self.install(SegmentIndex::build(raw));
    }

    pub(crate) fn install(&mut self, index: SegmentIndex) {
        let stats = index.stats();
        self.index = index;
        self.not_claimed.clear();
        if self.claimed.is_empty() {
            self.state = CycleState::Built;
        } else {
            self.state = CycleState::Queried;
            self.cleared = false;
        }
        info!(
            verbosity = 1,
            "Segment indices built: {} launch servers, {} hosts, {} gateway hosts, {} vms, {} pod-nodes",
            stats.launch_servers,
            stats.hosts,
            stats.gateway_hosts,
            stats.vms,
            stats.pod_nodes
        );
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn claimed(&self) -> &ClaimedSet {
        &self.claimed
    }

    pub fn clear_claimed(&mut self) {
        self.claimed.clear();
        self.cleared = true;
        if self.state != CycleState::Empty {
            self.state = CycleState::Built;
        }
    }

    /// Clears the claimed set and hands out a handle for one query pass.
    pub fn begin_cycle(&mut self) -> Cycle<'_> {
        self.clear_claimed();
        Cycle { segment: self }
    }

    fn mark_queried(&mut self) {
        match self.state {
            CycleState::Empty => warn!("Segment queried before the first build"),
            CycleState::Finalized => {
                warn!("Segment queried after the catch-all was computed; clear it first")
            }
            _ => {}
        }
        if self.state != CycleState::Empty {
            self.state = CycleState::Queried;
        }
    }

    pub fn by_launch_server(&mut self, launch_server: &str) -> Vec<SegmentView> {
        self.mark_queried();
        self.index
            .launch_server
            .resolve(launch_server, &mut self.claimed)
    }

    pub fn by_host_id(&mut self, host_id: u32) -> Vec<SegmentView> {
        self.mark_queried();
        self.index.host.resolve(&host_id, &mut self.claimed)
    }

    pub fn by_vm_id(&mut self, vm_id: u32) -> Vec<SegmentView> {
        self.mark_queried();
        self.index.vm.resolve(&vm_id, &mut self.claimed)
    }

    pub fn by_pod_node_id(&mut self, pod_node_id: u32) -> Vec<SegmentView> {
        self.mark_queried();
        self.index.pod_node.resolve(&pod_node_id, &mut self.claimed)
    }

    /// Segments for an agent running on a launch server in VM mode.
    ///
    /// The launch server's and the host's interfaces are merged into a single
    /// segment with [`MERGED_SEGMENT_ID`]. Always returns exactly one segment,
    /// possibly empty.
    pub fn by_vm_type_combined(&mut self, launch_server: &str, host_id: u32) -> Vec<SegmentView> {
        self.mark_queried();
        let mut segment = SegmentView::new(MERGED_SEGMENT_ID);
        if let Some(macs) = self.index.launch_server.get(launch_server) {
            macs.flatten_into(&mut segment, &mut self.claimed);
        }
        if let Some(macs) = self.index.host.get(&host_id) {
            macs.flatten_into(&mut segment, &mut self.claimed);
        }
        vec![segment]
    }

    /// Gateway segments cached at build time. Reading them claims nothing.
    pub fn all_gateway_segments(&self) -> &[SegmentView] {
        &self.index.all_gateway_segments
    }

    /// Collects every interface of `raw` not claimed this cycle into one segment.
    pub fn generate_not_yet_claimed(&mut self, raw: &PlatformRawData) -> &[SegmentView] {
        match self.state {
            CycleState::Empty => warn!("Catch-all computed before the first build"),
            CycleState::Built => debug!("Catch-all computed without any query this cycle"),
            _ => {}
        }
        if !self.cleared {
            warn!("Catch-all computed without clearing claimed interfaces for this cycle");
        }

        let mut segment = SegmentView::new(MERGED_SEGMENT_ID);
        for vif in raw.device_vifs() {
            if vif.has_mac() && !self.claimed.contains(vif.id) {
                segment.push(&vif.mac, vif.id);
            }
        }
        info!(
            "vifs claimed: {}, not claimed: {}",
            self.claimed.len(),
            segment.len()
        );

        self.not_claimed = if segment.is_empty() {
            Vec::new()
        } else {
            vec![segment]
        };
        self.cleared = false;
        if self.state != CycleState::Empty {
            self.state = CycleState::Finalized;
        }
        &self.not_claimed
    }

    /// The catch-all from the last [`Segment::generate_not_yet_claimed`] call.
    pub fn not_yet_claimed_segments(&self) -> &[SegmentView] {
        &self.not_claimed
    }
}

/// One query pass over a [`Segment`], from a cleared claimed set to the catch-all.
pub struct Cycle<'a> {
    segment: &'a mut Segment,
}

impl Cycle<'_> {
    pub fn by_launch_server(&mut self, launch_server: &str) -> Vec<SegmentView> {
        self.segment.by_launch_server(launch_server)
    }

    pub fn by_host_id(&mut self, host_id: u32) -> Vec<SegmentView> {
        self.segment.by_host_id(host_id)
    }

    pub fn by_vm_id(&mut self, vm_id: u32) -> Vec<SegmentView> {
        self.segment.by_vm_id(vm_id)
    }

    pub fn by_pod_node_id(&mut self, pod_node_id: u32) -> Vec<SegmentView> {
        self.segment.by_pod_node_id(pod_node_id)
    }

    pub fn by_vm_type_combined(&mut self, launch_server: &str, host_id: u32) -> Vec<SegmentView> {
        self.segment.by_vm_type_combined(launch_server, host_id)
    }

    pub fn all_gateway_segments(&self) -> &[SegmentView] {
        self.segment.all_gateway_segments()
    }

    pub fn state(&self) -> CycleState {
        self.segment.state()
    }

    /// Ends the pass and returns the catch-all segment (zero or one entries).
    pub fn finalize(self, raw: &PlatformRawData) -> Vec<SegmentView> {
        self.segment.generate_not_yet_claimed(raw).to_vec()
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

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use trisolaris_common::models::vinterface::VInterface;

    use super::*;

    /// H1 {a1}, V1 on H1 {a2}, N1 in V1 {a3}, Pd1 on N1 {a4}.
    fn scenario() -> PlatformRawData {
        PlatformRawData::new()
            .with_host_vif(1, VInterface::new(1, "a1", 10))
            .with_vm(1, Some("h1"))
            .with_vm_vif(1, VInterface::new(2, "a2", 10))
            .with_pod_node(1, Some(1))
            .with_pod_node_vif(1, VInterface::new(3, "a3", 20))
            .with_pod(1, 1)
            .with_pod_vif(1, VInterface::new(4, "a4", 20))
    }

    fn built(raw: &PlatformRawData) -> Segment {
        let mut segment = Segment::new();
        segment.rebuild(raw);
        segment.clear_claimed();
        segment
    }

    fn all_ids(segments: &[SegmentView]) -> Vec<u32> {
        let mut ids: Vec<u32> = segments
            .iter()
            .flat_map(|s| s.interface_ids.iter().copied())
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn vm_query_then_catch_all_matches_scenario() {
        let raw = scenario();
        let mut segment = built(&raw);

        let vm = segment.by_vm_id(1);
        assert_eq!(
            vm,
            vec![
                SegmentView {
                    id: 10,
                    macs: vec!["a2".into()],
                    interface_ids: vec![2],
                },
                SegmentView {
                    id: 20,
                    macs: vec!["a3".into(), "a4".into()],
                    interface_ids: vec![3, 4],
                },
            ]
        );

        let rest = segment.generate_not_yet_claimed(&raw);
        assert_eq!(
            rest,
            &[SegmentView {
                id: MERGED_SEGMENT_ID,
                macs: vec!["a1".into()],
                interface_ids: vec![1],
            }]
        );
    }

    #[test]
    fn pod_node_query_includes_pods() {
        let raw = scenario();
        let mut segment = built(&raw);

        let segments = segment.by_pod_node_id(1);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, 20);
        assert_eq!(segments[0].interface_ids, vec![3, 4]);
    }

    #[test]
    fn sibling_vm_sees_nothing_of_other_pod_node() {
        let raw = scenario().with_vm_vif(2, VInterface::new(9, "b9", 10));
        let mut segment = built(&raw);

        assert_eq!(all_ids(&segment.by_vm_id(2)), vec![9]);
    }

    #[test]
    fn host_query_then_catch_all_holds_only_unclaimed() {
        let raw = PlatformRawData::new()
            .with_host_vif(1, VInterface::new(1, "a", 10))
            .with_host_vif(1, VInterface::new(2, "b", 20))
            .with_device_vif(VInterface::new(3, "c", 30));
        let mut segment = built(&raw);

        segment.by_host_id(1);
        let rest = segment.generate_not_yet_claimed(&raw);

        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].interface_ids, vec![3]);
        assert_eq!(rest[0].macs, vec!["c"]);
    }

    #[test]
    fn launch_server_query_uses_network_ids() {
        let raw = scenario();
        let mut segment = built(&raw);

        let ids: Vec<u32> = segment.by_launch_server("h1").iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![10, 20]);
        assert!(segment.by_launch_server("nope").is_empty());
    }

    #[test]
    fn combined_query_merges_into_one_segment() {
        let raw = scenario();
        let mut segment = built(&raw);

        let combined = segment.by_vm_type_combined("h1", 1);

        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, MERGED_SEGMENT_ID);
        assert_eq!(combined[0].interface_ids, vec![2, 3, 4, 1]);
        assert!(segment.generate_not_yet_claimed(&raw).is_empty());
    }

    #[test]
    fn combined_query_on_unknown_keys_returns_one_empty_segment() {
        let raw = scenario();
        let mut segment = built(&raw);

        let combined = segment.by_vm_type_combined("nope", 99);
        assert_eq!(combined, vec![SegmentView::new(MERGED_SEGMENT_ID)]);
    }

    #[test]
    fn gateway_segments_do_not_claim() {
        let raw = PlatformRawData::new()
            .with_gateway_host_vif(7, VInterface::new(5, "g5", 30))
            .with_host_vif(1, VInterface::new(1, "a1", 10));
        let mut segment = built(&raw);

        assert_eq!(segment.all_gateway_segments().len(), 1);
        let rest = segment.generate_not_yet_claimed(&raw).to_vec();

        assert_eq!(all_ids(&rest), vec![1, 5]);
    }

    #[test]
    fn catch_all_skips_empty_mac() {
        let raw = PlatformRawData::new()
            .with_host_vif(1, VInterface::new(1, "", 10))
            .with_device_vif(VInterface::new(2, "", 10));
        let mut segment = built(&raw);

        assert!(segment.by_host_id(1).is_empty());
        assert!(segment.generate_not_yet_claimed(&raw).is_empty());
    }

    #[test]
    fn claims_accumulate_until_cleared() {
        let raw = scenario();
        let mut segment = built(&raw);

        segment.by_host_id(1);
        segment.generate_not_yet_claimed(&raw);
        segment.by_vm_id(1);
        assert!(segment.generate_not_yet_claimed(&raw).is_empty());

        segment.clear_claimed();
        assert_eq!(all_ids(segment.generate_not_yet_claimed(&raw)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn state_follows_cycle() {
        let raw = scenario();
        let mut segment = Segment::new();
        assert_eq!(segment.state(), CycleState::Empty);

        segment.rebuild(&raw);
        assert_eq!(segment.state(), CycleState::Built);

        let mut cycle = segment.begin_cycle();
        assert_eq!(cycle.state(), CycleState::Built);
        cycle.by_host_id(1);
        assert_eq!(cycle.state(), CycleState::Queried);
        let rest = cycle.finalize(&raw);
        assert_eq!(all_ids(&rest), vec![2, 3, 4]);
        assert_eq!(segment.state(), CycleState::Finalized);

        segment.clear_claimed();
        assert_eq!(segment.state(), CycleState::Built);
        assert!(segment.claimed().is_empty());
    }

    #[test]
    fn rebuild_keeps_pending_claims_visible() {
        let raw = scenario();
        let mut segment = built(&raw);
        segment.clear_claimed();
        segment.by_host_id(1);

        segment.rebuild(&raw);
        assert_eq!(segment.state(), CycleState::Queried);
        assert_eq!(segment.claimed().len(), 1);

        segment.clear_claimed();
        assert_eq!(segment.state(), CycleState::Built);
    }

    #[test]
    fn rebuild_drops_cached_catch_all() {
        let raw = scenario();
        let mut segment = built(&raw);
        assert!(!segment.begin_cycle().finalize(&raw).is_empty());

        segment.rebuild(&raw);
        assert!(segment.not_yet_claimed_segments().is_empty());
        assert_eq!(segment.state(), CycleState::Built);
    }

    #[test]
    fn query_before_build_is_empty() {
        let mut segment = Segment::new();
        assert!(segment.by_host_id(1).is_empty());
        assert_eq!(segment.state(), CycleState::Empty);
    }

    #[test]
    fn finalize_without_queries_returns_everything() {
        let raw = scenario();
        let mut segment = Segment::new();
        segment.rebuild(&raw);

        let rest = segment.begin_cycle().finalize(&raw);
        assert_eq!(all_ids(&rest), vec![1, 2, 3, 4]);
    }

    fn arb_topology() -> impl Strategy<Value = PlatformRawData> {
        let vif = (0u32..40, prop_oneof![Just(String::new()), "[a-f]{2}"], 1u32..4);
        proptest::collection::vec((0u8..5, 0u32..4, vif), 0..30).prop_map(|rows| {
            let mut raw = PlatformRawData::new()
                .with_vm(0, Some("s0"))
                .with_vm(1, Some("s1"))
                .with_pod_node(0, Some(0))
                .with_pod_node(1, Some(1))
                .with_pod(0, 0)
                .with_pod(1, 1);
            let mut seen = std::collections::HashSet::new();
            for (kind, owner, (id, mac, net)) in rows {
                if !seen.insert(id) {
                    continue;
                }
                let vif = VInterface::new(id, mac, net);
                raw = match kind {
                    0 => raw.with_host_vif(owner, vif),
                    1 => raw.with_vm_vif(owner % 2, vif),
                    2 => raw.with_pod_node_vif(owner % 2, vif),
                    3 => raw.with_pod_vif(owner % 2, vif),
                    _ => raw.with_gateway_host_vif(owner, vif),
                };
            }
            raw
        })
    }

    fn query_everything(segment: &mut Segment) -> Vec<SegmentView> {
        let mut out = Vec::new();
        for id in 0..4 {
            out.extend(segment.by_host_id(id));
            out.extend(segment.by_vm_id(id));
            out.extend(segment.by_pod_node_id(id));
        }
        out.extend(segment.by_launch_server("s0"));
        out.extend(segment.by_launch_server("s1"));
        out.extend(segment.by_vm_type_combined("s0", 0));
        out.extend(segment.all_gateway_segments().iter().cloned());
        out
    }

    proptest! {
        #[test]
        fn empty_mac_is_never_returned(raw in arb_topology()) {
            let mut segment = built(&raw);
            let mut out = query_everything(&mut segment);
            out.extend(segment.generate_not_yet_claimed(&raw).iter().cloned());
            prop_assert!(out.iter().all(|s| s.macs.iter().all(|m| !m.is_empty())));
        }

        #[test]
        fn rebuild_is_idempotent(raw in arb_topology()) {
            let mut segment = built(&raw);
            let first = query_everything(&mut segment);

            segment.rebuild(&raw);
            segment.clear_claimed();
            let second = query_everything(&mut segment);

            prop_assert_eq!(first, second);
        }
    }
}
