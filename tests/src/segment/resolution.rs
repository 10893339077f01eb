// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use trisolaris_common::config::Config;
use trisolaris_common::models::segment::SegmentView;
use trisolaris_common::models::topology::PlatformRawData;
use trisolaris_common::models::vinterface::VInterface;
use trisolaris_core::dispatch::{self, AgentSegments};
use trisolaris_core::segment::{CycleState, Segment};

use crate::utils;

fn ids(segments: &[SegmentView]) -> Vec<u32> {
    let mut ids: Vec<u32> = segments
        .iter()
        .flat_map(|s| s.interface_ids.iter().copied())
        .collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_fixture_vm_closure_and_catch_all() {
    let raw: PlatformRawData = utils::topology("topology.json").expect("fixture loads");
    let mut segment = Segment::new();
    segment.rebuild(&raw);

    let mut cycle = segment.begin_cycle();
    let vm = cycle.by_vm_id(11);
    assert_eq!(vm.len(), 2, "one segment per network");
    assert_eq!(vm[0].id, 10);
    assert_eq!(vm[0].interface_ids, vec![2]);
    assert_eq!(vm[1].id, 20);
    assert_eq!(vm[1].interface_ids, vec![3, 4]);

    let rest = cycle.finalize(&raw);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].id, 1);
    assert_eq!(rest[0].interface_ids, vec![1, 5, 6, 8]);
}

#[test]
fn test_fixture_launch_server_spans_all_its_vms() {
    let raw = utils::topology("topology.json").expect("fixture loads");
    let mut segment = Segment::new();
    segment.rebuild(&raw);
    segment.clear_claimed();

    let segments = segment.by_launch_server("10.0.0.1");
    let network_ids: Vec<u32> = segments.iter().map(|s| s.id).collect();

    assert_eq!(network_ids, vec![10, 20]);
    assert_eq!(ids(&segments), vec![2, 3, 4, 6]);
}

#[test]
fn test_fixture_dispatch_hands_leftovers_to_dedicated() {
    let raw = utils::topology("topology.json").expect("fixture loads");
    let agents = utils::agents("agents.json").expect("fixture loads");
    let mut segment = Segment::new();
    segment.rebuild(&raw);

    let out: Vec<AgentSegments> =
        dispatch::resolve_agents(segment.begin_cycle(), &raw, &agents, &Config::default());

    let names: Vec<&str> = out.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["pod-node-21", "dedicated", "gateway", "vm-12"]);
    assert_eq!(ids(&out[0].segments), vec![3, 4]);
    assert_eq!(ids(&out[2].segments), vec![5]);
    assert_eq!(ids(&out[3].segments), vec![6]);
    // gateway interfaces are never claimed, so 5 is still left over
    assert_eq!(ids(&out[1].segments), vec![1, 2, 5, 8]);
    assert_eq!(segment.state(), CycleState::Finalized);
}

#[test]
fn test_transitive_closure_without_direct_vm_vifs() {
    let raw = PlatformRawData::new()
        .with_vm(1, None)
        .with_vm(2, None)
        .with_pod_node(10, Some(1))
        .with_pod_node_vif(10, VInterface::new(2, "i2", 5))
        .with_pod(100, 10)
        .with_pod_vif(100, VInterface::new(1, "i1", 5));
    let mut segment = Segment::new();
    segment.rebuild(&raw);
    segment.clear_claimed();

    assert_eq!(ids(&segment.by_vm_id(1)), vec![1, 2]);
    assert_eq!(ids(&segment.by_pod_node_id(10)), vec![1, 2]);
    assert!(segment.by_vm_id(2).is_empty());
}

#[test]
fn test_gateway_read_does_not_change_catch_all() {
    let raw = utils::topology("topology.json").expect("fixture loads");
    let mut segment = Segment::new();
    segment.rebuild(&raw);

    segment.clear_claimed();
    let without = segment.generate_not_yet_claimed(&raw).to_vec();

    segment.clear_claimed();
    assert!(!segment.all_gateway_segments().is_empty());
    let with = segment.generate_not_yet_claimed(&raw).to_vec();

    assert_eq!(without, with);
}

#[test]
fn test_rebuild_twice_gives_identical_results() {
    let raw = utils::topology("topology.json").expect("fixture loads");
    let mut segment = Segment::new();

    let mut passes = Vec::new();
    for _ in 0..2 {
        segment.rebuild(&raw);
        let mut cycle = segment.begin_cycle();
        let mut out = Vec::new();
        out.extend(cycle.by_launch_server("10.0.0.1"));
        out.extend(cycle.by_host_id(1));
        out.extend(cycle.by_vm_type_combined("10.0.0.1", 1));
        out.extend(cycle.finalize(&raw));
        passes.push(out);
    }

    assert_eq!(passes[0], passes[1]);
}
