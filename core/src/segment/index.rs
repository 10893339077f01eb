// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! The five per-dimension indices and the cached gateway segments.
//!
//! A [`SegmentIndex`] is immutable once built; a refresh builds a new one and
//! swaps it in whole.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::Serialize;
use trisolaris_common::models::segment::{MERGED_SEGMENT_ID, SegmentView};
use trisolaris_common::models::topology::PlatformRawData;
use trisolaris_common::models::vinterface::VifSet;

use super::closure::{self, Closures};
use super::network_macs::{EntityIndex, NetworkMacs};

#[derive(Debug, Clone, Default)]
pub struct SegmentIndex {
    pub(crate) launch_server: EntityIndex<String>,
    pub(crate) host: EntityIndex<u32>,
    pub(crate) gateway_host: EntityIndex<u32>,
    pub(crate) vm: EntityIndex<u32>,
    pub(crate) pod_node: EntityIndex<u32>,
    pub(crate) all_gateway_segments: Vec<SegmentView>,
}

/// Entry counts per dimension, reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub launch_servers: usize,
    pub hosts: usize,
    pub gateway_hosts: usize,
    pub vms: usize,
    pub pod_nodes: usize,
    pub gateway_segments: usize,
}

fn direct(sets: &BTreeMap<u32, VifSet>) -> EntityIndex<u32> {
    sets.par_iter()
        .map(|(&id, vifs)| {
            let mut macs = NetworkMacs::new();
            macs.extend(vifs.iter());
            (id, macs)
        })
        .collect::<BTreeMap<_, _>>()
        .into()
}

impl SegmentIndex {
    pub fn build(raw: &PlatformRawData) -> Self {
        let closures = closure::build(raw);

        let mut index = Self {
            launch_server: build_launch_server(raw, &closures),
            host: direct(raw.host_id_to_vifs()),
            gateway_host: direct(raw.gateway_host_id_to_vifs()),
            vm: build_vm(raw, &closures),
            pod_node: build_pod_node(&closures),
            all_gateway_segments: Vec::new(),
        };
        index.all_gateway_segments = flatten_gateways(&index.gateway_host);
        index
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            launch_servers: self.launch_server.len(),
            hosts: self.host.len(),
            gateway_hosts: self.gateway_host.len(),
            vms: self.vm.len(),
            pod_nodes: self.pod_node.len(),
            gateway_segments: self.all_gateway_segments.len(),
        }
    }
}

fn build_launch_server(raw: &PlatformRawData, closures: &Closures) -> EntityIndex<String> {
    raw.server_to_vm_ids()
        .par_iter()
        .map(|(server, vm_ids)| {
            let mut macs = NetworkMacs::new();
            for &vm_id in vm_ids {
                if let Some(vifs) = raw.vm_id_to_vifs().get(&vm_id) {
                    macs.extend(vifs.iter());
                }
                if let Some(vifs) = closures.vm_pod_node_all_vifs.get(vm_id) {
                    macs.extend(vifs.iter());
                }
            }
            (server.clone(), macs)
        })
        .collect::<BTreeMap<_, _>>()
        .into()
}

/// VMs with own interfaces and VMs only reachable through a pod-node both get an entry.
fn build_vm(raw: &PlatformRawData, closures: &Closures) -> EntityIndex<u32> {
    let vm_ids: BTreeSet<u32> = raw
        .vm_id_to_vifs()
        .keys()
        .copied()
        .chain(closures.vm_pod_node_all_vifs.keys())
        .collect();

    vm_ids
        .par_iter()
        .map(|&vm_id| {
            let mut macs = NetworkMacs::new();
            if let Some(vifs) = raw.vm_id_to_vifs().get(&vm_id) {
                macs.extend(vifs.iter());
            }
            if let Some(vifs) = closures.vm_pod_node_all_vifs.get(vm_id) {
                macs.extend(vifs.iter());
            }
            (vm_id, macs)
        })
        .collect::<BTreeMap<_, _>>()
        .into()
}

fn build_pod_node(closures: &Closures) -> EntityIndex<u32> {
    let mut index = EntityIndex::new();
    for (pod_node_id, vifs) in closures.pod_node_all_vifs.iter() {
        let mut macs = NetworkMacs::new();
        macs.extend(vifs.iter());
        index.add(pod_node_id, macs);
    }
    index
}

/// Every network of every gateway host becomes its own segment with the merged id.
/// Nothing is claimed here.
fn flatten_gateways(gateway_host: &EntityIndex<u32>) -> Vec<SegmentView> {
    let mut segments = Vec::new();
    for host in gateway_host.values() {
        for (_, vifs) in host.iter() {
            let mut segment = SegmentView::new(MERGED_SEGMENT_ID);
            for vif in vifs {
                segment.push(&vif.mac, vif.id);
            }
            segments.push(segment);
        }
    }
    segments
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
