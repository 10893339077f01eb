// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Propagates pod and pod-node interfaces up to the VM that hosts them.
//!
//! A pod runs on a pod-node, a pod-node runs inside one VM. A VM therefore
//! "sees" its own NICs plus everything of every pod-node it hosts and every
//! pod on those pod-nodes.

use std::collections::BTreeMap;

use trisolaris_common::debug;
use trisolaris_common::models::topology::PlatformRawData;
use trisolaris_common::models::vinterface::VifSet;

/// Interface sets keyed by pod-node or VM id. Adding to an existing key unions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdToVifs {
    sets: BTreeMap<u32, VifSet>,
}

impl IdToVifs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: u32, vifs: &VifSet) {
        match self.sets.get_mut(&id) {
            Some(existing) => existing.union(vifs),
            None => {
                self.sets.insert(id, vifs.clone());
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&VifSet> {
        self.sets.get(&id)
    }

    pub fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.sets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &VifSet)> {
        self.sets.iter().map(|(id, vifs)| (*id, vifs))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Closures {
    /// Pod-node id -> its own interfaces plus those of all its pods.
    pub pod_node_all_vifs: IdToVifs,
    /// VM id -> union of `pod_node_all_vifs` over the pod-nodes it hosts.
    pub vm_pod_node_all_vifs: IdToVifs,
}

pub fn build(raw: &PlatformRawData) -> Closures {
    let mut pod_node_all_vifs = IdToVifs::new();
    for pod_node_id in raw.id_to_pod_node().keys().copied() {
        if let Some(vifs) = raw.pod_node_id_to_vifs().get(&pod_node_id) {
            pod_node_all_vifs.add(pod_node_id, vifs);
        }
        let Some(pod_ids) = raw.pod_node_id_to_pod_ids().get(&pod_node_id) else {
            continue;
        };
        for pod_id in pod_ids {
            if let Some(vifs) = raw.pod_id_to_vifs().get(pod_id) {
                pod_node_all_vifs.add(pod_node_id, vifs);
            }
        }
    }

    let mut vm_pod_node_all_vifs = IdToVifs::new();
    for (&pod_node_id, &vm_id) in raw.pod_node_id_to_vm_id() {
        if !raw.has_vm(vm_id) {
            debug!("pod-node {pod_node_id} references unknown vm {vm_id}, skipped");
            continue;
        }
        if let Some(all_vifs) = pod_node_all_vifs.get(pod_node_id) {
            vm_pod_node_all_vifs.add(vm_id, all_vifs);
        }
    }

    Closures {
        pod_node_all_vifs,
        vm_pod_node_all_vifs,
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
