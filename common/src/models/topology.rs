// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Topology Snapshot
//!
//! [`PlatformRawData`] is the read-only picture of the platform that one refresh
//! cycle of the segment engine works from: which interfaces hang off which
//! device, which VMs a launch server runs, which pods a pod-node hosts and which
//! VM a pod-node lives in.
//!
//! Snapshots are rebuilt wholesale on every refresh. They either come from a
//! [`TopologyDocument`] (JSON rows as the controller database holds them) or are
//! assembled directly with the `with_*` builder methods.
//!
//! ## Tolerated malformations
//! * Interfaces pointing at an undeclared device stay in the device list but are
//!   attached to no entity.
//! * A pod-node whose VM is unknown keeps its link here; the closure builder
//!   drops it.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::debug;
use crate::models::vinterface::{DeviceType, VInterface, VifSet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("interface {0} is declared more than once")]
    DuplicateInterface(u32),
    #[error("{kind:?} {id} is declared more than once")]
    DuplicateDevice { kind: DeviceType, id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodNode {
    pub id: u32,
    #[serde(default)]
    pub vm_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRow {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRow {
    pub id: u32,
    #[serde(default)]
    pub launch_server: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRow {
    pub id: u32,
    #[serde(default)]
    pub pod_node_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VInterfaceRow {
    pub id: u32,
    #[serde(default)]
    pub mac: String,
    pub network_id: u32,
    pub device_type: DeviceType,
    pub device_id: u32,
}

/// Serialized form of a topology, one list per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyDocument {
    pub hosts: Vec<HostRow>,
    pub gateway_hosts: Vec<HostRow>,
    pub vms: Vec<VmRow>,
    pub pod_nodes: Vec<PodNode>,
    pub pods: Vec<PodRow>,
    pub vinterfaces: Vec<VInterfaceRow>,
}

impl TopologyDocument {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlatformRawData {
    server_to_vm_ids: BTreeMap<String, BTreeSet<u32>>,
    vm_ids: BTreeSet<u32>,
    host_id_to_vifs: BTreeMap<u32, VifSet>,
    gateway_host_id_to_vifs: BTreeMap<u32, VifSet>,
    vm_id_to_vifs: BTreeMap<u32, VifSet>,
    pod_node_id_to_vifs: BTreeMap<u32, VifSet>,
    pod_node_id_to_pod_ids: BTreeMap<u32, BTreeSet<u32>>,
    pod_id_to_vifs: BTreeMap<u32, VifSet>,
    pod_node_id_to_vm_id: BTreeMap<u32, u32>,
    id_to_pod_node: BTreeMap<u32, PodNode>,
    device_vifs: Vec<Arc<VInterface>>,
}

impl PlatformRawData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a [`TopologyDocument`] and converts it in one go.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let document = TopologyDocument::from_json(raw)?;
        Ok(Self::try_from(document)?)
    }

    pub fn with_host_vif(mut self, host_id: u32, vif: VInterface) -> Self {
        let vif = self.push_device_vif(vif);
        self.host_id_to_vifs.entry(host_id).or_default().insert(vif);
        self
    }

    pub fn with_gateway_host_vif(mut self, host_id: u32, vif: VInterface) -> Self {
        let vif = self.push_device_vif(vif);
        self.gateway_host_id_to_vifs
            .entry(host_id)
            .or_default()
            .insert(vif);
        self
    }

    /// Declares a VM, optionally placing it on a launch server.
    pub fn with_vm(mut self, vm_id: u32, launch_server: Option<&str>) -> Self {
        self.vm_ids.insert(vm_id);
        if let Some(server) = launch_server.filter(|s| !s.is_empty()) {
            self.server_to_vm_ids
                .entry(server.to_string())
                .or_default()
                .insert(vm_id);
        }
        self
    }

    pub fn with_vm_vif(mut self, vm_id: u32, vif: VInterface) -> Self {
        self.vm_ids.insert(vm_id);
        let vif = self.push_device_vif(vif);
        self.vm_id_to_vifs.entry(vm_id).or_default().insert(vif);
        self
    }

    /// Declares a pod-node, optionally running inside a VM.
    pub fn with_pod_node(mut self, pod_node_id: u32, vm_id: Option<u32>) -> Self {
        self.id_to_pod_node.insert(
            pod_node_id,
            PodNode {
                id: pod_node_id,
                vm_id,
            },
        );
        match vm_id {
            Some(vm_id) => {
                self.pod_node_id_to_vm_id.insert(pod_node_id, vm_id);
            }
            None => {
                self.pod_node_id_to_vm_id.remove(&pod_node_id);
            }
        }
        self
    }

    /// Attaches an interface to a pod-node, declaring the pod-node if needed.
    pub fn with_pod_node_vif(mut self, pod_node_id: u32, vif: VInterface) -> Self {
        self.id_to_pod_node.entry(pod_node_id).or_insert(PodNode {
            id: pod_node_id,
            vm_id: None,
        });
        let vif = self.push_device_vif(vif);
        self.pod_node_id_to_vifs
            .entry(pod_node_id)
            .or_default()
            .insert(vif);
        self
    }

    pub fn with_pod(mut self, pod_id: u32, pod_node_id: u32) -> Self {
        self.pod_node_id_to_pod_ids
            .entry(pod_node_id)
            .or_default()
            .insert(pod_id);
        self
    }

    pub fn with_pod_vif(mut self, pod_id: u32, vif: VInterface) -> Self {
        let vif = self.push_device_vif(vif);
        self.pod_id_to_vifs.entry(pod_id).or_default().insert(vif);
        self
    }

    /// Adds an interface that belongs to no indexed entity.
    /// It only ever shows up in the catch-all segment.
    pub fn with_device_vif(mut self, vif: VInterface) -> Self {
        self.push_device_vif(vif);
        self
    }

    fn push_device_vif(&mut self, vif: VInterface) -> Arc<VInterface> {
        let vif = Arc::new(vif);
        self.device_vifs.push(Arc::clone(&vif));
        vif
    }

    pub fn server_to_vm_ids(&self) -> &BTreeMap<String, BTreeSet<u32>> {
        &self.server_to_vm_ids
    }

    pub fn has_vm(&self, vm_id: u32) -> bool {
        self.vm_ids.contains(&vm_id)
    }

    pub fn host_id_to_vifs(&self) -> &BTreeMap<u32, VifSet> {
        &self.host_id_to_vifs
    }

    pub fn gateway_host_id_to_vifs(&self) -> &BTreeMap<u32, VifSet> {
        &self.gateway_host_id_to_vifs
    }

    pub fn vm_id_to_vifs(&self) -> &BTreeMap<u32, VifSet> {
        &self.vm_id_to_vifs
    }

    pub fn pod_node_id_to_vifs(&self) -> &BTreeMap<u32, VifSet> {
        &self.pod_node_id_to_vifs
    }

    pub fn pod_node_id_to_pod_ids(&self) -> &BTreeMap<u32, BTreeSet<u32>> {
        &self.pod_node_id_to_pod_ids
    }

    pub fn pod_id_to_vifs(&self) -> &BTreeMap<u32, VifSet> {
        &self.pod_id_to_vifs
    }

    pub fn pod_node_id_to_vm_id(&self) -> &BTreeMap<u32, u32> {
        &self.pod_node_id_to_vm_id
    }

    pub fn id_to_pod_node(&self) -> &BTreeMap<u32, PodNode> {
        &self.id_to_pod_node
    }

    /// Every interface of the snapshot in insertion order, attached or not.
    pub fn device_vifs(&self) -> &[Arc<VInterface>] {
        &self.device_vifs
    }
}

fn check_unique(
    kind: DeviceType,
    ids: impl Iterator<Item = u32>,
) -> Result<HashSet<u32>, TopologyError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(TopologyError::DuplicateDevice { kind, id });
        }
    }
    Ok(seen)
}

impl TryFrom<TopologyDocument> for PlatformRawData {
    type Error = TopologyError;

    fn try_from(doc: TopologyDocument) -> Result<Self, Self::Error> {
        let hosts = check_unique(DeviceType::Host, doc.hosts.iter().map(|h| h.id))?;
        let gateways = check_unique(
            DeviceType::GatewayHost,
            doc.gateway_hosts.iter().map(|h| h.id),
        )?;
        let vms = check_unique(DeviceType::Vm, doc.vms.iter().map(|v| v.id))?;
        let pod_nodes = check_unique(DeviceType::PodNode, doc.pod_nodes.iter().map(|n| n.id))?;
        let pods = check_unique(DeviceType::Pod, doc.pods.iter().map(|p| p.id))?;

        let mut raw = PlatformRawData::new();
        for vm in &doc.vms {
            raw = raw.with_vm(vm.id, vm.launch_server.as_deref());
        }
        for node in &doc.pod_nodes {
            raw = raw.with_pod_node(node.id, node.vm_id);
        }
        for pod in &doc.pods {
            if let Some(pod_node_id) = pod.pod_node_id {
                raw = raw.with_pod(pod.id, pod_node_id);
            }
        }

        let mut vif_ids = HashSet::with_capacity(doc.vinterfaces.len());
        for row in doc.vinterfaces {
            if !vif_ids.insert(row.id) {
                return Err(TopologyError::DuplicateInterface(row.id));
            }

            let known = match row.device_type {
                DeviceType::Host => hosts.contains(&row.device_id),
                DeviceType::GatewayHost => gateways.contains(&row.device_id),
                DeviceType::Vm => vms.contains(&row.device_id),
                DeviceType::PodNode => pod_nodes.contains(&row.device_id),
                DeviceType::Pod => pods.contains(&row.device_id),
                DeviceType::Other => false,
            };
            let vif = VInterface::new(row.id, row.mac, row.network_id);
            if !known {
                if row.device_type != DeviceType::Other {
                    debug!(
                        "interface {} references unknown {:?} {}",
                        vif.id, row.device_type, row.device_id
                    );
                }
                raw = raw.with_device_vif(vif);
                continue;
            }

            raw = match row.device_type {
                DeviceType::Host => raw.with_host_vif(row.device_id, vif),
                DeviceType::GatewayHost => raw.with_gateway_host_vif(row.device_id, vif),
                DeviceType::Vm => raw.with_vm_vif(row.device_id, vif),
                DeviceType::PodNode => raw.with_pod_node_vif(row.device_id, vif),
                DeviceType::Pod => raw.with_pod_vif(row.device_id, vif),
                DeviceType::Other => raw.with_device_vif(vif),
            };
        }

        Ok(raw)
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
