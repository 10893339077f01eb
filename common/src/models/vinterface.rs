// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Virtual Interface Model
//!
//! A [`VInterface`] is the atomic unit the segment engine works with: one
//! virtual NIC with its MAC, its numeric id and the network it is plugged into.
//!
//! Records are read once from a topology snapshot and never mutated afterwards.
//! Every index that references a record holds an [`Arc`] to it instead of a copy.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The kind of device an interface is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Host,
    GatewayHost,
    Vm,
    PodNode,
    Pod,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VInterface {
    pub id: u32,
    pub mac: String,
    pub network_id: u32,
}

impl VInterface {
    pub fn new(id: u32, mac: impl Into<String>, network_id: u32) -> Self {
        Self {
            id,
            mac: mac.into(),
            network_id,
        }
    }

    /// Interfaces without a MAC are never indexed and never handed to an agent.
    pub fn has_mac(&self) -> bool {
        !self.mac.is_empty()
    }
}

/// An ordered set of interfaces keyed by interface id.
///
/// Iteration is ascending by id. [`VifSet::insert`] and [`VifSet::union`] keep
/// the record already present for an id; a set never loses or replaces members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VifSet {
    vifs: BTreeMap<u32, Arc<VInterface>>,
}

impl VifSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `vif` unless an interface with the same id is already present.
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, vif: Arc<VInterface>) -> bool {
        match self.vifs.entry(vif.id) {
            Entry::Vacant(slot) => {
                slot.insert(vif);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn union(&mut self, other: &VifSet) {
        for vif in other.iter() {
            self.insert(Arc::clone(vif));
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.vifs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.vifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vifs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<VInterface>> {
        self.vifs.values()
    }
}

impl FromIterator<Arc<VInterface>> for VifSet {
    fn from_iter<I: IntoIterator<Item = Arc<VInterface>>>(iter: I) -> Self {
        let mut set = VifSet::new();
        for vif in iter {
            set.insert(vif);
        }
        set
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
