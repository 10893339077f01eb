// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Per-network grouping of interfaces and the per-entity index built on top of it.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::sync::Arc;

use trisolaris_common::models::segment::SegmentView;
use trisolaris_common::models::vinterface::VInterface;

use super::claimed::ClaimedSet;

/// Interfaces visible to one entity, grouped by network id.
///
/// No de-duplication happens here: adding the same interface twice yields two
/// entries. Callers dedup through the set they add from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkMacs {
    networks: BTreeMap<u32, Vec<Arc<VInterface>>>,
}

impl NetworkMacs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `vif` under its network. Interfaces without a MAC are skipped.
    pub fn add(&mut self, vif: &Arc<VInterface>) {
        if !vif.has_mac() {
            return;
        }
        self.networks
            .entry(vif.network_id)
            .or_default()
            .push(Arc::clone(vif));
    }

    pub fn extend<'a>(&mut self, vifs: impl IntoIterator<Item = &'a Arc<VInterface>>) {
        for vif in vifs {
            self.add(vif);
        }
    }

    pub fn get(&self, network_id: u32) -> &[Arc<VInterface>] {
        self.networks
            .get(&network_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Arc<VInterface>])> {
        self.networks.iter().map(|(id, vifs)| (*id, vifs.as_slice()))
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// One segment per network, id set to the network id, claiming every interface.
    pub fn to_segments(&self, claimed: &mut ClaimedSet) -> Vec<SegmentView> {
        self.iter()
            .map(|(network_id, vifs)| {
                let mut segment = SegmentView::new(network_id);
                for vif in vifs {
                    segment.push(&vif.mac, vif.id);
                    claimed.claim(vif.id);
                }
                segment
            })
            .collect()
    }

    /// Appends every interface of every network to `segment`, claiming each one.
    pub fn flatten_into(&self, segment: &mut SegmentView, claimed: &mut ClaimedSet) {
        for (_, vifs) in self.iter() {
            for vif in vifs {
                segment.push(&vif.mac, vif.id);
                claimed.claim(vif.id);
            }
        }
    }
}

/// Maps an entity key (launch server name, host id, VM id...) to what it sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityIndex<K: Ord> {
    entries: BTreeMap<K, NetworkMacs>,
}

impl<K: Ord> Default for EntityIndex<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord> From<BTreeMap<K, NetworkMacs>> for EntityIndex<K> {
    fn from(entries: BTreeMap<K, NetworkMacs>) -> Self {
        Self { entries }
    }
}

impl<K: Ord> EntityIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `macs` for `key`, replacing whatever was there.
    pub fn add(&mut self, key: K, macs: NetworkMacs) {
        self.entries.insert(key, macs);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&NetworkMacs>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key)
    }

    /// Segments for `key`, one per network. Unknown keys give an empty list.
    pub fn resolve<Q>(&self, key: &Q, claimed: &mut ClaimedSet) -> Vec<SegmentView>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.entries.get(key) {
            Some(macs) => macs.to_segments(claimed),
            None => Vec::new(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &NetworkMacs> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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
