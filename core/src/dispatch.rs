// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Resolves segments for a batch of agents within one cycle.
//!
//! Agents are answered in request order, except that dedicated agents receive
//! the catch-all, which only exists once every other agent has claimed its
//! interfaces.

use serde::{Deserialize, Serialize};
use trisolaris_common::config::Config;
use trisolaris_common::models::segment::SegmentView;
use trisolaris_common::models::topology::PlatformRawData;

use crate::segment::Cycle;

/// How an agent is deployed, which decides what it may consider local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentKind {
    /// Runs on a hypervisor and watches the VMs it launches.
    LaunchServer { server: String },
    Host { host_id: u32 },
    /// VM mode: the launch server's VMs and the host's own NICs, merged.
    Vm { launch_server: String, host_id: u32 },
    /// Runs inside a VM.
    WorkloadVm { vm_id: u32 },
    PodNode { pod_node_id: u32 },
    Gateway,
    /// Receives whatever no other agent claimed.
    Dedicated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub name: String,
    #[serde(flatten)]
    pub kind: AgentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSegments {
    pub name: String,
    pub segments: Vec<SegmentView>,
}

fn resolve_one(cycle: &mut Cycle<'_>, kind: &AgentKind) -> Vec<SegmentView> {
    match kind {
        AgentKind::LaunchServer { server } => cycle.by_launch_server(server),
        AgentKind::Host { host_id } => cycle.by_host_id(*host_id),
        AgentKind::Vm {
            launch_server,
            host_id,
        } => cycle.by_vm_type_combined(launch_server, *host_id),
        AgentKind::WorkloadVm { vm_id } => cycle.by_vm_id(*vm_id),
        AgentKind::PodNode { pod_node_id } => cycle.by_pod_node_id(*pod_node_id),
        AgentKind::Gateway => cycle.all_gateway_segments().to_vec(),
        AgentKind::Dedicated => Vec::new(),
    }
}

pub fn resolve_agents(
    mut cycle: Cycle<'_>,
    raw: &PlatformRawData,
    agents: &[AgentRequest],
    cfg: &Config,
) -> Vec<AgentSegments> {
    let mut resolved: Vec<Option<Vec<SegmentView>>> = agents
        .iter()
        .map(|agent| match agent.kind {
            AgentKind::Dedicated => None,
            ref kind => Some(resolve_one(&mut cycle, kind)),
        })
        .collect();

    let catch_all = if cfg.skip_catch_all {
        Vec::new()
    } else {
        cycle.finalize(raw)
    };

    agents
        .iter()
        .zip(resolved.iter_mut())
        .map(|(agent, segments)| AgentSegments {
            name: agent.name.clone(),
            segments: segments.take().unwrap_or_else(|| catch_all.clone()),
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
