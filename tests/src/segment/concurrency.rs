// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::thread;

use trisolaris_common::models::topology::PlatformRawData;
use trisolaris_common::models::vinterface::VInterface;
use trisolaris_core::segment::SharedSegment;

fn topology(generation: u32) -> PlatformRawData {
    let mut raw = PlatformRawData::new();
    for host in 0..8u32 {
        for vif in 0..4u32 {
            let id = host * 4 + vif;
            raw = raw.with_host_vif(host, VInterface::new(id, format!("g{generation}-{id}"), vif));
        }
    }
    raw
}

#[test]
fn test_readers_never_see_mixed_generations() {
    let shared = SharedSegment::new();
    shared.publish(&topology(0));

    thread::scope(|scope| {
        scope.spawn(|| {
            for generation in 1..20 {
                shared.publish(&topology(generation));
            }
        });

        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let macs: Vec<String> = shared.cycle(|mut cycle| {
                        (0..8u32)
                            .flat_map(|host| cycle.by_host_id(host))
                            .flat_map(|s| s.macs)
                            .collect()
                    });
                    let prefix = macs[0].split('-').next().unwrap().to_string();
                    assert_eq!(macs.len(), 32);
                    assert!(macs.iter().all(|m| m.starts_with(&format!("{prefix}-"))));
                }
            });
        }
    });
}

#[test]
fn test_each_cycle_claims_from_scratch() {
    let raw = topology(0);
    let shared = SharedSegment::new();
    shared.publish(&raw);

    thread::scope(|scope| {
        for host in 0..8u32 {
            let shared = &shared;
            let raw = &raw;
            scope.spawn(move || {
                let rest = shared.cycle(|mut cycle| {
                    cycle.by_host_id(host);
                    cycle.finalize(raw)
                });
                assert_eq!(rest.len(), 1);
                assert_eq!(rest[0].interface_ids.len(), 28);
                assert!(
                    rest[0]
                        .interface_ids
                        .iter()
                        .all(|id| id / 4 != host)
                );
            });
        }
    });
}
