// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Utilities for privacy-preserving output.
//!
//! MAC addresses in topology documents are plain strings as stored by the
//! controller, so masking works on the textual form instead of a parsed address.

use crate::models::segment::SegmentView;

/// Redacts a MAC address to prevent hardware fingerprinting.
///
/// The vendor OUI (first three octets) stays readable, the rest becomes `XX`.
/// Strings that do not look like a colon or dash separated MAC are fully masked.
///
/// # Examples
/// ```
/// use trisolaris_common::utils::redact;
///
/// assert_eq!(redact::mac("2c:cf:67:f2:51:e3"), "2c:cf:67:XX:XX:XX");
/// assert_eq!(redact::mac("2C-CF-67-F2-51-E3"), "2C-CF-67-XX-XX-XX");
/// assert_eq!(redact::mac("garbage"), "XX:XX:XX:XX:XX:XX");
/// ```
pub fn mac(mac: &str) -> String {
    let separator = if mac.contains('-') { '-' } else { ':' };
    let octets: Vec<&str> = mac.split(separator).collect();

    let well_formed = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    if !well_formed {
        return "XX:XX:XX:XX:XX:XX".to_string();
    }

    let sep = separator.to_string();
    format!("{}{sep}XX{sep}XX{sep}XX", octets[..3].join(sep.as_str()))
}

/// Returns a copy of `segment` with every MAC redacted.
pub fn segment(segment: &SegmentView) -> SegmentView {
    SegmentView {
        id: segment.id,
        macs: segment.macs.iter().map(|m| mac(m)).collect(),
        interface_ids: segment.interface_ids.clone(),
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
