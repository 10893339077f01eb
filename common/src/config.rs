// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

/// Runtime options for a resolution run.
///
/// Built from the command line flags; the engine itself only looks at
/// `skip_catch_all`, the rest shapes what the CLI prints.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Suppresses the human readable summary printed after the JSON output.
    ///
    /// This value is typically mapped from the `-q` or `--quiet` CLI flags.
    ///
    /// # Levels
    /// * **0** (Default): JSON followed by a summary on stderr.
    /// * **1+**: JSON only.
    pub quiet: u8,

    /// Pretty-prints JSON output instead of emitting one compact line.
    pub pretty: bool,

    /// Masks MAC addresses in printed output.
    ///
    /// The first three octets (the vendor OUI) stay visible, the device
    /// specific part is replaced by `XX`. Interface ids are left untouched
    /// so the output can still be correlated with the controller database.
    pub redact: bool,

    /// Skips the not-yet-claimed computation at the end of a cycle.
    ///
    /// Dedicated agents then receive no segments. Useful when only the
    /// per-entity view of a topology is of interest.
    pub skip_catch_all: bool,
}
