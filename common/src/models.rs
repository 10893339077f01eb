// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Data shared between the engine, the command line and the tests.
//!
//! * [`vinterface`]: interface records and the ordered [`vinterface::VifSet`].
//! * [`topology`]: the raw topology snapshot consumed by the segment engine.
//! * [`segment`]: the per-agent output unit sent over the wire.

pub mod segment;
pub mod topology;
pub mod vinterface;
