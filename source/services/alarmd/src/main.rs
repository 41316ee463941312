// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: alarmd daemon entrypoint
//! OWNERS: @runtime
//! PUBLIC API: main()
//! DEPENDS_ON: alarmd::run

#![forbid(unsafe_code)]

fn main() {
    alarmd::run();
}
