// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Integration tests for alarmd CLI functionality
//! OWNERS: @runtime
//! STATUS: Functional
//! API_STABILITY: Stable
//! TEST_COVERAGE: 2 integration tests
//!
//! TEST_SCENARIOS:
//!   - default_ready(): ready line with default limits
//!   - config_file_overrides_limits(): --config loads TOML limits

use std::io::Write;

#[test]
fn default_ready() {
    assert!(alarmd::execute(&[]).contains("ready"));
}

#[test]
fn config_file_overrides_limits() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("alarmd.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "max_alarms_per_uid = 3").unwrap();

    let path = path.to_str().unwrap();
    let output = alarmd::execute(&["--config", path]);
    assert!(output.contains("max_alarms_per_uid=3"), "{output}");

    let bad = dir.path().join("missing.toml");
    let output = alarmd::execute(&["--config", bad.to_str().unwrap()]);
    assert!(output.contains("config error"), "{output}");
}
