// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: alarmd daemon — alarm admission and delivery window authority
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests in this crate + tests/cli.rs + tests/scheduling.rs
//! DEPENDS_ON: nexus_alarm (window entity), parking_lot, log, serde/toml (config)
//!
//! SECURITY INVARIANTS:
//! - Alarm registrations are bounded per uid and globally
//! - Policy pushes never move an alarm earlier than its requester time
//! - Wake timer re-evaluation is driven only by the entity change signal

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod service;
pub mod store;

pub use cli::{execute, help, run};
pub use config::{AlarmdConfig, ConfigError};
pub use service::AlarmService;
pub use store::{AdmitReject, AlarmId, AlarmStore};
