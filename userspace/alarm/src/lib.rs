// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Alarm delivery window entity shared by alarmd and its clients
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests per module + tests/window_scenarios.rs
//! DEPENDS_ON: bitflags (delivery flags), serde (snapshots), thiserror (index errors)
//!
//! Each [`Alarm`] reconciles a closed set of named [`Policy`] constraints of
//! the form "do not deliver before T" into one delivery window
//! `[when_elapsed, max_when_elapsed]` and reports whether the window moved.
//!
//! INVARIANTS:
//! - `when_elapsed` is the maximum over all policy slots
//! - `max_when_elapsed >= when_elapsed`
//! - No policy moves delivery earlier than the requester slot
//! - Window end arithmetic saturates at `u64::MAX`

#![forbid(unsafe_code)]

mod alarm;
mod dump;
mod identity;
mod kind;
mod policy;
mod window;

pub use alarm::{Alarm, AlarmClockInfo, AlarmFlags, AlarmRequest, PriorityClass, WorkSource};
pub use dump::{format_duration, format_relative, AlarmSnapshot, PolicySlot};
pub use identity::{AlarmIdentity, ListenerToken, OperationToken, OwnerIdentity};
pub use kind::AlarmKind;
pub use policy::{Policy, PolicyIndexError};
pub use window::{window_end, DeliveryWindow};
