// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Named delivery policies that may hold an alarm back
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//!
//! INVARIANTS:
//! - The policy set is closed; slot arrays are sized by `Policy::COUNT`
//! - `Requester` is always slot 0 and anchors the delivery floor

use serde::Serialize;
use thiserror::Error;

/// A source of a "do not deliver before T" constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// The time the caller originally asked for.
    Requester = 0,
    /// Earliest time allowed by the app-standby / quota evaluator.
    AppStandby = 1,
}

impl Policy {
    /// Number of named policies.
    pub const COUNT: usize = 2;
    /// Every policy, in slot order.
    pub const ALL: [Policy; Policy::COUNT] = [Policy::Requester, Policy::AppStandby];

    /// Slot index of this policy.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable diagnostic name.
    pub const fn name(self) -> &'static str {
        match self {
            Policy::Requester => "requester",
            Policy::AppStandby => "app_standby",
        }
    }
}

/// Raw policy index outside `0..Policy::COUNT`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("policy index {0} out of range")]
pub struct PolicyIndexError(pub usize);

impl TryFrom<usize> for Policy {
    type Error = PolicyIndexError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Policy::ALL.get(index).copied().ok_or(PolicyIndexError(index))
    }
}
