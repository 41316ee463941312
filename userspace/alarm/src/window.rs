// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Delivery window reconciliation across named policies
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests + proptest invariants
//!
//! All times are milliseconds in the elapsed (monotonic) time base.
//!
//! INVARIANTS (hold after every mutation):
//! - `when_elapsed == max(policy slots)`
//! - `max_when_elapsed == max(when_elapsed, requester + window_length)`, the sum
//!   saturating at `u64::MAX`
//! - `when_elapsed >= requester slot`

use crate::policy::Policy;

/// End of a window starting at `start` with `length` slack. Saturates at
/// `u64::MAX` instead of wrapping.
pub const fn window_end(start: u64, length: u64) -> u64 {
    match start.checked_add(length) {
        Some(end) => end,
        None => u64::MAX,
    }
}

/// Per-policy earliest times and the window derived from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryWindow {
    policy_elapsed: [u64; Policy::COUNT],
    window_length: u64,
    when_elapsed: u64,
    max_when_elapsed: u64,
}

impl DeliveryWindow {
    /// Creates a window anchored at `requested_elapsed`. Non-requester slots
    /// start at 0, which imposes no constraint.
    pub fn new(requested_elapsed: u64, window_length: u64) -> Self {
        let mut policy_elapsed = [0; Policy::COUNT];
        policy_elapsed[Policy::Requester.index()] = requested_elapsed;
        let mut window = Self { policy_elapsed, window_length, when_elapsed: 0, max_when_elapsed: 0 };
        let _ = window.reconcile();
        window
    }

    /// Earliest delivery time according to `policy` alone.
    pub fn policy_elapsed(&self, policy: Policy) -> u64 {
        self.policy_elapsed[policy.index()]
    }

    /// Overwrites the slot for `policy` and recomputes the window.
    ///
    /// Returns `true` iff `when_elapsed` or `max_when_elapsed` changed.
    #[must_use = "a changed window must be propagated to the wake timer"]
    pub fn set_policy_elapsed(&mut self, policy: Policy, elapsed: u64) -> bool {
        self.policy_elapsed[policy.index()] = elapsed;
        self.reconcile()
    }

    /// Earliest time delivery is permitted.
    pub fn when_elapsed(&self) -> u64 {
        self.when_elapsed
    }

    /// Latest time by which delivery must happen.
    pub fn max_when_elapsed(&self) -> u64 {
        self.max_when_elapsed
    }

    /// Slack the requester declared; 0 for exact alarms.
    pub fn window_length(&self) -> u64 {
        self.window_length
    }

    fn reconcile(&mut self) -> bool {
        let old = (self.when_elapsed, self.max_when_elapsed);

        self.when_elapsed = self.policy_elapsed.iter().copied().fold(0, u64::max);
        let requested_end =
            window_end(self.policy_elapsed[Policy::Requester.index()], self.window_length);
        self.max_when_elapsed = requested_end.max(self.when_elapsed);

        debug_assert!(self.max_when_elapsed >= self.when_elapsed);
        old != (self.when_elapsed, self.max_when_elapsed)
    }
}
