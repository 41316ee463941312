// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Per-alarm delivery window entity
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests + tests/window_scenarios.rs
//!
//! An [`Alarm`] is constructed once when a scheduling request is admitted and
//! is mutated afterwards only through policy slot updates. It carries no
//! locking; the owning scheduler serializes access.

use bitflags::bitflags;
use serde::Serialize;

use crate::identity::{AlarmIdentity, ListenerToken, OperationToken, OwnerIdentity};
use crate::kind::AlarmKind;
use crate::policy::Policy;
use crate::window::DeliveryWindow;

bitflags! {
    /// Delivery flags supplied with the request. Opaque to reconciliation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AlarmFlags: u32 {
        /// Never batch with other alarms.
        const STANDALONE = 1 << 0;
        /// May bring the device out of idle.
        const WAKE_FROM_IDLE = 1 << 1;
        /// May fire while idle, subject to rate limits.
        const ALLOW_WHILE_IDLE = 1 << 2;
        /// May fire while idle without rate limits.
        const ALLOW_WHILE_IDLE_UNRESTRICTED = 1 << 3;
        /// Marks the alarm that ends the idle period.
        const IDLE_UNTIL = 1 << 4;
        /// Legacy allow-while-idle behaviour.
        const ALLOW_WHILE_IDLE_COMPAT = 1 << 5;
    }
}

/// User visible alarm clock attached to a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlarmClockInfo {
    /// Wall clock trigger time in milliseconds since the epoch.
    pub trigger_time: u64,
    /// Tag of the callback that shows the alarm clock UI.
    pub show_tag: String,
}

/// Uids the alarm's work is attributed to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkSource {
    /// Attributed uids.
    pub uids: Vec<u32>,
}

/// Ordering class assigned by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityClass {
    /// Sequence number of the last assignment.
    pub seq: u32,
    /// Priority bucket; lower sorts first.
    pub priority: i32,
}

/// Construction parameters, already resolved to the elapsed time base.
#[derive(Clone, Debug)]
pub struct AlarmRequest {
    /// Clock kind.
    pub kind: AlarmKind,
    /// Caller's raw requested time in the clock base of `kind`.
    pub requested_time: u64,
    /// Caller's requested time converted to elapsed time.
    pub requested_elapsed: u64,
    /// Allowed slack after `requested_elapsed`; 0 for exact alarms.
    pub window_length: u64,
    /// Repeat period; 0 for one-shot alarms.
    pub repeat_interval: u64,
    /// Delivery target.
    pub identity: AlarmIdentity,
    /// Optional work attribution.
    pub work_source: Option<WorkSource>,
    /// Delivery flags.
    pub flags: AlarmFlags,
    /// Optional alarm clock metadata.
    pub alarm_clock: Option<AlarmClockInfo>,
    /// Requesting uid.
    pub uid: u32,
    /// Requesting package.
    pub package: String,
}

impl AlarmRequest {
    /// Exact one-shot request at `requested_elapsed`.
    pub fn new(
        kind: AlarmKind,
        requested_elapsed: u64,
        identity: AlarmIdentity,
        uid: u32,
        package: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            requested_time: requested_elapsed,
            requested_elapsed,
            window_length: 0,
            repeat_interval: 0,
            identity,
            work_source: None,
            flags: AlarmFlags::empty(),
            alarm_clock: None,
            uid,
            package: package.into(),
        }
    }

    /// Sets the raw requested time when it differs from the elapsed one.
    pub fn requested_time(mut self, requested_time: u64) -> Self {
        self.requested_time = requested_time;
        self
    }

    /// Sets the allowed delivery slack.
    pub fn window(mut self, window_length: u64) -> Self {
        self.window_length = window_length;
        self
    }

    /// Makes the alarm periodic.
    pub fn repeating(mut self, interval: u64) -> Self {
        self.repeat_interval = interval;
        self
    }

    /// Sets delivery flags.
    pub fn flags(mut self, flags: AlarmFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attaches alarm clock metadata.
    pub fn alarm_clock(mut self, info: AlarmClockInfo) -> Self {
        self.alarm_clock = Some(info);
        self
    }

    /// Attributes the alarm's work to `work_source`.
    pub fn work_source(mut self, work_source: WorkSource) -> Self {
        self.work_source = Some(work_source);
        self
    }
}

/// One scheduled timer request and its live delivery window.
#[derive(Clone, Debug)]
pub struct Alarm {
    kind: AlarmKind,
    requested_time: u64,
    repeat_interval: u64,
    identity: AlarmIdentity,
    owner: OwnerIdentity,
    stats_tag: String,
    work_source: Option<WorkSource>,
    flags: AlarmFlags,
    alarm_clock: Option<AlarmClockInfo>,
    window: DeliveryWindow,
    /// Times this alarm has been delivered. Maintained by the scheduler.
    pub delivery_count: u32,
    /// Ordering class assigned by the scheduler.
    pub priority_class: Option<PriorityClass>,
}

impl Alarm {
    /// Builds the alarm and derives its initial window from the request.
    pub fn new(request: AlarmRequest) -> Self {
        let AlarmRequest {
            kind,
            requested_time,
            requested_elapsed,
            window_length,
            repeat_interval,
            identity,
            work_source,
            flags,
            alarm_clock,
            uid,
            package,
        } = request;
        let owner = OwnerIdentity::resolve(uid, package, &identity);
        let stats_tag = make_tag(kind, &identity);
        Self {
            kind,
            requested_time,
            repeat_interval,
            identity,
            owner,
            stats_tag,
            work_source,
            flags,
            alarm_clock,
            window: DeliveryWindow::new(requested_elapsed, window_length),
            delivery_count: 0,
            priority_class: None,
        }
    }

    /// Clock kind.
    pub fn kind(&self) -> AlarmKind {
        self.kind
    }

    /// True if delivery may wake a suspended device.
    pub fn is_wakeup(&self) -> bool {
        self.kind.is_wakeup()
    }

    /// Caller's raw requested time, in the clock base of [`Alarm::kind`].
    pub fn requested_time(&self) -> u64 {
        self.requested_time
    }

    /// Declared slack; 0 for exact alarms.
    pub fn window_length(&self) -> u64 {
        self.window.window_length()
    }

    /// Repeat period; 0 for one-shot alarms.
    pub fn repeat_interval(&self) -> u64 {
        self.repeat_interval
    }

    pub fn identity(&self) -> &AlarmIdentity {
        &self.identity
    }

    pub fn owner(&self) -> &OwnerIdentity {
        &self.owner
    }

    /// Stats tag, `*walarm*:` or `*alarm*:` followed by the target tag.
    pub fn stats_tag(&self) -> &str {
        &self.stats_tag
    }

    pub fn work_source(&self) -> Option<&WorkSource> {
        self.work_source.as_ref()
    }

    pub fn flags(&self) -> AlarmFlags {
        self.flags
    }

    pub fn alarm_clock(&self) -> Option<&AlarmClockInfo> {
        self.alarm_clock.as_ref()
    }

    /// Earliest delivery time according to `policy` alone.
    pub fn policy_elapsed(&self, policy: Policy) -> u64 {
        self.window.policy_elapsed(policy)
    }

    /// Earliest elapsed time at which delivery is permitted.
    pub fn when_elapsed(&self) -> u64 {
        self.window.when_elapsed()
    }

    /// Latest elapsed time by which delivery must happen. Equal to
    /// [`Alarm::when_elapsed`] for exact alarms.
    pub fn max_when_elapsed(&self) -> u64 {
        self.window.max_when_elapsed()
    }

    /// Sets the earliest time `policy` allows delivery.
    ///
    /// Returns `true` if the delivery window (either bound) changed; this is
    /// the only signal that the scheduler must re-evaluate its wake timer.
    #[must_use = "a changed window must be propagated to the wake timer"]
    pub fn set_policy_elapsed(&mut self, policy: Policy, elapsed: u64) -> bool {
        self.window.set_policy_elapsed(policy, elapsed)
    }

    /// Cancellation by identity.
    pub fn matches(&self, operation: Option<&OperationToken>, listener: Option<ListenerToken>) -> bool {
        self.identity.matches(operation, listener)
    }

    /// Bulk cancellation by package, against the attributed source package.
    pub fn matches_package(&self, package: &str) -> bool {
        self.owner.source_package == package
    }
}

fn make_tag(kind: AlarmKind, identity: &AlarmIdentity) -> String {
    let prefix = if kind.is_wakeup() { "*walarm*:" } else { "*alarm*:" };
    match identity {
        AlarmIdentity::Operation(op) => format!("{prefix}{}", op.tag()),
        AlarmIdentity::Listener { tag, .. } => format!("{prefix}{tag}"),
    }
}
