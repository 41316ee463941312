// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Shared alarmd facade serializing access to the alarm store
//! OWNERS: @runtime
//!
//! Alarms carry no locking of their own; every mutation goes through the
//! store mutex held here, so "mutate slot, observe change, re-arm" happens
//! under one critical section.

use nexus_alarm::{Alarm, ListenerToken, OperationToken};
use parking_lot::Mutex;

use crate::config::AlarmdConfig;
use crate::store::{AdmitReject, AlarmId, AlarmStore};

/// Thread-safe alarm service.
#[derive(Default)]
pub struct AlarmService {
    store: Mutex<AlarmStore>,
}

impl AlarmService {
    /// Creates a service with an empty store.
    pub fn new(config: AlarmdConfig) -> Self {
        Self { store: Mutex::new(AlarmStore::new(config)) }
    }

    /// Admits a new alarm.
    pub fn admit(&self, alarm: Alarm) -> Result<AlarmId, AdmitReject> {
        self.store.lock().admit(alarm)
    }

    /// Cancels alarms by delivery identity.
    pub fn cancel_matching(
        &self,
        operation: Option<&OperationToken>,
        listener: Option<ListenerToken>,
    ) -> Vec<Alarm> {
        self.store.lock().cancel_matching(operation, listener)
    }

    /// Cancels every alarm attributed to `package`.
    pub fn cancel_package(&self, package: &str) -> Vec<Alarm> {
        self.store.lock().cancel_package(package)
    }

    /// Applies a standby evaluation; `true` means the wake timer needs re-arming.
    pub fn set_standby_earliest(&self, package: &str, elapsed: u64) -> bool {
        self.store.lock().set_standby_earliest(package, elapsed)
    }

    /// Next elapsed time the wake timer should fire at.
    pub fn next_wake(&self, wakeup_only: bool) -> Option<u64> {
        self.store.lock().next_wake(wakeup_only)
    }

    /// Removes and returns alarms due at `now_elapsed`.
    pub fn take_due(&self, now_elapsed: u64) -> Vec<Alarm> {
        self.store.lock().take_due(now_elapsed)
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut AlarmStore) -> R) -> R {
        f(&mut *self.store.lock())
    }

    /// JSON dump of all live alarms.
    pub fn dump_json(&self) -> Result<String, serde_json::Error> {
        let snapshots = self.store.lock().describe_all();
        serde_json::to_string_pretty(&snapshots)
    }
}
