// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Scheduler-side bookkeeping for live alarms
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Unit tests + tests/scheduling.rs
//!
//! INVARIANTS:
//! - Live alarms are bounded per uid and globally
//! - Alarm ids are non-zero and never reused while live
//! - Window changes are only observed through the entity's change signal

use log::{debug, warn};
use nexus_alarm::{Alarm, AlarmSnapshot, ListenerToken, OperationToken, Policy};

use crate::config::AlarmdConfig;

/// Store-assigned handle of a live alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlarmId(u32);

impl AlarmId {
    /// Raw id value.
    pub fn value(self) -> u32 {
        self.0
    }
}

#[must_use = "alarm admission rejects must be handled"]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdmitReject {
    /// The requesting uid already holds its maximum number of alarms.
    #[error("per-uid alarm limit reached")]
    OverLimit,
    /// The store is full.
    #[error("alarm store full")]
    NoSpace,
}

struct Entry {
    id: AlarmId,
    alarm: Alarm,
}

/// Bounded in-memory set of pending alarms.
pub struct AlarmStore {
    config: AlarmdConfig,
    entries: Vec<Entry>,
    next_id: u32,
}

impl AlarmStore {
    /// Creates an empty store enforcing `config` limits.
    pub fn new(config: AlarmdConfig) -> Self {
        Self { config, entries: Vec::new(), next_id: 1 }
    }

    /// Admits `alarm`, enforcing per-uid and global bounds.
    pub fn admit(&mut self, alarm: Alarm) -> Result<AlarmId, AdmitReject> {
        let uid = alarm.owner().uid;
        if self.count_for_uid(uid) >= self.config.max_alarms_per_uid {
            warn!("alarmd: uid {uid} over limit, rejecting {}", alarm.stats_tag());
            return Err(AdmitReject::OverLimit);
        }
        if self.entries.len() >= self.config.max_alarms_total {
            warn!("alarmd: store full, rejecting {}", alarm.stats_tag());
            return Err(AdmitReject::NoSpace);
        }
        let id = self.allocate_id();
        debug!(
            "alarmd: admit {} id={} window=[{}, {}]",
            alarm.stats_tag(),
            id.0,
            alarm.when_elapsed(),
            alarm.max_when_elapsed()
        );
        self.entries.push(Entry { id, alarm });
        Ok(id)
    }

    fn allocate_id(&mut self) -> AlarmId {
        loop {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            if self.next_id == 0 {
                self.next_id = 1;
            }
            if !self.entries.iter().any(|entry| entry.id.0 == id) {
                return AlarmId(id);
            }
        }
    }

    /// Looks up a live alarm.
    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.entries.iter().find(|entry| entry.id == id).map(|entry| &entry.alarm)
    }

    /// Removes and returns every alarm whose identity matches.
    pub fn cancel_matching(
        &mut self,
        operation: Option<&OperationToken>,
        listener: Option<ListenerToken>,
    ) -> Vec<Alarm> {
        let removed = self.remove_where(|alarm| alarm.matches(operation, listener));
        debug!("alarmd: cancel by identity removed {}", removed.len());
        removed
    }

    /// Removes and returns every alarm attributed to `package`.
    pub fn cancel_package(&mut self, package: &str) -> Vec<Alarm> {
        let removed = self.remove_where(|alarm| alarm.matches_package(package));
        debug!("alarmd: cancel package {package} removed {}", removed.len());
        removed
    }

    /// Pushes an app-standby earliest time to every alarm of `package`.
    ///
    /// Returns `true` if any alarm's delivery window changed.
    pub fn set_standby_earliest(&mut self, package: &str, elapsed: u64) -> bool {
        let mut changed = false;
        for entry in self.entries.iter_mut().filter(|entry| entry.alarm.matches_package(package)) {
            if entry.alarm.set_policy_elapsed(Policy::AppStandby, elapsed) {
                debug!(
                    "alarmd: standby moved {} id={} to [{}, {}]",
                    entry.alarm.stats_tag(),
                    entry.id.0,
                    entry.alarm.when_elapsed(),
                    entry.alarm.max_when_elapsed()
                );
                changed = true;
            }
        }
        changed
    }

    /// Earliest `when_elapsed` over pending alarms.
    pub fn next_wake(&self, wakeup_only: bool) -> Option<u64> {
        self.pending(wakeup_only).map(Alarm::when_elapsed).min()
    }

    /// Earliest `max_when_elapsed` over pending alarms.
    pub fn next_deadline(&self, wakeup_only: bool) -> Option<u64> {
        self.pending(wakeup_only).map(Alarm::max_when_elapsed).min()
    }

    fn pending(&self, wakeup_only: bool) -> impl Iterator<Item = &Alarm> {
        self.entries
            .iter()
            .map(|entry| &entry.alarm)
            .filter(move |alarm| !wakeup_only || alarm.is_wakeup())
    }

    /// Removes alarms due at `now_elapsed`, bumps their delivery count and
    /// returns them ordered by `when_elapsed`.
    pub fn take_due(&mut self, now_elapsed: u64) -> Vec<Alarm> {
        let mut due = self.remove_where(|alarm| alarm.when_elapsed() <= now_elapsed);
        due.sort_by_key(Alarm::when_elapsed);
        for alarm in &mut due {
            alarm.delivery_count = alarm.delivery_count.saturating_add(1);
        }
        due
    }

    fn remove_where(&mut self, mut pred: impl FnMut(&Alarm) -> bool) -> Vec<Alarm> {
        let (removed, kept): (Vec<Entry>, Vec<Entry>) =
            std::mem::take(&mut self.entries).into_iter().partition(|entry| pred(&entry.alarm));
        self.entries = kept;
        removed.into_iter().map(|entry| entry.alarm).collect()
    }

    /// Number of live alarms held by `uid`.
    pub fn count_for_uid(&self, uid: u32) -> usize {
        self.entries.iter().filter(|entry| entry.alarm.owner().uid == uid).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots of all live alarms, ordered by `when_elapsed`.
    pub fn describe_all(&self) -> Vec<AlarmSnapshot> {
        let mut alarms: Vec<&Alarm> = self.entries.iter().map(|entry| &entry.alarm).collect();
        alarms.sort_by_key(|alarm| alarm.when_elapsed());
        alarms.into_iter().map(Alarm::describe).collect()
    }
}

impl Default for AlarmStore {
    fn default() -> Self {
        Self::new(AlarmdConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_alarm::{AlarmIdentity, AlarmKind, AlarmRequest};

    fn listener(uid: u32, package: &str, token: u64, when: u64) -> Alarm {
        Alarm::new(AlarmRequest::new(
            AlarmKind::MonotonicWakeup,
            when,
            AlarmIdentity::Listener { token: ListenerToken(token), tag: "t".into() },
            uid,
            package,
        ))
    }

    fn small_store() -> AlarmStore {
        AlarmStore::new(AlarmdConfig { max_alarms_per_uid: 2, max_alarms_total: 3 })
    }

    #[test]
    fn test_reject_admission_over_uid_limit() {
        let mut store = small_store();
        store.admit(listener(1, "a", 1, 10)).expect("first");
        store.admit(listener(1, "a", 2, 10)).expect("second");
        let reject = store.admit(listener(1, "a", 3, 10)).unwrap_err();
        assert_eq!(reject, AdmitReject::OverLimit);
        assert_eq!(store.count_for_uid(1), 2);
    }

    #[test]
    fn test_reject_admission_over_global_limit() {
        let mut store = small_store();
        for uid in 1..=3 {
            store.admit(listener(uid, "a", uid as u64, 10)).expect("within global cap");
        }
        let reject = store.admit(listener(9, "b", 9, 10)).unwrap_err();
        assert_eq!(reject, AdmitReject::NoSpace);
    }

    #[test]
    fn ids_are_non_zero_and_distinct() {
        let mut store = AlarmStore::default();
        store.next_id = u32::MAX;
        let a = store.admit(listener(1, "a", 1, 10)).unwrap();
        let b = store.admit(listener(1, "a", 2, 10)).unwrap();
        assert_eq!(a.value(), u32::MAX);
        assert_eq!(b.value(), 1);
        assert!(store.get(a).is_some());
    }

    #[test]
    fn cancel_by_listener_only_hits_match() {
        let mut store = AlarmStore::default();
        store.admit(listener(1, "a", 1, 10)).unwrap();
        store.admit(listener(1, "a", 2, 10)).unwrap();
        let removed = store.cancel_matching(None, Some(ListenerToken(2)));
        assert_eq!(removed.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn standby_change_signal_propagates() {
        let mut store = AlarmStore::default();
        store.admit(listener(1, "a", 1, 1_000)).unwrap();
        store.admit(listener(2, "b", 2, 1_000)).unwrap();
        assert!(store.set_standby_earliest("a", 2_000));
        assert!(!store.set_standby_earliest("a", 2_000));
        assert!(!store.set_standby_earliest("nobody", 9_000));
        assert_eq!(store.next_wake(false), Some(1_000));
        assert_eq!(store.cancel_package("b").len(), 1);
        assert_eq!(store.next_wake(false), Some(2_000));
        assert!(store.set_standby_earliest("a", 500));
        assert_eq!(store.next_wake(false), Some(1_000));
    }

    #[test]
    fn take_due_orders_and_counts() {
        let mut store = AlarmStore::default();
        store.admit(listener(1, "a", 1, 30)).unwrap();
        store.admit(listener(1, "a", 2, 10)).unwrap();
        store.admit(listener(1, "a", 3, 50)).unwrap();
        let due = store.take_due(30);
        let whens: Vec<u64> = due.iter().map(Alarm::when_elapsed).collect();
        assert_eq!(whens, vec![10, 30]);
        assert!(due.iter().all(|alarm| alarm.delivery_count == 1));
        assert_eq!(store.len(), 1);
    }
}
