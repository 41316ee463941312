// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Integration tests for alarm window reconciliation
//! OWNERS: @runtime
//! STATUS: Functional
//! API_STABILITY: Unstable
//! TEST_COVERAGE: 7 integration tests
//!
//! TEST_SCENARIOS:
//!   - basic_window(): requester 1000 + window 500
//!   - standby_delay_within_window(): floor moves, ceiling stays
//!   - standby_delay_beyond_window(): ceiling tracks floor
//!   - idempotent_reset(): repeated value reports no change
//!   - exact_alarm(): zero window ignores earlier standby values
//!   - overflow_saturates(): window end clamps to u64::MAX
//!   - identity_exclusivity(): token kinds never cross-match

use nexus_alarm::{
    Alarm, AlarmIdentity, AlarmKind, AlarmRequest, ListenerToken, OperationToken, Policy,
};

fn listener_alarm(requested: u64, window: u64) -> Alarm {
    Alarm::new(
        AlarmRequest::new(
            AlarmKind::MonotonicWakeup,
            requested,
            AlarmIdentity::Listener { token: ListenerToken(0xbeef), tag: "job".into() },
            10_077,
            "com.example.jobs",
        )
        .window(window),
    )
}

#[test]
fn basic_window() {
    let alarm = listener_alarm(1000, 500);
    assert_eq!(alarm.when_elapsed(), 1000);
    assert_eq!(alarm.max_when_elapsed(), 1500);
}

#[test]
fn standby_delay_within_window() {
    let mut alarm = listener_alarm(1000, 500);
    assert!(alarm.set_policy_elapsed(Policy::AppStandby, 1200));
    assert_eq!(alarm.when_elapsed(), 1200);
    assert_eq!(alarm.max_when_elapsed(), 1500);
}

#[test]
fn standby_delay_beyond_window() {
    let mut alarm = listener_alarm(1000, 500);
    assert!(alarm.set_policy_elapsed(Policy::AppStandby, 1800));
    assert_eq!(alarm.when_elapsed(), 1800);
    assert_eq!(alarm.max_when_elapsed(), 1800);
}

#[test]
fn idempotent_reset() {
    let mut alarm = listener_alarm(1000, 500);
    assert!(alarm.set_policy_elapsed(Policy::AppStandby, 1800));
    assert!(!alarm.set_policy_elapsed(Policy::AppStandby, 1800));
}

#[test]
fn exact_alarm() {
    let mut alarm = listener_alarm(5000, 0);
    assert_eq!(alarm.when_elapsed(), 5000);
    assert_eq!(alarm.max_when_elapsed(), 5000);
    assert!(!alarm.set_policy_elapsed(Policy::AppStandby, 3000));
    assert!(!alarm.set_policy_elapsed(Policy::AppStandby, 5000));
    assert_eq!((alarm.when_elapsed(), alarm.max_when_elapsed()), (5000, 5000));
}

#[test]
fn overflow_saturates() {
    let alarm = listener_alarm(u64::MAX - 1, 10);
    assert_eq!(alarm.max_when_elapsed(), u64::MAX);
    assert!(alarm.max_when_elapsed() >= alarm.when_elapsed());
}

#[test]
fn identity_exclusivity() {
    let op = OperationToken::new(0xbeef, 10_077, "com.example.jobs", "job");
    let by_listener = listener_alarm(1, 0);
    assert!(!by_listener.matches(Some(&op), None));
    assert!(by_listener.matches(None, Some(ListenerToken(0xbeef))));

    let by_op = Alarm::new(AlarmRequest::new(
        AlarmKind::Monotonic,
        1,
        AlarmIdentity::Operation(op.clone()),
        10_077,
        "com.example.jobs",
    ));
    assert!(!by_op.matches(None, Some(ListenerToken(0xbeef))));
    assert!(by_op.matches(Some(&op), None));
}
