// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Alarm clock kinds.

use serde::Serialize;

/// Clock base of the caller's requested time and whether delivery may wake a
/// suspended device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AlarmKind {
    /// Wall clock time; wakes the device.
    #[serde(rename = "RTC_WAKEUP")]
    WallClockWakeup,
    /// Wall clock time; delivered on next wake.
    #[serde(rename = "RTC")]
    WallClock,
    /// Elapsed time since boot; wakes the device.
    #[serde(rename = "ELAPSED_WAKEUP")]
    MonotonicWakeup,
    /// Elapsed time since boot; delivered on next wake.
    #[serde(rename = "ELAPSED")]
    Monotonic,
}

impl AlarmKind {
    /// Decodes the raw wire value (0..=3).
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(AlarmKind::WallClockWakeup),
            1 => Some(AlarmKind::WallClock),
            2 => Some(AlarmKind::MonotonicWakeup),
            3 => Some(AlarmKind::Monotonic),
            _ => None,
        }
    }

    /// Raw wire value.
    pub const fn raw(self) -> u8 {
        match self {
            AlarmKind::WallClockWakeup => 0,
            AlarmKind::WallClock => 1,
            AlarmKind::MonotonicWakeup => 2,
            AlarmKind::Monotonic => 3,
        }
    }

    /// True for kinds that must be able to resume a suspended device.
    pub const fn is_wakeup(self) -> bool {
        matches!(self, AlarmKind::WallClockWakeup | AlarmKind::MonotonicWakeup)
    }

    /// True when the requested time is expressed in wall clock time.
    pub const fn is_wall_clock(self) -> bool {
        matches!(self, AlarmKind::WallClockWakeup | AlarmKind::WallClock)
    }

    /// Diagnostic name.
    pub const fn name(self) -> &'static str {
        match self {
            AlarmKind::WallClockWakeup => "RTC_WAKEUP",
            AlarmKind::WallClock => "RTC",
            AlarmKind::MonotonicWakeup => "ELAPSED_WAKEUP",
            AlarmKind::Monotonic => "ELAPSED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_round_trip() {
        for raw in 0..4u8 {
            let kind = AlarmKind::from_raw(raw).expect("valid kind");
            assert_eq!(kind.raw(), raw);
        }
        assert_eq!(AlarmKind::from_raw(4), None);
    }

    #[test]
    fn wakeup_and_clock_base() {
        assert!(AlarmKind::WallClockWakeup.is_wakeup());
        assert!(AlarmKind::MonotonicWakeup.is_wakeup());
        assert!(!AlarmKind::WallClock.is_wakeup());
        assert!(!AlarmKind::Monotonic.is_wakeup());
        assert!(AlarmKind::WallClock.is_wall_clock());
        assert!(!AlarmKind::MonotonicWakeup.is_wall_clock());
    }
}
