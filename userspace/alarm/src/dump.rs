// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Read-only diagnostics for alarms (snapshot, text dump, one-liner)
//! OWNERS: @runtime
//! STATUS: Experimental
//! API_STABILITY: Unstable
//!
//! Formatting is best effort and never mutates the alarm.

use core::fmt::{self, Write};

use serde::Serialize;

use crate::alarm::{Alarm, AlarmClockInfo};
use crate::identity::AlarmIdentity;
use crate::kind::AlarmKind;
use crate::policy::Policy;

const MS_PER_SEC: u64 = 1_000;
const MS_PER_MIN: u64 = 60 * MS_PER_SEC;
const MS_PER_HOUR: u64 = 60 * MS_PER_MIN;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Formats a signed millisecond duration as `+1d2h3m4s5ms`.
///
/// Leading zero units are omitted, milliseconds are always printed, and zero
/// prints as `0`.
pub fn format_duration(ms: i64) -> String {
    if ms == 0 {
        return "0".to_string();
    }
    let mut out = String::with_capacity(16);
    out.push(if ms > 0 { '+' } else { '-' });
    let mut rest = ms.unsigned_abs();
    let mut started = false;
    for (unit, suffix) in
        [(MS_PER_DAY, "d"), (MS_PER_HOUR, "h"), (MS_PER_MIN, "m"), (MS_PER_SEC, "s")]
    {
        let value = rest / unit;
        rest %= unit;
        if value > 0 || started {
            let _ = write!(out, "{value}{suffix}");
            started = true;
        }
    }
    let _ = write!(out, "{rest}ms");
    out
}

/// Formats `time` relative to `now`. A zero timestamp means "unset" and prints
/// as `--`.
pub fn format_relative(time: u64, now: u64) -> String {
    if time == 0 {
        return "--".to_string();
    }
    let delta = if time >= now {
        i64::try_from(time - now).unwrap_or(i64::MAX)
    } else {
        -i64::try_from(now - time).unwrap_or(i64::MAX)
    };
    format_duration(delta)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// One policy slot in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PolicySlot {
    /// Policy owning the slot.
    pub policy: Policy,
    /// Earliest elapsed time the policy allows.
    pub elapsed: u64,
}

/// Structured projection of an alarm for logging and tracing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlarmSnapshot {
    pub tag: String,
    pub kind: AlarmKind,
    pub requested_time: u64,
    pub window_length: u64,
    pub repeat_interval: u64,
    pub count: u32,
    pub flags: u32,
    pub uid: u32,
    pub creator_uid: u32,
    pub package: String,
    pub source_package: String,
    pub policy_elapsed: Vec<PolicySlot>,
    pub when_elapsed: u64,
    pub max_when_elapsed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_clock: Option<AlarmClockInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener: Option<String>,
}

impl Alarm {
    /// Snapshot of every field.
    pub fn describe(&self) -> AlarmSnapshot {
        let owner = self.owner();
        AlarmSnapshot {
            tag: self.stats_tag().to_string(),
            kind: self.kind(),
            requested_time: self.requested_time(),
            window_length: self.window_length(),
            repeat_interval: self.repeat_interval(),
            count: self.delivery_count,
            flags: self.flags().bits(),
            uid: owner.uid,
            creator_uid: owner.creator_uid,
            package: owner.package.clone(),
            source_package: owner.source_package.clone(),
            policy_elapsed: Policy::ALL
                .iter()
                .map(|&policy| PolicySlot { policy, elapsed: self.policy_elapsed(policy) })
                .collect(),
            when_elapsed: self.when_elapsed(),
            max_when_elapsed: self.max_when_elapsed(),
            priority: self.priority_class.map(|class| class.priority),
            alarm_clock: self.alarm_clock().cloned(),
            operation: self.identity().operation().map(|op| op.to_string()),
            listener: self.identity().listener().map(|token| token.to_string()),
        }
    }

    /// Writes an indented multi-line dump, elapsed times relative to `now_elapsed`.
    pub fn dump<W: Write>(&self, out: &mut W, prefix: &str, now_elapsed: u64) -> fmt::Result {
        writeln!(out, "{prefix}tag={}", self.stats_tag())?;

        write!(out, "{prefix}type={} origWhen=", self.kind().name())?;
        if self.kind().is_wall_clock() {
            write!(out, "{}", self.requested_time())?;
        } else {
            out.write_str(&format_relative(self.requested_time(), now_elapsed))?;
        }
        writeln!(
            out,
            " window={} repeatInterval={} count={} flags={:#x}",
            format_duration(clamp_i64(self.window_length())),
            self.repeat_interval(),
            self.delivery_count,
            self.flags().bits(),
        )?;

        write!(out, "{prefix}policyWhenElapsed:")?;
        for policy in Policy::ALL {
            write!(
                out,
                " {}={}",
                policy.name(),
                format_relative(self.policy_elapsed(policy), now_elapsed)
            )?;
        }
        writeln!(out)?;

        writeln!(
            out,
            "{prefix}whenElapsed={} maxWhenElapsed={}",
            format_relative(self.when_elapsed(), now_elapsed),
            format_relative(self.max_when_elapsed(), now_elapsed),
        )?;

        if let Some(clock) = self.alarm_clock() {
            writeln!(out, "{prefix}Alarm clock:")?;
            writeln!(out, "{prefix}  triggerTime={}", clock.trigger_time)?;
            writeln!(out, "{prefix}  showIntent={}", clock.show_tag)?;
        }
        match self.identity() {
            AlarmIdentity::Operation(op) => writeln!(out, "{prefix}operation={op}"),
            AlarmIdentity::Listener { token, .. } => writeln!(out, "{prefix}listener={token}"),
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Alarm{{{} origWhen {} whenElapsed {} {}}}",
            self.kind().name(),
            self.requested_time(),
            self.when_elapsed(),
            self.owner().source_package,
        )
    }
}
