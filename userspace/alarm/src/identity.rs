// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Alarm delivery identities and ownership
//! OWNERS: @runtime
//!
//! INVARIANTS:
//! - An alarm carries exactly one identity variant
//! - Identity comparison is by token handle, never by payload

use core::fmt;

/// Opaque completion callback handle.
///
/// Two tokens denote the same callback iff their handles are equal; the
/// creator metadata travels with the token but does not take part in matching.
#[derive(Clone, Debug)]
pub struct OperationToken {
    handle: u64,
    creator_uid: u32,
    creator_package: String,
    tag: String,
}

impl OperationToken {
    /// Wraps a callback handle created by `creator_package` (`creator_uid`).
    /// `tag` names the target for diagnostics and stats.
    pub fn new(
        handle: u64,
        creator_uid: u32,
        creator_package: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self { handle, creator_uid, creator_package: creator_package.into(), tag: tag.into() }
    }

    /// Raw handle value.
    pub fn handle(&self) -> u64 {
        self.handle
    }

    /// Uid of the process that created the token.
    pub fn creator_uid(&self) -> u32 {
        self.creator_uid
    }

    /// Package that created the token.
    pub fn creator_package(&self) -> &str {
        &self.creator_package
    }

    /// Diagnostic tag of the callback target.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// True if both tokens refer to the same callback.
    pub fn same_as(&self, other: &OperationToken) -> bool {
        self.handle == other.handle
    }
}

impl fmt::Display for OperationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operation{{{:#x} {}: {}}}", self.handle, self.creator_package, self.tag)
    }
}

/// Opaque in-process listener handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

impl fmt::Display for ListenerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener{{{:#x}}}", self.0)
    }
}

/// Who gets notified when the alarm fires.
#[derive(Clone, Debug)]
pub enum AlarmIdentity {
    /// Deliver through a completion callback.
    Operation(OperationToken),
    /// Deliver to a registered listener.
    Listener {
        /// The listener handle.
        token: ListenerToken,
        /// Caller supplied tag for diagnostics.
        tag: String,
    },
}

impl AlarmIdentity {
    /// Completion token, if this identity is one.
    pub fn operation(&self) -> Option<&OperationToken> {
        match self {
            AlarmIdentity::Operation(op) => Some(op),
            AlarmIdentity::Listener { .. } => None,
        }
    }

    /// Listener token, if this identity is one.
    pub fn listener(&self) -> Option<ListenerToken> {
        match self {
            AlarmIdentity::Operation(_) => None,
            AlarmIdentity::Listener { token, .. } => Some(*token),
        }
    }

    /// True iff the populated variant equals the matching candidate.
    pub fn matches(
        &self,
        operation: Option<&OperationToken>,
        listener: Option<ListenerToken>,
    ) -> bool {
        match self {
            AlarmIdentity::Operation(op) => operation.is_some_and(|candidate| op.same_as(candidate)),
            AlarmIdentity::Listener { token, .. } => listener == Some(*token),
        }
    }
}

/// Who asked for the alarm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerIdentity {
    /// Uid of the requesting process.
    pub uid: u32,
    /// Uid that created the completion token; `uid` for listener alarms.
    pub creator_uid: u32,
    /// Package of the requesting process.
    pub package: String,
    /// Package the alarm is attributed to; the token creator when present.
    pub source_package: String,
}

impl OwnerIdentity {
    /// Resolves ownership for a request by `uid`/`package` carrying `identity`.
    pub fn resolve(uid: u32, package: String, identity: &AlarmIdentity) -> Self {
        match identity.operation() {
            Some(op) => Self {
                uid,
                creator_uid: op.creator_uid(),
                source_package: op.creator_package().to_string(),
                package,
            },
            None => Self { uid, creator_uid: uid, source_package: package.clone(), package },
        }
    }
}
