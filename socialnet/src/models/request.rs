//! Pending relationship requests

use super::person::{GroupKind, PersonId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of a request a record is looking at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    /// The record's owner sent the request
    Sent,
    /// The record's owner received the request
    Received,
}

impl RequestDirection {
    /// The direction as seen from the other party
    pub fn flipped(self) -> Self {
        match self {
            Self::Sent => Self::Received,
            Self::Received => Self::Sent,
        }
    }
}

impl std::fmt::Display for RequestDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::Received => write!(f, "received"),
        }
    }
}

/// An outstanding request, stored once in each party's record.
///
/// Both copies share the same `id`; the sender's copy has direction
/// [`RequestDirection::Sent`] and `other` pointing at the receiver, the
/// receiver's copy mirrors it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingRequest {
    /// Identifier shared by both copies of the request
    pub id: Uuid,

    /// Group the request is for
    pub kind: GroupKind,

    /// The other party
    pub other: PersonId,

    /// Whether the owner of this copy sent or received the request
    pub direction: RequestDirection,

    /// When the request was sent
    pub created_at: DateTime<Utc>,

    /// Deadline after which the request is pruned, if any
    pub expires_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    /// Create both copies of a new request: `(sender's copy, receiver's copy)`.
    ///
    /// A deadline past the end of the calendar leaves the request without one.
    pub fn pair(
        kind: GroupKind,
        sender: &PersonId,
        receiver: &PersonId,
        now: DateTime<Utc>,
        ttl: Option<Duration>,
    ) -> (Self, Self) {
        let sent = Self {
            id: Uuid::new_v4(),
            kind,
            other: receiver.clone(),
            direction: RequestDirection::Sent,
            created_at: now,
            expires_at: ttl.and_then(|ttl| now.checked_add_signed(ttl)),
        };
        let received = sent.mirrored(sender);
        (sent, received)
    }

    /// The copy held by `other`, given that `owner` holds this one.
    pub fn mirrored(&self, owner: &PersonId) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            other: owner.clone(),
            direction: self.direction.flipped(),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }

    /// Whether the deadline has passed at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }

    /// Whether this entry concerns `other` for the given group
    pub fn concerns(&self, kind: GroupKind, other: &PersonId) -> bool {
        self.kind == kind && &self.other == other
    }
}
