//! Person records and the identifiers that key them

use super::request::{PendingRequest, RequestDirection};
use crate::SocialError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 32;

/// Case-insensitive player identifier.
///
/// The name is trimmed and lowercased on construction, so `"Steve"` and
/// `"steve"` address the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Parse and normalize a player name
    pub fn new(name: impl AsRef<str>) -> Result<Self, SocialError> {
        let name = name.as_ref().trim();

        if name.is_empty() {
            return Err(SocialError::InvalidIdentifier(
                "Player name cannot be empty".to_string(),
            ));
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(SocialError::InvalidIdentifier(format!(
                "Player name '{}' is longer than {} characters",
                name, MAX_NAME_LEN
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SocialError::InvalidIdentifier(format!(
                "Player name '{}' can only contain alphanumeric characters, hyphens, and underscores",
                name
            )));
        }

        Ok(Self(name.to_lowercase()))
    }

    /// The normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PersonId {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PersonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kinds of social group a person can belong to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Symmetric friendship
    Friend,
    /// Asymmetric parent/child relationship
    Child,
}

impl GroupKind {
    /// Every group kind, in a stable order
    pub const ALL: [GroupKind; 2] = [GroupKind::Friend, GroupKind::Child];
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Friend => write!(f, "friend"),
            Self::Child => write!(f, "child"),
        }
    }
}

impl FromStr for GroupKind {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "friend" | "friends" => Ok(Self::Friend),
            "child" | "children" => Ok(Self::Child),
            other => Err(SocialError::InvalidIdentifier(format!(
                "Unknown group kind: {}",
                other
            ))),
        }
    }
}

/// Everything the social network knows about one player.
///
/// Pure data: the workflow engine is responsible for keeping the two sides of
/// every relationship consistent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonRecord {
    /// Normalized identifier
    pub id: PersonId,

    /// Name as the player first spelled it
    pub name: String,

    /// Friends (symmetric)
    #[serde(default)]
    pub friends: BTreeSet<PersonId>,

    /// People this person is the parent of
    #[serde(default)]
    pub children: BTreeSet<PersonId>,

    /// This person's parent, if any
    #[serde(default)]
    pub child_of: Option<PersonId>,

    /// Requests this person has sent or received
    #[serde(default)]
    pub pending: Vec<PendingRequest>,

    /// People whose requests are dropped
    #[serde(default)]
    pub ignoring: BTreeSet<PersonId>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl PersonRecord {
    /// Create an empty record for a player
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            friends: BTreeSet::new(),
            children: BTreeSet::new(),
            child_of: None,
            pending: Vec::new(),
            ignoring: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_friend_with(&self, other: &PersonId) -> bool {
        self.friends.contains(other)
    }

    pub fn number_friends(&self) -> usize {
        self.friends.len()
    }

    /// Returns false if they were already friends
    pub fn add_friend(&mut self, other: PersonId) -> bool {
        self.friends.insert(other)
    }

    /// Returns false if they were not friends
    pub fn remove_friend(&mut self, other: &PersonId) -> bool {
        self.friends.remove(other)
    }

    pub fn is_parent_of(&self, other: &PersonId) -> bool {
        self.children.contains(other)
    }

    pub fn is_child_of(&self, other: &PersonId) -> bool {
        self.child_of.as_ref() == Some(other)
    }

    pub fn number_children(&self) -> usize {
        self.children.len()
    }

    pub fn add_child(&mut self, child: PersonId) -> bool {
        self.children.insert(child)
    }

    pub fn remove_child(&mut self, child: &PersonId) -> bool {
        self.children.remove(child)
    }

    /// Set the parent, replacing any previous one
    pub fn set_child_of(&mut self, parent: PersonId) {
        self.child_of = Some(parent);
    }

    /// Clear the parent, returning the old one
    pub fn break_child_of(&mut self) -> Option<PersonId> {
        self.child_of.take()
    }

    pub fn is_ignoring(&self, other: &PersonId) -> bool {
        self.ignoring.contains(other)
    }

    /// Returns false if `other` was already ignored
    pub fn ignore(&mut self, other: PersonId) -> bool {
        self.ignoring.insert(other)
    }

    /// Returns false if `other` was not ignored
    pub fn unignore(&mut self, other: &PersonId) -> bool {
        self.ignoring.remove(other)
    }

    /// The pending entry for `other` and `kind`, in either direction
    pub fn pending_with(&self, kind: GroupKind, other: &PersonId) -> Option<&PendingRequest> {
        self.pending.iter().find(|p| p.concerns(kind, other))
    }

    /// The pending entry for `other` and `kind` in the given direction
    pub fn pending_in(
        &self,
        kind: GroupKind,
        other: &PersonId,
        direction: RequestDirection,
    ) -> Option<&PendingRequest> {
        self.pending
            .iter()
            .find(|p| p.concerns(kind, other) && p.direction == direction)
    }

    /// Store a pending entry, replacing any existing entry for the same pair and kind
    pub fn insert_pending(&mut self, request: PendingRequest) {
        self.pending
            .retain(|p| !p.concerns(request.kind, &request.other));
        self.pending.push(request);
    }

    /// Remove the entry for `other` and `kind`
    pub fn remove_pending(&mut self, kind: GroupKind, other: &PersonId) -> Option<PendingRequest> {
        let index = self.pending.iter().position(|p| p.concerns(kind, other))?;
        Some(self.pending.remove(index))
    }

    /// Remove every entry involving `other`, whatever the kind
    pub fn remove_all_pending_with(&mut self, other: &PersonId) -> Vec<PendingRequest> {
        let (removed, kept) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| &p.other == other);
        self.pending = kept;
        removed
    }

    /// Remove and return every entry whose deadline has passed
    pub fn drain_expired(&mut self, now: DateTime<Utc>) -> Vec<PendingRequest> {
        let (expired, kept) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.is_expired(now));
        self.pending = kept;
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn id(name: &str) -> PersonId {
        PersonId::new(name).unwrap()
    }

    #[test]
    fn test_person_id_is_case_insensitive() {
        assert_eq!(id("Steve"), id("steve"));
        assert_eq!(id("  Notch ").as_str(), "notch");
    }

    #[test]
    fn test_person_id_rejects_bad_names() {
        assert!(PersonId::new("").is_err());
        assert!(PersonId::new("   ").is_err());
        assert!(PersonId::new("has space").is_err());
        assert!(PersonId::new("a".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(PersonId::new("under_score-dash").is_ok());
    }

    #[test]
    fn test_group_kind_parsing() {
        assert_eq!("Friend".parse::<GroupKind>().unwrap(), GroupKind::Friend);
        assert_eq!("children".parse::<GroupKind>().unwrap(), GroupKind::Child);
        assert!(matches!(
            "spouse".parse::<GroupKind>(),
            Err(SocialError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_single_pending_entry_per_pair_and_kind() {
        let mut record = PersonRecord::new(id("alice"), "Alice");
        let now = Utc::now();

        let (first, _) = PendingRequest::pair(GroupKind::Friend, &id("alice"), &id("bob"), now, None);
        let (second, _) = PendingRequest::pair(GroupKind::Friend, &id("alice"), &id("bob"), now, None);
        let (child, _) = PendingRequest::pair(GroupKind::Child, &id("alice"), &id("bob"), now, None);

        record.insert_pending(first);
        record.insert_pending(second.clone());
        record.insert_pending(child);

        assert_eq!(record.pending.len(), 2);
        assert_eq!(
            record.pending_with(GroupKind::Friend, &id("bob")).map(|p| p.id),
            Some(second.id)
        );
        assert!(
            record
                .pending_in(GroupKind::Friend, &id("bob"), RequestDirection::Received)
                .is_none()
        );
    }

    #[test]
    fn test_remove_all_pending_with() {
        let mut record = PersonRecord::new(id("alice"), "Alice");
        let now = Utc::now();

        for (kind, other) in [
            (GroupKind::Friend, "bob"),
            (GroupKind::Child, "bob"),
            (GroupKind::Friend, "carol"),
        ] {
            let (sent, _) = PendingRequest::pair(kind, &id("alice"), &id(other), now, None);
            record.insert_pending(sent);
        }

        let removed = record.remove_all_pending_with(&id("bob"));
        assert_eq!(removed.len(), 2);
        assert_eq!(record.pending.len(), 1);
        assert_eq!(record.pending[0].other, id("carol"));
    }

    #[test]
    fn test_drain_expired() {
        let mut record = PersonRecord::new(id("alice"), "Alice");
        let now = Utc::now();

        let (short, _) = PendingRequest::pair(
            GroupKind::Friend,
            &id("alice"),
            &id("bob"),
            now,
            Some(Duration::seconds(10)),
        );
        let (forever, _) =
            PendingRequest::pair(GroupKind::Friend, &id("alice"), &id("carol"), now, None);
        record.insert_pending(short);
        record.insert_pending(forever);

        assert!(record.drain_expired(now).is_empty());
        let expired = record.drain_expired(now + Duration::seconds(11));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].other, id("bob"));
        assert_eq!(record.pending.len(), 1);
    }

    #[test]
    fn test_child_of_is_single_valued() {
        let mut record = PersonRecord::new(id("bob"), "Bob");
        record.set_child_of(id("alice"));
        assert!(record.is_child_of(&id("alice")));

        record.set_child_of(id("carol"));
        assert!(!record.is_child_of(&id("alice")));
        assert_eq!(record.break_child_of(), Some(id("carol")));
        assert!(record.child_of.is_none());
    }
}
