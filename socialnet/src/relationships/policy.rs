//! The policy enum and the checks shared by every variant

use super::asymmetric::AsymmetricPolicy;
use super::symmetric::SymmetricPolicy;
use crate::config::GroupsConfig;
use crate::models::{GroupKind, PersonId, PersonRecord};
use crate::ports::SideEffect;

/// Why a request may not be sent or accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Ineligibility {
    #[error("{person} cannot afford the cost of this request")]
    InsufficientFunds { person: PersonId },

    #[error("{person} already has the maximum of {limit} {kind} members")]
    GroupFull {
        person: PersonId,
        kind: GroupKind,
        limit: u32,
    },

    #[error("{person} already has a parent")]
    AlreadyHasParent { person: PersonId },

    #[error("{person} is already the parent of {other}")]
    ParentCycle { person: PersonId, other: PersonId },
}

pub(crate) fn check_funds(person: &PersonRecord, can_afford: bool) -> Result<(), Ineligibility> {
    if can_afford {
        Ok(())
    } else {
        Err(Ineligibility::InsufficientFunds {
            person: person.id.clone(),
        })
    }
}

/// `maximum == 0` means no limit
pub(crate) fn check_cap(
    person: &PersonRecord,
    kind: GroupKind,
    count: usize,
    maximum: u32,
) -> Result<(), Ineligibility> {
    if maximum > 0 && count >= maximum as usize {
        return Err(Ineligibility::GroupFull {
            person: person.id.clone(),
            kind,
            limit: maximum,
        });
    }
    Ok(())
}

/// Rules for one group kind
#[derive(Debug, Clone, PartialEq)]
pub enum GroupPolicy {
    /// Undirected edge, e.g. friends
    Symmetric(SymmetricPolicy),
    /// Directed edge with a single parent, e.g. parent/child
    Asymmetric(AsymmetricPolicy),
}

impl GroupPolicy {
    /// The policy for `kind` under the given settings
    pub fn for_kind(kind: GroupKind, groups: &GroupsConfig) -> Self {
        match kind {
            GroupKind::Friend => Self::Symmetric(SymmetricPolicy::from_settings(&groups.friend)),
            GroupKind::Child => Self::Asymmetric(AsymmetricPolicy::from_settings(&groups.child)),
        }
    }

    pub fn kind(&self) -> GroupKind {
        match self {
            Self::Symmetric(p) => p.kind,
            Self::Asymmetric(p) => p.kind,
        }
    }

    /// Currency charged to the requester when a relationship is established
    pub fn per_use_cost(&self) -> f64 {
        match self {
            Self::Symmetric(p) => p.per_use_cost,
            Self::Asymmetric(p) => p.per_use_cost,
        }
    }

    /// May `sender` ask `receiver` to join their group?
    pub fn allow_send_request(
        &self,
        sender: &PersonRecord,
        receiver: &PersonRecord,
        sender_can_afford: bool,
    ) -> Result<(), Ineligibility> {
        match self {
            Self::Symmetric(p) => p.allow_send_request(sender, receiver, sender_can_afford),
            Self::Asymmetric(p) => p.allow_send_request(sender, receiver, sender_can_afford),
        }
    }

    /// May `acceptor` still accept the request `sender` sent earlier?
    pub fn allow_accept_request(
        &self,
        acceptor: &PersonRecord,
        sender: &PersonRecord,
        acceptor_can_afford: bool,
    ) -> Result<(), Ineligibility> {
        match self {
            Self::Symmetric(p) => p.allow_accept_request(acceptor, sender, acceptor_can_afford),
            Self::Asymmetric(p) => p.allow_accept_request(acceptor, sender, acceptor_can_afford),
        }
    }

    /// Is `member` in `owner`'s group?
    pub fn person_in_group(&self, owner: &PersonRecord, member: &PersonRecord) -> bool {
        match self {
            Self::Symmetric(p) => p.person_in_group(owner, member),
            Self::Asymmetric(p) => p.person_in_group(owner, member),
        }
    }

    /// Put `added` into `owner`'s group. `owner` is the player who asked and
    /// the one who pays.
    pub fn add_person_to_group(
        &self,
        owner: &mut PersonRecord,
        added: &mut PersonRecord,
    ) -> Vec<SideEffect> {
        match self {
            Self::Symmetric(p) => p.add_person_to_group(owner, added),
            Self::Asymmetric(p) => p.add_person_to_group(owner, added),
        }
    }

    /// Take `removed` out of `owner`'s group
    pub fn remove_person_from_group(
        &self,
        owner: &mut PersonRecord,
        removed: &mut PersonRecord,
    ) -> Vec<SideEffect> {
        match self {
            Self::Symmetric(p) => p.remove_person_from_group(owner, removed),
            Self::Asymmetric(p) => p.remove_person_from_group(owner, removed),
        }
    }

    /// End the relationship between `initiator` and `other`, whichever side
    /// of it `initiator` is on. `None` when they are not related.
    pub fn end_relationship(
        &self,
        initiator: &mut PersonRecord,
        other: &mut PersonRecord,
    ) -> Option<Vec<SideEffect>> {
        match self {
            Self::Symmetric(p) => p.end_relationship(initiator, other),
            Self::Asymmetric(p) => p.end_relationship(initiator, other),
        }
    }

    /// Everyone in `record`'s group, sorted
    pub fn members(&self, record: &PersonRecord) -> Vec<PersonId> {
        match self {
            Self::Symmetric(p) => p.members(record),
            Self::Asymmetric(p) => p.members(record),
        }
    }
}
