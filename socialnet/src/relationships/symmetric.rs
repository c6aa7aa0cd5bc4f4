//! Symmetric groups: both sides list each other

use super::policy::{Ineligibility, check_cap, check_funds};
use crate::config::FriendSettings;
use crate::models::{GroupKind, PersonId, PersonRecord};
use crate::ports::SideEffect;

#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricPolicy {
    pub kind: GroupKind,
    /// 0 for unlimited
    pub maximum: u32,
    pub per_use_cost: f64,
}

impl SymmetricPolicy {
    pub fn from_settings(settings: &FriendSettings) -> Self {
        Self {
            kind: GroupKind::Friend,
            maximum: settings.maximum_friends,
            per_use_cost: settings.per_use_cost,
        }
    }

    fn check_cap(&self, person: &PersonRecord) -> Result<(), Ineligibility> {
        check_cap(person, self.kind, person.number_friends(), self.maximum)
    }

    pub fn allow_send_request(
        &self,
        sender: &PersonRecord,
        _receiver: &PersonRecord,
        sender_can_afford: bool,
    ) -> Result<(), Ineligibility> {
        check_funds(sender, sender_can_afford)?;
        self.check_cap(sender)
    }

    /// Both sides gain a member, so both caps are checked
    pub fn allow_accept_request(
        &self,
        acceptor: &PersonRecord,
        sender: &PersonRecord,
        acceptor_can_afford: bool,
    ) -> Result<(), Ineligibility> {
        check_funds(acceptor, acceptor_can_afford)?;
        self.check_cap(acceptor)?;
        self.check_cap(sender)
    }

    pub fn person_in_group(&self, owner: &PersonRecord, member: &PersonRecord) -> bool {
        owner.is_friend_with(&member.id)
    }

    pub fn add_person_to_group(
        &self,
        owner: &mut PersonRecord,
        added: &mut PersonRecord,
    ) -> Vec<SideEffect> {
        owner.add_friend(added.id.clone());
        added.add_friend(owner.id.clone());
        owner.touch();
        added.touch();

        let mut effects = vec![
            SideEffect::SyncPermissions(owner.id.clone()),
            SideEffect::SyncPermissions(added.id.clone()),
        ];
        if self.per_use_cost > 0.0 {
            effects.push(SideEffect::Charge {
                payer: owner.id.clone(),
                amount: self.per_use_cost,
            });
        }
        effects
    }

    pub fn remove_person_from_group(
        &self,
        owner: &mut PersonRecord,
        removed: &mut PersonRecord,
    ) -> Vec<SideEffect> {
        owner.remove_friend(&removed.id);
        removed.remove_friend(&owner.id);
        owner.touch();
        removed.touch();

        vec![
            SideEffect::SyncPermissions(owner.id.clone()),
            SideEffect::SyncPermissions(removed.id.clone()),
        ]
    }

    /// Either friend may end the friendship
    pub fn end_relationship(
        &self,
        initiator: &mut PersonRecord,
        other: &mut PersonRecord,
    ) -> Option<Vec<SideEffect>> {
        if !initiator.is_friend_with(&other.id) && !other.is_friend_with(&initiator.id) {
            return None;
        }
        Some(self.remove_person_from_group(initiator, other))
    }

    pub fn members(&self, record: &PersonRecord) -> Vec<PersonId> {
        record.friends.iter().cloned().collect()
    }
}
