//! Asymmetric groups: a parent lists many children, a child has one parent

use super::policy::{Ineligibility, check_cap, check_funds};
use crate::config::ChildSettings;
use crate::models::{GroupKind, PersonId, PersonRecord};
use crate::ports::SideEffect;

/// The requester becomes the parent, the receiver becomes the child.
#[derive(Debug, Clone, PartialEq)]
pub struct AsymmetricPolicy {
    pub kind: GroupKind,
    /// Most children a parent may have, 0 for unlimited
    pub maximum: u32,
    pub per_use_cost: f64,
}

impl AsymmetricPolicy {
    pub fn from_settings(settings: &ChildSettings) -> Self {
        Self {
            kind: GroupKind::Child,
            maximum: settings.maximum_children,
            per_use_cost: settings.per_use_cost,
        }
    }

    fn check_cap(&self, person: &PersonRecord) -> Result<(), Ineligibility> {
        check_cap(person, self.kind, person.number_children(), self.maximum)
    }

    fn check_single_parent(child: &PersonRecord) -> Result<(), Ineligibility> {
        if child.child_of.is_some() {
            return Err(Ineligibility::AlreadyHasParent {
                person: child.id.clone(),
            });
        }
        Ok(())
    }

    fn check_not_reversed(parent: &PersonRecord, child: &PersonRecord) -> Result<(), Ineligibility> {
        if parent.is_child_of(&child.id) {
            return Err(Ineligibility::ParentCycle {
                person: child.id.clone(),
                other: parent.id.clone(),
            });
        }
        Ok(())
    }

    /// `sender` wants to adopt `receiver`
    pub fn allow_send_request(
        &self,
        sender: &PersonRecord,
        receiver: &PersonRecord,
        sender_can_afford: bool,
    ) -> Result<(), Ineligibility> {
        check_funds(sender, sender_can_afford)?;
        self.check_cap(sender)?;
        Self::check_single_parent(receiver)?;
        Self::check_not_reversed(sender, receiver)
    }

    /// `acceptor` agrees to become `sender`'s child.
    ///
    /// The acceptor's own child count is still held against the cap, and so
    /// is the sender's, since the sender may have filled up while the request
    /// was pending.
    pub fn allow_accept_request(
        &self,
        acceptor: &PersonRecord,
        sender: &PersonRecord,
        acceptor_can_afford: bool,
    ) -> Result<(), Ineligibility> {
        check_funds(acceptor, acceptor_can_afford)?;
        self.check_cap(acceptor)?;
        self.check_cap(sender)?;
        Self::check_single_parent(acceptor)?;
        Self::check_not_reversed(sender, acceptor)
    }

    /// Is `member` a child of `owner`?
    pub fn person_in_group(&self, owner: &PersonRecord, member: &PersonRecord) -> bool {
        owner.is_parent_of(&member.id)
    }

    pub fn add_person_to_group(
        &self,
        owner: &mut PersonRecord,
        added: &mut PersonRecord,
    ) -> Vec<SideEffect> {
        owner.add_child(added.id.clone());
        added.set_child_of(owner.id.clone());
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
        owner.remove_child(&removed.id);
        if removed.is_child_of(&owner.id) {
            removed.break_child_of();
        }
        owner.touch();
        removed.touch();

        vec![
            SideEffect::SyncPermissions(owner.id.clone()),
            SideEffect::SyncPermissions(removed.id.clone()),
        ]
    }

    /// A child leaves its parent, or a parent disowns a child
    pub fn end_relationship(
        &self,
        initiator: &mut PersonRecord,
        other: &mut PersonRecord,
    ) -> Option<Vec<SideEffect>> {
        if initiator.is_child_of(&other.id) || other.is_parent_of(&initiator.id) {
            Some(self.remove_person_from_group(other, initiator))
        } else if initiator.is_parent_of(&other.id) || other.is_child_of(&initiator.id) {
            Some(self.remove_person_from_group(initiator, other))
        } else {
            None
        }
    }

    pub fn members(&self, record: &PersonRecord) -> Vec<PersonId> {
        record.children.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> PersonRecord {
        PersonRecord::new(PersonId::new(name).unwrap(), name)
    }

    fn policy(maximum: u32, cost: f64) -> AsymmetricPolicy {
        AsymmetricPolicy::from_settings(&ChildSettings {
            maximum_children: maximum,
            per_use_cost: cost,
        })
    }

    #[test]
    fn test_add_links_parent_and_child() {
        let policy = policy(0, 3.0);
        let mut parent = person("alice");
        let mut child = person("bob");

        let effects = policy.add_person_to_group(&mut parent, &mut child);

        assert!(policy.person_in_group(&parent, &child));
        assert!(!policy.person_in_group(&child, &parent));
        assert!(child.is_child_of(&parent.id));
        assert!(effects.contains(&SideEffect::Charge {
            payer: parent.id.clone(),
            amount: 3.0
        }));
    }

    #[test]
    fn test_child_has_single_parent() {
        let policy = policy(0, 0.0);
        let mut alice = person("alice");
        let mut bob = person("bob");
        let carol = person("carol");

        policy.add_person_to_group(&mut alice, &mut bob);

        assert_eq!(
            policy.allow_send_request(&carol, &bob, true),
            Err(Ineligibility::AlreadyHasParent {
                person: bob.id.clone()
            })
        );
        assert!(matches!(
            policy.allow_accept_request(&bob, &carol, true),
            Err(Ineligibility::AlreadyHasParent { .. })
        ));
    }

    #[test]
    fn test_child_cannot_adopt_parent() {
        let policy = policy(0, 0.0);
        let mut alice = person("alice");
        let mut bob = person("bob");

        policy.add_person_to_group(&mut alice, &mut bob);

        assert_eq!(
            policy.allow_send_request(&bob, &alice, true),
            Err(Ineligibility::ParentCycle {
                person: alice.id.clone(),
                other: bob.id.clone()
            })
        );
    }

    #[test]
    fn test_cap_applies_to_parent() {
        let policy = policy(1, 0.0);
        let mut alice = person("alice");
        let mut bob = person("bob");
        let carol = person("carol");

        policy.add_person_to_group(&mut alice, &mut bob);
        assert!(matches!(
            policy.allow_send_request(&alice, &carol, true),
            Err(Ineligibility::GroupFull { limit: 1, .. })
        ));
        assert!(matches!(
            policy.allow_accept_request(&carol, &alice, true),
            Err(Ineligibility::GroupFull { person, .. }) if person == alice.id
        ));
    }

    #[test]
    fn test_either_side_can_end_it() {
        let policy = policy(0, 0.0);
        let mut alice = person("alice");
        let mut bob = person("bob");
        let mut carol = person("carol");

        policy.add_person_to_group(&mut alice, &mut bob);
        assert!(policy.end_relationship(&mut bob, &mut alice).is_some());
        assert!(bob.child_of.is_none());
        assert!(alice.children.is_empty());

        policy.add_person_to_group(&mut alice, &mut carol);
        assert!(policy.end_relationship(&mut alice, &mut carol).is_some());
        assert!(carol.child_of.is_none());

        assert!(policy.end_relationship(&mut alice, &mut bob).is_none());
    }

    #[test]
    fn test_members_are_children() {
        let policy = policy(0, 0.0);
        let mut alice = person("alice");
        let mut bob = person("bob");
        let mut carol = person("carol");

        policy.add_person_to_group(&mut alice, &mut carol);
        policy.add_person_to_group(&mut alice, &mut bob);

        assert_eq!(policy.members(&alice), vec![bob.id.clone(), carol.id.clone()]);
        assert!(policy.members(&bob).is_empty());
    }
}
