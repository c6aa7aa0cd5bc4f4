//! Relationship workflow engine
//!
//! Every transition runs under one transaction lock: both records are loaded,
//! checked against the group policy, mutated and saved before the lock is
//! released. Port calls produced by the transition are dispatched afterwards,
//! so a slow or failing port never holds other players up and never undoes a
//! committed change.

use crate::config::{GroupsConfig, SocialConfig};
use crate::models::{GroupKind, PendingRequest, PersonId, PersonRecord, RequestDirection};
use crate::ports::{Ports, SideEffect, SocialEvent};
use crate::relationships::GroupPolicy;
use crate::storage::PersonStore;
use crate::{Result, SocialError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Drives the request/accept/reject state machine for every group kind
#[derive(Debug)]
pub struct RelationshipEngine {
    store: Arc<dyn PersonStore>,
    ports: Ports,
    groups: GroupsConfig,
    request_ttl: Option<chrono::Duration>,
    lock: Mutex<()>,
}

impl RelationshipEngine {
    /// Create an engine over `store`. The per-call port timeout is taken from
    /// the configuration.
    pub fn new(store: Arc<dyn PersonStore>, ports: Ports, config: &SocialConfig) -> Self {
        Self {
            store,
            ports: ports.with_call_timeout(config.ports.call_timeout()),
            groups: config.groups.clone(),
            request_ttl: config.requests.ttl(),
            lock: Mutex::new(()),
        }
    }

    /// The policy for a group kind under this engine's settings
    pub fn policy(&self, kind: GroupKind) -> GroupPolicy {
        GroupPolicy::for_kind(kind, &self.groups)
    }

    pub fn store(&self) -> &Arc<dyn PersonStore> {
        &self.store
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    /// Create the record for a player on first reference.
    ///
    /// Returns the existing record if the player already joined.
    pub async fn join(&self, name: &str) -> Result<PersonRecord> {
        let id = PersonId::new(name)?;
        let _guard = self.lock.lock().await;

        if let Some(existing) = self.store.get(&id).await? {
            return Ok(existing);
        }

        let record = PersonRecord::new(id, name.trim());
        self.store.save(&record).await?;
        info!("{} joined the social network", record.id);
        Ok(record)
    }

    /// Current record of a player
    pub async fn person(&self, id: &PersonId) -> Result<PersonRecord> {
        self.load(id).await
    }

    /// Ask `target` to join `requester`'s group of `kind`.
    ///
    /// When `target` ignores `requester` the request is dropped and this
    /// still returns `Ok(())`, so the requester cannot tell they are ignored.
    pub async fn send_request(
        &self,
        requester: &PersonId,
        target: &PersonId,
        kind: GroupKind,
    ) -> Result<()> {
        match self.try_send_request(requester, target, kind).await {
            Err(SocialError::TargetIgnoring) => {
                debug!(
                    "Dropped {} request from {} to {}: target is ignoring them",
                    kind, requester, target
                );
                Ok(())
            }
            other => other,
        }
    }

    async fn try_send_request(
        &self,
        requester: &PersonId,
        target: &PersonId,
        kind: GroupKind,
    ) -> Result<()> {
        if requester == target {
            return Err(SocialError::SelfTarget);
        }

        let policy = self.policy(kind);
        let can_afford = self
            .ports
            .can_afford(requester, policy.per_use_cost())
            .await;

        let effects = {
            let _guard = self.lock.lock().await;
            let (mut sender, mut receiver) = self.load_pair(requester, target).await?;

            if policy.person_in_group(&sender, &receiver) {
                return Err(SocialError::AlreadyInGroup);
            }
            policy.allow_send_request(&sender, &receiver, can_afford)?;

            // Expired entries count as absent; insert_pending replaces them below
            let now = Utc::now();
            let live = |p: &PendingRequest| !p.is_expired(now);
            if sender.pending_with(kind, target).is_some_and(live)
                || receiver.pending_with(kind, requester).is_some_and(live)
            {
                return Err(SocialError::AlreadyRequested);
            }
            if receiver.is_ignoring(requester) {
                return Err(SocialError::TargetIgnoring);
            }

            let before = sender.clone();
            let (sent, received) =
                PendingRequest::pair(kind, requester, target, now, self.request_ttl);
            sender.insert_pending(sent);
            receiver.insert_pending(received);
            sender.touch();
            receiver.touch();
            self.commit(&before, &sender, &receiver).await?;

            vec![SideEffect::Notify {
                person: target.clone(),
                event: SocialEvent::RequestReceived {
                    from: requester.clone(),
                    kind,
                },
            }]
        };

        debug!("{} sent a {} request to {}", requester, kind, target);
        self.ports.dispatch(effects).await;
        Ok(())
    }

    /// `acceptor` accepts the request `sender` sent them.
    ///
    /// If the policy refuses, the pending request stays so it can be accepted
    /// later or cancelled by the sender.
    pub async fn accept_request(
        &self,
        acceptor: &PersonId,
        sender: &PersonId,
        kind: GroupKind,
    ) -> Result<()> {
        if acceptor == sender {
            return Err(SocialError::SelfTarget);
        }

        let policy = self.policy(kind);
        let can_afford = self.ports.can_afford(acceptor, policy.per_use_cost()).await;

        let effects = {
            let _guard = self.lock.lock().await;
            let (mut accepting, mut requesting) = self.load_pair(acceptor, sender).await?;

            let live = accepting
                .pending_in(kind, sender, RequestDirection::Received)
                .is_some_and(|p| !p.is_expired(Utc::now()));
            if !live {
                return Err(SocialError::NoPendingRequest);
            }

            policy.allow_accept_request(&accepting, &requesting, can_afford)?;

            let before = requesting.clone();
            accepting.remove_pending(kind, sender);
            requesting.remove_pending(kind, acceptor);
            let mut effects = policy.add_person_to_group(&mut requesting, &mut accepting);
            self.commit(&before, &requesting, &accepting).await?;

            effects.push(SideEffect::Notify {
                person: sender.clone(),
                event: SocialEvent::RequestAccepted {
                    by: acceptor.clone(),
                    kind,
                },
            });
            effects.push(SideEffect::Notify {
                person: acceptor.clone(),
                event: SocialEvent::MemberAdded {
                    with: sender.clone(),
                    kind,
                },
            });
            effects
        };

        info!("{} accepted the {} request from {}", acceptor, kind, sender);
        self.ports.dispatch(effects).await;
        Ok(())
    }

    /// `acceptor` turns down the request `sender` sent them
    pub async fn reject_request(
        &self,
        acceptor: &PersonId,
        sender: &PersonId,
        kind: GroupKind,
    ) -> Result<()> {
        self.withdraw(acceptor, sender, kind, RequestDirection::Received)
            .await?;
        debug!("{} rejected the {} request from {}", acceptor, kind, sender);
        Ok(())
    }

    /// `requester` takes back a request they sent to `target`
    pub async fn cancel_request(
        &self,
        requester: &PersonId,
        target: &PersonId,
        kind: GroupKind,
    ) -> Result<()> {
        self.withdraw(requester, target, kind, RequestDirection::Sent)
            .await?;
        debug!("{} cancelled their {} request to {}", requester, kind, target);
        Ok(())
    }

    /// Clear a pending request seen from `actor`'s side in `direction`, and
    /// tell the other party.
    async fn withdraw(
        &self,
        actor: &PersonId,
        other: &PersonId,
        kind: GroupKind,
        direction: RequestDirection,
    ) -> Result<()> {
        if actor == other {
            return Err(SocialError::SelfTarget);
        }

        let effects = {
            let _guard = self.lock.lock().await;
            let (mut acting, mut counterpart) = self.load_pair(actor, other).await?;

            if acting.pending_in(kind, other, direction).is_none() {
                return Err(SocialError::NoPendingRequest);
            }

            let before = acting.clone();
            acting.remove_pending(kind, other);
            counterpart.remove_pending(kind, actor);
            acting.touch();
            counterpart.touch();
            self.commit(&before, &acting, &counterpart).await?;

            let event = match direction {
                RequestDirection::Received => SocialEvent::RequestRejected {
                    by: actor.clone(),
                    kind,
                },
                RequestDirection::Sent => SocialEvent::RequestCancelled {
                    by: actor.clone(),
                    kind,
                },
            };
            vec![SideEffect::Notify {
                person: other.clone(),
                event,
            }]
        };

        self.ports.dispatch(effects).await;
        Ok(())
    }

    /// Drop all future requests from `other` and clear every pending request
    /// between the two. Idempotent, nobody is notified.
    pub async fn ignore(&self, player: &PersonId, other: &PersonId) -> Result<()> {
        if player == other {
            return Err(SocialError::SelfTarget);
        }

        let _guard = self.lock.lock().await;
        let (mut ignoring, mut ignored) = self.load_pair(player, other).await?;
        let before = ignoring.clone();

        let newly_ignored = ignoring.ignore(other.clone());
        let cleared = ignoring.remove_all_pending_with(other).len()
            + ignored.remove_all_pending_with(player).len();

        if !newly_ignored && cleared == 0 {
            return Ok(());
        }

        ignoring.touch();
        ignored.touch();
        self.commit(&before, &ignoring, &ignored).await?;

        debug!(
            "{} is ignoring {} ({} pending entries cleared)",
            player, other, cleared
        );
        Ok(())
    }

    /// Accept requests from `other` again. Idempotent.
    pub async fn unignore(&self, player: &PersonId, other: &PersonId) -> Result<()> {
        if player == other {
            return Err(SocialError::SelfTarget);
        }

        let _guard = self.lock.lock().await;
        let mut record = self.load(player).await?;

        if record.unignore(other) {
            record.touch();
            self.store.save(&record).await?;
            debug!("{} is no longer ignoring {}", player, other);
        }
        Ok(())
    }

    /// End an established relationship. Either side may do this.
    pub async fn remove(
        &self,
        initiator: &PersonId,
        target: &PersonId,
        kind: GroupKind,
    ) -> Result<()> {
        if initiator == target {
            return Err(SocialError::SelfTarget);
        }

        let policy = self.policy(kind);
        let effects = {
            let _guard = self.lock.lock().await;
            let (mut leaving, mut other) = self.load_pair(initiator, target).await?;
            let before = leaving.clone();

            let mut effects = policy
                .end_relationship(&mut leaving, &mut other)
                .ok_or(SocialError::NotInGroup)?;
            self.commit(&before, &leaving, &other).await?;

            effects.push(SideEffect::Notify {
                person: target.clone(),
                event: SocialEvent::MemberRemoved {
                    by: initiator.clone(),
                    kind,
                },
            });
            effects
        };

        info!("{} ended their {} relationship with {}", initiator, kind, target);
        self.ports.dispatch(effects).await;
        Ok(())
    }

    /// Whether `member` is in `owner`'s group of `kind`
    pub async fn in_group(
        &self,
        owner: &PersonId,
        member: &PersonId,
        kind: GroupKind,
    ) -> Result<bool> {
        let owner = self.load(owner).await?;
        let member = self.load(member).await?;
        Ok(self.policy(kind).person_in_group(&owner, &member))
    }

    /// Friends or children of a player, sorted
    pub async fn members(&self, id: &PersonId, kind: GroupKind) -> Result<Vec<PersonId>> {
        let record = self.load(id).await?;
        Ok(self.policy(kind).members(&record))
    }

    pub async fn parent_of(&self, id: &PersonId) -> Result<Option<PersonId>> {
        Ok(self.load(id).await?.child_of)
    }

    /// Pending requests a player has sent or received, expired ones included
    /// until the next sweep
    pub async fn pending_requests(&self, id: &PersonId) -> Result<Vec<PendingRequest>> {
        Ok(self.load(id).await?.pending)
    }

    /// Remove every pending request whose deadline is at or before `now`.
    ///
    /// Both parties are notified. Returns the number of requests removed. If
    /// the store fails partway, records already saved are still notified
    /// before the error is returned.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut expired_ids = HashSet::new();
        let mut effects = Vec::new();

        let swept = {
            let _guard = self.lock.lock().await;
            self.sweep_records(now, &mut expired_ids, &mut effects).await
        };

        if !expired_ids.is_empty() {
            info!("Expired {} pending requests", expired_ids.len());
        }
        self.ports.dispatch(effects).await;

        swept?;
        Ok(expired_ids.len())
    }

    async fn sweep_records(
        &self,
        now: DateTime<Utc>,
        expired_ids: &mut HashSet<uuid::Uuid>,
        effects: &mut Vec<SideEffect>,
    ) -> Result<()> {
        for id in self.store.list_ids().await? {
            let Some(mut record) = self.store.get(&id).await? else {
                continue;
            };

            let expired = record.drain_expired(now);
            if expired.is_empty() {
                continue;
            }

            record.touch();
            self.store.save(&record).await?;

            for request in expired {
                expired_ids.insert(request.id);
                effects.push(SideEffect::Notify {
                    person: id.clone(),
                    event: SocialEvent::RequestExpired {
                        other: request.other,
                        kind: request.kind,
                    },
                });
            }
        }
        Ok(())
    }

    /// Run [`prune_expired`](Self::prune_expired) every `interval` until the
    /// returned task is aborted.
    pub fn spawn_expiry_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = self.prune_expired(Utc::now()).await {
                    warn!("Expiry sweep failed: {}", e);
                }
            }
        })
    }

    async fn load(&self, id: &PersonId) -> Result<PersonRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| SocialError::UnknownPerson(id.to_string()))
    }

    async fn load_pair(
        &self,
        first: &PersonId,
        second: &PersonId,
    ) -> Result<(PersonRecord, PersonRecord)> {
        Ok((self.load(first).await?, self.load(second).await?))
    }

    /// Save both records. If the second save fails the first record is put
    /// back as it was, so the pair never disagrees.
    async fn commit(
        &self,
        first_before: &PersonRecord,
        first: &PersonRecord,
        second: &PersonRecord,
    ) -> Result<()> {
        self.store.save(first).await?;

        if let Err(e) = self.store.save(second).await {
            error!(
                "Failed to save {} after saving {}, restoring: {}",
                second.id, first.id, e
            );
            if let Err(restore) = self.store.save(first_before).await {
                error!("Failed to restore {}: {}", first_before.id, restore);
            }
            return Err(e.into());
        }
        Ok(())
    }
}
