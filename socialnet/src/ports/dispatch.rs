//! Bundle of outbound ports and the side-effect runner.
//!
//! Calls are executed in order, each bounded by the configured timeout. A
//! failed or slow call is logged and skipped; it does not stop later calls.

use super::detached::Detached;
use super::traits::{Economy, Notifier, OnlinePlayer, PermissionSync, PlayerDirectory, SocialEvent};
use crate::models::PersonId;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default upper bound for a single port call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_millis(2000);

/// A deferred call into a port, produced by a committed transition
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Tell a player something happened
    Notify { person: PersonId, event: SocialEvent },
    /// Recompute a player's group-derived permissions
    SyncPermissions(PersonId),
    /// Charge the per-use cost of a group to the player who asked for it
    Charge { payer: PersonId, amount: f64 },
}

/// The four outbound ports plus the per-call timeout.
#[derive(Clone)]
pub struct Ports {
    directory: Arc<dyn PlayerDirectory>,
    notifier: Arc<dyn Notifier>,
    permissions: Arc<dyn PermissionSync>,
    economy: Arc<dyn Economy>,
    call_timeout: Duration,
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for Ports {
    fn default() -> Self {
        Self::detached()
    }
}

impl Ports {
    pub fn new(
        directory: Arc<dyn PlayerDirectory>,
        notifier: Arc<dyn Notifier>,
        permissions: Arc<dyn PermissionSync>,
        economy: Arc<dyn Economy>,
    ) -> Self {
        Self {
            directory,
            notifier,
            permissions,
            economy,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Ports that go nowhere, see [`Detached`]
    pub fn detached() -> Self {
        let detached = Arc::new(Detached);
        Self::new(detached.clone(), detached.clone(), detached.clone(), detached)
    }

    pub fn with_directory(mut self, directory: Arc<dyn PlayerDirectory>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionSync>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_economy(mut self, economy: Arc<dyn Economy>) -> Self {
        self.economy = economy;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    async fn bounded<F: Future>(&self, what: &str, future: F) -> Option<F::Output> {
        match tokio::time::timeout(self.call_timeout, future).await {
            Ok(output) => Some(output),
            Err(_) => {
                warn!(
                    "Port call '{}' timed out after {}ms",
                    what,
                    self.call_timeout.as_millis()
                );
                None
            }
        }
    }

    /// Look up a connected player; offline and timed-out lookups both give `None`
    pub async fn resolve(&self, id: &PersonId) -> Option<OnlinePlayer> {
        self.bounded("resolve_online_player", self.directory.resolve_online_player(id))
            .await
            .flatten()
    }

    /// Whether `id` can pay `amount`.
    ///
    /// Free groups always pass. A player who cannot be resolved passes too,
    /// matching the charge path, which skips offline players. An economy that
    /// does not answer in time fails the check.
    pub async fn can_afford(&self, id: &PersonId, amount: f64) -> bool {
        if amount <= 0.0 {
            return true;
        }

        let Some(player) = self.resolve(id).await else {
            debug!("{} is not online, skipping funds check", id);
            return true;
        };

        self.bounded("has_funds", self.economy.has_funds(&player, amount))
            .await
            .unwrap_or(false)
    }

    /// Run side effects in order. Never fails.
    pub async fn dispatch(&self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::Notify { person, event } => {
                    match self.bounded("notify", self.notifier.notify(&person, &event)).await {
                        Some(Ok(())) => debug!("Notified {}: {}", person, event),
                        Some(Err(e)) => warn!("Failed to notify {}: {}", person, e),
                        None => {}
                    }
                }
                SideEffect::SyncPermissions(person) => {
                    match self
                        .bounded("sync_permissions", self.permissions.sync_permissions(&person))
                        .await
                    {
                        Some(Ok(())) => debug!("Synced permissions for {}", person),
                        Some(Err(e)) => warn!("Failed to sync permissions for {}: {}", person, e),
                        None => {}
                    }
                }
                SideEffect::Charge { payer, amount } => self.charge(&payer, amount).await,
            }
        }
    }

    async fn charge(&self, payer: &PersonId, amount: f64) {
        if amount <= 0.0 {
            return;
        }

        let Some(player) = self.resolve(payer).await else {
            debug!("{} is not online, skipping charge of {}", payer, amount);
            return;
        };

        match self.bounded("charge", self.economy.charge(&player, amount)).await {
            Some(true) => debug!("Charged {} to {}", amount, payer),
            Some(false) => warn!("Economy declined charge of {} to {}", amount, payer),
            None => {}
        }
    }
}
