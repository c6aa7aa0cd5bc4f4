//! Port implementations for a server with no integrations wired up

use super::traits::{
    Economy, Notifier, OnlinePlayer, PermissionSync, PlayerDirectory, PortError, SocialEvent,
};
use crate::models::PersonId;
use async_trait::async_trait;
use tracing::trace;

/// Implements every port as a no-op: nobody is online, notifications and
/// permission syncs succeed silently, and no money ever moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

#[async_trait]
impl PlayerDirectory for Detached {
    async fn resolve_online_player(&self, _id: &PersonId) -> Option<OnlinePlayer> {
        None
    }
}

#[async_trait]
impl Notifier for Detached {
    async fn notify(&self, person: &PersonId, event: &SocialEvent) -> Result<(), PortError> {
        trace!("Dropping notification for {}: {}", person, event);
        Ok(())
    }
}

#[async_trait]
impl PermissionSync for Detached {
    async fn sync_permissions(&self, _person: &PersonId) -> Result<(), PortError> {
        Ok(())
    }
}

#[async_trait]
impl Economy for Detached {
    async fn has_funds(&self, _player: &OnlinePlayer, _amount: f64) -> bool {
        true
    }

    async fn charge(&self, _player: &OnlinePlayer, _amount: f64) -> bool {
        false
    }
}
