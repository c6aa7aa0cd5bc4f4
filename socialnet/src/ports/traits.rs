//! Traits for the external collaborators of the workflow engine.
//!
//! # Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use socialnet::models::PersonId;
//! use socialnet::ports::{Notifier, PortError, SocialEvent};
//!
//! struct ChatNotifier;
//!
//! #[async_trait]
//! impl Notifier for ChatNotifier {
//!     async fn notify(&self, person: &PersonId, event: &SocialEvent) -> Result<(), PortError> {
//!         println!("[to {}] {}", person, event);
//!         Ok(())
//!     }
//! }
//! ```

use crate::models::{GroupKind, PersonId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error reported by a port implementation
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    /// The target player or service cannot be reached right now
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Port call failed: {0}")]
    Failed(String),
}

/// A player who is connected to the server right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlinePlayer {
    pub id: PersonId,
    /// Display name as the server knows it
    pub name: String,
}

impl OnlinePlayer {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Something a player should be told about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SocialEvent {
    /// `from` wants to join the recipient's group
    RequestReceived { from: PersonId, kind: GroupKind },
    /// `by` accepted the recipient's request
    RequestAccepted { by: PersonId, kind: GroupKind },
    /// The recipient is now in a group with `with`
    MemberAdded { with: PersonId, kind: GroupKind },
    /// `by` rejected the recipient's request
    RequestRejected { by: PersonId, kind: GroupKind },
    /// `by` withdrew a request sent to the recipient
    RequestCancelled { by: PersonId, kind: GroupKind },
    /// A request between the recipient and `other` timed out
    RequestExpired { other: PersonId, kind: GroupKind },
    /// `by` ended their relationship with the recipient
    MemberRemoved { by: PersonId, kind: GroupKind },
}

impl std::fmt::Display for SocialEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestReceived { from, kind } => write!(f, "{} sent you a {} request", from, kind),
            Self::RequestAccepted { by, kind } => write!(f, "{} accepted your {} request", by, kind),
            Self::MemberAdded { with, kind } => write!(f, "you are now in a {} group with {}", kind, with),
            Self::RequestRejected { by, kind } => write!(f, "{} rejected your {} request", by, kind),
            Self::RequestCancelled { by, kind } => write!(f, "{} withdrew their {} request", by, kind),
            Self::RequestExpired { other, kind } => write!(f, "the {} request with {} expired", kind, other),
            Self::MemberRemoved { by, kind } => write!(f, "{} removed you from their {} group", by, kind),
        }
    }
}

/// Looks up connected players
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// The live player for `id`, or `None` if they are offline
    async fn resolve_online_player(&self, id: &PersonId) -> Option<OnlinePlayer>;
}

/// Delivers messages to players
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, person: &PersonId, event: &SocialEvent) -> Result<(), PortError>;
}

/// Recomputes group-derived permissions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionSync: Send + Sync {
    async fn sync_permissions(&self, person: &PersonId) -> Result<(), PortError>;
}

/// In-game currency
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Economy: Send + Sync {
    /// Whether `player` holds at least `amount`
    async fn has_funds(&self, player: &OnlinePlayer, amount: f64) -> bool;

    /// Withdraw `amount`; the result is informational only
    async fn charge(&self, player: &OnlinePlayer, amount: f64) -> bool;
}
