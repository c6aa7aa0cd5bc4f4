//! # socialnet
//!
//! Friend and parent/child relationship groups for multiplayer game servers.
//!
//! Players ask each other to join a group, the other side accepts, rejects or
//! ignores them, and either side can later end the relationship. Each group
//! kind has its own rules (caps, costs, single parent) expressed as a
//! [`relationships::GroupPolicy`]; the [`workflow::RelationshipEngine`] runs
//! the shared request workflow on top of a [`storage::PersonStore`] and calls
//! out to the host server through [`ports::Ports`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use socialnet::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let network = SocialNetwork::start(ConfigBuilder::development().build()?, Ports::detached()).await?;
//!     let engine = network.engine();
//!
//!     let steve = engine.join("Steve").await?.id;
//!     let alex = engine.join("Alex").await?.id;
//!
//!     engine.send_request(&steve, &alex, GroupKind::Friend).await?;
//!     engine.accept_request(&alex, &steve, GroupKind::Friend).await?;
//!
//!     assert_eq!(engine.members(&steve, GroupKind::Friend).await?, vec![alex]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **models**: person records, group kinds, pending requests
//! - **storage**: in-memory and flat-file JSON record stores
//! - **relationships**: symmetric and asymmetric group policies
//! - **workflow**: the request/accept/reject state machine
//! - **ports**: traits for notifications, permissions and the economy

pub mod config;
pub mod logging;
pub mod models;
pub mod network;
pub mod ports;
pub mod relationships;
pub mod storage;
pub mod workflow;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::network::SocialNetwork;

    pub use crate::config::{ConfigBuilder, ConfigLoader, LogLevel, SocialConfig};

    pub use crate::models::{GroupKind, PendingRequest, PersonId, PersonRecord, RequestDirection};

    pub use crate::ports::{
        Economy, Notifier, OnlinePlayer, PermissionSync, PlayerDirectory, PortError, Ports,
        SocialEvent,
    };

    pub use crate::relationships::{GroupPolicy, Ineligibility};

    pub use crate::storage::{FilePersonStore, MemoryPersonStore, PersonStore, StorageError};

    pub use crate::workflow::RelationshipEngine;

    pub use crate::{Result, SocialError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for socialnet operations
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// The group policy refused the request
    #[error("Not eligible: {0}")]
    NotEligible(#[from] relationships::Ineligibility),

    #[error("Already in that group")]
    AlreadyInGroup,

    /// A request of this kind is already pending between the two players
    #[error("A request is already pending")]
    AlreadyRequested,

    #[error("No pending request")]
    NoPendingRequest,

    #[error("Not in that group")]
    NotInGroup,

    /// No record exists for this player
    #[error("Player not found: {0}")]
    UnknownPerson(String),

    /// The target ignores the sender. Never returned from public operations.
    #[error("Target is ignoring the sender")]
    TargetIgnoring,

    #[error("Players cannot target themselves")]
    SelfTarget,

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),
}

impl From<crate::config::ConfigError> for SocialError {
    fn from(err: crate::config::ConfigError) -> Self {
        SocialError::Configuration(err.to_string())
    }
}

/// Result type for socialnet operations
pub type Result<T> = std::result::Result<T, SocialError>;

/// Build a relationship engine from configuration
///
/// Opens the configured person store and wires it to `ports`. Logging is not
/// touched; call [`logging::init`] or use [`network::SocialNetwork::start`]
/// for that.
///
/// # Examples
///
/// ```rust,no_run
/// use socialnet::prelude::*;
///
/// async fn example() -> Result<()> {
///     let config = ConfigBuilder::new().with_data_dir("./social").build()?;
///     let engine = socialnet::init(&config, Ports::detached()).await?;
///     engine.join("Steve").await?;
///     Ok(())
/// }
/// ```
pub async fn init(
    config: &config::SocialConfig,
    ports: ports::Ports,
) -> Result<workflow::RelationshipEngine> {
    let store = storage::create_person_store(&config.storage).await?;
    Ok(workflow::RelationshipEngine::new(store, ports, config))
}
