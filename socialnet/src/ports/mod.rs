//! Outbound ports: the narrow interfaces the engine calls after a transition.
//!
//! - `traits.rs`: `PlayerDirectory`, `Notifier`, `PermissionSync`, `Economy`
//! - `dispatch.rs`: the `Ports` bundle that runs side effects with timeouts
//! - `detached.rs`: no-op implementations for hosts without an integration
//!
//! Every call is best-effort. Failures and timeouts are logged and never undo
//! the state change that caused them.

pub mod detached;
pub mod dispatch;
pub mod traits;

pub use detached::Detached;
pub use dispatch::{Ports, SideEffect};
pub use traits::{
    Economy, Notifier, OnlinePlayer, PermissionSync, PlayerDirectory, PortError, SocialEvent,
};
