//! Domain models for people, group kinds, and pending requests

pub mod person;
pub mod request;

pub use person::{GroupKind, PersonId, PersonRecord};
pub use request::{PendingRequest, RequestDirection};
