//! The relationship workflow: request, accept, reject, cancel, ignore, remove.

pub mod engine;

pub use engine::RelationshipEngine;
