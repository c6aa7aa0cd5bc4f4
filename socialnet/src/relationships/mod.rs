//! Group policies
//!
//! A policy holds the rules of one group kind: who may request whom, who may
//! accept, what membership means, and how the two records change when a
//! relationship starts or ends. The workflow engine is written against
//! [`GroupPolicy`] only, so adding a group kind means adding a variant here.

pub mod asymmetric;
pub mod policy;
pub mod symmetric;

pub use asymmetric::AsymmetricPolicy;
pub use policy::{GroupPolicy, Ineligibility};
pub use symmetric::SymmetricPolicy;
