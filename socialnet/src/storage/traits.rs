//! Trait definition for person record storage

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{PersonId, PersonRecord};
use crate::storage::errors::StorageError;

/// Keyed storage of person records.
///
/// Implementations are plain synchronous-semantics stores: no locking across
/// calls is expected of them, the workflow engine serializes its own
/// read-modify-write cycles.
#[async_trait]
pub trait PersonStore: Send + Sync + 'static + Debug {
    /// Check if the store is usable; called once when the store is created
    async fn health_check(&self) -> std::result::Result<bool, StorageError>;

    /// Get a record by its identifier
    async fn get(&self, id: &PersonId) -> std::result::Result<Option<PersonRecord>, StorageError>;

    /// Insert or replace a record
    async fn save(&self, record: &PersonRecord) -> std::result::Result<(), StorageError>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: &PersonId) -> std::result::Result<bool, StorageError>;

    /// Identifiers of every stored record
    async fn list_ids(&self) -> std::result::Result<Vec<PersonId>, StorageError>;

    /// Number of stored records
    async fn count(&self) -> std::result::Result<usize, StorageError> {
        Ok(self.list_ids().await?.len())
    }
}
