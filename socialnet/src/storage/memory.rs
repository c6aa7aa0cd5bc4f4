//! In-memory person store

use super::errors::StorageError;
use super::traits::PersonStore;
use crate::models::{PersonId, PersonRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Person store backed by a `HashMap`. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPersonStore {
    records: RwLock<HashMap<PersonId, PersonRecord>>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn get(&self, id: &PersonId) -> Result<Option<PersonRecord>, StorageError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn save(&self, record: &PersonRecord) -> Result<(), StorageError> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &PersonId) -> Result<bool, StorageError> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    async fn list_ids(&self) -> Result<Vec<PersonId>, StorageError> {
        let mut ids: Vec<PersonId> = self.records.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.records.read().await.len())
    }
}
