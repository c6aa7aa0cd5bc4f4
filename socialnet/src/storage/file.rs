//! Flat-file person store: one pretty-printed JSON document per player

use super::errors::StorageError;
use super::traits::PersonStore;
use crate::models::{PersonId, PersonRecord};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const EXTENSION: &str = "json";

/// Person store that keeps `<dir>/<id>.json` per record.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous version intact.
#[derive(Debug, Clone)]
pub struct FilePersonStore {
    dir: PathBuf,
}

impl FilePersonStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::Configuration(format!(
                "Cannot create storage directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        debug!("Opened file person store at {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &PersonId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }
}

#[async_trait]
impl PersonStore for FilePersonStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn get(&self, id: &PersonId) -> Result<Option<PersonRecord>, StorageError> {
        let bytes = match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: PersonRecord = serde_json::from_slice(&bytes)?;
        if &record.id != id {
            return Err(StorageError::Corrupted(format!(
                "File for '{}' holds record '{}'",
                id, record.id
            )));
        }
        Ok(Some(record))
    }

    async fn save(&self, record: &PersonRecord) -> Result<(), StorageError> {
        let path = self.path_for(&record.id);
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        let json = serde_json::to_vec_pretty(record)?;

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, id: &PersonId) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_ids(&self) -> Result<Vec<PersonId>, StorageError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match PersonId::new(stem) {
                Ok(id) => ids.push(id),
                Err(e) => warn!("Skipping unexpected file {}: {}", path.display(), e),
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let store = FilePersonStore::open(dir.path().join("people")).await.unwrap();
        assert!(store.health_check().await.unwrap());

        let alice = PersonId::new("Alice").unwrap();
        let mut record = PersonRecord::new(alice.clone(), "Alice");
        record.add_child(PersonId::new("bob").unwrap());
        store.save(&record).await.unwrap();

        assert!(dir.path().join("people").join("alice.json").exists());

        // A second handle sees the same data
        let reopened = FilePersonStore::open(dir.path().join("people")).await.unwrap();
        assert_eq!(reopened.get(&alice).await.unwrap(), Some(record));
        assert_eq!(reopened.list_ids().await.unwrap(), vec![alice.clone()]);
    }

    #[tokio::test]
    async fn test_missing_and_deleted_records() {
        let dir = tempdir().unwrap();
        let store = FilePersonStore::open(dir.path()).await.unwrap();
        let ghost = PersonId::new("ghost").unwrap();

        assert!(store.get(&ghost).await.unwrap().is_none());
        assert!(!store.delete(&ghost).await.unwrap());

        store
            .save(&PersonRecord::new(ghost.clone(), "Ghost"))
            .await
            .unwrap();
        assert!(store.delete(&ghost).await.unwrap());
        assert!(store.get(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ignores_foreign_files() {
        let dir = tempdir().unwrap();
        let store = FilePersonStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("bad name.json"), "{}").unwrap();

        store
            .save(&PersonRecord::new(PersonId::new("carol").unwrap(), "Carol"))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(
            store.list_ids().await.unwrap(),
            vec![PersonId::new("carol").unwrap()]
        );
    }

    #[tokio::test]
    async fn test_detects_mismatched_record() {
        let dir = tempdir().unwrap();
        let store = FilePersonStore::open(dir.path()).await.unwrap();

        let bob = PersonRecord::new(PersonId::new("bob").unwrap(), "Bob");
        std::fs::write(
            dir.path().join("alice.json"),
            serde_json::to_vec(&bob).unwrap(),
        )
        .unwrap();

        let result = store.get(&PersonId::new("alice").unwrap()).await;
        assert!(matches!(result, Err(StorageError::Corrupted(_))));
    }
}
