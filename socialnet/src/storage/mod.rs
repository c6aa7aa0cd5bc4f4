//! Storage abstractions and implementations
//!
//! Person records live behind the [`PersonStore`] trait. Two backends ship:
//!
//! - **Memory**: a `HashMap`, for tests and servers that persist elsewhere
//! - **File**: one JSON document per player under a data directory

pub mod errors;
pub mod file;
pub mod memory;
pub mod traits;

pub use errors::{StorageError, StorageResult};
pub use file::FilePersonStore;
pub use memory::MemoryPersonStore;
pub use traits::PersonStore;

use crate::config::{StorageBackend, StorageConfig};
use std::sync::Arc;

/// Create the person store selected by configuration, refusing one that
/// fails its health check
pub async fn create_person_store(
    config: &StorageConfig,
) -> Result<Arc<dyn PersonStore>, StorageError> {
    let store: Arc<dyn PersonStore> = match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Creating in-memory person store");
            Arc::new(MemoryPersonStore::new())
        }
        StorageBackend::File => {
            let dir = config.people_dir();
            tracing::info!("Creating file person store at {}", dir.display());
            Arc::new(FilePersonStore::open(dir).await?)
        }
    };

    if !store.health_check().await? {
        return Err(StorageError::Configuration(format!(
            "{:?} person store failed its health check",
            config.backend
        )));
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_creates_configured_backend() {
        let memory = ConfigBuilder::testing().build().unwrap();
        let store = create_person_store(&memory.storage).await.unwrap();
        assert!(store.health_check().await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);

        let dir = tempdir().unwrap();
        let file = ConfigBuilder::testing()
            .with_file_storage()
            .with_data_dir(dir.path())
            .build()
            .unwrap();
        let store = create_person_store(&file.storage).await.unwrap();
        assert!(store.health_check().await.unwrap());
        assert!(dir.path().join("people").is_dir());
    }

    #[tokio::test]
    async fn test_unusable_data_dir_is_refused() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let config = ConfigBuilder::testing()
            .with_file_storage()
            .with_data_dir(&blocker)
            .build()
            .unwrap();
        assert!(create_person_store(&config.storage).await.is_err());
    }
}
