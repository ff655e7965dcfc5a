// # File Contact Store
//
// File-based implementation of ContactStore.
//
// ## Purpose
//
// Persists contacts across daemon runs so a push cycle can address records
// written by an earlier fetch cycle.
//
// ## Durability
//
// - Atomic writes: new state goes to a temporary file, then a rename
// - Corruption detection: JSON is validated on load; a corrupt file is
//   logged and the store starts empty
// - Buffered: mutations mark the store dirty; `flush()` persists
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "contacts": {
//     "contact-1": { "id": "contact-1", "external_id": "42", ... }
//   }
// }
// ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::contact::LocalContact;
use crate::error::Error;
use crate::traits::contact_store::ContactStore;

/// Store file format version
/// Used for future migration if the format changes
const STORE_FILE_VERSION: &str = "1.0";

/// File-based contact store with atomic writes
#[derive(Debug)]
pub struct FileContactStore {
    path: PathBuf,
    state: Arc<RwLock<FileState>>,
    next_record_id: Arc<AtomicU64>,
}

#[derive(Debug)]
struct FileState {
    contacts: HashMap<String, LocalContact>,
    dirty: bool,
}

/// Serializable store file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoreFileFormat {
    version: String,
    contacts: HashMap<String, LocalContact>,
}

impl FileContactStore {
    /// Create or load a file contact store
    ///
    /// Creates parent directories as needed. A missing file starts the
    /// store empty; a corrupt file is logged and also starts the store
    /// empty.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::store(format!(
                        "failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let contacts = Self::load_with_recovery(&path).await?;

        // Resume the record-ID counter past any IDs already on disk
        let highest = contacts
            .keys()
            .filter_map(|id| id.strip_prefix("contact-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(FileState {
                contacts,
                dirty: false,
            })),
            next_record_id: Arc::new(AtomicU64::new(highest)),
        })
    }

    async fn load_with_recovery(path: &Path) -> Result<HashMap<String, LocalContact>, Error> {
        if !path.exists() {
            tracing::debug!("no store file at {}, starting empty", path.display());
            return Ok(HashMap::new());
        }

        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| Error::store(format!("failed to read {}: {}", path.display(), e)))?;

        match serde_json::from_str::<StoreFileFormat>(&raw) {
            Ok(format) => {
                tracing::debug!(
                    "loaded {} contacts from {}",
                    format.contacts.len(),
                    path.display()
                );
                Ok(format.contacts)
            }
            Err(e) => {
                tracing::warn!(
                    "store file {} is corrupt ({}), starting empty",
                    path.display(),
                    e
                );
                Ok(HashMap::new())
            }
        }
    }

    /// Write the current state atomically (write to a temp file, rename)
    async fn persist(&self, contacts: &HashMap<String, LocalContact>) -> Result<(), Error> {
        let format = StoreFileFormat {
            version: STORE_FILE_VERSION.to_string(),
            contacts: contacts.clone(),
        };
        let serialized = serde_json::to_string_pretty(&format)?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized.as_bytes())
            .await
            .map_err(|e| Error::store(format!("failed to write {}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "failed to move {} into place: {}",
                tmp_path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn mint_record_id(&self) -> String {
        let n = self.next_record_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("contact-{}", n)
    }
}

#[async_trait]
impl ContactStore for FileContactStore {
    async fn upsert_by_external_id(
        &self,
        contact: LocalContact,
        external_id: &str,
    ) -> Result<LocalContact, Error> {
        let mut guard = self.state.write().await;

        let existing_id = guard
            .contacts
            .values()
            .find(|stored| stored.external_id.as_deref() == Some(external_id))
            .and_then(|stored| stored.id.clone());

        let record_id = match existing_id {
            Some(id) => id,
            None => self.mint_record_id(),
        };

        let mut stored = contact;
        stored.id = Some(record_id.clone());
        stored.external_id = Some(external_id.to_string());
        guard.contacts.insert(record_id, stored.clone());
        guard.dirty = true;
        Ok(stored)
    }

    async fn update(&self, contact: &LocalContact) -> Result<(), Error> {
        let Some(record_id) = contact.id.as_deref() else {
            return Err(Error::store("cannot update a contact without an ID"));
        };

        let mut guard = self.state.write().await;
        match guard.contacts.get_mut(record_id) {
            Some(slot) => {
                *slot = contact.clone();
                guard.dirty = true;
                Ok(())
            }
            None => Err(Error::not_found(format!("contact {}", record_id))),
        }
    }

    async fn get(&self, contact_id: &str) -> Result<Option<LocalContact>, Error> {
        let guard = self.state.read().await;
        Ok(guard.contacts.get(contact_id).cloned())
    }

    async fn flush(&self) -> Result<(), Error> {
        let mut guard = self.state.write().await;
        if !guard.dirty {
            return Ok(());
        }
        self.persist(&guard.contacts).await?;
        guard.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn contacts_survive_a_flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        let store = FileContactStore::new(&path).await.unwrap();
        let contact = LocalContact {
            email: Some("a@x.com".to_string()),
            ..LocalContact::default()
        };
        let stored = store.upsert_by_external_id(contact, "42").await.unwrap();
        store.flush().await.unwrap();

        let reopened = FileContactStore::new(&path).await.unwrap();
        let fetched = reopened
            .get(stored.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.email.as_deref(), Some("a@x.com"));
        assert_eq!(fetched.external_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn record_id_counter_resumes_past_persisted_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        {
            let store = FileContactStore::new(&path).await.unwrap();
            store
                .upsert_by_external_id(LocalContact::new(), "1")
                .await
                .unwrap();
            store
                .upsert_by_external_id(LocalContact::new(), "2")
                .await
                .unwrap();
            store.flush().await.unwrap();
        }

        let reopened = FileContactStore::new(&path).await.unwrap();
        let fresh = reopened
            .upsert_by_external_id(LocalContact::new(), "3")
            .await
            .unwrap();
        assert_eq!(fresh.id.as_deref(), Some("contact-3"));
    }

    #[tokio::test]
    async fn corrupt_file_recovers_to_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = FileContactStore::new(&path).await.unwrap();
        assert!(store.get("contact-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn flush_without_changes_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        let store = FileContactStore::new(&path).await.unwrap();
        store.flush().await.unwrap();
        assert!(!path.exists(), "clean store should not write a file");
    }
}
