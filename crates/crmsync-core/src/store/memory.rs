// # Memory Contact Store
//
// In-memory implementation of ContactStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for testing, demos, or scenarios where the CRM of record lives
// elsewhere and the local copy is disposable.
//
// ## Crash Behavior
//
// - All contacts are lost on restart/crash
// - Re-fetching from the remote system rebuilds the local copy

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::contact::LocalContact;
use crate::error::Error;
use crate::traits::contact_store::ContactStore;

/// In-memory contact store implementation
///
/// Contacts live in a HashMap keyed by record ID, protected by a RwLock.
/// Record IDs are minted from a monotonic counter on first insert.
#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    inner: Arc<RwLock<HashMap<String, LocalContact>>>,
    next_record_id: Arc<AtomicU64>,
}

impl MemoryContactStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of contacts in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Remove all contacts
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// Fetch a contact by its correlation key
    pub async fn find_by_external_id(&self, external_id: &str) -> Option<LocalContact> {
        let guard = self.inner.read().await;
        guard
            .values()
            .find(|contact| contact.external_id.as_deref() == Some(external_id))
            .cloned()
    }

    fn mint_record_id(&self) -> String {
        let n = self.next_record_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("contact-{}", n)
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn upsert_by_external_id(
        &self,
        contact: LocalContact,
        external_id: &str,
    ) -> Result<LocalContact, Error> {
        let mut guard = self.inner.write().await;

        let existing_id = guard
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
        guard.insert(record_id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, contact: &LocalContact) -> Result<(), Error> {
        let Some(record_id) = contact.id.as_deref() else {
            return Err(Error::store("cannot update a contact without an ID"));
        };

        let mut guard = self.inner.write().await;
        match guard.get_mut(record_id) {
            Some(slot) => {
                *slot = contact.clone();
                Ok(())
            }
            None => Err(Error::not_found(format!("contact {}", record_id))),
        }
    }

    async fn get(&self, contact_id: &str) -> Result<Option<LocalContact>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(contact_id).cloned())
    }

    async fn flush(&self) -> Result<(), Error> {
        // No-op for the memory store (everything is already "persisted")
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_replaces_in_place() {
        let store = MemoryContactStore::new();
        assert!(store.is_empty().await);

        let first = LocalContact {
            email: Some("a@x.com".to_string()),
            ..LocalContact::default()
        };
        let stored = store.upsert_by_external_id(first, "42").await.unwrap();
        let record_id = stored.id.clone().unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(stored.external_id.as_deref(), Some("42"));

        // Same correlation key: record is replaced, identity survives
        let second = LocalContact {
            email: Some("b@x.com".to_string()),
            ..LocalContact::default()
        };
        let replaced = store.upsert_by_external_id(second, "42").await.unwrap();
        assert_eq!(replaced.id.as_deref(), Some(record_id.as_str()));
        assert_eq!(store.len().await, 1);

        let fetched = store.get(&record_id).await.unwrap().unwrap();
        assert_eq!(fetched.email.as_deref(), Some("b@x.com"));
    }

    #[tokio::test]
    async fn distinct_keys_create_distinct_records() {
        let store = MemoryContactStore::new();

        let a = store
            .upsert_by_external_id(LocalContact::new(), "1")
            .await
            .unwrap();
        let b = store
            .upsert_by_external_id(LocalContact::new(), "2")
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_requires_an_existing_record() {
        let store = MemoryContactStore::new();

        let missing = LocalContact {
            id: Some("contact-99".to_string()),
            ..LocalContact::default()
        };
        assert!(matches!(
            store.update(&missing).await,
            Err(Error::NotFound(_))
        ));

        let anonymous = LocalContact::new();
        assert!(matches!(
            store.update(&anonymous).await,
            Err(Error::Store(_))
        ));
    }

    #[tokio::test]
    async fn find_by_external_id_matches_the_correlation_key() {
        let store = MemoryContactStore::new();
        store
            .upsert_by_external_id(LocalContact::new(), "150")
            .await
            .unwrap();

        assert!(store.find_by_external_id("150").await.is_some());
        assert!(store.find_by_external_id("151").await.is_none());
    }
}
