// # Contact Store Trait
//
// Defines the interface for contact persistence.
//
// ## Purpose
//
// The store owns record identity and durability. The callout client writes
// fetched profiles back through `upsert_by_external_id` and persists push
// timestamps through `update`; the dispatcher never touches the store.
//
// ## Implementations
//
// - In-memory: [`crate::store::MemoryContactStore`]
// - JSON file: [`crate::store::FileContactStore`]

use async_trait::async_trait;

use crate::contact::LocalContact;
use crate::error::Result;

/// Trait for contact store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert or update a contact keyed by its correlation key
    ///
    /// If a stored contact already carries `external_id`, it is replaced in
    /// place and keeps its record ID; otherwise a new record is created and
    /// assigned a fresh ID.
    ///
    /// # Parameters
    ///
    /// - `contact`: The field values to store
    /// - `external_id`: The correlation key to match on
    ///
    /// # Returns
    ///
    /// - `Ok(LocalContact)`: The stored record, identity filled in
    /// - `Err(Error)`: Storage error
    async fn upsert_by_external_id(
        &self,
        contact: LocalContact,
        external_id: &str,
    ) -> Result<LocalContact>;

    /// Update a contact by primary identity
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully updated
    /// - `Err(Error::NotFound)`: No record with the contact's ID exists
    /// - `Err(Error)`: Storage error
    async fn update(&self, contact: &LocalContact) -> Result<()>;

    /// Fetch a contact by primary identity
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LocalContact))`: The stored record
    /// - `Ok(None)`: No record found
    /// - `Err(Error)`: Storage error
    async fn get(&self, contact_id: &str) -> Result<Option<LocalContact>>;

    /// Persist any pending changes
    ///
    /// Some implementations buffer writes. This ensures all changes are
    /// flushed to durable storage.
    async fn flush(&self) -> Result<()>;
}
