//! Callout client
//!
//! The client performs the two outbound operations against the remote
//! profile API:
//! - **fetch**: GET a remote profile by external ID and upsert it locally
//! - **push**: POST a local contact to the remote system and stamp the
//!   sync time
//!
//! Each operation is terminal after one request/response cycle. There is no
//! internal retry: a failed record is downgraded to a logged
//! [`CalloutOutcome::Failed`] at this boundary and never aborts its batch.
//! Re-drive happens only through a future mutation or an external
//! mechanism.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::mapper;
use crate::traits::{CalloutBatch, ContactStore, HttpRequest, HttpTransport, IntentKind};

/// The only status the fetch endpoint treats as success
///
/// Push accepts the whole 2xx range; fetch requires 200 exactly. The
/// asymmetry mirrors the remote API contract.
const FETCH_SUCCESS_STATUS: u16 = 200;

/// Value-level result of one callout operation
///
/// Errors never cross this boundary; callers observe outcomes.
#[derive(Debug)]
pub enum CalloutOutcome {
    /// Remote and local state converged for this record
    Synced,
    /// Nothing to do for this record
    Skipped {
        /// Why the record was skipped
        reason: String,
    },
    /// Recoverable failure, already logged; the batch moves on
    Failed {
        /// The downgraded error
        error: Error,
    },
}

impl CalloutOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, CalloutOutcome::Synced)
    }
}

/// Client for the remote profile API
///
/// Owns the transport and the store handle; both operations write their
/// results back through the store. The client is cheap to share behind an
/// `Arc` and safe to call from any task, though the job runner only ever
/// drives it sequentially.
pub struct CalloutClient {
    transport: Box<dyn HttpTransport>,
    store: Arc<dyn ContactStore>,
    base_url: String,
}

impl CalloutClient {
    /// Create a new callout client
    ///
    /// # Parameters
    ///
    /// - `transport`: HTTP transport implementation
    /// - `store`: Contact store the results are written back to
    /// - `config`: Sync configuration carrying the remote base URL
    pub fn new(
        transport: Box<dyn HttpTransport>,
        store: Arc<dyn ContactStore>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            transport,
            store,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the remote profile for `external_id` and upsert it locally
    ///
    /// On HTTP 200 the body is parsed with the payload mapper, the resulting
    /// contact is correlated to `external_id`, and the store upserts it by
    /// that key. Any other status, a transport failure, or a malformed body
    /// leaves the store untouched.
    pub async fn fetch(&self, external_id: &str) -> CalloutOutcome {
        match self.try_fetch(external_id).await {
            Ok(contact_id) => {
                debug!(
                    "fetched profile {} into contact {}",
                    external_id, contact_id
                );
                CalloutOutcome::Synced
            }
            Err(error) => {
                warn!("fetch of profile {} failed: {}", external_id, error);
                CalloutOutcome::Failed { error }
            }
        }
    }

    async fn try_fetch(&self, external_id: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, external_id);
        let response = self.transport.send(HttpRequest::get(url)).await?;

        if response.status != FETCH_SUCCESS_STATUS {
            return Err(Error::rejected(response.status, response.body));
        }

        let document: Value = serde_json::from_str(&response.body)
            .map_err(|e| Error::malformed(format!("response body is not valid JSON: {}", e)))?;
        let mut contact = mapper::contact_from_remote_json(&document)?;
        contact.external_id = Some(external_id.to_string());

        let stored = self
            .store
            .upsert_by_external_id(contact, external_id)
            .await?;
        Ok(stored.id.unwrap_or_default())
    }

    /// Push the contact with ID `contact_id` to the remote system
    ///
    /// A storage miss is a no-op. On a 2xx response the contact's
    /// `last_synced_at` is stamped with the current time and persisted; on
    /// any failure the record is left unchanged.
    pub async fn push(&self, contact_id: &str) -> CalloutOutcome {
        match self.try_push(contact_id).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("push of contact {} failed: {}", contact_id, error);
                CalloutOutcome::Failed { error }
            }
        }
    }

    async fn try_push(&self, contact_id: &str) -> Result<CalloutOutcome> {
        let Some(mut contact) = self.store.get(contact_id).await? else {
            let error = Error::not_found(format!("contact {}", contact_id));
            info!("skipping push: {}", error);
            return Ok(CalloutOutcome::Skipped {
                reason: error.to_string(),
            });
        };

        let payload = mapper::contact_to_remote_payload(&contact);
        let url = format!("{}/add", self.base_url);
        let response = self
            .transport
            .send(HttpRequest::post_json(url, &payload))
            .await?;

        if !response.is_success() {
            return Err(Error::rejected(response.status, response.body));
        }

        contact.last_synced_at = Some(Utc::now());
        self.store.update(&contact).await?;
        debug!("pushed contact {} to the remote system", contact_id);
        Ok(CalloutOutcome::Synced)
    }

    /// Run one submitted batch, strictly sequentially
    ///
    /// One record's failure never skips subsequent records.
    pub async fn run_batch(&self, batch: &CalloutBatch) {
        debug!(
            "running {} batch of {} records",
            batch.kind().as_str(),
            batch.len()
        );

        let mut synced = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for reference in batch.refs() {
            let outcome = match batch.kind() {
                IntentKind::Fetch => self.fetch(reference).await,
                IntentKind::Push => self.push(reference).await,
            };
            match outcome {
                CalloutOutcome::Synced => synced += 1,
                CalloutOutcome::Skipped { .. } => skipped += 1,
                CalloutOutcome::Failed { .. } => failed += 1,
            }
        }

        info!(
            "{} batch finished: {} synced, {} skipped, {} failed",
            batch.kind().as_str(),
            synced,
            skipped,
            failed
        );
    }
}
