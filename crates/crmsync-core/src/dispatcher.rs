//! Change dispatcher
//!
//! The dispatcher runs synchronously inside the record-mutation
//! interception context, before the mutation commits. That context forbids
//! outbound network calls, so the dispatcher only classifies and enqueues:
//! every changed record maps to zero-or-one [`CalloutIntent`], same-intent
//! records accumulate into one batch, and each non-empty batch is submitted
//! as one deferred job.
//!
//! ## Classification rules
//!
//! - Insert: a record without a correlation key is assigned one from the ID
//!   source; a key `<= 100` classifies `Fetch`.
//! - Update: a key `> 100` classifies `Push`.
//! - Everything else is `None` and excluded from both batches.
//!
//! The boundary is asymmetric: an inserted record never classifies `Push`,
//! and a key of 80 on the update path classifies `None`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::contact::LocalContact;
use crate::error::Result;
use crate::traits::{CalloutBatch, ExternalIdSource, IntentKind, JobQueue};

/// Highest correlation key treated as fetch-eligible
///
/// Keys at or below this value mark records whose profile still lives
/// remotely; keys above it mark records the remote system has yet to
/// receive.
const FETCH_ID_MAX: i64 = 100;

/// The kind of record mutation being intercepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
}

/// Per-record classification result
///
/// Computed at classification time, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalloutIntent {
    /// Pull the remote profile with this external ID
    Fetch { external_id: String },
    /// Send the local contact with this record ID
    Push { contact_id: String },
    /// No callout for this record
    None,
}

/// Counts of work queued by one dispatch cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub fetch_queued: usize,
    pub push_queued: usize,
}

/// Classifies changed records and hands batches to the deferred queue
pub struct ChangeDispatcher {
    id_source: Arc<dyn ExternalIdSource>,
    queue: Arc<dyn JobQueue>,
}

impl ChangeDispatcher {
    /// Create a new dispatcher
    ///
    /// # Parameters
    ///
    /// - `id_source`: Correlation-key generator for the insert path
    /// - `queue`: Deferred job queue the batches are submitted to
    pub fn new(id_source: Arc<dyn ExternalIdSource>, queue: Arc<dyn JobQueue>) -> Self {
        Self { id_source, queue }
    }

    /// Classify a change set and submit the resulting batches
    ///
    /// Runs synchronously and never blocks. Records on the insert path may
    /// be assigned a correlation key in place; the caller commits those
    /// records afterwards.
    ///
    /// # Returns
    ///
    /// - `Ok(DispatchSummary)`: Per-intent counts of queued records
    /// - `Err(Error::Queue)`: The job runner is no longer accepting work
    pub fn dispatch(
        &self,
        kind: ChangeKind,
        records: &mut [LocalContact],
    ) -> Result<DispatchSummary> {
        let mut fetch_batch = CalloutBatch::new(IntentKind::Fetch);
        let mut push_batch = CalloutBatch::new(IntentKind::Push);

        for record in records.iter_mut() {
            match self.classify(kind, record) {
                CalloutIntent::Fetch { external_id } => fetch_batch.push(external_id),
                CalloutIntent::Push { contact_id } => push_batch.push(contact_id),
                CalloutIntent::None => {}
            }
        }

        let summary = DispatchSummary {
            fetch_queued: fetch_batch.len(),
            push_queued: push_batch.len(),
        };

        if !fetch_batch.is_empty() {
            let handle = self.queue.submit(fetch_batch)?;
            debug!(
                "submitted fetch job #{} ({} records)",
                handle.id(),
                summary.fetch_queued
            );
        }
        if !push_batch.is_empty() {
            let handle = self.queue.submit(push_batch)?;
            debug!(
                "submitted push job #{} ({} records)",
                handle.id(),
                summary.push_queued
            );
        }

        Ok(summary)
    }

    fn classify(&self, kind: ChangeKind, record: &mut LocalContact) -> CalloutIntent {
        match kind {
            ChangeKind::Insert => {
                let external_id = match &record.external_id {
                    Some(key) => key.clone(),
                    None => {
                        let assigned = self.id_source.next_id();
                        debug!("assigned correlation key {} to inserted contact", assigned);
                        record.external_id = Some(assigned.clone());
                        assigned
                    }
                };

                match external_id.trim().parse::<i64>() {
                    Ok(key) if key <= FETCH_ID_MAX => CalloutIntent::Fetch { external_id },
                    Ok(_) => CalloutIntent::None,
                    Err(_) => {
                        warn!(
                            "inserted contact has non-numeric correlation key {}",
                            external_id
                        );
                        CalloutIntent::None
                    }
                }
            }
            ChangeKind::Update => match (&record.id, record.external_id_value()) {
                (Some(contact_id), Some(key)) if key > FETCH_ID_MAX => CalloutIntent::Push {
                    contact_id: contact_id.clone(),
                },
                _ => CalloutIntent::None,
            },
        }
    }
}
