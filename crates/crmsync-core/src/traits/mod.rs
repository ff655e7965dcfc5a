//! Core traits for the sync system
//!
//! This module defines the abstract interfaces for the external
//! collaborators:
//!
//! - [`HttpTransport`]: Perform one outbound HTTP exchange
//! - [`ContactStore`]: Persist and look up local contacts
//! - [`JobQueue`]: Submit callout batches for deferred execution
//! - [`ExternalIdSource`]: Mint correlation keys for inserted records

pub mod contact_store;
pub mod id_source;
pub mod job_queue;
pub mod transport;

pub use contact_store::ContactStore;
pub use id_source::{ExternalIdSource, RandomIdSource};
pub use job_queue::{CalloutBatch, IntentKind, JobHandle, JobQueue};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method};
