// # crmsync-core
//
// Core library for the CRM contact / remote profile sync system.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping local CRM
// contacts and remote user profiles in sync:
// - **HttpTransport**: Trait for performing one outbound HTTP exchange
// - **ContactStore**: Trait for contact persistence (upsert/update/query)
// - **ExternalIdSource**: Trait for minting correlation keys
// - **JobQueue**: Trait for deferred, fire-and-forget job submission
// - **ChangeDispatcher**: Classifies changed records and batches callout work
// - **CalloutClient**: Performs fetch/push callouts and writes results back
// - **CalloutJobRunner**: Executes submitted batches outside the mutation context
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Classification never touches the network;
//    callouts never touch classification
// 2. **Value-Passing Handoff**: Batches move across the dispatcher/runner
//    boundary by ownership, never by shared mutable reference
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Recoverable Callouts**: A failed record is logged and skipped, never
//    fatal to its batch

pub mod client;
pub mod config;
pub mod contact;
pub mod dispatcher;
pub mod error;
pub mod mapper;
pub mod runner;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use client::{CalloutClient, CalloutOutcome};
pub use config::{ApiConfig, EngineConfig, SyncConfig};
pub use contact::LocalContact;
pub use dispatcher::{CalloutIntent, ChangeDispatcher, ChangeKind, DispatchSummary};
pub use error::{Error, Result};
pub use runner::CalloutJobRunner;
pub use store::{FileContactStore, MemoryContactStore};
pub use traits::{
    CalloutBatch, ContactStore, ExternalIdSource, HttpRequest, HttpResponse, HttpTransport,
    IntentKind, JobHandle, JobQueue, RandomIdSource,
};
