// # Job Queue Trait
//
// Defines the interface for deferred job submission.
//
// ## Purpose
//
// The mutation-interception context in which the dispatcher runs forbids
// outbound network calls, so network-capable work crosses this seam as an
// immutable batch and executes later on a worker context. Submission is
// fire-and-forget: the handle is returned for logging, never joined by the
// dispatcher.
//
// ## Implementations
//
// - Tokio worker: [`crate::runner::CalloutJobRunner`]
// - Collecting doubles: contract tests in this crate

use crate::error::Result;

/// The callout family a batch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    /// Pull a remote profile into the local store
    Fetch,
    /// Send a local contact to the remote system
    Push,
}

impl IntentKind {
    /// Intent name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Fetch => "fetch",
            IntentKind::Push => "push",
        }
    }
}

/// An ordered group of record references sharing one callout intent
///
/// For `Fetch` batches the references are external profile IDs; for `Push`
/// batches they are local contact IDs. A batch is constructed per mutation
/// event, consumed once by the job runner, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutBatch {
    kind: IntentKind,
    refs: Vec<String>,
}

impl CalloutBatch {
    /// Create an empty batch of the given intent kind
    pub fn new(kind: IntentKind) -> Self {
        Self {
            kind,
            refs: Vec::new(),
        }
    }

    /// Append a record reference, preserving encounter order
    pub fn push(&mut self, reference: impl Into<String>) {
        self.refs.push(reference.into());
    }

    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    pub fn refs(&self) -> &[String] {
        &self.refs
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Opaque handle to a submitted job
///
/// Nothing in the core consumes the handle; it exists for logging and for
/// callers that want to correlate submissions with runner output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobHandle {
    id: u64,
}

impl JobHandle {
    /// Create a handle with the given job ID
    ///
    /// Public so queue implementations (including test doubles) can mint
    /// handles.
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Trait for deferred job submission
///
/// `submit` is synchronous and must not block or suspend: the dispatcher
/// calls it from inside the mutation-interception context. The batch moves
/// by ownership; no shared mutable state crosses this boundary.
pub trait JobQueue: Send + Sync {
    /// Submit a batch for deferred execution
    ///
    /// # Returns
    ///
    /// - `Ok(JobHandle)`: The batch was accepted
    /// - `Err(Error::Queue)`: The executing side is no longer running
    fn submit(&self, batch: CalloutBatch) -> Result<JobHandle>;
}
