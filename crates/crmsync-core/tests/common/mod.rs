//! Test doubles and common utilities for contract tests
//!
//! Doubles clone by sharing their inner state, so a test can keep a handle
//! for assertions after moving a clone into the component under test.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crmsync_core::config::SyncConfig;
use crmsync_core::contact::LocalContact;
use crmsync_core::error::{Error, Result};
use crmsync_core::store::MemoryContactStore;
use crmsync_core::traits::{
    CalloutBatch, ContactStore, ExternalIdSource, HttpRequest, HttpResponse, HttpTransport,
    JobHandle, JobQueue,
};

/// Base URL used by every contract test
pub const TEST_BASE_URL: &str = "https://profiles.test/api/users";

pub fn test_config() -> SyncConfig {
    SyncConfig::new(TEST_BASE_URL)
}

/// One scripted transport reply
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Status(u16, String),
    TransportFailure,
}

#[derive(Default)]
struct TransportState {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<HttpRequest>>,
    send_count: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

/// A transport double that replays scripted replies in FIFO order and
/// records every request it sees
///
/// With a gate attached, each send first waits for one permit, letting a
/// test hold the worker mid-callout.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<TransportState>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose sends block until `gate` has permits
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            inner: Arc::new(TransportState {
                gate: Some(gate),
                ..TransportState::default()
            }),
        }
    }

    pub fn enqueue_status(&self, status: u16, body: &str) {
        self.inner
            .replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Status(status, body.to_string()));
    }

    pub fn enqueue_transport_failure(&self) {
        self.inner
            .replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::TransportFailure);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.inner.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        if let Some(gate) = &self.inner.gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }

        self.inner.send_count.fetch_add(1, Ordering::SeqCst);
        self.inner.requests.lock().unwrap().push(request);

        let reply = self.inner.replies.lock().unwrap().pop_front();
        match reply {
            Some(ScriptedReply::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(ScriptedReply::TransportFailure) => {
                Err(Error::transport("scripted transport failure"))
            }
            None => Ok(HttpResponse::new(500, "unscripted request")),
        }
    }

    fn transport_name(&self) -> &'static str {
        "scripted"
    }
}

/// Store double delegating to [`MemoryContactStore`] while counting calls
#[derive(Clone, Default)]
pub struct CountingStore {
    store: MemoryContactStore,
    upsert_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_call_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.store.len().await
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Option<LocalContact> {
        self.store.find_by_external_id(external_id).await
    }

    /// Seed a record directly, bypassing the counters
    pub async fn seed(&self, contact: LocalContact, external_id: &str) -> LocalContact {
        self.store
            .upsert_by_external_id(contact, external_id)
            .await
            .expect("seeding the memory store cannot fail")
    }
}

#[async_trait]
impl ContactStore for CountingStore {
    async fn upsert_by_external_id(
        &self,
        contact: LocalContact,
        external_id: &str,
    ) -> Result<LocalContact> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.store.upsert_by_external_id(contact, external_id).await
    }

    async fn update(&self, contact: &LocalContact) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.store.update(contact).await
    }

    async fn get(&self, contact_id: &str) -> Result<Option<LocalContact>> {
        self.store.get(contact_id).await
    }

    async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }
}

/// Queue double that records submitted batches instead of running them
#[derive(Clone, Default)]
pub struct CollectingQueue {
    batches: Arc<Mutex<Vec<CalloutBatch>>>,
    next_id: Arc<AtomicUsize>,
}

impl CollectingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<CalloutBatch> {
        self.batches.lock().unwrap().clone()
    }
}

impl JobQueue for CollectingQueue {
    fn submit(&self, batch: CalloutBatch) -> Result<JobHandle> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64;
        self.batches.lock().unwrap().push(batch);
        Ok(JobHandle::new(id))
    }
}

/// ID source that replays scripted keys in order
pub struct FixedIdSource {
    keys: Mutex<VecDeque<String>>,
}

impl FixedIdSource {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Mutex::new(keys.into_iter().map(Into::into).collect()),
        }
    }
}

impl ExternalIdSource for FixedIdSource {
    fn next_id(&self) -> String {
        self.keys
            .lock()
            .unwrap()
            .pop_front()
            .expect("FixedIdSource ran out of scripted keys")
    }
}
