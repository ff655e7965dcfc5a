// # crmsyncd - Sync Driver
//
// This is a THIN integration layer: it reads configuration from
// environment variables, wires the collaborators, runs one dispatch cycle,
// drains the deferred queue, and exits. All sync logic lives in
// crmsync-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Remote API
// - `CRMSYNC_API_BASE_URL`: Base URL of the remote profile API (required)
//
// ### Store
// - `CRMSYNC_STORE_TYPE`: Contact store type (memory, file)
// - `CRMSYNC_STORE_PATH`: Path to the store file (for the file store)
//
// ### Change set
// - `CRMSYNC_FETCH_IDS`: Comma-separated external profile IDs, dispatched
//   as inserted records
// - `CRMSYNC_PUSH_IDS`: Comma-separated local contact IDs, dispatched as
//   updated records
//
// ### Logging
// - `CRMSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export CRMSYNC_API_BASE_URL=https://profiles.example.com/api/users
// export CRMSYNC_STORE_TYPE=file
// export CRMSYNC_STORE_PATH=/var/lib/crmsync/contacts.json
// export CRMSYNC_FETCH_IDS=3,42,77
//
// crmsyncd
// ```

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use crmsync_core::{
    CalloutClient, CalloutJobRunner, ChangeDispatcher, ChangeKind, ContactStore, FileContactStore,
    LocalContact, MemoryContactStore, RandomIdSource, SyncConfig,
};
use crmsync_transport_reqwest::ReqwestTransport;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean run
/// - 1: Configuration error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    CleanRun = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    api_base_url: String,
    store_type: String,
    store_path: Option<String>,
    fetch_ids: Vec<String>,
    push_ids: Vec<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_base_url: env::var("CRMSYNC_API_BASE_URL")
                .context("CRMSYNC_API_BASE_URL is required")?,
            store_type: env::var("CRMSYNC_STORE_TYPE").unwrap_or_else(|_| "memory".to_string()),
            store_path: env::var("CRMSYNC_STORE_PATH").ok(),
            fetch_ids: split_ids(&env::var("CRMSYNC_FETCH_IDS").unwrap_or_default()),
            push_ids: split_ids(&env::var("CRMSYNC_PUSH_IDS").unwrap_or_default()),
            log_level: env::var("CRMSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialized");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {:#}", e);
            return SyncExitCode::ConfigError.into();
        }
    };
    init_logging(&config.log_level);

    match run(config).await {
        Ok(()) => SyncExitCode::CleanRun.into(),
        Err(e) => {
            error!("sync run failed: {:#}", e);
            SyncExitCode::RuntimeError.into()
        }
    }
}

async fn run(config: Config) -> Result<()> {
    let sync_config = SyncConfig::new(&config.api_base_url);
    sync_config.validate()?;

    let store: Arc<dyn ContactStore> = match config.store_type.as_str() {
        "memory" => Arc::new(MemoryContactStore::new()),
        "file" => {
            let path = config
                .store_path
                .as_deref()
                .context("CRMSYNC_STORE_PATH is required for the file store")?;
            Arc::new(FileContactStore::new(path).await?)
        }
        other => bail!("unsupported store type: {}", other),
    };

    let transport = ReqwestTransport::with_timeout(Duration::from_secs(
        sync_config.engine.request_timeout_secs,
    ));
    let client = Arc::new(CalloutClient::new(
        Box::new(transport),
        store.clone(),
        &sync_config,
    ));
    let runner = Arc::new(CalloutJobRunner::spawn(client));
    let dispatcher = ChangeDispatcher::new(Arc::new(RandomIdSource::new()), runner.clone());

    info!(
        "starting sync run against {} ({} store)",
        config.api_base_url, config.store_type
    );

    if !config.fetch_ids.is_empty() {
        let mut inserted: Vec<LocalContact> = config
            .fetch_ids
            .iter()
            .map(LocalContact::with_external_id)
            .collect();
        let summary = dispatcher.dispatch(ChangeKind::Insert, &mut inserted)?;
        info!(
            "insert cycle queued {} fetch / {} push callouts",
            summary.fetch_queued, summary.push_queued
        );
    }

    if !config.push_ids.is_empty() {
        let mut updated = Vec::new();
        for contact_id in &config.push_ids {
            match store.get(contact_id).await? {
                Some(contact) => updated.push(contact),
                None => warn!("contact {} not found in store, skipping", contact_id),
            }
        }
        let summary = dispatcher.dispatch(ChangeKind::Update, &mut updated)?;
        info!(
            "update cycle queued {} fetch / {} push callouts",
            summary.fetch_queued, summary.push_queued
        );
    }

    runner.shutdown().await?;
    store.flush().await?;
    info!("sync run complete");
    Ok(())
}
