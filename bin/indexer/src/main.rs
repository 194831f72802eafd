//! Omega indexer: follows the token factories, the liquidity locker and the
//! multisender, and folds their events into the entity store.
//!
//! Flow:
//! 1. Load settings, open the entity store and connect to the RPC endpoint
//! 2. Resume from the stored cursor (or `START_BLOCK`)
//! 3. Poll confirmed blocks in batches, decode watched logs in chain order
//! 4. Hand each event to the indexer, which dedups against the cursor

use std::collections::HashMap;
use std::time::Duration;

use alloy::{providers::Provider, rpc::types::Filter};
use eyre::Result;
use omega_chain::provider::{block_timestamp, ensure_chain_id};
use omega_chain::{ChainProvider, ContractRegistry, create_provider, decode_log};
use omega_core::{Settings, StoreBackend, telemetry};
use omega_indexer::{Indexer, Outcome};
use omega_storage::{self as storage, EntityStore, MemoryStore, PgStore};
use tokio::sync::watch;

/// Pause after a failed batch before retrying it.
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // ── Initialisation ──────────────────────────────────────────────────
    telemetry::init();
    let settings = Settings::from_env()?;

    tracing::info!(rpc = %settings.rpc_url, store = ?settings.store, "Starting Omega indexer");

    let provider = create_provider(&settings.rpc_url)?;
    ensure_chain_id(&provider, settings.chain_id).await?;
    tracing::info!(chain_id = settings.chain_id, "Connected to RPC");

    let registry = ContractRegistry::from_addresses(&settings.contracts)?;
    tracing::info!(
        contracts = registry.addresses().len(),
        topics = registry.event_signatures().len(),
        "Watching contracts"
    );

    match settings.store {
        StoreBackend::Postgres => {
            let pool = storage::connect(&settings.database_url).await?;
            tracing::info!("Connected to database");
            storage::migrate(&pool).await?;
            run(Indexer::new(PgStore::new(pool)), &provider, &registry, &settings).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; nothing survives a restart");
            run(Indexer::new(MemoryStore::new()), &provider, &registry, &settings).await
        }
    }
}

/// Main indexing loop. Returns once Ctrl-C has been seen and the event in
/// flight, if any, has been committed.
async fn run<S: EntityStore>(
    indexer: Indexer<S>,
    provider: &ChainProvider,
    registry: &ContractRegistry,
    settings: &Settings,
) -> Result<()> {
    // The cursor block may be only partly applied; the cursor skips the rest.
    let mut next_block = match indexer.cursor().await? {
        Some(cursor) => cursor.block_number,
        None => settings.start_block,
    };
    tracing::info!(from_block = next_block, "Starting indexing loop");

    let mut shutdown = shutdown_signal();
    let poll_interval = Duration::from_secs(settings.poll_interval_secs);

    while !*shutdown.borrow() {
        let batch =
            index_next_batch(&indexer, provider, registry, settings, &shutdown, &mut next_block);
        let pause = match batch.await {
            Ok(BatchStatus::Progress) => continue,
            Ok(BatchStatus::Interrupted) => break,
            Ok(BatchStatus::CaughtUp) => poll_interval,
            Err(e) => {
                tracing::error!(error = %e, "Indexing error, retrying in 5s…");
                RETRY_DELAY
            }
        };

        // Only idle waits race the signal; event processing never does.
        tokio::select! {
            _ = shutdown.changed() => {}
            _ = tokio::time::sleep(pause) => {}
        }
    }

    tracing::info!(next_block, "Indexer stopped.");
    Ok(())
}

/// Flips to `true` on Ctrl-C.
fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            // keep the sender so idle waits still time out normally
            tx.closed().await;
            return;
        }
        let _ = tx.send(true);
    });
    rx
}

enum BatchStatus {
    Progress,
    CaughtUp,
    /// Shutdown requested between two events; the batch is resumed on restart.
    Interrupted,
}

#[derive(Debug, Default)]
struct BatchSummary {
    logs: usize,
    applied: usize,
    duplicates: usize,
    skipped: usize,
    rejected: usize,
}

/// Index the next batch of confirmed blocks.
///
/// `next_block` only advances once the whole batch is applied, so a failed
/// batch is retried from its first block. Events already committed are then
/// rejected by the cursor.
async fn index_next_batch<S: EntityStore>(
    indexer: &Indexer<S>,
    provider: &ChainProvider,
    registry: &ContractRegistry,
    settings: &Settings,
    shutdown: &watch::Receiver<bool>,
    next_block: &mut u64,
) -> Result<BatchStatus> {
    let head = provider.get_block_number().await?;
    let safe_head = head.saturating_sub(settings.confirmations);
    if *next_block > safe_head {
        return Ok(BatchStatus::CaughtUp);
    }

    let from = *next_block;
    let to = std::cmp::min(from + settings.batch_size - 1, safe_head);

    let filter = Filter::new()
        .address(registry.addresses())
        .event_signature(registry.event_signatures())
        .from_block(from)
        .to_block(to);

    let mut logs = provider.get_logs(&filter).await?;
    logs.retain(|log| !log.removed);
    logs.sort_by_key(|log| {
        (
            log.block_number.unwrap_or_default(),
            log.log_index.unwrap_or_default(),
        )
    });

    let mut summary = BatchSummary {
        logs: logs.len(),
        ..Default::default()
    };
    let mut timestamps: HashMap<u64, u64> = HashMap::new();

    for log in &logs {
        if *shutdown.borrow() {
            tracing::info!(from, to, applied = summary.applied, "Stopping mid-batch");
            return Ok(BatchStatus::Interrupted);
        }

        let fallback_ts = match (log.block_timestamp, log.block_number) {
            (None, Some(number)) => Some(match timestamps.get(&number) {
                Some(ts) => *ts,
                None => {
                    let ts = block_timestamp(provider, number).await?;
                    timestamps.insert(number, ts);
                    ts
                }
            }),
            _ => None,
        };

        let event = match decode_log(registry, log, fallback_ts) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    contract = %log.address(),
                    block = ?log.block_number,
                    log_index = ?log.log_index,
                    "Undecodable log, skipping"
                );
                summary.rejected += 1;
                continue;
            }
        };

        match indexer.process(&event).await {
            Ok(Outcome::Applied) => summary.applied += 1,
            Ok(Outcome::Duplicate) => summary.duplicates += 1,
            Ok(Outcome::Skipped(reason)) => {
                tracing::debug!(?reason, position = %event.position(), "Event skipped");
                summary.skipped += 1;
            }
            Err(e) if e.is_permanent() => {
                tracing::error!(
                    error = %e,
                    kind = %event.kind(),
                    position = %event.position(),
                    tx = %event.meta.tx_hash,
                    "Rejected malformed event"
                );
                summary.rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        from,
        to,
        head,
        logs = summary.logs,
        applied = summary.applied,
        duplicates = summary.duplicates,
        skipped = summary.skipped,
        rejected = summary.rejected,
        "Indexed batch"
    );

    *next_block = to + 1;
    Ok(BatchStatus::Progress)
}
