//! Background task that polls the Soroban RPC and writes decoded
//! marketplace events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll starts: a ledger, plus a pagination cursor when the
/// previous page was not the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    ledger: u32,
    cursor: Option<String>,
}

/// Poll until `shutdown` is cancelled. Poll errors are logged and retried on
/// the next tick.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting, contract: {}", state.config.contract_id);

    let mut position = match resume_position(&state.pool, state.config.start_ledger).await {
        Ok(position) => position,
        Err(e) => {
            error!("Could not read indexer cursor, starting from config: {e}");
            Position {
                ledger: state.config.start_ledger,
                cursor: None,
            }
        }
    };
    info!("Resuming from ledger {}", position.ledger);

    let interval = Duration::from_secs(state.config.poll_interval_secs);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = poll_once(&state, &position) => match polled {
                Ok(next) => position = next,
                Err(e) => error!("Indexer poll error: {e}"),
            },
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Indexer stopped at ledger {}", position.ledger);
}

async fn resume_position(pool: &SqlitePool, start_ledger: u32) -> Result<Position> {
    let last_ledger = db::get_last_ledger(pool).await?;
    let cursor = db::get_cursor_string(pool).await?;
    let ledger = if last_ledger > 0 {
        u32::try_from(last_ledger).unwrap_or(start_ledger)
    } else {
        start_ledger
    };
    Ok(Position { ledger, cursor })
}

async fn poll_once(state: &IndexerState, position: &Position) -> Result<Position> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events, {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = advance(position.ledger, page.latest_ledger, page.cursor);

    // Persist before returning so a restart resumes from the same place.
    db::save_cursor(&state.pool, i64::from(next.ledger), next.cursor.as_deref()).await?;
    Ok(next)
}

/// The ledger never moves backwards, even if a lagging RPC node reports an
/// older `latestLedger`.
fn advance(start: u32, latest: Option<u64>, cursor: Option<String>) -> Position {
    let ledger = latest
        .and_then(|l| u32::try_from(l).ok())
        .map_or(start, |l| l.max(start));
    Position { ledger, cursor }
}
