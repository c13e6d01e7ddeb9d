//! Indexer configuration loaded from environment variables (and an optional
//! `.env` file read by `main`).

use std::str::FromStr;

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The course marketplace contract address (Strkey format)
    pub contract_id: String,
    /// SQLite database URL or file path
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let contract_id = std::env::var("CONTRACT_ID").map_err(|_| {
            IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
        })?;

        Ok(Config {
            rpc_url: std::env::var("RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            contract_id,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./marketplace_events.db".to_string()),
            api_port: env_or("API_PORT", 3001)?,
            poll_interval_secs: env_or("POLL_INTERVAL_SECS", 5)?,
            events_per_page: env_or("EVENTS_PER_PAGE", 100)?,
            start_ledger: env_or("START_LEDGER", 0)?,
        })
    }
}

/// Read and parse `key`, falling back to `default` when it is unset.
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| IndexerError::Config(format!("Invalid {key}: {raw:?}")))
}
