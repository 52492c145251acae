//! Record persistence
//!
//! Handlers talk to a `RecordStore`; which backend sits behind it is decided
//! once at startup from the configuration.

mod memory;
mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::{create_pool, PgRecordStore};

use crate::config::DatabaseConfig;
use async_trait::async_trait;
use billing::{Record, TotalPolicy};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored row: {0}")]
    Decode(#[from] billing::BillingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for billing records
///
/// Rows read back are migrated to the charge-list schema and their totals
/// reconciled under the store's `TotalPolicy`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record, returning its id
    async fn insert(&self, record: &Record) -> StoreResult<i64>;

    /// Replace every field of an existing record
    async fn update(&self, id: i64, record: &Record) -> StoreResult<()>;

    async fn fetch_one(&self, id: i64) -> StoreResult<Option<Record>>;

    /// All records, newest id first
    async fn fetch_all(&self) -> StoreResult<Vec<Record>>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}

/// Result of a best-effort write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Persisted,
    PersistFailed(String),
}

impl PersistOutcome {
    /// Log a failed write and keep going
    pub fn from_result<T>(action: &str, result: StoreResult<T>) -> Self {
        match result {
            Ok(_) => PersistOutcome::Persisted,
            Err(e) => {
                tracing::warn!(error = %e, "{action} failed");
                PersistOutcome::PersistFailed(e.to_string())
            }
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistOutcome::Persisted)
    }
}

/// Open the configured store
///
/// Without a database configuration records are kept in memory and lost on
/// restart.
pub async fn connect(
    database: Option<&DatabaseConfig>,
    policy: TotalPolicy,
) -> StoreResult<Arc<dyn RecordStore>> {
    match database {
        Some(db) => {
            let pool = create_pool(&db.url, db.max_connections).await?;
            let store = PgRecordStore::new(pool, policy);
            if db.auto_migrate {
                store.migrate().await?;
                tracing::info!("Database schema is up to date");
            }
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, records are kept in memory only");
            Ok(Arc::new(MemoryRecordStore::new(policy)))
        }
    }
}
