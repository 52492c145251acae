//! PostgreSQL record store

use super::{RecordStore, StoreResult};
use async_trait::async_trait;
use billing::{parse_iso_date, Record, StoredRecord, TotalPolicy};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;

/// Create the database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Records in the `pdf_records` table
///
/// Rows are read through `to_jsonb` so that legacy charge columns, on tables
/// that still have them, reach the migration step.
pub struct PgRecordStore {
    pool: PgPool,
    policy: TotalPolicy,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, policy: TotalPolicy) -> Self {
        Self { pool, policy }
    }

    /// Create the table if it does not exist yet
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    fn decode(&self, row: serde_json::Value) -> StoreResult<Record> {
        Ok(StoredRecord::from_value(row)?.into_record(self.policy))
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, record: &Record) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO pdf_records (name, date, from_date, to_date, charges, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&record.name)
        .bind(parse_iso_date(&record.date))
        .bind(parse_iso_date(&record.from_date))
        .bind(parse_iso_date(&record.to_date))
        .bind(Json(&record.charges))
        .bind(record.total)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: i64, record: &Record) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE pdf_records
            SET name = $1, date = $2, from_date = $3, to_date = $4, charges = $5, total = $6
            WHERE id = $7
            "#,
        )
        .bind(&record.name)
        .bind(parse_iso_date(&record.date))
        .bind(parse_iso_date(&record.from_date))
        .bind(parse_iso_date(&record.to_date))
        .bind(Json(&record.charges))
        .bind(record.total)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id, "Update matched no record");
        }
        Ok(())
    }

    async fn fetch_one(&self, id: i64) -> StoreResult<Option<Record>> {
        let row: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT to_jsonb(r) FROM pdf_records r WHERE r.id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|row| self.decode(row)).transpose()
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Record>> {
        let rows: Vec<serde_json::Value> =
            sqlx::query_scalar("SELECT to_jsonb(r) FROM pdf_records r ORDER BY r.id DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM pdf_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
