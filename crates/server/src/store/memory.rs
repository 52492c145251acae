//! In-memory record store

use super::{RecordStore, StoreError, StoreResult};
use async_trait::async_trait;
use billing::{Record, StoredRecord, TotalPolicy};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Rows {
    rows: BTreeMap<i64, Value>,
    last_id: i64,
}

/// Records kept in process memory
///
/// Rows are held as JSON, exactly like the database returns them, so rows
/// in the legacy schema go through the same decoding.
pub struct MemoryRecordStore {
    inner: Mutex<Rows>,
    policy: TotalPolicy,
}

impl MemoryRecordStore {
    pub fn new(policy: TotalPolicy) -> Self {
        Self {
            inner: Mutex::new(Rows::default()),
            policy,
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Rows>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Store a raw row as is, e.g. one in the legacy column layout
    ///
    /// The row keeps its own `id` when it has one.
    pub fn insert_row(&self, mut row: Value) -> StoreResult<i64> {
        if !row.is_object() {
            return Err(billing::BillingError::NotAnObject.into());
        }

        let mut inner = self.lock()?;
        let id = match row.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => inner.last_id + 1,
        };
        inner.last_id = inner.last_id.max(id);

        row["id"] = Value::from(id);
        inner.rows.insert(id, row);
        Ok(id)
    }

    fn decode(&self, row: &Value) -> StoreResult<Record> {
        Ok(StoredRecord::from_value(row.clone())?.into_record(self.policy))
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new(TotalPolicy::default())
    }
}

fn record_row(record: &Record) -> StoreResult<Value> {
    let mut row = serde_json::to_value(record)?;
    if let Some(map) = row.as_object_mut() {
        map.remove("id");
    }
    Ok(row)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: &Record) -> StoreResult<i64> {
        self.insert_row(record_row(record)?)
    }

    async fn update(&self, id: i64, record: &Record) -> StoreResult<()> {
        let mut row = record_row(record)?;
        let mut inner = self.lock()?;
        if inner.rows.contains_key(&id) {
            row["id"] = Value::from(id);
            inner.rows.insert(id, row);
        }
        Ok(())
    }

    async fn fetch_one(&self, id: i64) -> StoreResult<Option<Record>> {
        let row = self.lock()?.rows.get(&id).cloned();
        row.map(|row| self.decode(&row)).transpose()
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Record>> {
        let rows: Vec<Value> = self.lock()?.rows.values().rev().cloned().collect();
        rows.iter().map(|row| self.decode(row)).collect()
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }
}
