//! Billing records and stored-row decoding

use crate::charge::{
    amount_from_value, compute_total, deserialize_amount, deserialize_text, round_cents,
    text_from_value, Charge,
};
use crate::legacy::{migrate_charges, ChargeSchema};
use crate::{BillingError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One billing entry
///
/// Dates are kept as submitted (`YYYY-MM-DD` from the form) so that input
/// which does not parse can still be printed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by storage, absent before the first insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Party name and address, one item per line
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub date: String,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub from_date: String,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub to_date: String,

    #[serde(default)]
    pub charges: Vec<Charge>,

    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "deserialize_amount"
    )]
    pub total: Decimal,
}

impl Record {
    /// Build an unsaved record, computing its total from `charges`
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        from_date: impl Into<String>,
        to_date: impl Into<String>,
        charges: Vec<Charge>,
    ) -> Self {
        let total = compute_total(&charges);
        Self {
            id: None,
            name: name.into(),
            date: date.into(),
            from_date: from_date.into(),
            to_date: to_date.into(),
            charges,
            total,
        }
    }

    /// First line of the name, trimmed
    pub fn display_name(&self) -> &str {
        self.name.lines().next().unwrap_or_default().trim()
    }

    /// Name lines after the first one, untrimmed and including blank ones
    pub fn continuation_lines(&self) -> impl Iterator<Item = &str> {
        self.name.lines().skip(1)
    }

    /// Charges that appear on the printed invoice
    pub fn printable_charges(&self) -> impl Iterator<Item = &Charge> {
        self.charges.iter().filter(|c| c.is_printable())
    }

    /// Attachment file name derived from the display name
    ///
    /// `fallback` is used as the stem when the display name is blank.
    pub fn download_filename(&self, fallback: &str) -> String {
        let stem = sanitize_filename(self.display_name());
        if stem.is_empty() {
            format!("{fallback}.pdf")
        } else {
            format!("{stem}.pdf")
        }
    }
}

/// Replace spaces and characters unsafe in file names with `_`
pub fn sanitize_filename(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// How a decoded record's total is reconciled with its charges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TotalPolicy {
    /// Always recompute from the charges
    #[default]
    Recompute,
    /// Keep a stored non-zero total, recompute otherwise
    PreferStored,
}

impl TotalPolicy {
    pub fn resolve(self, stored: Decimal, charges: &[Charge]) -> Decimal {
        match self {
            TotalPolicy::PreferStored if !stored.is_zero() => round_cents(stored),
            _ => compute_total(charges),
        }
    }
}

impl FromStr for TotalPolicy {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recompute" => Ok(TotalPolicy::Recompute),
            "stored" | "prefer_stored" => Ok(TotalPolicy::PreferStored),
            _ => Err(BillingError::UnknownTotalPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for TotalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalPolicy::Recompute => write!(f, "recompute"),
            TotalPolicy::PreferStored => write!(f, "stored"),
        }
    }
}

/// A row as read back from storage, in either charge schema
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    row: Map<String, Value>,
}

impl StoredRecord {
    pub fn new(row: Map<String, Value>) -> Self {
        Self { row }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(row) => Ok(Self::new(row)),
            _ => Err(BillingError::NotAnObject),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn id(&self) -> Option<i64> {
        match self.row.get("id")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn schema(&self) -> ChargeSchema {
        ChargeSchema::detect(&self.row)
    }

    pub fn row(&self) -> &Map<String, Value> {
        &self.row
    }

    fn text(&self, key: &str) -> String {
        self.row.get(key).map(text_from_value).unwrap_or_default()
    }

    /// Decode into a canonical record, migrating legacy charges and
    /// reconciling the total under `policy`
    pub fn into_record(self, policy: TotalPolicy) -> Record {
        let charges = migrate_charges(&self.row);
        let stored_total = self
            .row
            .get("total")
            .map(amount_from_value)
            .unwrap_or_default();

        Record {
            id: self.id(),
            name: self.text("name"),
            date: self.text("date"),
            from_date: self.text("from_date"),
            to_date: self.text("to_date"),
            total: policy.resolve(stored_total, &charges),
            charges,
        }
    }
}
