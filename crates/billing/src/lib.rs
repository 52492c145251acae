//! Billing - records, charges and schema migration
//!
//! This crate provides:
//! - The `Charge` and `Record` model with lenient amount coercion
//! - Normalization of submitted charge rows
//! - Migration of rows stored in the fixed eight-column legacy schema
//! - Date and amount formatting for printing
//!
//! # Example
//!
//! ```ignore
//! use billing::{compute_total, normalize_charges, Record};
//!
//! let charges = normalize_charges(&["Rent", ""], &["100", ""], &["", ""]);
//! assert_eq!(compute_total(&charges).to_string(), "100.00");
//!
//! let record = Record::new("Acme\nStreet 1", "2024-01-01", "2024-01-01", "2024-01-31", charges);
//! assert_eq!(record.download_filename("document"), "Acme.pdf");
//! ```

mod charge;
mod date;
mod legacy;
mod record;

pub use charge::{
    amount_from_value, compute_total, format_amount, normalize_charges, parse_amount, sum_amounts,
    Charge,
};
pub use date::{format_date_ddmmyyyy, parse_iso_date};
pub use legacy::{charges_from_value, migrate_charges, ChargeSchema, LegacyColumn, LEGACY_COLUMNS};
pub use record::{sanitize_filename, Record, StoredRecord, TotalPolicy};

/// Decimal type used for every amount
pub use rust_decimal::Decimal;

use thiserror::Error;

/// Rows pre-filled in an empty creation form
pub const DEFAULT_CHARGE_LABELS: [&str; 8] = [
    LEGACY_COLUMNS[0].label,
    LEGACY_COLUMNS[1].label,
    LEGACY_COLUMNS[2].label,
    LEGACY_COLUMNS[3].label,
    LEGACY_COLUMNS[4].label,
    LEGACY_COLUMNS[5].label,
    LEGACY_COLUMNS[6].label,
    LEGACY_COLUMNS[7].label,
];

/// Errors that can occur while decoding billing data
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Stored row is not a JSON object")]
    NotAnObject,

    #[error("Unknown total policy: {0}")]
    UnknownTotalPolicy(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;
