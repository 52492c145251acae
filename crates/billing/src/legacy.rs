//! Legacy eight-column charge schema
//!
//! Older rows stored a fixed set of charge/remark column pairs instead of a
//! `charges` list. Both shapes decode to the same `Vec<Charge>`.

use crate::charge::{amount_from_value, text_from_value, Charge};
use serde_json::{Map, Value};

/// One fixed charge/remark column pair of the legacy schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyColumn {
    /// Label given to the synthesized charge
    pub label: &'static str,
    pub amount_column: &'static str,
    pub remark_column: &'static str,
}

const fn column(
    label: &'static str,
    amount_column: &'static str,
    remark_column: &'static str,
) -> LegacyColumn {
    LegacyColumn {
        label,
        amount_column,
        remark_column,
    }
}

/// Legacy columns in canonical order
pub const LEGACY_COLUMNS: [LegacyColumn; 8] = [
    column("C & F CHARGES", "cf_charges", "cf_remarks"),
    column("GODOWN RENT", "godown_rent", "godown_remarks"),
    column("COURIER CHARGES", "courier_charges", "courier_remarks"),
    column("ELECTRIC BILL", "electric_bill", "electric_remarks"),
    column("INTERNET CHARGES", "internet_charges", "internet_remarks"),
    column("LOCAL FREIGHT", "local_freight", "local_remarks"),
    column("LABOUR CHARGES", "labour_charges", "labour_remarks"),
    column("HAMALI CHARGES", "hamali_charges", "hamali_remarks"),
];

/// Textual amount values that mean "no value"
const ABSENT_SENTINELS: [&str; 3] = ["", "None", "null"];

/// How a stored row carries its charges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeSchema {
    /// A non-empty `charges` list
    List,
    /// The fixed legacy columns
    Legacy,
}

impl ChargeSchema {
    pub fn detect(row: &Map<String, Value>) -> Self {
        match row.get("charges") {
            Some(value) if !charges_from_value(value).is_empty() => ChargeSchema::List,
            _ => ChargeSchema::Legacy,
        }
    }
}

/// Decode a stored `charges` value
///
/// Accepts a JSON array or a string holding one. Entries that are not
/// objects are skipped.
pub fn charges_from_value(value: &Value) -> Vec<Charge> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Array(_)) => charges_from_value(&parsed),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Charges of a stored row in either schema
///
/// A non-empty `charges` list is returned as is. Otherwise one charge is
/// synthesized per legacy pair whose amount column holds a value, in
/// canonical order.
pub fn migrate_charges(row: &Map<String, Value>) -> Vec<Charge> {
    if let Some(value) = row.get("charges") {
        let charges = charges_from_value(value);
        if !charges.is_empty() {
            return charges;
        }
    }

    LEGACY_COLUMNS
        .iter()
        .filter_map(|col| {
            let amount = row.get(col.amount_column)?;
            if !has_legacy_value(amount) {
                return None;
            }

            let remark = row
                .get(col.remark_column)
                .map(text_from_value)
                .unwrap_or_default();

            Some(Charge::new(col.label, amount_from_value(amount), remark))
        })
        .collect()
}

fn has_legacy_value(amount: &Value) -> bool {
    if amount.is_null() {
        return false;
    }
    let text = text_from_value(amount);
    !ABSENT_SENTINELS.contains(&text.trim())
}
