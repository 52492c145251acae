//! Charge line items, amount coercion and totals

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A single line item of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Label shown in the PARTICULAR column
    #[serde(rename = "type", default, deserialize_with = "deserialize_text")]
    pub charge_type: String,

    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "deserialize_amount"
    )]
    pub amount: Decimal,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub remark: String,
}

impl Charge {
    pub fn new(charge_type: impl Into<String>, amount: Decimal, remark: impl Into<String>) -> Self {
        Self {
            charge_type: charge_type.into(),
            amount,
            remark: remark.into(),
        }
    }

    /// Whether the charge belongs on a printed invoice
    ///
    /// A charge prints when it has a label, a remark, or a positive amount.
    pub fn is_printable(&self) -> bool {
        !self.charge_type.trim().is_empty()
            || !self.remark.trim().is_empty()
            || self.amount > Decimal::ZERO
    }
}

/// Parse a submitted amount, falling back to zero
///
/// Accepts plain decimals with an optional sign and exponent notation
/// (`1.5e3`). Finite numbers beyond the decimal range saturate to
/// `Decimal::MAX` or `Decimal::MIN`. Blank or unparseable input gives zero.
pub fn parse_amount(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or_else(|_| match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Decimal::from_f64(f).unwrap_or(if f >= 1.0 {
                Decimal::MAX
            } else if f <= -1.0 {
                Decimal::MIN
            } else {
                Decimal::ZERO
            }),
            _ => Decimal::ZERO,
        })
}

/// Coerce a stored JSON value into an amount
///
/// Numbers and numeric strings parse, booleans count as 1 and 0, anything
/// else is zero.
pub fn amount_from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                parse_amount(&n.to_string())
            }
        }
        Value::String(s) => parse_amount(s),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

/// Round half to even at two decimal places
pub(crate) fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Add up amounts, saturating at `Decimal::MAX` / `Decimal::MIN`
///
/// Once saturated the sum stays put: later amounts of the opposite sign do
/// not pull it back into range.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    let mut sum = Decimal::ZERO;
    for amount in amounts {
        match sum.checked_add(amount) {
            Some(next) => sum = next,
            None => {
                return if amount.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            }
        }
    }
    sum
}

/// Sum of all charge amounts rounded to two decimal places
pub fn compute_total(charges: &[Charge]) -> Decimal {
    let sum = sum_amounts(charges.iter().map(|c| c.amount));
    let mut total = round_cents(sum);
    total.rescale(2);
    total
}

/// Render an amount with exactly two decimals, e.g. `100.00`
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

/// Build charges from the parallel `charge_type[]`, `charge_amount[]` and
/// `charge_remark[]` sequences of a submitted form
///
/// Rows beyond the shortest sequence are ignored. A row is dropped only when
/// its type, amount and remark are all blank. Types are trimmed, remarks are
/// kept as submitted.
pub fn normalize_charges<S: AsRef<str>>(types: &[S], amounts: &[S], remarks: &[S]) -> Vec<Charge> {
    types
        .iter()
        .zip(amounts)
        .zip(remarks)
        .filter_map(|((t, a), r)| {
            let charge_type = t.as_ref().trim();
            let amount = a.as_ref();
            let remark = r.as_ref();

            if charge_type.is_empty() && amount.trim().is_empty() && remark.trim().is_empty() {
                return None;
            }

            Some(Charge::new(charge_type, parse_amount(amount), remark))
        })
        .collect()
}

/// Lenient amount deserializer, see [`amount_from_value`]
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

/// Strings pass through, null becomes empty, other scalars are stringified
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

pub(crate) fn text_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
