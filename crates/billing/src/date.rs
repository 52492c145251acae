//! Date formatting for printed invoices

use chrono::NaiveDate;

const ISO_FORMAT: &str = "%Y-%m-%d";
const PRINT_FORMAT: &str = "%d-%m-%Y";

/// Parse a `YYYY-MM-DD` date
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, ISO_FORMAT).ok()
}

/// Reformat `YYYY-MM-DD` as `DD-MM-YYYY`
///
/// Input that is not an ISO date is returned unchanged.
///
/// # Examples
/// ```
/// use billing::format_date_ddmmyyyy;
/// assert_eq!(format_date_ddmmyyyy("2024-03-07"), "07-03-2024");
/// assert_eq!(format_date_ddmmyyyy("next week"), "next week");
/// ```
pub fn format_date_ddmmyyyy(text: &str) -> String {
    match parse_iso_date(text) {
        Some(date) => date.format(PRINT_FORMAT).to_string(),
        None => text.to_string(),
    }
}
