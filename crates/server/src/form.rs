//! Submitted record form
//!
//! The charge inputs are repeated fields (`charge_type[]` and friends), so
//! the body is decoded into ordered pairs rather than a flat struct.

use billing::{normalize_charges, Record};

/// Raw values of a create or edit form submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm {
    pub name: String,
    pub date: String,
    pub from_date: String,
    pub to_date: String,
    pub charge_types: Vec<String>,
    pub charge_amounts: Vec<String>,
    pub charge_remarks: Vec<String>,
}

impl RecordForm {
    /// Decode an `application/x-www-form-urlencoded` body
    ///
    /// Single fields keep their first value. The client-side `total` field
    /// and unknown fields are ignored.
    pub fn parse(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;

        let mut form = RecordForm::default();
        let mut seen = [false; 4];
        for (key, value) in pairs {
            let (slot, field) = match key.as_str() {
                "name" => (0, &mut form.name),
                "date" => (1, &mut form.date),
                "from_date" => (2, &mut form.from_date),
                "to_date" => (3, &mut form.to_date),
                "charge_type[]" => {
                    form.charge_types.push(value);
                    continue;
                }
                "charge_amount[]" => {
                    form.charge_amounts.push(value);
                    continue;
                }
                "charge_remark[]" => {
                    form.charge_remarks.push(value);
                    continue;
                }
                _ => continue,
            };
            if !seen[slot] {
                seen[slot] = true;
                *field = value;
            }
        }
        Ok(form)
    }

    /// Normalize the charge rows and build an unsaved record
    pub fn into_record(self) -> Record {
        let charges = normalize_charges(
            &self.charge_types,
            &self.charge_amounts,
            &self.charge_remarks,
        );
        Record::new(self.name, self.date, self.from_date, self.to_date, charges)
    }
}
