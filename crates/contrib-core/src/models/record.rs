//! Contribution record model.

use serde::{Deserialize, Serialize};

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 5] = ["Date", "First Name", "Last Name", "Amount", "Address"];

/// One contribution row read from a ledger page.
///
/// All fields are kept as the raw OCR tokens: the date is not reformatted and
/// the amount is not parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContributionRecord {
    /// Entry date, `MM/DD/YYYY`.
    pub date: String,

    /// Donor last name.
    pub last_name: String,

    /// Donor first name.
    pub first_name: String,

    /// Contribution amount as printed.
    pub amount: String,

    /// Donor address joined from the two address rows.
    pub address: String,
}

impl ContributionRecord {
    /// Fields in [`CSV_HEADER`] order.
    pub fn csv_fields(&self) -> [&str; 5] {
        [
            &self.date,
            &self.first_name,
            &self.last_name,
            &self.amount,
            &self.address,
        ]
    }
}
