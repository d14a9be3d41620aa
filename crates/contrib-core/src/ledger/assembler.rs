//! Record assembly from an anchor line and its address.

use crate::error::ExtractionError;
use crate::models::record::ContributionRecord;

use super::lines::RawLine;

/// Date, last name, first name and amount.
pub const MIN_ANCHOR_TOKENS: usize = 4;

/// Build a record from the anchor line tokens and an address.
///
/// Tokens past the amount (occupation, extra name parts) are dropped.
pub fn assemble_record(
    anchor: &RawLine<'_>,
    address: String,
) -> Result<ContributionRecord, ExtractionError> {
    let tokens: Vec<&str> = anchor.text.split_whitespace().collect();
    if tokens.len() < MIN_ANCHOR_TOKENS {
        return Err(ExtractionError::MalformedAnchorLine {
            position: anchor.position,
            token_count: tokens.len(),
        });
    }

    Ok(ContributionRecord {
        date: tokens[0].to_string(),
        last_name: tokens[1].trim_end_matches(',').to_string(),
        first_name: tokens[2].trim_end_matches(',').to_string(),
        amount: tokens[3].to_string(),
        address,
    })
}
