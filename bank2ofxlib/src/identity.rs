//! Content-derived transaction identifiers.
//!
//! The hashed input is `date ‖ amount ‖ counterparty ‖ reference` where the
//! date is `YYYY-MM-DD` and the amount is the signed value with trailing zeros
//! stripped (`-5.99`, `1000`, `-20`). Changing either rule re-keys every
//! previously imported transaction, so both are fixed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

pub fn derive_fitid(
    date: NaiveDate,
    signed_amount: Decimal,
    counterparty: &str,
    reference: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    hasher.update(signed_amount.normalize().to_string().as_bytes());
    hasher.update(counterparty.as_bytes());
    hasher.update(reference.unwrap_or_default().as_bytes());
    hex::encode(hasher.finalize())
}
