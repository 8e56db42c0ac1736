//! Locale-aware lexers for the date and amount tokens found in bank exports.

use crate::error::{ConvertError, Result};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

static DOTTED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid date regex"));
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

// 12.345,67 | 12345,67 | -1.000 | 5
static GROUPED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d+)?$").expect("valid amount regex")
});
// 11353.15 | -123.4 | 123
static PLAIN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("valid amount regex"));

/// Date spellings used by the supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `13.12.2022`
    Dotted,
    /// `2022-12-13`
    Iso,
}

impl DateFormat {
    fn shape(self) -> &'static Regex {
        match self {
            DateFormat::Dotted => &*DOTTED_DATE,
            DateFormat::Iso => &*ISO_DATE,
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Dotted => "%d.%m.%Y",
            DateFormat::Iso => "%Y-%m-%d",
        }
    }
}

/// Amount spellings used by the supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFormat {
    /// Period groups thousands, comma separates the fraction: `12.345,67`.
    Grouped,
    /// No grouping, period separates the fraction: `12345.67`.
    Plain,
}

impl AmountFormat {
    fn shape(self) -> &'static Regex {
        match self {
            AmountFormat::Grouped => &*GROUPED_AMOUNT,
            AmountFormat::Plain => &*PLAIN_AMOUNT,
        }
    }

    fn canonical(self, token: &str) -> String {
        match self {
            AmountFormat::Grouped => token.replace('.', "").replace(',', "."),
            AmountFormat::Plain => token.to_string(),
        }
    }
}

pub fn parse_date(token: &str, format: DateFormat) -> Result<NaiveDate> {
    let token = token.trim();
    if !format.shape().is_match(token) {
        return Err(ConvertError::Format(format!(
            "date {token:?} is not in {} form",
            format.pattern()
        )));
    }
    NaiveDate::parse_from_str(token, format.pattern())
        .map_err(|e| ConvertError::Format(format!("date {token:?}: {e}")))
}

/// Parses an amount token exactly. An empty token is an absent amount, not zero.
///
/// Values keep their own fractional digits but never fewer than two, so
/// `12345` reads as `12345.00`.
pub fn parse_grouped_amount(token: &str, format: AmountFormat) -> Result<Option<Decimal>> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(None);
    }
    if !format.shape().is_match(token) {
        return Err(ConvertError::Format(format!(
            "amount {token:?} is not a valid {format:?} amount"
        )));
    }

    let mut amount = Decimal::from_str_exact(&format.canonical(token))
        .map_err(|e| ConvertError::Format(format!("amount {token:?}: {e}")))?;
    if amount.scale() < 2 {
        amount.rescale(2);
    }
    Ok(Some(amount))
}

/// Empty cells and the `-` placeholder are absent; anything else passes through.
pub fn str_or_absent(token: &str) -> Option<&str> {
    match token {
        "" | "-" => None,
        s => Some(s),
    }
}
