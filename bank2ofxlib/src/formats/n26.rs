//! N26 direct-bank export: comma-delimited, fully quoted, UTF-8.
//!
//! The file carries no per-transaction id, no account number and no balance,
//! so ids are derived from row content and the account number must be
//! supplied by the caller.

use crate::{
    error::{ConvertError, Result},
    identity::derive_fitid,
    lexing::{parse_date, parse_grouped_amount, str_or_absent, AmountFormat, DateFormat},
    model::{Account, AccountExport, Amount, ForeignAmount, Transaction},
    traits::ReadFormat,
};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8};
use rust_decimal::Decimal;
use std::io::BufRead;
use tracing::debug;

pub const BANK_NAME: &str = "N26 BANK GMBH";
pub const BANK_ID: &str = "NTSBDEB1";
pub const CURRENCY: &str = "EUR";

const COLUMNS: [&str; 9] = [
    "Date",
    "Payee",
    "Account number",
    "Transaction type",
    "Payment reference",
    "Amount (EUR)",
    "Amount (Foreign Currency)",
    "Type Foreign Currency",
    "Exchange Rate",
];

#[derive(serde::Deserialize)]
struct N26Row {
    date: String,
    payee: String,
    account_number: String,
    // Outgoing Transfer, MasterCard Payment, ...; categorisation is left to the importer.
    _transaction_type: String,
    payment_reference: String,
    amount_eur: String,
    amount_foreign: String,
    foreign_currency: String,
    exchange_rate: String,
}

pub struct N26;

impl ReadFormat for N26 {
    fn encoding() -> &'static Encoding {
        UTF_8
    }

    fn read<R: BufRead>(r: R) -> Result<AccountExport> {
        let mut records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(r)
            .into_records();

        let header = records
            .next()
            .transpose()?
            .ok_or_else(|| ConvertError::schema(1, COLUMNS.join(","), "end of file"))?;
        if header.iter().ne(COLUMNS) {
            return Err(ConvertError::schema(
                header.position().map_or(1, |p| p.line()),
                COLUMNS.join(","),
                header.iter().collect::<Vec<_>>().join(","),
            ));
        }

        let mut transactions = Vec::new();
        for rec in records {
            let rec = rec?;
            if rec.len() != COLUMNS.len() {
                debug!(
                    line = rec.position().map(|p| p.line()),
                    columns = rec.len(),
                    "skipping row with unexpected column count"
                );
                continue;
            }
            let row: N26Row = rec.deserialize(None)?;
            transactions.push(row.into_transaction()?);
        }

        let dates = || transactions.iter().map(|t| t.posting_date);
        let (Some(from), Some(to)) = (dates().min(), dates().max()) else {
            return Err(ConvertError::schema(2, "at least one transaction row", "none"));
        };

        Ok(AccountExport {
            account: Account {
                bank: BANK_NAME.into(),
                bank_id: BANK_ID.into(),
                owner: String::new(),
                account_number: String::new(),
            },
            currency: CURRENCY.into(),
            from,
            to,
            export_date: to,
            opening_balance: None,
            final_balance: Decimal::new(0, 2),
            transactions,
        })
    }
}

impl N26Row {
    fn into_transaction(self) -> Result<Transaction> {
        let date = parse_date(&self.date, DateFormat::Iso)?;
        let signed = parse_plain(&self.amount_eur)?
            .ok_or_else(|| ConvertError::Format(format!("missing amount for {date}")))?;
        let reference = str_or_absent(&self.payment_reference);

        let foreign = match (
            parse_plain(&self.amount_foreign)?,
            str_or_absent(&self.foreign_currency),
            parse_plain(&self.exchange_rate)?,
        ) {
            (Some(amount), Some(currency), Some(rate)) => Some(ForeignAmount {
                amount,
                currency: currency.to_string(),
                rate,
            }),
            _ => None,
        };

        Ok(Transaction {
            currency: CURRENCY.into(),
            value_date: date,
            posting_date: date,
            external_id: String::new(),
            reclamation_id: derive_fitid(date, signed, &self.payee, reference),
            counterparty: self.payee,
            counterparty_account: str_or_absent(self.account_number.trim()).map(str::to_string),
            amount: Amount::from_signed(signed),
            reference_payer: reference.unwrap_or_default().to_string(),
            reference_payee: String::new(),
            description: reference.unwrap_or_default().to_string(),
            foreign,
        })
    }
}

fn parse_plain(token: &str) -> Result<Option<Decimal>> {
    match str_or_absent(token) {
        Some(t) => parse_grouped_amount(t, AmountFormat::Plain),
        None => Ok(None),
    }
}
