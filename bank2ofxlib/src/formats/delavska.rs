//! Delavska hranilnica passbook export: `;`-delimited, windows-1250.
//!
//! ```text
//! Banka:;DELAVSKA HRANILNICA D.D. LJUBLJANA
//! Komitent:;JANEZ KRANJSKI
//! Promet za obdobje:;28.09.2022 - 24.12.2022
//! Datum izpisa:;24.12.2022
//!
//! Račun;SI56 6100 0001 0000 001
//! Valuta;Začetno stanje;Breme;Dobro;Končno stanje
//! EUR;20.000,00;100,00;150,00;20.050,00
//!
//! Valuta;Datum valute;Datum knjiženja;ID transakcije;...;Opis prejemnika
//! EUR;13.12.2022;13.12.2022;123456520;860000123456520;...
//! ```

use crate::{
    error::{ConvertError, Result},
    lexing::{parse_date, parse_grouped_amount, AmountFormat, DateFormat},
    model::{Account, AccountExport, Amount, Transaction},
    traits::ReadFormat,
};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::{Encoding, WINDOWS_1250};
use rust_decimal::Decimal;
use std::{io::BufRead, str::SplitInclusive};
use tracing::debug;

pub const BANK_ID: &str = "HDELSI22";

const BALANCES_HEADER: [&str; 5] = ["Valuta", "Začetno stanje", "Breme", "Dobro", "Končno stanje"];

const COLUMNS: [&str; 11] = [
    "Valuta",
    "Datum valute",
    "Datum knjiženja",
    "ID transakcije",
    "Št. za reklamacijo",
    "Prejemnik / Plačnik",
    "Breme",
    "Dobro",
    "Referenca plačnika",
    "Referenca prejemnika",
    "Opis prejemnika",
];

#[derive(serde::Deserialize)]
struct DhRow {
    currency: String,
    value_date: String,
    posting_date: String,
    transaction_id: String,
    reclamation_nr: String,
    payer_or_payee: String,
    paid: String,
    received: String,
    reference_payer: String,
    reference_payee: String,
    description: String,
}

pub struct Delavska;

impl ReadFormat for Delavska {
    fn encoding() -> &'static Encoding {
        WINDOWS_1250
    }

    fn read<R: BufRead>(mut r: R) -> Result<AccountExport> {
        let mut text = String::new();
        r.read_to_string(&mut text)?;
        let mut meta = Metadata {
            lines: text.split_inclusive('\n'),
            line: 0,
            consumed: 0,
        };

        let bank = meta.labelled("Banka:")?;
        let owner = meta.labelled("Komitent:")?;

        let (period, line) = meta.labelled_at("Promet za obdobje:")?;
        let (from, to) = period
            .split_once(" - ")
            .ok_or_else(|| ConvertError::schema(line, "period \"<start> - <end>\"", &period))?;
        let from = parse_date(from, DateFormat::Dotted)?;
        let to = parse_date(to, DateFormat::Dotted)?;

        let export_date = parse_date(&meta.labelled("Datum izpisa:")?, DateFormat::Dotted)?;
        let account_number = meta.labelled("Račun")?;

        let header = meta.next_record("balances header")?;
        let found: Vec<&str> = header.iter().take(BALANCES_HEADER.len()).collect();
        if found != BALANCES_HEADER {
            return Err(ConvertError::schema(
                meta.line,
                BALANCES_HEADER.join(";"),
                found.join(";"),
            ));
        }

        let balances = meta.next_record("balances row")?;
        let cell = |i: usize| balances.get(i).unwrap_or("");
        let currency = cell(0).to_string();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConvertError::schema(meta.line, "3-letter currency code", currency));
        }
        let opening_balance = parse_grouped_amount(cell(1), AmountFormat::Grouped)?;
        let final_balance = parse_grouped_amount(cell(4), AmountFormat::Grouped)?
            .ok_or_else(|| ConvertError::schema(meta.line, "final balance", "empty cell"))?;

        let columns = meta.next_record("transaction column header")?;
        if columns.iter().ne(COLUMNS) {
            return Err(ConvertError::schema(
                meta.line,
                COLUMNS.join(";"),
                columns.iter().collect::<Vec<_>>().join(";"),
            ));
        }

        let header_line = meta.line;
        let mut transactions = Vec::new();
        for rec in reader(&text.as_bytes()[meta.consumed..]).into_records() {
            let rec = rec?;
            if rec.len() != COLUMNS.len() {
                debug!(
                    line = rec.position().map(|p| header_line + p.line()),
                    columns = rec.len(),
                    "skipping row with unexpected column count"
                );
                continue;
            }
            let row: DhRow = rec.deserialize(None)?;
            transactions.push(row.into_transaction()?);
        }

        Ok(AccountExport {
            account: Account {
                bank,
                bank_id: BANK_ID.into(),
                owner,
                account_number,
            },
            currency,
            from,
            to,
            export_date,
            opening_balance,
            final_balance,
            transactions,
        })
    }
}

impl DhRow {
    fn into_transaction(self) -> Result<Transaction> {
        let amount = Amount::from_columns(
            parse_amount(&self.paid)?,
            parse_amount(&self.received)?,
        )?;
        Ok(Transaction {
            currency: self.currency,
            value_date: parse_date(&self.value_date, DateFormat::Dotted)?,
            posting_date: parse_date(&self.posting_date, DateFormat::Dotted)?,
            external_id: self.transaction_id,
            reclamation_id: self.reclamation_nr,
            counterparty: self.payer_or_payee,
            counterparty_account: None,
            amount,
            reference_payer: self.reference_payer,
            reference_payee: self.reference_payee,
            description: self.description,
            foreign: None,
        })
    }
}

fn parse_amount(token: &str) -> Result<Option<Decimal>> {
    parse_grouped_amount(token, AmountFormat::Grouped)
}

fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes)
}

/// Cursor over the metadata block, one physical line per record.
///
/// Blank lines are skipped but still counted, so `line` is always the
/// 1-based line of the record last returned.
struct Metadata<'a> {
    lines: SplitInclusive<'a, char>,
    line: u64,
    /// Bytes of input behind the cursor.
    consumed: usize,
}

impl Metadata<'_> {
    fn next_record(&mut self, expected: &str) -> Result<StringRecord> {
        for raw in self.lines.by_ref() {
            self.line += 1;
            self.consumed += raw.len();
            let mut rec = StringRecord::new();
            if !reader(raw.as_bytes()).read_record(&mut rec)? {
                continue;
            }
            if rec.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            return Ok(rec);
        }
        Err(ConvertError::schema(self.line + 1, expected, "end of file"))
    }

    fn labelled_at(&mut self, label: &str) -> Result<(String, u64)> {
        let rec = self.next_record(label)?;
        match (rec.get(0), rec.get(1)) {
            (Some(l), Some(value)) if l == label => Ok((value.to_string(), self.line)),
            _ => Err(ConvertError::schema(
                self.line,
                format!("{label:?} line"),
                rec.iter().collect::<Vec<_>>().join(";"),
            )),
        }
    }

    fn labelled(&mut self, label: &str) -> Result<String> {
        self.labelled_at(label).map(|(value, _)| value)
    }
}
