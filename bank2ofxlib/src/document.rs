//! In-memory OFX 2.2 bank statement document.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub const ORG_MAX: usize = 32;
pub const ACCTID_MAX: usize = 22;
pub const NAME_MAX: usize = 32;
pub const REFNUM_MAX: usize = 32;
pub const MEMO_MAX: usize = 255;
pub const FITID_MAX: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u32,
    pub severity: Severity,
}

impl Status {
    pub fn success() -> Self {
        Status {
            code: 0,
            severity: Severity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOn {
    pub status: Status,
    pub server_time: DateTime<Utc>,
    pub language: String,
    pub org: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Checking,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub bank_id: String,
    pub account_id: String,
    pub account_type: AccountType,
}

/// TRNTYPE; only the generic credit and debit are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "CREDIT",
            TransactionKind::Debit => "DEBIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrigCurrency {
    pub rate: Decimal,
    pub symbol: String,
}

/// STMTTRN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementEntry {
    pub kind: TransactionKind,
    pub posted: NaiveDate,
    pub available: Option<NaiveDate>,
    /// Negative for money leaving the account.
    pub amount: Decimal,
    pub fitid: String,
    pub refnum: Option<String>,
    pub name: Option<String>,
    pub memo: Option<String>,
    pub orig_currency: Option<OrigCurrency>,
}

/// BANKTRANLIST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionList {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub entries: Vec<StatementEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerBalance {
    pub amount: Decimal,
    pub as_of: NaiveDate,
}

/// STMTTRNRS with its STMTRS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementResponse {
    pub trnuid: String,
    pub status: Status,
    pub currency: String,
    pub account: BankAccount,
    pub transactions: TransactionList,
    pub ledger_balance: LedgerBalance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfxDocument {
    pub signon: SignOn,
    pub statement: StatementResponse,
}
