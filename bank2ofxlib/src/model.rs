//! Canonical model every dialect converges to.

use crate::error::{ConvertError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Identity of the account a statement belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub bank: String,
    /// Routing identifier of the bank (BIC).
    pub bank_id: String,
    pub owner: String,
    /// As printed by the bank, spaces included.
    pub account_number: String,
}

/// Money leaving (`Paid`) or entering (`Received`) the account. Always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Paid(Decimal),
    Received(Decimal),
}

impl Amount {
    /// Negative values leave the account.
    pub fn from_signed(value: Decimal) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            Amount::Paid(-value)
        } else {
            Amount::Received(value.abs())
        }
    }

    /// Builds an amount from separate debit/credit columns; exactly one must be set.
    ///
    /// A negative value reverses direction: `-150,00` under paid is money
    /// received, and the reverse.
    pub fn from_columns(paid: Option<Decimal>, received: Option<Decimal>) -> Result<Self> {
        match (paid, received) {
            (Some(p), None) => Ok(Amount::from_signed(-p)),
            (None, Some(r)) => Ok(Amount::from_signed(r)),
            (Some(p), Some(r)) => Err(ConvertError::Format(format!(
                "both paid ({p}) and received ({r}) amounts are set"
            ))),
            (None, None) => Err(ConvertError::Format(
                "neither paid nor received amount is set".into(),
            )),
        }
    }

    /// Single signed value: paid amounts are negative.
    pub fn signed(&self) -> Decimal {
        match *self {
            Amount::Paid(a) => -a,
            Amount::Received(a) => a,
        }
    }
}

/// Amount in the currency the payment was originally made in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignAmount {
    pub amount: Decimal,
    pub currency: String,
    /// Statement currency units per foreign unit.
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub currency: String,
    pub value_date: NaiveDate,
    pub posting_date: NaiveDate,
    /// Bank's transaction id; may be empty.
    pub external_id: String,
    /// Stable per-row identifier (bank-issued, or derived from content).
    pub reclamation_id: String,
    pub counterparty: String,
    /// Counterparty IBAN, when the dialect reports one.
    pub counterparty_account: Option<String>,
    pub amount: Amount,
    pub reference_payer: String,
    pub reference_payee: String,
    pub description: String,
    pub foreign: Option<ForeignAmount>,
}

impl Transaction {
    pub fn amount_paid(&self) -> Option<Decimal> {
        match self.amount {
            Amount::Paid(a) => Some(a),
            Amount::Received(_) => None,
        }
    }

    pub fn amount_received(&self) -> Option<Decimal> {
        match self.amount {
            Amount::Received(a) => Some(a),
            Amount::Paid(_) => None,
        }
    }
}

/// One parsed statement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountExport {
    pub account: Account,
    /// Statement-level currency code.
    pub currency: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub export_date: NaiveDate,
    pub opening_balance: Option<Decimal>,
    pub final_balance: Decimal,
    /// In statement order.
    pub transactions: Vec<Transaction>,
}

impl AccountExport {
    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account.account_number = account_number.into();
        self
    }

    pub fn ensure_account_number(&self) -> Result<()> {
        if self.account.account_number.trim().is_empty() {
            return Err(ConvertError::MissingAccountNumber);
        }
        Ok(())
    }

    /// Difference between the declared final balance and opening balance plus
    /// transactions. `None` when balanced or when no opening balance is known.
    pub fn reconcile(&self) -> Option<Decimal> {
        let opening = self.opening_balance?;
        let computed = self
            .transactions
            .iter()
            .fold(opening, |acc, t| acc + t.amount.signed());
        let diff = self.final_balance - computed;
        (!diff.is_zero()).then_some(diff)
    }
}
