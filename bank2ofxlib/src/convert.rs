//! Projection of canonical records into an OFX document.

use crate::{
    document::*,
    identity::derive_fitid,
    model::{AccountExport, Amount, Transaction},
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Maps one canonical transaction to a STMTTRN entry.
pub fn project(t: &Transaction, statement_currency: &str) -> StatementEntry {
    let kind = match t.amount {
        Amount::Paid(_) => TransactionKind::Debit,
        Amount::Received(_) => TransactionKind::Credit,
    };

    let orig_currency = t
        .foreign
        .as_ref()
        .filter(|f| f.currency != statement_currency)
        .map(|f| OrigCurrency {
            rate: f.rate,
            symbol: f.currency.clone(),
        });

    StatementEntry {
        kind,
        posted: t.posting_date,
        available: Some(t.value_date),
        amount: t.amount.signed(),
        fitid: truncate(&select_fitid(t), FITID_MAX),
        refnum: non_empty(&t.reference_payee).map(|s| truncate(s, REFNUM_MAX)),
        name: non_empty(&t.counterparty).map(|s| truncate(s, NAME_MAX)),
        memo: non_empty(&t.description).map(|s| truncate(s, MEMO_MAX)),
        orig_currency,
    }
}

/// Builds the full document. `server_time` is the only input not taken from
/// the export, so equal inputs give equal documents.
pub fn assemble(export: &AccountExport, server_time: DateTime<Utc>) -> OfxDocument {
    if let Some(diff) = export.reconcile() {
        warn!(
            account = %export.account.account_number,
            %diff,
            "final balance does not match opening balance plus transactions"
        );
    }

    let entries = export
        .transactions
        .iter()
        .map(|t| project(t, &export.currency))
        .collect();

    OfxDocument {
        signon: SignOn {
            status: Status::success(),
            server_time,
            language: "ENG".into(),
            org: sanitize_org(&export.account.bank),
        },
        statement: StatementResponse {
            trnuid: "0".into(),
            status: Status::success(),
            currency: export.currency.clone(),
            account: BankAccount {
                bank_id: export.account.bank_id.clone(),
                account_id: sanitize_account_id(&export.account.account_number),
                account_type: AccountType::Checking,
            },
            transactions: TransactionList {
                start: export.from,
                end: export.to,
                entries,
            },
            ledger_balance: LedgerBalance {
                amount: export.final_balance,
                as_of: export.to,
            },
        },
    }
}

/// Prefers the bank's stable id, then its transaction id, then a content hash.
fn select_fitid(t: &Transaction) -> String {
    if let Some(id) = non_empty(&t.reclamation_id) {
        return id.to_string();
    }
    if let Some(id) = non_empty(&t.external_id) {
        return id.to_string();
    }
    derive_fitid(
        t.posting_date,
        t.amount.signed(),
        &t.counterparty,
        non_empty(&t.reference_payer),
    )
}

/// Drops trailing words (usually the city) until the name fits ORG.
pub fn sanitize_org(bank: &str) -> String {
    let mut org = bank.trim();
    while org.chars().count() > ORG_MAX {
        match org.rsplit_once(char::is_whitespace) {
            Some((head, _)) => org = head.trim_end(),
            None => break,
        }
    }
    if org != bank.trim() {
        debug!(bank, org, "shortened bank name");
    }
    truncate(org, ORG_MAX)
}

pub fn sanitize_account_id(account_number: &str) -> String {
    let compact: String = account_number.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.chars().count() > ACCTID_MAX {
        warn!(account_number, "account number truncated to {ACCTID_MAX} characters");
    }
    truncate(&compact, ACCTID_MAX)
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
