use bank2ofxlib::{
    convert::assemble,
    dialect::Dialect,
    document::{OfxDocument, TransactionKind},
    formats::{delavska::Delavska, n26::N26, ofx::Ofx},
    traits::{ReadFormat, WriteFormat},
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

const DELAVSKA: &str = include_str!("fixtures/delavska_hranilnica.csv");
const DELAVSKA_OFX: &str = include_str!("fixtures/delavska_hranilnica.ofx");
const N26_EXPORT: &str = include_str!("fixtures/n26.csv");

fn server_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 12, 27, 10, 43, 23).unwrap() + Duration::milliseconds(361)
}

fn delavska_doc() -> OfxDocument {
    let ex = Delavska::read(DELAVSKA.as_bytes()).expect("delavska read");
    assemble(&ex, server_time())
}

#[test]
fn delavska_document_fields() {
    let doc = delavska_doc();
    assert_eq!(doc.signon.org, "DELAVSKA HRANILNICA D.D.");
    assert_eq!(doc.signon.status.code, 0);

    let st = &doc.statement;
    assert_eq!(st.currency, "EUR");
    assert_eq!(st.account.bank_id, "HDELSI22");
    assert_eq!(st.account.account_id, "SI56610000010000001");
    assert_eq!(st.transactions.start, NaiveDate::from_ymd_opt(2022, 9, 28).unwrap());
    assert_eq!(st.transactions.end, NaiveDate::from_ymd_opt(2022, 12, 24).unwrap());

    let entries = &st.transactions.entries;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].amount, Decimal::new(-10000, 2));
    assert_eq!(entries[0].kind, TransactionKind::Debit);
    assert_eq!(entries[0].fitid, "860000123456520");
    assert_eq!(entries[1].amount, Decimal::new(15000, 2));
    assert_eq!(entries[1].kind, TransactionKind::Credit);
    assert_eq!(entries[1].fitid, "860000123456519");

    assert_eq!(st.ledger_balance.amount, Decimal::new(2005000, 2));
    assert_eq!(st.ledger_balance.as_of, NaiveDate::from_ymd_opt(2022, 12, 24).unwrap());
}

#[test]
fn delavska_renders_expected_ofx() {
    let out = Ofx::render(&delavska_doc()).expect("render ofx");
    assert_eq!(out, DELAVSKA_OFX);
}

#[test]
fn rendering_is_reproducible() {
    let mut first = Vec::new();
    Ofx::write(&mut first, &delavska_doc()).expect("write ofx");
    let mut second = Vec::new();
    Ofx::write(&mut second, &delavska_doc()).expect("write ofx");
    assert_eq!(first, second);
    assert!(!first.contains(&b'\r'));
    assert!(!first.contains(&b'\n'));
}

#[test]
fn line_breaks_in_fields_are_dropped() {
    let input = DELAVSKA.replace("San Francisco, CA", "\"San Francisco,\r\nCA\"");
    let ex = Delavska::read(input.as_bytes()).expect("delavska read");
    assert_eq!(ex.transactions[1].description, "San Francisco,\r\nCA");

    let out = Ofx::render(&assemble(&ex, server_time())).unwrap();
    assert!(out.contains("<MEMO>San Francisco,CA</MEMO>"));
    assert!(!out.contains('\r'));
}

#[test]
fn n26_document_uses_derived_ids() {
    let ex = Dialect::N26
        .parse(N26_EXPORT)
        .unwrap()
        .with_account_number("DE89 3704 0044 0532 0130 00");
    let doc = assemble(&ex, server_time());
    let st = &doc.statement;

    assert_eq!(doc.signon.org, "N26 BANK GMBH");
    assert_eq!(st.account.bank_id, "NTSBDEB1");
    assert_eq!(st.account.account_id, "DE89370400440532013000");
    assert_eq!(st.ledger_balance.as_of, NaiveDate::from_ymd_opt(2022, 12, 2).unwrap());

    let kinds: Vec<TransactionKind> = st.transactions.entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Debit,
            TransactionKind::Debit,
            TransactionKind::Debit,
            TransactionKind::Credit,
        ]
    );
    for (entry, t) in st.transactions.entries.iter().zip(&ex.transactions) {
        assert_eq!(entry.fitid, t.reclamation_id);
        assert_eq!(entry.fitid.len(), 64);
    }

    // EUR-denominated card payments carry no ORIGCURRENCY
    assert!(st.transactions.entries[0].orig_currency.is_none());
    let usd = st.transactions.entries[2].orig_currency.as_ref().unwrap();
    assert_eq!(usd.symbol, "USD");

    let out = Ofx::render(&doc).unwrap();
    assert!(out.contains("<TRNAMT>-5.99</TRNAMT>"));
    assert!(out.contains("<TRNAMT>1000.00</TRNAMT>"));
    assert!(out.contains("<ORIGCURRENCY><CURRATE>0.9698795181</CURRATE><CURSYM>USD</CURSYM></ORIGCURRENCY>"));
    assert!(out.contains("<NAME>MATJAZ DROLC, S.P.</NAME>"));
}

#[test]
fn n26_reimport_yields_same_document() {
    let run = || {
        let ex = N26::read(N26_EXPORT.as_bytes())
            .unwrap()
            .with_account_number("DE89370400440532013000");
        Ofx::render(&assemble(&ex, server_time())).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn empty_ids_fall_back_to_content_hash() {
    let input = DELAVSKA
        .replace(";123456520;860000123456520;", ";;;")
        .replace(";860000123456519;", ";;");
    let ex = Delavska::read(input.as_bytes()).unwrap();
    let doc = assemble(&ex, server_time());
    let entries = &doc.statement.transactions.entries;
    assert_eq!(entries[0].fitid.len(), 64);
    assert_eq!(entries[1].fitid, "123456519");
}
