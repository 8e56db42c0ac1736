use bank2ofxlib::{
    dialect::Dialect,
    error::ConvertError,
    formats::n26::N26,
    identity::derive_fitid,
    model::{Amount, ForeignAmount},
    traits::ReadFormat,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

const EXPORT: &str = include_str!("fixtures/n26.csv");
const HEADER: &str = r#""Date","Payee","Account number","Transaction type","Payment reference","Amount (EUR)","Amount (Foreign Currency)","Type Foreign Currency","Exchange Rate""#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

#[test]
fn n26_read_fixture() {
    let ex = N26::read(EXPORT.as_bytes()).expect("n26 read");

    assert_eq!(ex.account.bank, "N26 BANK GMBH");
    assert_eq!(ex.account.bank_id, "NTSBDEB1");
    assert_eq!(ex.account.account_number, "");
    assert_eq!(ex.currency, "EUR");
    assert_eq!(ex.from, date(2022, 1, 12));
    assert_eq!(ex.to, date(2022, 12, 2));
    assert_eq!(ex.opening_balance, None);
    assert_eq!(ex.transactions.len(), 4);

    let amounts: Vec<Amount> = ex.transactions.iter().map(|t| t.amount).collect();
    assert_eq!(
        amounts,
        vec![
            Amount::Paid(dec("5.99")),
            Amount::Paid(dec("20.00")),
            Amount::Paid(dec("1.61")),
            Amount::Received(dec("1000.00")),
        ]
    );

    let johnny = &ex.transactions[1];
    assert_eq!(johnny.counterparty, "Johnny");
    assert_eq!(johnny.value_date, date(2022, 10, 4));
    assert_eq!(johnny.posting_date, date(2022, 10, 4));
    assert_eq!(johnny.external_id, "");
    assert_eq!(johnny.description, "The gift");
    assert_eq!(johnny.reference_payer, "The gift");
    assert_eq!(johnny.foreign, None);
    assert_eq!(johnny.counterparty_account.as_deref(), Some("IT1234567890"));
    assert_eq!(ex.transactions[0].counterparty_account, None);

    assert_eq!(
        ex.transactions[2].foreign,
        Some(ForeignAmount {
            amount: dec("-1.66"),
            currency: "USD".into(),
            rate: dec("0.9698795181"),
        })
    );
    assert_eq!(ex.transactions[0].description, "");
}

#[test]
fn n26_ids_are_derived_from_content() {
    let first = N26::read(EXPORT.as_bytes()).unwrap();
    let second = N26::read(EXPORT.as_bytes()).unwrap();
    assert_eq!(first, second);

    let johnny = &first.transactions[1];
    assert_eq!(
        johnny.reclamation_id,
        derive_fitid(date(2022, 10, 4), dec("-20"), "Johnny", Some("The gift"))
    );

    let mut ids: Vec<&str> = first.transactions.iter().map(|t| t.reclamation_id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn n26_identical_rows_share_an_id() {
    let row = r#""2022-10-04","Johnny","IT1234567890","MoneyBeam","The gift","-20.00","","","""#;
    let input = format!("{HEADER}\n{row}\n{row}\n");
    let ex = N26::read(input.as_bytes()).unwrap();
    assert_eq!(ex.transactions.len(), 2);
    assert_eq!(ex.transactions[0].reclamation_id, ex.transactions[1].reclamation_id);
    // "-20.0" in the fixture and "-20.00" here hash the same
    let fixture = N26::read(EXPORT.as_bytes()).unwrap();
    assert_eq!(ex.transactions[0].reclamation_id, fixture.transactions[1].reclamation_id);
}

#[test]
fn n26_header_must_match() {
    let input = EXPORT.replacen("\"Payee\"", "\"Counterparty\"", 1);
    match N26::read(input.as_bytes()) {
        Err(ConvertError::Schema { line, expected, found }) => {
            assert_eq!(line, 1);
            assert!(expected.contains("Payee"));
            assert!(found.contains("Counterparty"));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn n26_short_rows_are_skipped() {
    let input = format!("{EXPORT}\"Exported by N26\"\n");
    let ex = N26::read(input.as_bytes()).unwrap();
    assert_eq!(ex.transactions.len(), 4);
}

#[test]
fn n26_without_rows_has_no_period() {
    let input = format!("{HEADER}\n");
    assert!(matches!(
        N26::read(input.as_bytes()),
        Err(ConvertError::Schema { .. })
    ));
    assert!(matches!(
        N26::read("".as_bytes()),
        Err(ConvertError::Schema { line: 1, .. })
    ));
}

#[test]
fn n26_bad_amount_is_format_error() {
    let input = EXPORT.replace("\"-5.99\",\"-5.99\"", "\"-5,99\",\"-5.99\"");
    assert!(matches!(
        N26::read(input.as_bytes()),
        Err(ConvertError::Format(_))
    ));
}

#[test]
fn n26_account_number_override() {
    let ex = Dialect::detect_and_parse(EXPORT.as_bytes()).unwrap();
    assert!(matches!(
        ex.ensure_account_number(),
        Err(ConvertError::MissingAccountNumber)
    ));
    let ex = ex.with_account_number("DE89 3704 0044 0532 0130 00");
    assert!(ex.ensure_account_number().is_ok());
}
