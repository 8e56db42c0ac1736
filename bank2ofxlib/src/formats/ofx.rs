//! OFX 2.2 writer: one line, no carriage returns.

use crate::{
    document::*,
    error::{ConvertError, Result},
    traits::WriteFormat,
};
use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io::Write;

const OFX_HEADER: &str =
    r#"<?OFX OFXHEADER="200" VERSION="220" SECURITY="NONE" OLDFILEUID="NONE" NEWFILEUID="NONE"?>"#;

type XmlResult = std::result::Result<(), quick_xml::Error>;

pub struct Ofx;

impl WriteFormat for Ofx {
    fn write<W: Write>(mut w: W, doc: &OfxDocument) -> Result<()> {
        let mut wr = Writer::new(&mut w);
        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
            .map_err(xml)?;
        wr.get_mut().write_all(OFX_HEADER.as_bytes())?;

        open(&mut wr, "OFX").map_err(xml)?;
        write_signon(&mut wr, &doc.signon).map_err(xml)?;
        write_statement(&mut wr, &doc.statement).map_err(xml)?;
        close(&mut wr, "OFX").map_err(xml)?;
        Ok(())
    }
}

impl Ofx {
    /// Renders the whole document into memory.
    pub fn render(doc: &OfxDocument) -> Result<String> {
        let mut buf = Vec::new();
        Ofx::write(&mut buf, doc)?;
        String::from_utf8(buf).map_err(|e| ConvertError::Xml(e.to_string()))
    }
}

fn write_signon<W: Write>(wr: &mut Writer<W>, s: &SignOn) -> XmlResult {
    open(wr, "SIGNONMSGSRSV1")?;
    open(wr, "SONRS")?;
    write_status(wr, &s.status)?;
    element(wr, "DTSERVER", &ofx_datetime(s.server_time))?;
    element(wr, "LANGUAGE", &s.language)?;
    open(wr, "FI")?;
    element(wr, "ORG", &s.org)?;
    close(wr, "FI")?;
    close(wr, "SONRS")?;
    close(wr, "SIGNONMSGSRSV1")
}

fn write_statement<W: Write>(wr: &mut Writer<W>, st: &StatementResponse) -> XmlResult {
    open(wr, "BANKMSGSRSV1")?;
    open(wr, "STMTTRNRS")?;
    element(wr, "TRNUID", &st.trnuid)?;
    write_status(wr, &st.status)?;

    open(wr, "STMTRS")?;
    element(wr, "CURDEF", &st.currency)?;
    open(wr, "BANKACCTFROM")?;
    element(wr, "BANKID", &st.account.bank_id)?;
    element(wr, "ACCTID", &st.account.account_id)?;
    element(wr, "ACCTTYPE", st.account.account_type.as_str())?;
    close(wr, "BANKACCTFROM")?;

    open(wr, "BANKTRANLIST")?;
    element(wr, "DTSTART", &ofx_date(st.transactions.start))?;
    element(wr, "DTEND", &ofx_date(st.transactions.end))?;
    for e in &st.transactions.entries {
        write_entry(wr, e)?;
    }
    close(wr, "BANKTRANLIST")?;

    open(wr, "LEDGERBAL")?;
    element(wr, "BALAMT", &st.ledger_balance.amount.to_string())?;
    element(wr, "DTASOF", &ofx_date(st.ledger_balance.as_of))?;
    close(wr, "LEDGERBAL")?;

    close(wr, "STMTRS")?;
    close(wr, "STMTTRNRS")?;
    close(wr, "BANKMSGSRSV1")
}

fn write_entry<W: Write>(wr: &mut Writer<W>, e: &StatementEntry) -> XmlResult {
    open(wr, "STMTTRN")?;
    element(wr, "TRNTYPE", e.kind.as_str())?;
    element(wr, "DTPOSTED", &ofx_date(e.posted))?;
    if let Some(d) = e.available {
        element(wr, "DTAVAIL", &ofx_date(d))?;
    }
    element(wr, "TRNAMT", &e.amount.to_string())?;
    element(wr, "FITID", &e.fitid)?;
    if let Some(r) = &e.refnum {
        element(wr, "REFNUM", r)?;
    }
    if let Some(n) = &e.name {
        element(wr, "NAME", n)?;
    }
    if let Some(m) = &e.memo {
        element(wr, "MEMO", m)?;
    }
    if let Some(c) = &e.orig_currency {
        open(wr, "ORIGCURRENCY")?;
        element(wr, "CURRATE", &c.rate.to_string())?;
        element(wr, "CURSYM", &c.symbol)?;
        close(wr, "ORIGCURRENCY")?;
    }
    close(wr, "STMTTRN")
}

fn write_status<W: Write>(wr: &mut Writer<W>, s: &Status) -> XmlResult {
    open(wr, "STATUS")?;
    element(wr, "CODE", &s.code.to_string())?;
    element(wr, "SEVERITY", s.severity.as_str())?;
    close(wr, "STATUS")
}

fn open<W: Write>(wr: &mut Writer<W>, name: &str) -> XmlResult {
    wr.write_event(Event::Start(BytesStart::new(name)))
}

fn close<W: Write>(wr: &mut Writer<W>, name: &str) -> XmlResult {
    wr.write_event(Event::End(BytesEnd::new(name)))
}

fn element<W: Write>(wr: &mut Writer<W>, name: &str, text: &str) -> XmlResult {
    let text = text.replace(['\r', '\n'], "");
    open(wr, name)?;
    wr.write_event(Event::Text(BytesText::new(&text)))?;
    close(wr, name)
}

fn ofx_date(d: NaiveDate) -> String {
    format!("{}000000.000[+0:UTC]", d.format("%Y%m%d"))
}

fn ofx_datetime(t: DateTime<Utc>) -> String {
    format!("{}[+0:UTC]", t.format("%Y%m%d%H%M%S%.3f"))
}

fn xml<E: std::fmt::Display>(e: E) -> ConvertError {
    ConvertError::Xml(e.to_string())
}
