//! The closed set of supported export dialects behind one parsing entry point.

use crate::{
    error::{ConvertError, Result},
    formats::{delavska::Delavska, n26::N26},
    model::AccountExport,
    traits::ReadFormat,
};
use encoding_rs::Encoding;
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Delavska hranilnica passbook export.
    Delavska,
    /// N26 direct-bank export.
    N26,
}

impl Dialect {
    /// Recognises a dialect from the first bytes of a raw export.
    pub fn sniff(raw: &[u8]) -> Option<Dialect> {
        let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
        let dialect = if raw.starts_with(b"Banka:") || raw.starts_with(b"\"Banka:\"") {
            Some(Dialect::Delavska)
        } else if raw.starts_with(b"\"Date\"") || raw.starts_with(b"Date,") {
            Some(Dialect::N26)
        } else {
            None
        };
        debug!(?dialect, "sniffed export dialect");
        dialect
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            Dialect::Delavska => Delavska::encoding(),
            Dialect::N26 => N26::encoding(),
        }
    }

    /// Decodes raw file bytes with this dialect's encoding.
    pub fn decode(self, raw: &[u8]) -> Result<Cow<'_, str>> {
        let encoding = self.encoding();
        let (text, had_errors) = encoding.decode_with_bom_removal(raw);
        if had_errors {
            return Err(ConvertError::Format(format!(
                "input is not valid {}",
                encoding.name()
            )));
        }
        Ok(text)
    }

    pub fn parse(self, text: &str) -> Result<AccountExport> {
        match self {
            Dialect::Delavska => Delavska::read(text.as_bytes()),
            Dialect::N26 => N26::read(text.as_bytes()),
        }
    }

    /// Sniffs, decodes and parses raw bytes in one step.
    pub fn detect_and_parse(raw: &[u8]) -> Result<AccountExport> {
        let dialect = Dialect::sniff(raw).ok_or(ConvertError::UnknownDialect)?;
        dialect.parse(&dialect.decode(raw)?)
    }
}
