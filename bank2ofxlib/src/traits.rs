//! Reading exports and writing documents over std::io::{BufRead, Write}.

use crate::{document::OfxDocument, error::Result, model::AccountExport};
use encoding_rs::Encoding;
use std::io::{BufRead, Write};

/// A bank export dialect. Input is already-decoded UTF-8 text.
pub trait ReadFormat {
    /// Character encoding the bank writes this dialect in.
    fn encoding() -> &'static Encoding;

    fn read<R: BufRead>(r: R) -> Result<AccountExport>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, doc: &OfxDocument) -> Result<()>;
}
