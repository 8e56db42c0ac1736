//! Single error type of the public API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    /// A date or amount token broke its dialect's lexical rules.
    #[error("format error: {0}")]
    Format(String),

    /// A metadata or header line did not match its fixed position in the export.
    #[error("schema error at line {line}: expected {expected}, found {found}")]
    Schema {
        line: u64,
        expected: String,
        found: String,
    },

    #[error("the export carries no account number; pass one explicitly")]
    MissingAccountNumber,

    #[error("unrecognised export dialect")]
    UnknownDialect,
}

impl ConvertError {
    pub(crate) fn schema(line: u64, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ConvertError::Schema {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
