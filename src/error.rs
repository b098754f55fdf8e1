//! Error types for the ISR decoding library.

use crate::types::{ChecksumPart, IsrVariant};
use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding or building ISR data.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing CSV.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The type prefix and length match no known ISR variant.
    #[error("This kind of ISR is not supported: prefix '{0}'")]
    UnsupportedFormat(String),

    /// The prefix selected a variant but the length does not fit it.
    #[error("Malformed {variant} string: expected {expected} characters, got {actual}")]
    MalformedInput {
        variant: IsrVariant,
        expected: usize,
        actual: usize,
    },

    /// An embedded check digit does not match the computed one.
    #[error("ISR checksum error in {0} part")]
    Checksum(ChecksumPart),

    /// The beneficiary account slice cannot be formatted.
    #[error("Invalid beneficiary account: {0}")]
    Format(String),

    /// Invalid amount format.
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// A non-decimal character was handed to the checksum engine.
    #[error("Invalid digit sequence: {0}")]
    InvalidDigit(String),

    /// Invalid ISR reference.
    #[error("Invalid ISR reference: {0}")]
    InvalidReference(String),

    /// Invalid ISR subscription number.
    #[error("Invalid ISR subscription number: {0}")]
    InvalidSubscription(String),

    /// General parsing error.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Currency other than CHF or EUR.
    #[error("Unsupported currency: {0}")]
    InvalidCurrency(String),
}
