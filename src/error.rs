//! Error types for CSV reading

use thiserror::Error;

/// Errors raised while reading CSV input
#[derive(Debug, Error)]
pub enum CsvError {
    /// I/O failure from the underlying stream
    #[error("read error: {0}")]
    ReadError(String),

    /// `read_header` was called on an already exhausted stream
    #[error("missing header: stream contains no rows")]
    MissingHeader,

    /// A field index past the end of the record was requested
    #[error("field index {index} out of range (record has {len} fields)")]
    FieldOutOfRange {
        /// The requested index
        index: usize,
        /// Number of fields in the record
        len: usize,
    },
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;
