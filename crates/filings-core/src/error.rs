//! Error types for filing operations.
//!
//! This module defines [`FilingsError`] which covers the failures that can occur
//! while fetching filings, parsing XBRL instances, or handing malformed input to
//! the reconciliation core. Data sparsity is never an error: the reconciliation
//! and projection stages report it as diagnostics instead.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during filing operations.
#[derive(Error, Debug)]
pub enum FilingsError {
    /// Network-related errors (connection failures, timeouts, HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// The requested entity (ticker or CIK) was not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// The instance document for a filing could not be located.
    #[error("Document not found for accession {accession}")]
    DocumentNotFound {
        /// Accession number of the filing.
        accession: String,
    },

    /// Error parsing a response or an instance document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A duration period whose end does not fall after its start.
    #[error("Invalid period: end {end} is not after start {start}")]
    InvalidPeriod {
        /// Start of the rejected range.
        start: NaiveDate,
        /// End of the rejected range.
        end: NaiveDate,
    },

    /// Input that violates a caller contract (for example synthetic records
    /// handed back to the reconciliation engine).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`FilingsError`].
pub type Result<T> = std::result::Result<T, FilingsError>;
