#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for XBRL filing reconciliation.
//!
//! This crate provides the foundational abstractions shared by every stage:
//!
//! - [`FactRecord`](types::FactRecord) - A tagged numeric observation
//! - [`FactStore`](store::FactStore) - Append-only fact collection
//! - [`classify`](period::classify) - Discrete / year-to-date period classifier
//! - [`AxisPriority`](axis::AxisPriority) - Precedence of dimensional axes
//! - [`FilingSource`](provider::FilingSource) - Filing list and document retrieval
//! - [`FactParser`](provider::FactParser) - Instance document parsing

/// Dimensional axis precedence.
pub mod axis;
/// Error types for filing operations.
pub mod error;
/// Reporting period classification.
pub mod period;
/// Collaborator traits for fetching and parsing filings.
pub mod provider;
/// Append-only fact collection.
pub mod store;
/// Core data types (FactRecord, Period, Segment, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use axis::AxisPriority;
pub use error::{FilingsError, Result};
pub use period::{PeriodClass, classify, quarter_label};
pub use provider::{FactParser, FilingSource};
pub use store::FactStore;
pub use types::{
    CONSOLIDATED, DateRange, EntityId, FactRecord, FilingDescriptor, FormType, Period, Segment,
    SourceForm,
};
