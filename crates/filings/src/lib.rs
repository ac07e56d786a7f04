#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Quarterly financial statements from SEC XBRL filings.
//!
//! This crate re-exports the workspace crates and provides
//! [`FinancialsPipeline`], which lists an entity's 10-K and 10-Q filings,
//! parses their facts, reconciles them into discrete quarters and projects
//! the configured statements.
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR client and XBRL instance parser (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use filings::{EdgarClient, FinancialsPipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> filings::Result<()> {
//!     let pipeline = FinancialsPipeline::edgar(
//!         "MyApp/1.0 (contact@example.com)",
//!         PipelineConfig::default(),
//!     )?;
//!     let entity = EdgarClient::new("MyApp/1.0 (contact@example.com)")?
//!         .lookup_cik("CAT")
//!         .await?;
//!
//!     let book = pipeline.run(&entity).await?;
//!     for table in &book.tables {
//!         println!("{}", table.to_dataframe()?);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use filings_core::*;

// Reconciliation and projection
pub use filings_reconcile::{
    Diagnostic, DiagnosticKind, Q4Scope, ReconcileOptions, Reconciliation, reconcile,
};
pub use filings_statements::{
    LineItem, PeriodAxis, RowKind, SchemaLine, SegmentAliases, SegmentSelector, StatementKind,
    StatementSchema, Table, TableRow, TagCatalog, default_aliases, default_catalog,
    default_schemas, project,
};

// EDGAR
#[cfg(feature = "edgar")]
pub use filings_edgar::{EdgarClient, FixedIntervalPacer, InstanceParser, NoPacing, Pacer};

mod memory;
mod pipeline;

pub use memory::InMemoryFilingSource;
pub use pipeline::{
    CollectedFacts, FinancialsPipeline, PipelineConfig, SkippedFiling, StatementBook,
};
