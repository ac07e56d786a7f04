#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Statement projection for reconciled XBRL facts.
//!
//! - [`StatementSchema`] - Ordered line items of one statement
//! - [`TagCatalog`] / [`SegmentAliases`] - Candidate tags and segment codes
//! - [`project`] - Builds a line item by period [`Table`]
//! - [`defaults`] - Shipped catalog and statements

pub mod catalog;
pub mod defaults;
pub mod project;
pub mod schema;
pub mod table;

pub use catalog::{SegmentAliases, TagCatalog};
pub use defaults::{default_aliases, default_catalog, default_schemas};
pub use project::project;
pub use schema::{
    LineItem, PeriodAxis, SchemaLine, SegmentSelector, StatementKind, StatementSchema,
};
pub use table::{RowKind, Table, TableRow};
