//! Collaborator traits at the fetch and parse boundary.
//!
//! - [`FilingSource`] - Lists periodic filings and fetches their instance documents
//! - [`FactParser`] - Turns an instance document into [`FactRecord`]s

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{EntityId, FactRecord, FilingDescriptor},
};

/// Source of periodic filings for an entity.
#[async_trait]
pub trait FilingSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Lists 10-K and 10-Q filings whose report date is on or after `since`,
    /// ordered by report date ascending.
    async fn fetch_filing_list(
        &self,
        entity: &EntityId,
        since: NaiveDate,
    ) -> Result<Vec<FilingDescriptor>>;

    /// Fetches the XBRL instance document of one filing.
    async fn fetch_filing_document(
        &self,
        entity: &EntityId,
        filing: &FilingDescriptor,
    ) -> Result<Vec<u8>>;
}

/// Parser from instance document bytes to fact records.
pub trait FactParser: Send + Sync + Debug {
    /// Extracts numeric facts, tagging each with the filing's provenance.
    fn parse_facts(&self, document: &[u8], filing: &FilingDescriptor) -> Result<Vec<FactRecord>>;
}
