//! In-memory filing source.

use async_trait::async_trait;
use chrono::NaiveDate;
use filings_core::{EntityId, FilingDescriptor, FilingSource, FilingsError, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
struct StoredFiling {
    filing: FilingDescriptor,
    document: Option<Vec<u8>>,
}

/// Filing source backed by documents held in memory.
///
/// Useful for tests, replaying previously downloaded filings, and offline
/// runs. Entities are keyed by CIK.
#[derive(Debug, Default)]
pub struct InMemoryFilingSource {
    entities: RwLock<HashMap<String, Vec<StoredFiling>>>,
}

impl InMemoryFilingSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filing with its instance document, replacing any filing with
    /// the same accession number.
    pub async fn insert(
        &self,
        entity: &EntityId,
        filing: FilingDescriptor,
        document: impl Into<Vec<u8>>,
    ) {
        self.store(entity, filing, Some(document.into())).await;
    }

    /// Adds a filing that is listed but has no retrievable document.
    pub async fn insert_listing(&self, entity: &EntityId, filing: FilingDescriptor) {
        self.store(entity, filing, None).await;
    }

    async fn store(&self, entity: &EntityId, filing: FilingDescriptor, document: Option<Vec<u8>>) {
        let mut entities = self.entities.write().await;
        let filings = entities.entry(entity.cik.clone()).or_default();
        filings.retain(|stored| stored.filing.accession != filing.accession);
        filings.push(StoredFiling { filing, document });
    }

    /// Number of filings held for an entity.
    pub async fn len(&self, entity: &EntityId) -> usize {
        self.entities
            .read()
            .await
            .get(&entity.cik)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl FilingSource for InMemoryFilingSource {
    fn name(&self) -> &str {
        "In-memory"
    }

    #[instrument(skip(self), fields(cik = %entity.cik))]
    async fn fetch_filing_list(
        &self,
        entity: &EntityId,
        since: NaiveDate,
    ) -> Result<Vec<FilingDescriptor>> {
        let entities = self.entities.read().await;
        let stored = entities
            .get(&entity.cik)
            .ok_or_else(|| FilingsError::EntityNotFound(entity.cik.clone()))?;

        let mut filings: Vec<FilingDescriptor> = stored
            .iter()
            .filter(|s| s.filing.report_date >= since)
            .map(|s| s.filing.clone())
            .collect();
        filings.sort_by_key(|f| f.report_date);
        debug!("Listed {} filings", filings.len());
        Ok(filings)
    }

    #[instrument(skip(self, filing), fields(cik = %entity.cik, accession = %filing.accession))]
    async fn fetch_filing_document(
        &self,
        entity: &EntityId,
        filing: &FilingDescriptor,
    ) -> Result<Vec<u8>> {
        let entities = self.entities.read().await;
        entities
            .get(&entity.cik)
            .and_then(|stored| {
                stored
                    .iter()
                    .find(|s| s.filing.accession == filing.accession)
            })
            .and_then(|s| s.document.clone())
            .ok_or_else(|| FilingsError::DocumentNotFound {
                accession: filing.accession.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filings_core::FormType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filing(accession: &str, report: NaiveDate) -> FilingDescriptor {
        FilingDescriptor::new(accession, report, report, FormType::TenQ)
    }

    #[tokio::test]
    async fn test_listing_is_sorted_and_filtered() {
        let source = InMemoryFilingSource::new();
        let entity = EntityId::new("18230");
        source
            .insert(&entity, filing("b", date(2023, 6, 30)), b"b".to_vec())
            .await;
        source
            .insert(&entity, filing("a", date(2023, 3, 31)), b"a".to_vec())
            .await;
        source
            .insert(&entity, filing("old", date(2022, 9, 30)), b"old".to_vec())
            .await;

        let listed = source
            .fetch_filing_list(&entity, date(2023, 1, 1))
            .await
            .unwrap();
        let accessions: Vec<&str> = listed.iter().map(|f| f.accession.as_str()).collect();
        assert_eq!(accessions, vec!["a", "b"]);
        assert_eq!(source.len(&entity).await, 3);
    }

    #[tokio::test]
    async fn test_insert_replaces_same_accession() {
        let source = InMemoryFilingSource::new();
        let entity = EntityId::new("18230");
        let f = filing("a", date(2023, 3, 31));
        source.insert(&entity, f.clone(), b"first".to_vec()).await;
        source.insert(&entity, f.clone(), b"second".to_vec()).await;

        assert_eq!(source.len(&entity).await, 1);
        let document = source.fetch_filing_document(&entity, &f).await.unwrap();
        assert_eq!(document, b"second");
    }

    #[tokio::test]
    async fn test_missing_document() {
        let source = InMemoryFilingSource::new();
        let entity = EntityId::new("18230");
        let f = filing("a", date(2023, 3, 31));
        source.insert_listing(&entity, f.clone()).await;

        let result = source.fetch_filing_document(&entity, &f).await;
        assert!(matches!(result, Err(FilingsError::DocumentNotFound { .. })));
        assert!(matches!(
            source.fetch_filing_list(&EntityId::new("1"), date(2023, 1, 1)).await,
            Err(FilingsError::EntityNotFound(_))
        ));
    }
}
