//! Append-only fact collection.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

use crate::error::{FilingsError, Result};
use crate::types::FactRecord;

/// Ordered, append-only collection of [`FactRecord`]s.
///
/// Insertion order is preserved and used as the last tie-break wherever
/// competing records have to be ranked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FactStore {
    facts: Vec<FactRecord>,
}

impl FactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, fact: FactRecord) {
        self.facts.push(fact);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FactRecord> {
        self.facts.iter()
    }

    /// Records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FactRecord] {
        &self.facts
    }

    /// Records reported in filings.
    pub fn raw(&self) -> impl Iterator<Item = &FactRecord> {
        self.facts.iter().filter(|f| f.source_form().is_raw())
    }

    /// Records produced by reconciliation.
    pub fn synthetic(&self) -> impl Iterator<Item = &FactRecord> {
        self.facts.iter().filter(|f| f.source_form().is_synthetic())
    }

    /// Exports every record as one row.
    ///
    /// Columns: `concept`, `value`, `start`, `end`, `segment`, `axis`,
    /// `business_segment`, `source_form`, `filing_id`, `filing_date`.
    /// Date columns use the polars `Date` type; `start` is null for instants.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let n = self.facts.len();
        let mut concepts = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        let mut starts: Vec<Option<i32>> = Vec::with_capacity(n);
        let mut ends: Vec<i32> = Vec::with_capacity(n);
        let mut segments = Vec::with_capacity(n);
        let mut axes: Vec<Option<&str>> = Vec::with_capacity(n);
        let mut business: Vec<Option<&str>> = Vec::with_capacity(n);
        let mut forms = Vec::with_capacity(n);
        let mut filing_ids: Vec<Option<&str>> = Vec::with_capacity(n);
        let mut filing_dates: Vec<Option<i32>> = Vec::with_capacity(n);

        for fact in &self.facts {
            concepts.push(fact.concept());
            values.push(fact.value());
            starts.push(fact.period().start().map(epoch_days));
            ends.push(epoch_days(fact.end_date()));
            segments.push(fact.segment().label());
            axes.push(fact.segment().axis());
            business.push(fact.business_segment());
            forms.push(fact.source_form().as_str());
            filing_ids.push(fact.filing_id());
            filing_dates.push(fact.filing_date().map(epoch_days));
        }

        let date_column = |name: &str, col: Column| -> Result<Column> {
            col.cast(&DataType::Date)
                .map_err(|e| FilingsError::Other(format!("{name}: {e}")))
        };

        let df = DataFrame::new(vec![
            Column::new("concept".into(), concepts),
            Column::new("value".into(), values),
            date_column("start", Column::new("start".into(), starts))?,
            date_column("end", Column::new("end".into(), ends))?,
            Column::new("segment".into(), segments),
            Column::new("axis".into(), axes),
            Column::new("business_segment".into(), business),
            Column::new("source_form".into(), forms),
            Column::new("filing_id".into(), filing_ids),
            date_column("filing_date", Column::new("filing_date".into(), filing_dates))?,
        ])
        .map_err(|e| FilingsError::Other(e.to_string()))?;

        debug!(rows = df.height(), "Exported fact store");
        Ok(df)
    }
}

impl Extend<FactRecord> for FactStore {
    fn extend<T: IntoIterator<Item = FactRecord>>(&mut self, iter: T) {
        self.facts.extend(iter);
    }
}

impl FromIterator<FactRecord> for FactStore {
    fn from_iter<T: IntoIterator<Item = FactRecord>>(iter: T) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<FactRecord>> for FactStore {
    fn from(facts: Vec<FactRecord>) -> Self {
        Self { facts }
    }
}

impl IntoIterator for FactStore {
    type Item = FactRecord;
    type IntoIter = std::vec::IntoIter<FactRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.into_iter()
    }
}

impl<'a> IntoIterator for &'a FactStore {
    type Item = &'a FactRecord;
    type IntoIter = std::slice::Iter<'a, FactRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

/// Days from 0001-01-01 to 1970-01-01 in the proleptic Gregorian calendar.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Period, Segment, SourceForm};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(epoch_days(date(1970, 1, 1)), 0);
        assert_eq!(epoch_days(date(1970, 1, 2)), 1);
        assert_eq!(epoch_days(date(1969, 12, 31)), -1);
        assert_eq!(epoch_days(date(2023, 6, 30)), 19_538);
    }

    fn sample() -> FactStore {
        let mut store = FactStore::new();
        store.push(
            FactRecord::new(
                "Revenues",
                100.0,
                Period::duration(date(2023, 4, 1), date(2023, 6, 30)).unwrap(),
                SourceForm::QuarterReport,
            )
            .with_filing("0000018230-23-000050", date(2023, 8, 3)),
        );
        store.push(
            FactRecord::new(
                "Assets",
                900.0,
                Period::instant(date(2023, 12, 31)),
                SourceForm::SyntheticQ4Balance,
            )
            .with_segment(Segment::on_axis(
                "StatementBusinessSegmentsAxis",
                "FinancialProductsMember",
            )),
        );
        store
    }

    #[test]
    fn test_raw_and_synthetic_views() {
        let store = sample();
        assert_eq!(store.len(), 2);
        assert_eq!(store.raw().count(), 1);
        assert_eq!(store.synthetic().count(), 1);
        assert_eq!(store.raw().next().unwrap().concept(), "Revenues");
    }

    #[test]
    fn test_to_dataframe() {
        let df = sample().to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 10);
        assert_eq!(df.column("start").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("start").unwrap().null_count(), 1);
        assert_eq!(df.column("axis").unwrap().null_count(), 1);
        assert_eq!(df.column("filing_date").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_store_exports_empty_frame() {
        let df = FactStore::new().to_dataframe().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 10);
    }
}
