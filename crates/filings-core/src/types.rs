//! Core data types for XBRL filings.
//!
//! This module defines the fundamental data structures:
//!
//! - [`FactRecord`] - A single tagged numeric observation
//! - [`Period`] / [`DateRange`] - Instant or duration reporting period
//! - [`Segment`] - Dimensional breakdown, or the consolidated sentinel
//! - [`SourceForm`] - Provenance tag separating raw and synthesized records
//! - [`FilingDescriptor`] / [`FormType`] - Filing metadata from the archive
//! - [`EntityId`] - SEC registrant identifier

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FilingsError, Result};
use crate::period::{PeriodClass, classify, span_days};

/// Label used for facts reported without a dimensional breakdown.
pub const CONSOLIDATED: &str = "Consolidated";

/// Date range of a duration fact. The end is always after the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = FilingsError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting ranges whose end is not after the start.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(FilingsError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Day count between start and end.
    #[must_use]
    pub fn days(&self) -> i64 {
        span_days(self.start, self.end)
    }

    /// Classification of this range.
    #[must_use]
    pub fn class(&self) -> PeriodClass {
        classify(self.start, self.end)
    }
}

/// Reporting period of a fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Point-in-time value (balance sheet style).
    Instant(NaiveDate),
    /// Value accumulated over a range (income and cash flow style).
    Duration(DateRange),
}

impl Period {
    /// Creates an instant period.
    #[must_use]
    pub const fn instant(date: NaiveDate) -> Self {
        Self::Instant(date)
    }

    /// Creates a duration period, validating the range.
    pub fn duration(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        DateRange::new(start, end).map(Self::Duration)
    }

    /// Instant date, or the end of the range for durations.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Duration(range) => range.end,
        }
    }

    /// Start of the range for durations.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        match self {
            Self::Instant(_) => None,
            Self::Duration(range) => Some(range.start),
        }
    }

    /// Returns the range of a duration period.
    #[must_use]
    pub const fn range(&self) -> Option<&DateRange> {
        match self {
            Self::Instant(_) => None,
            Self::Duration(range) => Some(range),
        }
    }

    /// Returns true for instant periods.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        matches!(self, Self::Instant(_))
    }

    /// Returns true for duration periods.
    #[must_use]
    pub const fn is_duration(&self) -> bool {
        matches!(self, Self::Duration(_))
    }

    /// Classification of a duration period; `None` for instants.
    #[must_use]
    pub fn class(&self) -> Option<PeriodClass> {
        self.range().map(DateRange::class)
    }
}

/// Dimensional breakdown of a fact.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Whole-company figure reported without any dimension.
    #[default]
    Consolidated,
    /// Figure reported for one member of a dimensional axis.
    Member {
        /// Axis the member belongs to (e.g. `StatementBusinessSegmentsAxis`).
        axis: Option<String>,
        /// Member name (e.g. `ConstructionIndustriesMember`).
        member: String,
    },
}

impl Segment {
    /// Creates a member segment without axis information.
    #[must_use]
    pub fn member(member: impl Into<String>) -> Self {
        Self::Member {
            axis: None,
            member: member.into(),
        }
    }

    /// Creates a member segment on a named axis.
    #[must_use]
    pub fn on_axis(axis: impl Into<String>, member: impl Into<String>) -> Self {
        Self::Member {
            axis: Some(axis.into()),
            member: member.into(),
        }
    }

    /// Segment label: the member name, or `"Consolidated"`.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Consolidated => CONSOLIDATED,
            Self::Member { member, .. } => member,
        }
    }

    /// Axis name for member segments.
    #[must_use]
    pub fn axis(&self) -> Option<&str> {
        match self {
            Self::Consolidated => None,
            Self::Member { axis, .. } => axis.as_deref(),
        }
    }

    /// Returns true for the consolidated sentinel.
    #[must_use]
    pub const fn is_consolidated(&self) -> bool {
        matches!(self, Self::Consolidated)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Provenance of a fact record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceForm {
    /// Reported in an annual report (10-K).
    AnnualReport,
    /// Reported in a quarterly report (10-Q).
    QuarterReport,
    /// Year-end balance copied forward as the fourth-quarter balance.
    SyntheticQ4Balance,
    /// Fourth-quarter flow derived as annual total minus the first three quarters.
    SyntheticQ4Flow,
    /// Discrete quarter differenced out of year-to-date values.
    NormalizedDiscreteQuarter,
}

impl SourceForm {
    /// Returns true for records produced by reconciliation.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(
            self,
            Self::SyntheticQ4Balance | Self::SyntheticQ4Flow | Self::NormalizedDiscreteQuarter
        )
    }

    /// Returns true for records that were reported in a filing.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        !self.is_synthetic()
    }

    /// Short label used in exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnnualReport => "10-K",
            Self::QuarterReport => "10-Q",
            Self::SyntheticQ4Balance => "10-K (Q4)",
            Self::SyntheticQ4Flow => "10-Q (Q4 Calculated)",
            Self::NormalizedDiscreteQuarter => "10-Q (Discrete)",
        }
    }
}

impl fmt::Display for SourceForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Periodic report form types handled by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report.
    #[serde(rename = "10-K")]
    TenK,
    /// Quarterly report.
    #[serde(rename = "10-Q")]
    TenQ,
}

impl FormType {
    /// Form name as used by EDGAR.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
        }
    }

    /// Provenance tag for facts parsed from this form.
    #[must_use]
    pub const fn source_form(&self) -> SourceForm {
        match self {
            Self::TenK => SourceForm::AnnualReport,
            Self::TenQ => SourceForm::QuarterReport,
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = FilingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "10-K" => Ok(Self::TenK),
            "10-Q" => Ok(Self::TenQ),
            other => Err(FilingsError::Parse(format!("Unsupported form type: {other}"))),
        }
    }
}

/// SEC registrant identifier.
///
/// The CIK is stored zero-padded to 10 digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    /// Zero-padded Central Index Key.
    pub cik: String,
    /// Lowercase ticker, used for instance document names.
    pub ticker: Option<String>,
}

impl EntityId {
    /// Creates an identifier from a CIK, padding it to 10 digits.
    #[must_use]
    pub fn new(cik: impl AsRef<str>) -> Self {
        Self {
            cik: format!("{:0>10}", cik.as_ref().trim()),
            ticker: None,
        }
    }

    /// Sets the ticker (stored lowercase).
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl AsRef<str>) -> Self {
        self.ticker = Some(ticker.as_ref().to_lowercase());
        self
    }

    /// CIK without leading zeros, as used in archive paths.
    #[must_use]
    pub fn cik_unpadded(&self) -> &str {
        let trimmed = self.cik.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ticker {
            Some(ticker) => write!(f, "{} ({})", self.cik, ticker.to_uppercase()),
            None => write!(f, "{}", self.cik),
        }
    }
}

/// Metadata for one periodic filing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDescriptor {
    /// Accession number (e.g. `0000018230-23-000067`).
    pub accession: String,
    /// Date the filing was submitted.
    pub filing_date: NaiveDate,
    /// Period end date the filing reports on.
    pub report_date: NaiveDate,
    /// Form type.
    pub form: FormType,
    /// Primary document name within the filing folder.
    pub primary_document: Option<String>,
}

impl FilingDescriptor {
    /// Creates a descriptor with required fields.
    #[must_use]
    pub fn new(
        accession: impl Into<String>,
        filing_date: NaiveDate,
        report_date: NaiveDate,
        form: FormType,
    ) -> Self {
        Self {
            accession: accession.into(),
            filing_date,
            report_date,
            form,
            primary_document: None,
        }
    }

    /// Sets the primary document name.
    #[must_use]
    pub fn with_primary_document(mut self, document: impl Into<String>) -> Self {
        self.primary_document = Some(document.into());
        self
    }
}

/// A single tagged numeric observation.
///
/// Records are immutable once built; the builder methods consume `self`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    concept: String,
    value: f64,
    period: Period,
    #[serde(default)]
    segment: Segment,
    #[serde(default)]
    business_segment: Option<String>,
    source_form: SourceForm,
    #[serde(default)]
    filing_id: Option<String>,
    #[serde(default)]
    filing_date: Option<NaiveDate>,
}

impl FactRecord {
    /// Creates a consolidated record without provenance.
    #[must_use]
    pub fn new(
        concept: impl Into<String>,
        value: f64,
        period: Period,
        source_form: SourceForm,
    ) -> Self {
        Self {
            concept: concept.into(),
            value,
            period,
            segment: Segment::Consolidated,
            business_segment: None,
            source_form,
            filing_id: None,
            filing_date: None,
        }
    }

    /// Sets the segment.
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = segment;
        self
    }

    /// Sets the secondary business segment label.
    #[must_use]
    pub fn with_business_segment(mut self, label: impl Into<String>) -> Self {
        self.business_segment = Some(label.into());
        self
    }

    /// Copies accession number and filing date from a filing.
    #[must_use]
    pub fn with_provenance(mut self, filing: &FilingDescriptor) -> Self {
        self.filing_id = Some(filing.accession.clone());
        self.filing_date = Some(filing.filing_date);
        self
    }

    /// Sets accession number and filing date directly.
    #[must_use]
    pub fn with_filing(mut self, filing_id: impl Into<String>, filing_date: NaiveDate) -> Self {
        self.filing_id = Some(filing_id.into());
        self.filing_date = Some(filing_date);
        self
    }

    /// Builds a record of the same concept, segment and provenance with a new
    /// value, period and source form.
    #[must_use]
    pub fn derive(&self, value: f64, period: Period, source_form: SourceForm) -> Self {
        Self {
            concept: self.concept.clone(),
            value,
            period,
            segment: self.segment.clone(),
            business_segment: self.business_segment.clone(),
            source_form,
            filing_id: self.filing_id.clone(),
            filing_date: self.filing_date,
        }
    }

    /// Concept name.
    #[must_use]
    pub fn concept(&self) -> &str {
        &self.concept
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Reporting period.
    #[must_use]
    pub const fn period(&self) -> &Period {
        &self.period
    }

    /// Instant date, or the end of the duration.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.period.end()
    }

    /// Classification of a duration period; `None` for instants.
    #[must_use]
    pub fn class(&self) -> Option<PeriodClass> {
        self.period.class()
    }

    /// Segment.
    #[must_use]
    pub const fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Secondary business segment label.
    #[must_use]
    pub fn business_segment(&self) -> Option<&str> {
        self.business_segment.as_deref()
    }

    /// Provenance tag.
    #[must_use]
    pub const fn source_form(&self) -> SourceForm {
        self.source_form
    }

    /// Accession number of the source filing.
    #[must_use]
    pub fn filing_id(&self) -> Option<&str> {
        self.filing_id.as_deref()
    }

    /// Filing date of the source filing.
    #[must_use]
    pub const fn filing_date(&self) -> Option<NaiveDate> {
        self.filing_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_requires_end_after_start() {
        assert!(Period::duration(date(2023, 1, 1), date(2023, 3, 31)).is_ok());
        assert!(matches!(
            Period::duration(date(2023, 3, 31), date(2023, 3, 31)),
            Err(FilingsError::InvalidPeriod { .. })
        ));
        assert!(Period::duration(date(2023, 3, 31), date(2023, 1, 1)).is_err());
    }

    #[test]
    fn test_period_accessors() {
        let instant = Period::instant(date(2023, 12, 31));
        assert!(instant.is_instant());
        assert_eq!(instant.end(), date(2023, 12, 31));
        assert_eq!(instant.start(), None);
        assert_eq!(instant.class(), None);

        let flow = Period::duration(date(2023, 4, 1), date(2023, 6, 30)).unwrap();
        assert!(flow.is_duration());
        assert_eq!(flow.start(), Some(date(2023, 4, 1)));
        assert_eq!(flow.class(), Some(PeriodClass::Discrete));
    }

    #[test]
    fn test_segment_labels() {
        assert_eq!(Segment::Consolidated.label(), "Consolidated");
        assert_eq!(Segment::default(), Segment::Consolidated);
        let seg = Segment::on_axis("StatementBusinessSegmentsAxis", "ConstructionIndustriesMember");
        assert_eq!(seg.label(), "ConstructionIndustriesMember");
        assert_eq!(seg.axis(), Some("StatementBusinessSegmentsAxis"));
        assert!(!seg.is_consolidated());
        assert_eq!(Segment::member("X").axis(), None);
    }

    #[test]
    fn test_source_form_provenance() {
        assert!(SourceForm::AnnualReport.is_raw());
        assert!(SourceForm::QuarterReport.is_raw());
        assert!(SourceForm::SyntheticQ4Balance.is_synthetic());
        assert!(SourceForm::SyntheticQ4Flow.is_synthetic());
        assert!(SourceForm::NormalizedDiscreteQuarter.is_synthetic());
        assert_eq!(FormType::TenK.source_form(), SourceForm::AnnualReport);
        assert_eq!(FormType::TenQ.source_form(), SourceForm::QuarterReport);
    }

    #[test]
    fn test_form_type_parsing() {
        assert_eq!("10-K".parse::<FormType>().unwrap(), FormType::TenK);
        assert_eq!("10-Q".parse::<FormType>().unwrap(), FormType::TenQ);
        assert!("8-K".parse::<FormType>().is_err());
        assert_eq!(FormType::TenQ.to_string(), "10-Q");
    }

    #[test]
    fn test_entity_padding() {
        let entity = EntityId::new("18230").with_ticker("CAT");
        assert_eq!(entity.cik, "0000018230");
        assert_eq!(entity.cik_unpadded(), "18230");
        assert_eq!(entity.ticker.as_deref(), Some("cat"));
    }

    #[test]
    fn test_fact_derive_keeps_identity() {
        let filing = FilingDescriptor::new(
            "0000018230-24-000008",
            date(2024, 2, 16),
            date(2023, 12, 31),
            FormType::TenK,
        );
        let fact = FactRecord::new(
            "Revenues",
            1000.0,
            Period::duration(date(2023, 1, 1), date(2023, 12, 31)).unwrap(),
            SourceForm::AnnualReport,
        )
        .with_segment(Segment::member("FinancialProductsMember"))
        .with_provenance(&filing);

        let q4 = fact.derive(
            300.0,
            Period::duration(date(2023, 10, 1), date(2023, 12, 31)).unwrap(),
            SourceForm::SyntheticQ4Flow,
        );
        assert_eq!(q4.concept(), "Revenues");
        assert_eq!(q4.segment().label(), "FinancialProductsMember");
        assert_eq!(q4.filing_id(), Some("0000018230-24-000008"));
        assert_eq!(q4.source_form(), SourceForm::SyntheticQ4Flow);
        assert_eq!(q4.value(), 300.0);
    }

    #[test]
    fn test_fact_deserialize_rejects_inverted_range() {
        let json = r#"{
            "concept": "Revenues",
            "value": 1.0,
            "period": {"duration": {"start": "2023-06-30", "end": "2023-04-01"}},
            "source_form": "QuarterReport"
        }"#;
        assert!(serde_json::from_str::<FactRecord>(json).is_err());

        let json = r#"{
            "concept": "Assets",
            "value": 5.0,
            "period": {"instant": "2023-12-31"},
            "source_form": "AnnualReport"
        }"#;
        let fact: FactRecord = serde_json::from_str(json).unwrap();
        assert!(fact.segment().is_consolidated());
        assert_eq!(fact.end_date(), date(2023, 12, 31));
    }
}
