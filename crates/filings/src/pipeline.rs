//! Fetch, parse, reconcile and project in one pass.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use filings_core::{
    EntityId, FactParser, FactRecord, FactStore, FilingDescriptor, FilingSource, FilingsError,
    Result,
};
use filings_reconcile::{Diagnostic, ReconcileOptions, reconcile};
use filings_statements::{StatementSchema, Table, TagCatalog, default_catalog, default_schemas, project};

/// Pipeline settings.
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Earliest report date of the filings to collect.
    pub since: NaiveDate,
    /// Reconciliation options. The axis priority also drives projection.
    pub reconcile: ReconcileOptions,
    /// Candidate tags per base concept.
    pub catalog: TagCatalog,
    /// Statements to project, in output order.
    pub schemas: Vec<StatementSchema>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            since: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            reconcile: ReconcileOptions::default(),
            catalog: default_catalog(),
            schemas: default_schemas(),
        }
    }
}

impl PipelineConfig {
    /// Parses a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FilingsError::Config(format!("Invalid pipeline config: {}", e)))
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FilingsError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Sets the earliest report date.
    #[must_use]
    pub fn with_since(mut self, since: NaiveDate) -> Self {
        self.since = since;
        self
    }

    /// Replaces the reconciliation options.
    #[must_use]
    pub fn with_reconcile(mut self, options: ReconcileOptions) -> Self {
        self.reconcile = options;
        self
    }

    /// Replaces the statements to project.
    #[must_use]
    pub fn with_schemas(mut self, schemas: Vec<StatementSchema>) -> Self {
        self.schemas = schemas;
        self
    }
}

/// A filing that contributed no facts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFiling {
    /// Accession number of the filing.
    pub accession: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Raw facts gathered from every listed filing.
#[derive(Clone, Debug, Default)]
pub struct CollectedFacts {
    /// Parsed facts in filing order.
    pub facts: FactStore,
    /// Filings whose document could not be fetched or parsed.
    pub skipped: Vec<SkippedFiling>,
}

/// Reconciled facts and the projected statements.
#[derive(Clone, Debug)]
pub struct StatementBook {
    /// Raw and synthesized facts.
    pub facts: FactStore,
    /// One table per configured statement, in configuration order.
    pub tables: Vec<Table>,
    /// Degraded reconciliation results.
    pub diagnostics: Vec<Diagnostic>,
    /// Filings that contributed no facts.
    pub skipped: Vec<SkippedFiling>,
}

impl StatementBook {
    /// Table by statement name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Runs filings from a [`FilingSource`] through a [`FactParser`], the
/// reconciliation engine and statement projection.
///
/// Filings are fetched one at a time; any pacing is up to the source.
///
/// # Example
///
/// ```rust,ignore
/// use filings::{EdgarClient, FinancialsPipeline, InstanceParser, PipelineConfig};
/// use std::sync::Arc;
///
/// let client = EdgarClient::new("MyApp/1.0 (contact@example.com)")?;
/// let entity = client.lookup_cik("CAT").await?;
/// let pipeline = FinancialsPipeline::new(
///     Arc::new(client),
///     Arc::new(InstanceParser::new()),
///     PipelineConfig::default(),
/// );
/// let book = pipeline.run(&entity).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FinancialsPipeline {
    source: Arc<dyn FilingSource>,
    parser: Arc<dyn FactParser>,
    config: PipelineConfig,
}

impl FinancialsPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        source: Arc<dyn FilingSource>,
        parser: Arc<dyn FactParser>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            parser,
            config,
        }
    }

    /// Creates a pipeline over SEC EDGAR with the instance parser.
    #[cfg(feature = "edgar")]
    pub fn edgar(user_agent: &str, config: PipelineConfig) -> Result<Self> {
        let client = filings_edgar::EdgarClient::new(user_agent)?;
        Ok(Self::new(
            Arc::new(client),
            Arc::new(filings_edgar::InstanceParser::new()),
            config,
        ))
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Lists the entity's filings and parses each one.
    ///
    /// A failed listing is returned as an error. A filing whose document
    /// cannot be fetched or parsed is recorded in
    /// [`CollectedFacts::skipped`] and the rest are still processed.
    #[instrument(skip_all, fields(source = self.source.name(), cik = %entity.cik))]
    pub async fn collect_facts(&self, entity: &EntityId) -> Result<CollectedFacts> {
        let filings = self
            .source
            .fetch_filing_list(entity, self.config.since)
            .await?;

        let mut collected = CollectedFacts::default();
        for filing in &filings {
            match self.fetch_and_parse(entity, filing).await {
                Ok(records) => {
                    debug!(
                        accession = %filing.accession,
                        form = %filing.form,
                        records = records.len(),
                        "Parsed filing"
                    );
                    collected.facts.extend(records);
                }
                Err(e) => {
                    warn!(accession = %filing.accession, error = %e, "Skipping filing");
                    collected.skipped.push(SkippedFiling {
                        accession: filing.accession.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            filings = filings.len(),
            skipped = collected.skipped.len(),
            facts = collected.facts.len(),
            "Collected facts"
        );
        Ok(collected)
    }

    async fn fetch_and_parse(
        &self,
        entity: &EntityId,
        filing: &FilingDescriptor,
    ) -> Result<Vec<FactRecord>> {
        let document = self.source.fetch_filing_document(entity, filing).await?;
        self.parser.parse_facts(&document, filing)
    }

    /// Reconciles collected facts and projects every configured statement.
    #[instrument(skip_all, fields(facts = collected.facts.len()))]
    pub fn build(&self, collected: CollectedFacts) -> Result<StatementBook> {
        let reconciliation = reconcile(collected.facts.as_slice(), &self.config.reconcile)?;

        let tables: Vec<Table> = self
            .config
            .schemas
            .iter()
            .map(|schema| {
                project(
                    &reconciliation.facts,
                    schema,
                    &self.config.catalog,
                    &self.config.reconcile.axis_priority,
                )
            })
            .collect();

        let empty = tables.iter().filter(|t| t.is_empty()).count();
        if empty > 0 {
            warn!(empty, "Statements without any resolved line item");
        }
        info!(
            tables = tables.len(),
            diagnostics = reconciliation.diagnostics.len(),
            "Built statements"
        );

        Ok(StatementBook {
            facts: reconciliation.facts,
            tables,
            diagnostics: reconciliation.diagnostics,
            skipped: collected.skipped,
        })
    }

    /// Collects, reconciles and projects in one call.
    pub async fn run(&self, entity: &EntityId) -> Result<StatementBook> {
        let collected = self.collect_facts(entity).await?;
        self.build(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryFilingSource;
    use filings_core::{FormType, Period, SourceForm};
    use filings_statements::defaults::{INCOME_STATEMENT, OPERATING_SEGMENTS};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Documents are JSON arrays of fact records.
    #[derive(Debug)]
    struct JsonFactParser;

    impl FactParser for JsonFactParser {
        fn parse_facts(
            &self,
            document: &[u8],
            filing: &FilingDescriptor,
        ) -> Result<Vec<FactRecord>> {
            let records: Vec<FactRecord> = serde_json::from_slice(document)
                .map_err(|e| FilingsError::Parse(e.to_string()))?;
            Ok(records
                .into_iter()
                .map(|r| r.with_provenance(filing))
                .collect())
        }
    }

    fn revenue(form: FormType, start: NaiveDate, end: NaiveDate, value: f64) -> FactRecord {
        FactRecord::new(
            "Revenues",
            value,
            Period::duration(start, end).unwrap(),
            form.source_form(),
        )
    }

    fn document(records: &[FactRecord]) -> Vec<u8> {
        serde_json::to_vec(records).unwrap()
    }

    fn filing(accession: &str, report: NaiveDate, form: FormType) -> FilingDescriptor {
        FilingDescriptor::new(accession, report + chrono::Days::new(35), report, form)
    }

    async fn fiscal_2023(entity: &EntityId) -> InMemoryFilingSource {
        let source = InMemoryFilingSource::new();
        let q = FormType::TenQ;
        source
            .insert(
                entity,
                filing("q1", date(2023, 3, 31), q),
                document(&[revenue(q, date(2023, 1, 1), date(2023, 3, 31), 200.0)]),
            )
            .await;
        source
            .insert(
                entity,
                filing("q2", date(2023, 6, 30), q),
                document(&[
                    revenue(q, date(2023, 4, 1), date(2023, 6, 30), 250.0),
                    revenue(q, date(2023, 1, 1), date(2023, 6, 30), 450.0),
                ]),
            )
            .await;
        source
            .insert(
                entity,
                filing("q3", date(2023, 9, 30), q),
                document(&[
                    revenue(q, date(2023, 7, 1), date(2023, 9, 30), 250.0),
                    revenue(q, date(2023, 1, 1), date(2023, 9, 30), 700.0),
                ]),
            )
            .await;
        source
            .insert(
                entity,
                filing("k", date(2023, 12, 31), FormType::TenK),
                document(&[revenue(
                    FormType::TenK,
                    date(2023, 1, 1),
                    date(2023, 12, 31),
                    1000.0,
                )]),
            )
            .await;
        source
    }

    fn pipeline(source: InMemoryFilingSource) -> FinancialsPipeline {
        FinancialsPipeline::new(
            Arc::new(source),
            Arc::new(JsonFactParser),
            PipelineConfig::default().with_since(date(2023, 1, 1)),
        )
    }

    #[tokio::test]
    async fn test_run_builds_quarterly_income_statement() {
        let entity = EntityId::new("18230").with_ticker("cat");
        let book = pipeline(fiscal_2023(&entity).await)
            .run(&entity)
            .await
            .unwrap();

        let income = book.table(INCOME_STATEMENT).unwrap();
        assert_eq!(income.quarter_labels(), vec!["Q4", "Q3", "Q2", "Q1"]);
        assert_eq!(
            income.row("Total sales and revenues").unwrap().cells,
            vec![Some(300.0), Some(250.0), Some(250.0), Some(200.0)]
        );
        assert_eq!(book.tables.len(), default_schemas().len());
        assert!(book.table(OPERATING_SEGMENTS).unwrap().is_empty());
        assert!(book.diagnostics.is_empty());
        assert!(book.skipped.is_empty());

        let q4 = book
            .facts
            .synthetic()
            .find(|f| f.source_form() == SourceForm::SyntheticQ4Flow)
            .unwrap();
        assert_eq!(q4.value(), 300.0);
        assert_eq!(q4.filing_id(), Some("k"));
    }

    #[tokio::test]
    async fn test_failed_filings_are_skipped() {
        let entity = EntityId::new("18230");
        let source = fiscal_2023(&entity).await;
        source
            .insert(
                &entity,
                filing("bad", date(2024, 3, 31), FormType::TenQ),
                b"not json".to_vec(),
            )
            .await;
        source
            .insert_listing(&entity, filing("gone", date(2024, 6, 30), FormType::TenQ))
            .await;

        let collected = pipeline(source).collect_facts(&entity).await.unwrap();
        let skipped: Vec<&str> = collected
            .skipped
            .iter()
            .map(|s| s.accession.as_str())
            .collect();
        assert_eq!(skipped, vec!["bad", "gone"]);
        assert_eq!(collected.facts.len(), 6);
    }

    #[tokio::test]
    async fn test_since_filters_filings() {
        let entity = EntityId::new("18230");
        let source = fiscal_2023(&entity).await;
        let pipeline = FinancialsPipeline::new(
            Arc::new(source),
            Arc::new(JsonFactParser),
            PipelineConfig::default().with_since(date(2023, 7, 1)),
        );
        let collected = pipeline.collect_facts(&entity).await.unwrap();
        // q3 and k only
        assert_eq!(collected.facts.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_entity_is_an_error() {
        let source = InMemoryFilingSource::new();
        let result = pipeline(source).run(&EntityId::new("1")).await;
        assert!(matches!(result, Err(FilingsError::EntityNotFound(_))));
    }

    #[test]
    fn test_config_json_overrides() {
        let config = PipelineConfig::from_json_str(
            r#"{"since": "2021-01-01", "reconcile": {"q4_scope": "consolidated_only"}}"#,
        )
        .unwrap();
        assert_eq!(config.since, date(2021, 1, 1));
        assert_eq!(
            config.reconcile.q4_scope,
            filings_reconcile::Q4Scope::ConsolidatedOnly
        );
        assert_eq!(config.schemas, default_schemas());
        assert_eq!(config.catalog, default_catalog());

        assert!(matches!(
            PipelineConfig::from_json_str("{\"since\": 5}"),
            Err(FilingsError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_path("/nonexistent/filings.json"),
            Err(FilingsError::Config(_))
        ));
    }

    #[test]
    fn test_config_round_trip() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[cfg(feature = "edgar")]
    #[tokio::test]
    async fn test_instance_documents_end_to_end() {
        fn instance(context: &str, start: &str, end: &str, value: u64) -> Vec<u8> {
            format!(
                r#"<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance" xmlns:us-gaap="http://fasb.org/us-gaap/2023">
  <xbrli:context id="{context}">
    <xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000018230</xbrli:identifier></xbrli:entity>
    <xbrli:period><xbrli:startDate>{start}</xbrli:startDate><xbrli:endDate>{end}</xbrli:endDate></xbrli:period>
  </xbrli:context>
  <us-gaap:Revenues contextRef="{context}" unitRef="usd" decimals="-6">{value}</us-gaap:Revenues>
</xbrli:xbrl>"#
            )
            .into_bytes()
        }

        let entity = EntityId::new("18230");
        let source = InMemoryFilingSource::new();
        let q = FormType::TenQ;
        source
            .insert(&entity, filing("q1", date(2023, 3, 31), q), instance("c1", "2023-01-01", "2023-03-31", 200))
            .await;
        source
            .insert(&entity, filing("q2", date(2023, 6, 30), q), instance("c2", "2023-01-01", "2023-06-30", 450))
            .await;
        source
            .insert(&entity, filing("q3", date(2023, 9, 30), q), instance("c3", "2023-01-01", "2023-09-30", 700))
            .await;
        source
            .insert(
                &entity,
                filing("k", date(2023, 12, 31), FormType::TenK),
                instance("fy", "2023-01-01", "2023-12-31", 1000),
            )
            .await;

        let pipeline = FinancialsPipeline::new(
            Arc::new(source),
            Arc::new(filings_edgar::InstanceParser::new()),
            PipelineConfig::default().with_since(date(2023, 1, 1)),
        );
        let book = pipeline.run(&entity).await.unwrap();
        let income = book.table(INCOME_STATEMENT).unwrap();
        assert_eq!(
            income.row("Total sales and revenues").unwrap().cells,
            vec![Some(300.0), Some(250.0), Some(250.0), Some(200.0)]
        );
    }
}
