#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR filing source and XBRL instance parser.
//!
//! - [`EdgarClient`] - Lists 10-K/10-Q filings and downloads instance documents
//! - [`InstanceParser`] - Extracts numeric facts from instance XML
//! - [`Pacer`] - Request pacing policy ([`FixedIntervalPacer`], [`NoPacing`])

pub mod instance;
pub mod pacing;

pub use instance::InstanceParser;
pub use pacing::{DEFAULT_REQUEST_INTERVAL, FixedIntervalPacer, NoPacing, Pacer};

use async_trait::async_trait;
use chrono::NaiveDate;
use filings_core::{
    EntityId, FilingDescriptor, FilingSource, FilingsError, FormType, Result,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// SEC EDGAR API base URL
pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";

/// SEC EDGAR archives base URL
pub const EDGAR_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// SEC company tickers URL
pub const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// SEC EDGAR filing source.
///
/// Every request goes through the configured [`Pacer`], which defaults to a
/// [`FixedIntervalPacer`] at [`DEFAULT_REQUEST_INTERVAL`].
#[derive(Debug, Clone)]
pub struct EdgarClient {
    client: reqwest::Client,
    pacer: Arc<dyn Pacer>,
    data_url: String,
    archives_url: String,
    tickers_url: String,
}

impl EdgarClient {
    /// Creates a client with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    pub fn new(user_agent: &str) -> Result<Self> {
        if user_agent.trim().is_empty() {
            return Err(FilingsError::InvalidInput("Empty user agent".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FilingsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Creates a client around a pre-configured reqwest client.
    ///
    /// The client must already carry an identifying user agent.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            pacer: Arc::new(FixedIntervalPacer::default()),
            data_url: EDGAR_DATA_URL.to_string(),
            archives_url: EDGAR_ARCHIVES_URL.to_string(),
            tickers_url: COMPANY_TICKERS_URL.to_string(),
        }
    }

    /// Replaces the pacing policy.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Points the client at a mirror.
    #[must_use]
    pub fn with_base_urls(
        mut self,
        data_url: impl Into<String>,
        archives_url: impl Into<String>,
        tickers_url: impl Into<String>,
    ) -> Self {
        self.data_url = trim_slash(data_url.into());
        self.archives_url = trim_slash(archives_url.into());
        self.tickers_url = tickers_url.into();
        self
    }

    /// Looks up a registrant from its ticker symbol.
    pub async fn lookup_cik(&self, ticker: &str) -> Result<EntityId> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(FilingsError::InvalidInput("Empty ticker".to_string()));
        }

        debug!("Fetching company tickers from SEC");
        let data: HashMap<String, CompanyTickerInfo> =
            self.get_json(&self.tickers_url, "company tickers").await?;

        find_ticker(&data, ticker).ok_or_else(|| FilingsError::EntityNotFound(ticker.to_string()))
    }

    /// Fetches the submissions index of a registrant.
    async fn fetch_submissions(&self, entity: &EntityId) -> Result<CompanySubmissions> {
        let url = format!("{}/submissions/CIK{}.json", self.data_url, entity.cik);
        self.get_json(&url, &format!("submissions for CIK {}", entity.cik))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        self.pacer.pace().await;

        debug!("Fetching {} from {}", what, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FilingsError::Network(format!(
                "Failed to fetch {}: HTTP {}",
                what,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FilingsError::Parse(format!("Failed to parse {}: {}", what, e)))
    }
}

#[async_trait]
impl FilingSource for EdgarClient {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    async fn fetch_filing_list(
        &self,
        entity: &EntityId,
        since: NaiveDate,
    ) -> Result<Vec<FilingDescriptor>> {
        let submissions = self.fetch_submissions(entity).await?;
        let filings = filings_from_submissions(&submissions.filings.recent, since);
        info!(
            cik = %entity.cik,
            company = submissions.name.as_deref().unwrap_or_default(),
            count = filings.len(),
            %since,
            "Listed periodic filings"
        );
        Ok(filings)
    }

    async fn fetch_filing_document(
        &self,
        entity: &EntityId,
        filing: &FilingDescriptor,
    ) -> Result<Vec<u8>> {
        let document = instance_document_name(entity, filing)?;
        let url = archive_url(&self.archives_url, entity, filing, &document);

        self.pacer.pace().await;

        debug!("Fetching instance document from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FilingsError::DocumentNotFound {
                accession: filing.accession.clone(),
            });
        }
        if !status.is_success() {
            return Err(FilingsError::Network(format!(
                "Failed to fetch {}: HTTP {}",
                url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Name of the XBRL instance document of a filing.
///
/// Inline XBRL filings publish the extracted instance next to the primary
/// document as `name_htm.xml`. Without a primary document the name is built
/// from the ticker and report date.
pub fn instance_document_name(entity: &EntityId, filing: &FilingDescriptor) -> Result<String> {
    if let Some(primary) = filing.primary_document.as_deref()
        && let Some(stem) = primary.strip_suffix(".htm")
        && !stem.is_empty()
    {
        return Ok(format!("{stem}_htm.xml"));
    }

    match entity.ticker.as_deref() {
        Some(ticker) => Ok(format!(
            "{}-{}_htm.xml",
            ticker,
            filing.report_date.format("%Y%m%d")
        )),
        None => Err(FilingsError::DocumentNotFound {
            accession: filing.accession.clone(),
        }),
    }
}

/// Archive URL of a document within a filing folder.
#[must_use]
pub fn archive_url(
    archives_url: &str,
    entity: &EntityId,
    filing: &FilingDescriptor,
    document: &str,
) -> String {
    format!(
        "{}/{}/{}/{}",
        archives_url,
        entity.cik_unpadded(),
        filing.accession.replace('-', ""),
        document
    )
}

/// Periodic filings from the `filings.recent` arrays.
///
/// Keeps 10-K and 10-Q entries whose report date is on or after `since`,
/// ordered by report date ascending. Entries with unparsable dates are
/// dropped.
fn filings_from_submissions(recent: &RecentFilings, since: NaiveDate) -> Vec<FilingDescriptor> {
    let mut filings = Vec::new();

    for (i, form) in recent.form.iter().enumerate() {
        let Ok(form) = form.parse::<FormType>() else {
            continue;
        };
        let (Some(accession), Some(filing_date), Some(report_date)) = (
            recent.accession_number.get(i),
            recent.filing_date.get(i).and_then(|d| parse_date(d)),
            recent.report_date.get(i).and_then(|d| parse_date(d)),
        ) else {
            debug!(index = i, "Skipping submission entry with missing fields");
            continue;
        };
        if report_date < since {
            continue;
        }

        let mut filing = FilingDescriptor::new(accession.as_str(), filing_date, report_date, form);
        if let Some(primary) = recent.primary_document.get(i)
            && !primary.is_empty()
        {
            filing = filing.with_primary_document(primary.as_str());
        }
        filings.push(filing);
    }

    filings.sort_by_key(|f| f.report_date);
    filings
}

fn find_ticker(data: &HashMap<String, CompanyTickerInfo>, ticker: &str) -> Option<EntityId> {
    let ticker_upper = ticker.to_uppercase();
    data.values()
        .find(|company| company.ticker.to_uppercase() == ticker_upper)
        .map(|company| {
            let entity = EntityId::new(company.cik_str.to_string()).with_ticker(&company.ticker);
            debug!("Found CIK {} for ticker {} ({})", entity.cik, ticker, company.title);
            entity
        })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

// ============================================================================
// SEC API Response Types
// ============================================================================

/// Company ticker information from SEC
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    cik_str: u64,
    ticker: String,
    title: String,
}

/// Company submissions response
#[derive(Debug, Deserialize)]
struct CompanySubmissions {
    #[serde(default)]
    name: Option<String>,
    filings: SubmissionFilings,
}

#[derive(Debug, Deserialize)]
struct SubmissionFilings {
    recent: RecentFilings,
}

/// Parallel arrays, one element per filing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    #[serde(default)]
    accession_number: Vec<String>,
    #[serde(default)]
    filing_date: Vec<String>,
    #[serde(default)]
    report_date: Vec<String>,
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    primary_document: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
