//! Company identity and per-concept XBRL endpoints.
//!
//! This module covers the two company-level lookups the rest of the crate builds on:
//! - Ticker → CIK resolution against the SEC's public company directory. Every other
//!   request is keyed by the zero-padded CIK this returns.
//! - The "company concept" API, which returns every value a registrant has reported for
//!   one taxonomy tag across all of its filings. The statement deduplicator consumes it.
//!
//! It also turns a submissions payload into the short company bio shown above a filing list.

use super::CompanyOperations;
use super::Edgar;
use super::error::{EdgarError, Result};
use super::filings::Submission;
use super::parsing::utils::{deserialize_ordered_map, fiscal_year_from_value};
use super::parsing::xbrl::NOT_AVAILABLE;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Mapping between a stock ticker symbol and the company's CIK.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyTicker {
    #[serde(rename = "cik_str")]
    pub cik: u64,
    pub ticker: String,
    pub title: String,
}

/// Historical data for a single XBRL concept across a company's filings.
///
/// `units` keeps the order in which the SEC lists unit groups (`USD`, `shares`, ...), since
/// consumers pick "the first unit group" from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConcept {
    pub cik: u64,
    pub taxonomy: String,
    pub tag: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "entityName", default)]
    pub entity_name: Option<String>,
    #[serde(deserialize_with = "deserialize_ordered_map")]
    pub units: Vec<(String, Vec<DataPoint>)>,
}

impl CompanyConcept {
    /// The first unit group in response order, if any.
    pub fn first_unit(&self) -> Option<(&str, &[DataPoint])> {
        self.units
            .first()
            .map(|(unit, points)| (unit.as_str(), points.as_slice()))
    }
}

/// A single reported value of a concept.
///
/// `fy` and `val` stay as raw JSON: the SEC has served fiscal years as floats and values as
/// either integers or decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start: Option<String>,
    pub end: String,
    pub val: serde_json::Value,
    pub accn: String,
    #[serde(default)]
    pub fy: serde_json::Value,
    #[serde(default)]
    pub fp: Option<String>,
    pub form: String,
    #[serde(default)]
    pub filed: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frame: Option<String>,
}

impl DataPoint {
    /// Fiscal year as an integer, ignoring any fractional part.
    pub fn fiscal_year(&self) -> Option<i32> {
        fiscal_year_from_value(&self.fy)
    }
}

/// Identity block shown above a company's filing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyBio {
    pub name: String,
    pub sic: String,
    pub sic_description: String,
    pub ein: Option<String>,
    /// Fiscal year end rendered as `MM/DD`, or `N/A` when the SEC has none.
    pub fiscal_year_end: String,
    /// Exchanges without duplicates, in first-seen order.
    pub exchanges: Vec<String>,
    pub tickers: Vec<String>,
}

impl From<&Submission> for CompanyBio {
    fn from(submission: &Submission) -> Self {
        let mut exchanges: Vec<String> = Vec::with_capacity(submission.exchanges.len());
        for exchange in &submission.exchanges {
            if !exchanges.contains(exchange) {
                exchanges.push(exchange.clone());
            }
        }

        Self {
            name: submission.name.clone(),
            sic: submission.sic.clone(),
            sic_description: submission.sic_description.clone(),
            ein: submission.ein.clone(),
            fiscal_year_end: submission
                .fiscal_year_end
                .as_deref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), format_fiscal_year_end),
            exchanges,
            tickers: submission.tickers.clone(),
        }
    }
}

/// Renders the SEC's `MMDD` fiscal year end as `MM/DD`. Other shapes are returned as-is.
pub fn format_fiscal_year_end(raw: &str) -> String {
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("{}/{}", &raw[..2], &raw[2..])
    } else {
        raw.to_string()
    }
}

/// Parses the company directory (`company_tickers.json`), keeping file order.
pub fn parse_company_tickers(content: &str) -> Result<Vec<CompanyTicker>> {
    let mut deserializer = serde_json::Deserializer::from_str(content);
    let entries: Vec<(String, CompanyTicker)> = deserialize_ordered_map(&mut deserializer)?;
    Ok(entries.into_iter().map(|(_, ticker)| ticker).collect())
}

/// Resolves a ticker against a loaded directory, returning the 10-digit zero-padded CIK.
///
/// # Errors
///
/// * `EdgarError::InvalidTicker` - blank input or characters no ticker uses
/// * `EdgarError::TickerNotFound` - well-formed ticker absent from the directory
pub fn lookup_cik(tickers: &[CompanyTicker], ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    let well_formed = !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if !well_formed {
        return Err(EdgarError::InvalidTicker(ticker.to_string()));
    }

    tickers
        .iter()
        .find(|t| t.ticker.eq_ignore_ascii_case(ticker))
        .map(|t| format!("{:0>10}", t.cik))
        .ok_or(EdgarError::TickerNotFound)
}

#[derive(Debug)]
enum CompanyUrlType {
    CompanyTickers,
    CompanyConcept,
}

impl Edgar {
    fn build_company_url(&self, url_type: CompanyUrlType, params: &[&str]) -> String {
        match url_type {
            CompanyUrlType::CompanyTickers => {
                format!("{}/company_tickers.json", self.edgar_files_url)
            }
            CompanyUrlType::CompanyConcept => {
                let (cik, taxonomy, tag) = (params[0], params[1], params[2]);
                format!(
                    "{}/api/xbrl/companyconcept/CIK{:0>10}/{}/{}.json",
                    self.edgar_data_url, cik, taxonomy, tag
                )
            }
        }
    }
}

#[async_trait]
impl CompanyOperations for Edgar {
    /// Retrieves the public company directory.
    ///
    /// # Errors
    ///
    /// * `EdgarError::RequestError` - If there was an error sending the request or reading the response.
    /// * `EdgarError::JsonError` - If the directory is not the expected JSON object.
    async fn company_tickers(&self) -> Result<Vec<CompanyTicker>> {
        let url = self.build_company_url(CompanyUrlType::CompanyTickers, &[]);
        let response = self.get(&url).await?;
        parse_company_tickers(&response)
    }

    /// Resolves a ticker symbol (any case) to its zero-padded 10-digit CIK.
    ///
    /// The whole directory is fetched on every call; nothing is cached.
    async fn company_cik(&self, ticker: &str) -> Result<String> {
        let tickers = self.company_tickers().await?;
        lookup_cik(&tickers, ticker)
    }

    /// Fetches every reported value of `taxonomy:tag` for a company.
    ///
    /// # Parameters
    ///
    /// * `cik` - The company CIK, padded or not.
    /// * `taxonomy` - A taxonomy name such as "us-gaap" or "dei".
    /// * `tag` - The concept's local name, e.g. "Revenues".
    async fn company_concept(&self, cik: &str, taxonomy: &str, tag: &str) -> Result<CompanyConcept> {
        let url = self.build_company_url(
            CompanyUrlType::CompanyConcept,
            &[cik.trim_start_matches('0'), taxonomy, tag],
        );
        let response = self.get(&url).await?;
        Ok(serde_json::from_str(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<CompanyTicker> {
        parse_company_tickers(
            r#"{"0":{"cik_str":320193,"ticker":"AAPL","title":"Apple Inc."},
                "1":{"cik_str":732717,"ticker":"T","title":"AT&T INC."}}"#,
        )
        .unwrap()
    }

    #[test]
    fn lookup_pads_cik() {
        assert_eq!(lookup_cik(&directory(), "aapl").unwrap(), "0000320193");
        assert_eq!(lookup_cik(&directory(), " T ").unwrap(), "0000732717");
    }

    #[test]
    fn lookup_rejects_blank_and_unknown() {
        assert!(matches!(
            lookup_cik(&directory(), "   "),
            Err(EdgarError::InvalidTicker(_))
        ));
        assert!(matches!(
            lookup_cik(&directory(), "AA PL"),
            Err(EdgarError::InvalidTicker(_))
        ));
        assert!(matches!(
            lookup_cik(&directory(), "ZZZZ"),
            Err(EdgarError::TickerNotFound)
        ));
    }

    #[test]
    fn fiscal_year_end_rendering() {
        assert_eq!(format_fiscal_year_end("0930"), "09/30");
        assert_eq!(format_fiscal_year_end(""), "");
    }

    #[test]
    fn bio_from_sparse_submission() {
        let submission: Submission = serde_json::from_str(
            r#"{"cik":"1","name":"X","fiscalYearEnd":null,"phone":null,
                "stateOfIncorporation":null,"sic":null,"filings":{"recent":{}}}"#,
        )
        .unwrap();
        let bio = CompanyBio::from(&submission);
        assert_eq!(bio.fiscal_year_end, "N/A");
        assert_eq!(bio.sic, "");
        assert!(bio.tickers.is_empty());
    }

    #[test]
    fn concept_url_pads_cik() {
        let edgar = Edgar::new("test_agent example@example.com").unwrap();
        let url = edgar.build_company_url(
            CompanyUrlType::CompanyConcept,
            &["320193", "us-gaap", "Revenues"],
        );
        assert_eq!(
            url,
            "https://data.sec.gov/api/xbrl/companyconcept/CIK0000320193/us-gaap/Revenues.json"
        );
    }

    #[test]
    fn concept_keeps_unit_order() {
        let json = r#"{
            "cik": 320193, "taxonomy": "us-gaap", "tag": "Revenues",
            "units": {
                "shares": [{"end": "2023-09-30", "val": 1, "accn": "a", "fy": 2023, "fp": "FY", "form": "10-K"}],
                "USD": [{"end": "2023-09-30", "val": 2, "accn": "b", "fy": 2023.0, "fp": "FY", "form": "10-K"}]
            }
        }"#;
        let concept: CompanyConcept = serde_json::from_str(json).unwrap();
        let (unit, points) = concept.first_unit().unwrap();
        assert_eq!(unit, "shares");
        assert_eq!(points[0].fiscal_year(), Some(2023));
        assert_eq!(concept.units[1].1[0].fiscal_year(), Some(2023));
    }
}
