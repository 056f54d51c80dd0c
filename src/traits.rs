//! Trait definitions organizing EDGAR operations by area.
//!
//! The `Edgar` client implements each trait: company identity and concepts, filings and
//! their XBRL facts, and deduplicated statement series. Most callers use `Edgar` directly;
//! the traits make the API surface easy to scan and allow alternative implementations in
//! tests.

use super::company::{CompanyConcept, CompanyTicker};
use super::error::Result;
use super::filings::{CompanyFilings, Filing, Submission};
use super::options::FactOptions;
use super::parsing::xbrl::Fact;
use super::statements::StatementObservation;
use async_trait::async_trait;

/// Operations for resolving companies and reading per-concept XBRL data.
#[async_trait]
pub trait CompanyOperations {
    /// Retrieves the public ticker directory.
    async fn company_tickers(&self) -> Result<Vec<CompanyTicker>>;
    /// Resolves a ticker symbol to a zero-padded 10-digit CIK.
    async fn company_cik(&self, ticker: &str) -> Result<String>;
    /// Retrieves every reported value of one taxonomy concept for a company.
    async fn company_concept(&self, cik: &str, taxonomy: &str, tag: &str)
    -> Result<CompanyConcept>;
}

/// Operations for a company's filing catalog and the documents inside each filing.
///
/// Filings come from the submissions endpoint. Periodic reports can be augmented with the
/// us-gaap facts of their XBRL instance document.
#[async_trait]
pub trait FilingOperations {
    /// Retrieves the raw submissions payload for a CIK.
    async fn submissions(&self, cik: &str) -> Result<Submission>;
    /// Retrieves the company bio and the filing catalog in one request.
    async fn company_filings(&self, cik: &str, ticker: &str) -> Result<CompanyFilings>;
    /// Retrieves the HTML index page of a filing folder.
    async fn filing_index(&self, cik: &str, accession_number: &str) -> Result<String>;
    /// Finds the name of the instance document linked from a filing's index page.
    async fn instance_document_name(
        &self,
        cik: &str,
        accession_number: &str,
    ) -> Result<Option<String>>;
    /// Extracts the us-gaap facts of a filing's instance document.
    async fn filing_facts(&self, cik: &str, accession_number: &str) -> Result<Vec<Fact>>;
    /// Attaches facts to the leading periodic reports of a catalog. Returns how many got facts.
    async fn attach_facts(&self, filings: &mut [Filing], opts: FactOptions) -> usize;
    /// Retrieves the complete submission text file of a filing.
    async fn filing_text(&self, filing: &Filing) -> Result<String>;
    /// Downloads the primary document of a filing.
    async fn primary_document(&self, filing: &Filing) -> Result<Vec<u8>>;
}

/// Operations producing canonical statement series.
#[async_trait]
pub trait StatementOperations {
    /// Retrieves a us-gaap concept as deduplicated observations sorted by end date.
    async fn statement_observations(
        &self,
        cik: &str,
        gaap_item: &str,
    ) -> Result<Vec<StatementObservation>>;
}
