//! # edgarfacts - XBRL statements from SEC EDGAR filings
//!
//! edgarfacts retrieves a company's filing metadata from the SEC's EDGAR system, extracts the
//! us-gaap facts embedded in its 10-K and 10-Q instance documents, and turns per-concept time
//! series into deduplicated statement tables ready for display or CSV export.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - One request per configured interval, with the
//!   identifying `User-Agent` SEC.gov requires
//! - **Filing catalog** - Company bio and the recent filings index as typed records
//! - **XBRL fact extraction** - us-gaap facts with their resolved reporting contexts
//! - **Statement series** - Duplicate `(fiscal period, end date)` reports collapsed into one
//!   observation per period
//! - **Tables and export** - Display rows with archive hyperlinks, and CSV encoding
//!
//! ## Basic Usage
//!
//! ```ignore
//! use edgarfacts::{
//!     CompanyOperations, Edgar, FactOptions, FilingOperations, StatementOperations,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // SEC.gov requires a user agent that identifies you
//!     let edgar = Edgar::new("YourAppName contact@example.com")?;
//!
//!     let cik = edgar.company_cik("AAPL").await?;
//!     let mut catalog = edgar.company_filings(&cik, "AAPL").await?;
//!     edgar.attach_facts(&mut catalog.filings, FactOptions::new()).await;
//!
//!     for tag in edgarfacts::unique_tags(&catalog.filings).iter().take(5) {
//!         println!("{}", tag);
//!     }
//!
//!     for observation in edgar.statement_observations(&cik, "Revenues").await? {
//!         println!("{} {}", observation.end_date, observation.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod company;
mod config;
mod core;
mod error;
mod filings;
mod options;
pub mod parsing;
mod statements;
mod traits;

pub use config::{EdgarConfig, EdgarUrls, USER_AGENT_ENV};
pub use core::Edgar;
pub use error::{EdgarError, Result};
pub use options::{DEFAULT_FACT_LIMIT, FactOptions};

pub use company::{
    CompanyBio, CompanyConcept, CompanyTicker, DataPoint, format_fiscal_year_end, lookup_cik,
    parse_company_tickers,
};
pub use filings::{
    CompanyFilings, DEFAULT_SUMMARY, Filing, FilingRow, FilingsData, PERIODIC_REPORT_FORMS,
    RecentFilings, SEC_ARCHIVES_URL, Submission, archive_link, build_catalog, filing_rows,
    filter_by_form, unique_forms, unique_tags,
};
pub use parsing::xbrl::{Context, Fact, Segment, XbrlDocument, extract_facts};
pub use statements::{
    CsvMemo, StatementObservation, StatementRow, US_GAAP_TAXONOMY, format_magnitude,
    observations_from_concept, sort_by_end_date, statement_rows, to_csv,
};

pub use traits::{CompanyOperations, FilingOperations, StatementOperations};

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
