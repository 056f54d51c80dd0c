//! Filing catalog: a company's recent filings as typed records.
//!
//! The submissions endpoint describes recent filings as parallel arrays (one array per
//! column). [`build_catalog`] zips them into [`Filing`] rows after checking that every column
//! has the same length. Periodic reports (10-K and 10-Q) can then be augmented with the
//! us-gaap facts of their XBRL instance document via [`FilingOperations::attach_facts`].

use super::Edgar;
use super::company::CompanyBio;
use super::error::{EdgarError, Result};
use super::options::FactOptions;
use super::parsing::html::find_instance_document;
use super::parsing::utils::deserialize_null_default;
use super::parsing::xbrl::{Fact, extract_facts};
use super::traits::FilingOperations;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Public archive root used for hyperlinks handed to the display layer.
pub const SEC_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar";

/// Summary text given to every catalog entry.
pub const DEFAULT_SUMMARY: &str = "No summary";

/// Form codes whose filings carry financial statements worth extracting.
pub const PERIODIC_REPORT_FORMS: [&str; 2] = ["10-Q", "10-K"];

/// The parts of a submissions payload this crate reads. The SEC sends `null` for fields a
/// registrant never filed, so everything but the name and the filings index tolerates it.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub cik: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sic: String,
    #[serde(
        rename = "sicDescription",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub sic_description: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tickers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub exchanges: Vec<String>,
    #[serde(default)]
    pub ein: Option<String>,
    #[serde(rename = "fiscalYearEnd", default)]
    pub fiscal_year_end: Option<String>,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

/// The column-oriented filings index. Missing columns deserialize as empty and are then
/// rejected by [`build_catalog`] as a length mismatch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentFilings {
    #[serde(rename = "accessionNumber", default)]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate", default)]
    pub filing_date: Vec<String>,
    #[serde(rename = "reportDate", default)]
    pub report_date: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(rename = "primaryDocument", default)]
    pub primary_document: Vec<String>,
    #[serde(rename = "primaryDocDescription", default)]
    pub primary_doc_description: Vec<String>,
}

/// One row of a company's filings index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filing {
    pub cik: String,
    pub ticker: String,
    pub accession_number: String,
    pub filing_date: String,
    pub report_date: String,
    pub form: String,
    pub primary_document: String,
    pub primary_document_description: String,
    pub summary: String,
    /// Facts from the filing's instance document, set by augmentation only.
    pub facts: Option<Vec<Fact>>,
}

impl Filing {
    fn from_recent(cik: &str, ticker: &str, recent: &RecentFilings, idx: usize) -> Self {
        Self {
            cik: cik.to_string(),
            ticker: ticker.to_string(),
            accession_number: recent.accession_number[idx].clone(),
            filing_date: recent.filing_date[idx].clone(),
            report_date: recent.report_date[idx].clone(),
            form: recent.form[idx].clone(),
            primary_document: recent.primary_document[idx].clone(),
            primary_document_description: recent.primary_doc_description[idx].clone(),
            summary: DEFAULT_SUMMARY.to_string(),
            facts: None,
        }
    }

    /// True for 10-K and 10-Q filings, compared case-insensitively.
    pub fn is_periodic_report(&self) -> bool {
        PERIODIC_REPORT_FORMS
            .iter()
            .any(|form| self.form.eq_ignore_ascii_case(form))
    }

    /// Public EDGAR folder of this filing.
    pub fn archive_url(&self) -> String {
        archive_link(&self.cik, &self.accession_number)
    }

    /// Tags of the attached facts; empty when the filing was not augmented.
    pub fn unique_tags(&self) -> BTreeSet<String> {
        self.facts
            .iter()
            .flatten()
            .map(|fact| fact.tag.clone())
            .collect()
    }
}

/// Hyperlink to a filing folder on the public archive.
pub fn archive_link(cik: &str, accession_number: &str) -> String {
    archive_folder_url(SEC_ARCHIVES_URL, cik, accession_number)
}

fn archive_folder_url(archives: &str, cik: &str, accession_number: &str) -> String {
    format!(
        "{}/data/{}/{}/",
        archives,
        trim_cik(cik),
        accession_number.replace('-', "")
    )
}

/// Archive paths use the CIK without zero padding.
fn trim_cik(cik: &str) -> &str {
    let trimmed = cik.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

/// Zips the filings index columns into `Filing` records.
///
/// # Errors
///
/// Returns `EdgarError::MismatchedFilingArrays` naming the first column whose length differs
/// from `accessionNumber`. Nothing is truncated.
pub fn build_catalog(cik: &str, ticker: &str, recent: &RecentFilings) -> Result<Vec<Filing>> {
    let expected = recent.accession_number.len();
    let columns: [(&'static str, usize); 5] = [
        ("filingDate", recent.filing_date.len()),
        ("reportDate", recent.report_date.len()),
        ("form", recent.form.len()),
        ("primaryDocument", recent.primary_document.len()),
        ("primaryDocDescription", recent.primary_doc_description.len()),
    ];

    if let Some(&(field, found)) = columns.iter().find(|(_, len)| *len != expected) {
        return Err(EdgarError::MismatchedFilingArrays {
            field,
            expected,
            found,
        });
    }

    Ok((0..expected)
        .map(|idx| Filing::from_recent(cik, ticker, recent, idx))
        .collect())
}

/// Distinct form codes present in a filing list.
pub fn unique_forms(filings: &[Filing]) -> HashSet<String> {
    filings.iter().map(|filing| filing.form.clone()).collect()
}

/// Filings whose form code is one of `forms`, in catalog order.
pub fn filter_by_form<S: AsRef<str>>(filings: &[Filing], forms: &[S]) -> Vec<Filing> {
    filings
        .iter()
        .filter(|filing| forms.iter().any(|form| form.as_ref() == filing.form))
        .cloned()
        .collect()
}

/// Every tag found across augmented filings, sorted for a selection list.
pub fn unique_tags(filings: &[Filing]) -> BTreeSet<String> {
    filings.iter().flat_map(Filing::unique_tags).collect()
}

/// Company bio and catalog produced by a single submissions fetch.
#[derive(Debug, Clone)]
pub struct CompanyFilings {
    pub bio: CompanyBio,
    pub filings: Vec<Filing>,
}

/// One row of the filings table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilingRow {
    #[serde(rename = "reportDate")]
    pub report_date: String,
    #[serde(rename = "filingDate")]
    pub filing_date: String,
    pub form: String,
    pub link: String,
}

pub fn filing_rows(filings: &[Filing]) -> Vec<FilingRow> {
    filings
        .iter()
        .map(|filing| FilingRow {
            report_date: filing.report_date.clone(),
            filing_date: filing.filing_date.clone(),
            form: filing.form.clone(),
            link: filing.archive_url(),
        })
        .collect()
}

#[derive(Debug)]
enum UrlType {
    Submission,
    FilingIndex,
    FilingContent,
    TextFiling,
}

impl Edgar {
    fn build_url(&self, url_type: UrlType, params: &[&str]) -> String {
        match url_type {
            UrlType::Submission => {
                format!("{}/submissions/CIK{:0>10}.json", self.edgar_data_url, params[0])
            }
            UrlType::FilingIndex => {
                let (cik, acc_no) = (params[0], params[1]);
                archive_folder_url(&self.edgar_archives_url, cik, acc_no)
            }
            UrlType::FilingContent => {
                let (cik, acc_no, filename) = (params[0], params[1], params[2]);
                format!(
                    "{}{}",
                    archive_folder_url(&self.edgar_archives_url, cik, acc_no),
                    filename
                )
            }
            UrlType::TextFiling => {
                // /Archives/edgar/data/CIK/ACC_NO_NO_DASHES/ACC_NO_WITH_DASHES.txt
                let (cik, acc_no) = (params[0], params[1]);
                format!(
                    "{}{}.txt",
                    archive_folder_url(&self.edgar_archives_url, cik, acc_no),
                    acc_no
                )
            }
        }
    }
}

#[async_trait]
impl FilingOperations for Edgar {
    /// Retrieves the submissions payload for a CIK.
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - If no submissions exist for the CIK.
    /// * `EdgarError::JsonError` - If the payload does not have the expected shape.
    /// * Network-related errors during HTTP requests.
    async fn submissions(&self, cik: &str) -> Result<Submission> {
        let url = self.build_url(UrlType::Submission, &[cik.trim_start_matches('0')]);
        let response = self.get(&url).await?;
        Ok(serde_json::from_str::<Submission>(&response)?)
    }

    /// Fetches the submissions payload once and derives both the bio and the catalog.
    ///
    /// Fetch failures propagate; an unreachable index is an error, not an empty catalog.
    async fn company_filings(&self, cik: &str, ticker: &str) -> Result<CompanyFilings> {
        let submission = self.submissions(cik).await?;
        let filings = build_catalog(cik, &ticker.to_uppercase(), &submission.filings.recent)?;
        tracing::debug!("Built catalog of {} filings for CIK {}", filings.len(), cik);

        Ok(CompanyFilings {
            bio: CompanyBio::from(&submission),
            filings,
        })
    }

    /// Fetches the HTML index page of a filing folder.
    async fn filing_index(&self, cik: &str, accession_number: &str) -> Result<String> {
        let url = self.build_url(UrlType::FilingIndex, &[cik, accession_number]);
        self.get(&url).await
    }

    /// Name of the XBRL instance document linked from a filing's index page, if any.
    async fn instance_document_name(
        &self,
        cik: &str,
        accession_number: &str,
    ) -> Result<Option<String>> {
        let index = self.filing_index(cik, accession_number).await?;
        Ok(find_instance_document(&index))
    }

    /// Downloads a filing's instance document and extracts its us-gaap facts.
    ///
    /// # Errors
    ///
    /// * `EdgarError::InvalidResponse` - If the index page links no instance document.
    /// * `EdgarError::XmlError` - If the instance document is malformed.
    /// * Network-related errors during HTTP requests.
    async fn filing_facts(&self, cik: &str, accession_number: &str) -> Result<Vec<Fact>> {
        let file_name = self
            .instance_document_name(cik, accession_number)
            .await?
            .ok_or_else(|| {
                EdgarError::InvalidResponse(format!(
                    "No XBRL instance document linked from filing {}",
                    accession_number
                ))
            })?;

        let url = self.build_url(
            UrlType::FilingContent,
            &[cik, accession_number, file_name.as_str()],
        );
        let document = self.get_bytes(&url).await?;
        extract_facts(&document)
    }

    /// Attaches extracted facts to the first qualifying 10-K/10-Q filings, in place.
    ///
    /// Filings are visited in order. Only periodic reports count toward `opts.limit`, and a
    /// report whose facts could not be fetched or parsed still uses up its slot. A failure is
    /// logged and leaves that filing's `facts` as `None`; the remaining filings are still
    /// processed.
    ///
    /// Returns the number of filings that received facts.
    async fn attach_facts(&self, filings: &mut [Filing], opts: FactOptions) -> usize {
        let mut processed = 0;
        let mut augmented = 0;

        for filing in filings.iter_mut() {
            if !filing.is_periodic_report() {
                continue;
            }
            if opts.exhausted(processed) {
                break;
            }
            processed += 1;

            match self
                .filing_facts(&filing.cik, &filing.accession_number)
                .await
            {
                Ok(facts) => {
                    tracing::debug!(
                        "Extracted {} facts from {} {}",
                        facts.len(),
                        filing.form,
                        filing.accession_number
                    );
                    filing.facts = Some(facts);
                    augmented += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        "No facts available for {} {}: {}",
                        filing.form,
                        filing.accession_number,
                        err
                    );
                }
            }
        }

        tracing::info!(
            "Augmented {} of {} periodic reports with XBRL facts",
            augmented,
            processed
        );
        augmented
    }

    /// Retrieves the complete submission text file (`{accession}.txt`) of a filing.
    async fn filing_text(&self, filing: &Filing) -> Result<String> {
        let url = self.build_url(
            UrlType::TextFiling,
            &[filing.cik.as_str(), filing.accession_number.as_str()],
        );
        self.get(&url).await
    }

    /// Downloads a filing's primary document.
    ///
    /// `primaryDocument` sometimes carries a rendering subfolder (`xslF345X05/doc.xml`);
    /// the file itself sits at the folder root, so only the last segment is used.
    async fn primary_document(&self, filing: &Filing) -> Result<Vec<u8>> {
        let document = filing
            .primary_document
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                EdgarError::InvalidResponse(format!(
                    "Filing {} has no primary document",
                    filing.accession_number
                ))
            })?;

        let url = self.build_url(
            UrlType::FilingContent,
            &[filing.cik.as_str(), filing.accession_number.as_str(), document],
        );
        self.get_bytes(&url).await
    }
}
