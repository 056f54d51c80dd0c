//! Canonical statement time series built from the company concept API.
//!
//! A registrant reports the same value many times: a 10-K repeats the prior year's
//! figures, amended filings repeat the originals. [`observations_from_concept`] keeps the
//! first report of every `(fiscal period, end date)` pair, which yields one observation per
//! period in the order the SEC serves them.

use super::Edgar;
use super::company::CompanyConcept;
use super::error::{EdgarError, Result};
use super::filings::archive_link;
use super::parsing::utils::magnitude_from_value;
use super::parsing::xbrl::NOT_AVAILABLE;
use super::traits::{CompanyOperations, StatementOperations};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Taxonomy queried by [`StatementOperations::statement_observations`].
pub const US_GAAP_TAXONOMY: &str = "us-gaap";

/// One deduplicated value of a financial concept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementObservation {
    pub cik: u64,
    pub gaap_item: String,
    pub end_date: NaiveDate,
    pub accession_number: String,
    pub form: String,
    pub fiscal_year: Option<i32>,
    pub fiscal_period: Option<String>,
    /// Reported value, truncated to an integer.
    pub amount: i64,
    /// `amount` rendered by [`format_magnitude`].
    pub value: String,
}

impl StatementObservation {
    /// Public EDGAR folder of the filing that reported this value.
    pub fn archive_url(&self) -> String {
        archive_link(&self.cik.to_string(), &self.accession_number)
    }
}

/// Collapses a concept's time series into one observation per `(fp, end)` pair.
///
/// The first occurrence of a pair wins; later ones are dropped silently. A missing `fp` is a
/// key of its own, distinct from every named period.
///
/// Only the first unit group of the response is read. A concept reported in both `USD` and
/// `shares` yields only whichever group the SEC listed first. This is a known limitation.
///
/// # Errors
///
/// Returns `EdgarError::InvalidResponse` if an `end` date is not `YYYY-MM-DD` or a `val` is not
/// numeric. One bad data point fails the whole concept.
pub fn observations_from_concept(concept: &CompanyConcept) -> Result<Vec<StatementObservation>> {
    let Some((unit, points)) = concept.first_unit() else {
        return Ok(Vec::new());
    };
    tracing::debug!(
        "Deduplicating {} {} points of {}",
        points.len(),
        unit,
        concept.tag
    );

    let mut seen: HashSet<(Option<&str>, &str)> = HashSet::with_capacity(points.len());
    let mut observations = Vec::new();

    for point in points {
        if !seen.insert((point.fp.as_deref(), point.end.as_str())) {
            continue;
        }

        let end_date = NaiveDate::parse_from_str(&point.end, "%Y-%m-%d").map_err(|err| {
            EdgarError::InvalidResponse(format!(
                "Invalid end date '{}' in {}: {}",
                point.end, concept.tag, err
            ))
        })?;
        let amount = magnitude_from_value(&point.val).ok_or_else(|| {
            EdgarError::InvalidResponse(format!(
                "Non-numeric value {} in {} for period ending {}",
                point.val, concept.tag, point.end
            ))
        })?;

        observations.push(StatementObservation {
            cik: concept.cik,
            gaap_item: concept.tag.clone(),
            end_date,
            accession_number: point.accn.clone(),
            form: point.form.clone(),
            fiscal_year: point.fiscal_year(),
            fiscal_period: point.fp.clone(),
            amount,
            value: format_magnitude(amount),
        });
    }

    Ok(observations)
}

/// Renders a magnitude as dollars with a B/M/K suffix.
///
/// Thresholds apply to the absolute value and the sign stays in the number:
///
/// ```
/// use edgarfacts::format_magnitude;
///
/// assert_eq!(format_magnitude(1_500_000_000), "$1.50B");
/// assert_eq!(format_magnitude(-2_500_000), "$-2.50M");
/// assert_eq!(format_magnitude(42), "$42.00");
/// ```
pub fn format_magnitude(value: i64) -> String {
    let magnitude = value.unsigned_abs();
    let (divisor, suffix) = if magnitude >= 1_000_000_000 {
        (1e9, "B")
    } else if magnitude >= 1_000_000 {
        (1e6, "M")
    } else if magnitude >= 1_000 {
        (1e3, "K")
    } else {
        (1.0, "")
    };

    let scaled = format!("{:.2}", value as f64 / divisor);
    format!("${}{}", group_thousands(&scaled), suffix)
}

/// Inserts `,` separators into the integer part of a rendered decimal.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

/// Stable ascending sort on `end_date`; ties keep their input order.
pub fn sort_by_end_date(mut observations: Vec<StatementObservation>) -> Vec<StatementObservation> {
    observations.sort_by_key(|observation| observation.end_date);
    observations
}

/// One row of the statement table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StatementRow {
    pub gaap_item: String,
    pub year: String,
    pub quarter: String,
    pub form: String,
    pub value: String,
    pub link: String,
}

pub fn statement_rows(observations: &[StatementObservation]) -> Vec<StatementRow> {
    observations
        .iter()
        .map(|observation| StatementRow {
            gaap_item: observation.gaap_item.clone(),
            year: observation
                .fiscal_year
                .map_or_else(|| NOT_AVAILABLE.to_string(), |year| year.to_string()),
            quarter: observation
                .fiscal_period
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            form: observation.form.clone(),
            // The formatted value is exported as-is; the raw amount does not reach the CSV.
            value: observation.value.clone(),
            link: observation.archive_url(),
        })
        .collect()
}

/// Encodes table rows as CSV with a header row.
///
/// The header comes from the first row, so an empty slice encodes to an empty string.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| EdgarError::FileError(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Caches the CSV of the table currently on display.
///
/// The memo keeps a copy of the rows it last encoded. Encoding reruns only when the rows
/// passed in differ from that copy.
#[derive(Debug)]
pub struct CsvMemo<T> {
    rows: Option<Vec<T>>,
    csv: String,
}

impl<T> Default for CsvMemo<T> {
    fn default() -> Self {
        Self {
            rows: None,
            csv: String::new(),
        }
    }
}

impl<T: Serialize + Clone + PartialEq> CsvMemo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, rows: &[T]) -> Result<&str> {
        if self.rows.as_deref() == Some(rows) {
            tracing::debug!("Reusing cached CSV for {} rows", rows.len());
        } else {
            self.csv = to_csv(rows)?;
            self.rows = Some(rows.to_vec());
        }
        Ok(&self.csv)
    }
}

#[async_trait]
impl StatementOperations for Edgar {
    /// Fetches `us-gaap:{gaap_item}` for a company and returns its canonical series,
    /// oldest period first.
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - If the company never reported the concept.
    /// * `EdgarError::InvalidResponse` - If a data point has a bad date or value.
    /// * Network-related errors during HTTP requests.
    async fn statement_observations(
        &self,
        cik: &str,
        gaap_item: &str,
    ) -> Result<Vec<StatementObservation>> {
        let concept = self
            .company_concept(cik, US_GAAP_TAXONOMY, gaap_item)
            .await?;
        Ok(sort_by_end_date(observations_from_concept(&concept)?))
    }
}
