//! Filing index page scraping.
//!
//! Each filing folder on EDGAR has an HTML index page whose first table lists the documents
//! in the submission. For XBRL filings one of them is the extracted instance document, whose
//! file name ends in `_htm.xml`.
use scraper::{Html, Selector};

/// Suffix EDGAR gives the XBRL instance extracted from an inline XBRL primary document.
pub const INSTANCE_DOCUMENT_SUFFIX: &str = "_htm.xml";

/// Finds the instance document listed in a filing index page.
///
/// Only the first `<table>` is searched, and the first anchor whose `href` ends with
/// [`INSTANCE_DOCUMENT_SUFFIX`] wins. The returned value is the last path segment of the
/// link, ready to be joined onto the filing folder URL.
///
/// Returns `None` if the page has no table or the table links no instance document.
pub fn find_instance_document(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").ok()?;
    let anchor_selector = Selector::parse("a[href]").ok()?;

    let table = document.select(&table_selector).next()?;
    table
        .select(&anchor_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| href.ends_with(INSTANCE_DOCUMENT_SUFFIX))
        .and_then(|href| href.rsplit('/').next())
        .map(str::to_string)
}
