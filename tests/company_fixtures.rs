mod common;

use common::read_fixture;
use edgarfacts::{CompanyBio, CompanyConcept, EdgarError, Submission, lookup_cik, parse_company_tickers};

#[test]
fn parse_ticker_directory() {
    let tickers = parse_company_tickers(&read_fixture("tickers/company_tickers.json")).unwrap();

    assert_eq!(tickers.len(), 5);
    assert_eq!(tickers[0].ticker, "AAPL");
    assert_eq!(tickers[0].cik, 320193);
    assert_eq!(tickers[4].title, "BERKSHIRE HATHAWAY INC");
}

#[test]
fn lookup_resolves_any_case() {
    let tickers = parse_company_tickers(&read_fixture("tickers/company_tickers.json")).unwrap();

    assert_eq!(lookup_cik(&tickers, "msft").unwrap(), "0000789019");
    assert_eq!(lookup_cik(&tickers, "brk-b").unwrap(), "0001067983");
    assert!(matches!(
        lookup_cik(&tickers, "NOPE"),
        Err(EdgarError::TickerNotFound)
    ));
    assert!(matches!(
        lookup_cik(&tickers, ""),
        Err(EdgarError::InvalidTicker(_))
    ));
}

#[test]
fn parse_company_concept() {
    let concept: CompanyConcept =
        serde_json::from_str(&read_fixture("concepts/companyconcept.json")).unwrap();

    assert_eq!(concept.cik, 320193);
    assert_eq!(concept.taxonomy, "us-gaap");
    assert_eq!(concept.entity_name.as_deref(), Some("Apple Inc."));

    let (unit, points) = concept.first_unit().unwrap();
    assert_eq!(unit, "USD");
    assert_eq!(points.len(), 7);
    assert_eq!(points[0].frame.as_deref(), Some("CY2018"));
    assert!(points[2].frame.is_none());
    assert_eq!(points[5].fiscal_year(), Some(2019));
}

#[test]
fn bio_from_submission() {
    let submission: Submission =
        serde_json::from_str(&read_fixture("submissions/submission.json")).unwrap();
    let bio = CompanyBio::from(&submission);

    assert_eq!(bio.name, "Apple Inc.");
    assert_eq!(bio.sic, "3571");
    assert_eq!(bio.sic_description, "Electronic Computers");
    assert_eq!(bio.ein.as_deref(), Some("942404110"));
    assert_eq!(bio.fiscal_year_end, "09/30");
    assert_eq!(bio.exchanges, vec!["Nasdaq"]);
    assert_eq!(bio.tickers, vec!["AAPL"]);
}

#[test]
fn bio_tolerates_null_fields() {
    let submission: Submission =
        serde_json::from_str(&read_fixture("submissions/submission_nulls.json")).unwrap();
    let bio = CompanyBio::from(&submission);

    assert_eq!(bio.name, "Apple Inc.");
    assert_eq!(bio.fiscal_year_end, "N/A");
    assert_eq!(bio.sic, "");
    assert!(bio.ein.is_none());
    assert!(bio.exchanges.is_empty());
    assert_eq!(submission.filings.recent.accession_number.len(), 5);
}
