mod common;

use chrono::NaiveDate;
use common::read_fixture;
use edgarfacts::{
    CompanyConcept, CsvMemo, observations_from_concept, sort_by_end_date, statement_rows, to_csv,
};

fn concept() -> CompanyConcept {
    serde_json::from_str(&read_fixture("concepts/companyconcept.json")).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn duplicates_collapse_to_first_report() {
    let observations = observations_from_concept(&concept()).unwrap();

    let accessions: Vec<_> = observations
        .iter()
        .map(|o| o.accession_number.as_str())
        .collect();
    assert_eq!(
        accessions,
        vec![
            "0000320193-18-000145",
            "0000320193-19-000010",
            "0000320193-18-000070",
            "0000320193-19-000119",
            "0000320193-19-000076",
        ]
    );
    assert!(observations.iter().all(|o| o.gaap_item == "Revenues"));
    assert!(observations.iter().all(|o| o.cik == 320193));
}

#[test]
fn values_are_formatted() {
    let observations = observations_from_concept(&concept()).unwrap();

    assert_eq!(observations[1].value, "$84.31B");
    assert_eq!(observations[2].value, "$61.14B");
    assert_eq!(observations[3].fiscal_year, Some(2019));
    assert_eq!(observations[4].amount, -1_250_000);
    assert_eq!(observations[4].value, "$-1.25M");
}

#[test]
fn sorted_by_end_date() {
    let sorted = sort_by_end_date(observations_from_concept(&concept()).unwrap());
    let ends: Vec<_> = sorted.iter().map(|o| o.end_date).collect();
    assert_eq!(
        ends,
        vec![
            date("2018-03-31"),
            date("2018-09-29"),
            date("2018-12-29"),
            date("2019-06-29"),
            date("2019-09-28"),
        ]
    );
}

#[test]
fn table_exports_as_csv() {
    let sorted = sort_by_end_date(observations_from_concept(&concept()).unwrap());
    let rows = statement_rows(&sorted);
    let csv = to_csv(&rows).unwrap();
    let lines: Vec<_> = csv.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "gaap_item,year,quarter,form,value,link");
    assert_eq!(
        lines[1],
        "Revenues,2018,Q2,10-Q,$61.14B,https://www.sec.gov/Archives/edgar/data/320193/000032019318000070/"
    );

    let mut memo = CsvMemo::new();
    assert_eq!(memo.encode(&rows).unwrap(), csv);
}
