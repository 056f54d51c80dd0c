//! Company statements walkthrough
//!
//! Plays the part of a small terminal front end:
//! - Resolve a ticker and show the company bio
//! - List the form types on file, narrow the filing table to a selection of them
//! - Attach XBRL facts to the latest reports
//! - Pick a us-gaap concept and print its deduplicated series as a table and as CSV
//!
//! The user agent is read from `USERAGENT` (a `.env` file works too).
//!
//! Run with: `cargo run --example company_statements -- AAPL NetIncomeLoss 10-K,8-K`

use edgarfacts::{
    CompanyOperations, CsvMemo, Edgar, EdgarConfig, FactOptions, FilingOperations,
    StatementOperations, filing_rows, filter_by_form, statement_rows, unique_forms, unique_tags,
};
use std::error::Error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let ticker = args.next().unwrap_or_else(|| "AAPL".to_string());
    let requested_item = args.next();
    let requested_forms: Vec<String> = args
        .next()
        .unwrap_or_else(|| "10-K,10-Q".to_string())
        .split(',')
        .map(|form| form.trim().to_string())
        .filter(|form| !form.is_empty())
        .collect();

    let edgar = Edgar::with_config(EdgarConfig::from_env()?)?;

    println!("=== {} ===\n", ticker.to_uppercase());
    let cik = edgar.company_cik(&ticker).await?;
    let mut catalog = edgar.company_filings(&cik, &ticker).await?;

    let bio = &catalog.bio;
    println!("Name:            {}", bio.name);
    println!("SIC:             {} ({})", bio.sic, bio.sic_description);
    println!("Fiscal year end: {}", bio.fiscal_year_end);
    println!("Exchanges:       {}\n", bio.exchanges.join(", "));

    let mut forms: Vec<String> = unique_forms(&catalog.filings).into_iter().collect();
    forms.sort();
    println!("Form types on file: {}\n", forms.join(", "));

    let selected = filter_by_form(&catalog.filings, &requested_forms);
    println!("Filings of type {}:", requested_forms.join(", "));
    for row in filing_rows(&selected).iter().take(10) {
        println!(
            "  {:<12} {:<12} {:<8} {}",
            row.report_date, row.filing_date, row.form, row.link
        );
    }
    if selected.is_empty() {
        println!("  (none)");
    }

    let augmented = edgar
        .attach_facts(&mut catalog.filings, FactOptions::new())
        .await;
    let tags = unique_tags(&catalog.filings);
    println!(
        "\n{} reports augmented, {} distinct us-gaap tags found",
        augmented,
        tags.len()
    );

    let gaap_item = match requested_item {
        Some(item) => item,
        None => match tags.iter().find(|tag| tag.as_str() == "Revenues") {
            Some(tag) => tag.clone(),
            None => match tags.iter().next() {
                Some(tag) => tag.clone(),
                None => {
                    println!("No XBRL facts available for {}", ticker);
                    return Ok(());
                }
            },
        },
    };

    let observations = edgar.statement_observations(&cik, &gaap_item).await?;
    let rows = statement_rows(&observations);

    println!("\n{}:", gaap_item);
    for row in &rows {
        println!(
            "  {:<6} {:<4} {:<6} {:>14}  {}",
            row.year, row.quarter, row.form, row.value, row.link
        );
    }

    let mut memo = CsvMemo::new();
    println!("\n{}", memo.encode(&rows)?);

    Ok(())
}
