mod common;

use common::{read_fixture, read_fixture_bytes};
use edgarfacts::parsing::xbrl::{XbrlDocument, extract_facts, unique_tags};
use edgarfacts::{EdgarError, Segment};

#[test]
fn extracts_only_us_gaap_facts_in_order() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();

    let ids: Vec<_> = facts.iter().map(|f| f.element_id_or_na()).collect();
    assert_eq!(ids, vec!["f-3", "f-4", "f-5", "f-6", "f-8", "f-9"]);
    assert!(facts.iter().all(|f| f.tag != "DocumentType"));
    assert!(facts.iter().all(|f| f.tag != "ExtensionItem"));
}

#[test]
fn fact_carries_attributes_and_duration_context() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();
    let revenue = &facts[0];

    assert_eq!(revenue.tag, "RevenueFromContractWithCustomerExcludingAssessedTax");
    assert_eq!(revenue.value.as_deref(), Some("383285000000"));
    assert_eq!(revenue.unit_reference.as_deref(), Some("usd"));
    assert_eq!(revenue.decimals.as_deref(), Some("-6"));

    assert_eq!(revenue.context.len(), 1);
    let context = &revenue.context[0];
    assert_eq!(context.entity_identifier.as_deref(), Some("0000320193"));
    assert_eq!(context.period_start_date.as_deref(), Some("2022-09-25"));
    assert_eq!(context.period_end_date.as_deref(), Some("2023-09-30"));
    assert!(context.is_duration());
    assert!(!context.is_instant());
    assert!(!context.is_dimensional());
}

#[test]
fn dimensional_context_lists_every_member() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();
    let segments = &facts[1].context[0].segments;

    assert_eq!(
        segments,
        &vec![
            Segment {
                dimension: Some("srt:ProductOrServiceAxis".to_string()),
                member: Some("us-gaap:ProductMember".to_string()),
            },
            Segment {
                dimension: Some("srt:StatementGeographicalAxis".to_string()),
                member: Some("aapl:AmericasSegmentMember".to_string()),
            },
        ]
    );
}

#[test]
fn repeated_context_id_attaches_all_matches() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();
    let assets = facts.iter().find(|f| f.tag == "Assets").unwrap();

    let identifiers: Vec<_> = assets
        .context
        .iter()
        .map(|c| c.entity_identifier_or_na())
        .collect();
    assert_eq!(identifiers, vec!["0000320193", "0000320193-dup"]);
    assert!(assets.context.iter().all(|c| c.is_instant()));
}

#[test]
fn unknown_context_and_missing_attributes_render_na() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();
    let taxes = facts.iter().find(|f| f.tag == "IncomeTaxesPaidNet").unwrap();

    assert!(taxes.context.is_empty());
    assert!(taxes.unit_reference.is_none());
    assert_eq!(
        taxes.to_string(),
        "Fact(tag='IncomeTaxesPaidNet', context_ref='c-missing', id='f-8', value='18679000000', unit_ref='N/A', decimals=N/A, context=None)"
    );
}

#[test]
fn text_block_is_unescaped() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();
    let policy = facts.last().unwrap();
    assert_eq!(
        policy.value.as_deref(),
        Some("Basis of presentation & consolidation")
    );
}

#[test]
fn document_exposes_contexts_and_resolution() {
    let document = XbrlDocument::parse(read_fixture("xbrl/instance.xml").as_bytes()).unwrap();

    assert_eq!(document.contexts().len(), 4);
    assert_eq!(document.facts().len(), 6);
    assert!(document.facts().iter().all(|f| f.context.is_empty()));
    assert_eq!(document.resolve_context("c-2").len(), 2);
    assert_eq!(document.resolve_context("c-3")[0].segments.len(), 2);
    assert!(document.resolve_context("c-404").is_empty());
}

#[test]
fn tags_are_deduplicated() {
    let facts = extract_facts(&read_fixture_bytes("xbrl/instance.xml")).unwrap();
    let tags: Vec<_> = unique_tags(&facts).into_iter().collect();
    assert_eq!(
        tags,
        vec![
            "Assets",
            "IncomeTaxesPaidNet",
            "NetIncomeLoss",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SignificantAccountingPoliciesTextBlock",
        ]
    );
}

#[test]
fn mismatched_tags_fail_extraction() {
    let result = extract_facts(&read_fixture_bytes("xbrl/malformed.xml"));
    assert!(matches!(result, Err(EdgarError::XmlError(_))));
}
