use edgarfacts::{CompanyOperations, Edgar, EdgarError};

#[tokio::test]
#[ignore]
async fn company_cik() {
    let edgar = Edgar::new("test_agent example@example.com").unwrap();
    let cik = edgar.company_cik("AAPL").await.unwrap();
    assert_eq!(cik, "0000320193");
}

#[tokio::test]
#[ignore]
async fn company_cik_not_found() {
    let edgar = Edgar::new("test_agent example@example.com").unwrap();
    let result = edgar.company_cik("INVALIDX").await;
    assert!(matches!(result, Err(EdgarError::TickerNotFound)));
}

#[tokio::test]
#[ignore]
async fn company_concept() {
    let edgar = Edgar::new("test_agent example@example.com").unwrap();
    let concept = edgar
        .company_concept("320193", "us-gaap", "AccountsPayableCurrent")
        .await
        .unwrap();
    assert_eq!(concept.tag, "AccountsPayableCurrent");
    assert_eq!(concept.first_unit().map(|(unit, _)| unit), Some("USD"));
}

#[tokio::test]
#[ignore]
async fn company_concept_not_found() {
    let edgar = Edgar::new("test_agent example@example.com").unwrap();
    let result = edgar
        .company_concept("320193", "us-gaap", "NotARealConcept")
        .await;
    assert!(matches!(result, Err(EdgarError::NotFound)));
}
