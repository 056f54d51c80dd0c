use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Ticker not found")]
    TickerNotFound,

    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("XML parsing error: {0}")]
    XmlError(String),

    #[error("CSV encoding error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] FromUtf8Error),

    #[error(
        "Filings index arrays differ in length: {field} has {found} entries, expected {expected}"
    )]
    MismatchedFilingArrays {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(
        "Unexpected content type from URL {url}. Expected pattern {expected_pattern}, but got Content-Type: {got_content_type}. Content preview: {content_preview}..."
    )]
    UnexpectedContentType {
        url: String,
        expected_pattern: String,
        got_content_type: String,
        content_preview: String,
    },
}

impl From<quick_xml::Error> for EdgarError {
    fn from(error: quick_xml::Error) -> Self {
        EdgarError::XmlError(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for EdgarError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        EdgarError::XmlError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdgarError>;
