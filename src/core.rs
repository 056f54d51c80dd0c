use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::Arc;

use super::config::EdgarConfig;
use super::error::{EdgarError, Result};

const PREVIEW_CHARS: usize = 200;

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone)]
pub struct Edgar {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Spaces requests by the configured interval
    pub(crate) rate_limiter: Arc<Governor>,

    /// Base URL for EDGAR archives
    pub(crate) edgar_archives_url: String,

    /// Base URL for EDGAR data API
    pub(crate) edgar_data_url: String,

    /// Base URL for EDGAR files
    pub(crate) edgar_files_url: String,
}

/// HTTP client for the SEC EDGAR endpoints this crate consumes.
///
/// `Edgar` is the single fetch component: the company directory, filings index, concept
/// facts and per-filing archive documents all go through [`Edgar::get`] or
/// [`Edgar::get_bytes`]. Every request carries the configured `User-Agent`, which SEC.gov
/// requires to identify automated clients.
///
/// # Rate Limiting
///
/// Before each request the client waits on a limiter that admits one request per
/// `request_interval` (300ms by default). The delay is fixed; it does not adapt to server
/// responses.
///
/// # Error Handling
///
/// Nothing is retried. A 404 maps to `EdgarError::NotFound`, a 429 to
/// `EdgarError::RateLimitExceeded`, any other non-success status to
/// `EdgarError::InvalidResponse`, and transport failures to `EdgarError::RequestError`.
/// The caller decides whether a failure is terminal for its action.
///
/// # Examples
///
/// ```rust
/// # use edgarfacts::Edgar;
/// let edgar = Edgar::new("my_app/1.0 (my@email.com)")?;
/// # Ok::<(), edgarfacts::EdgarError>(())
/// ```
impl Edgar {
    /// Creates a new Edgar client with the default interval, timeout and SEC.gov base URLs.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - A descriptive identifier for your application, following the format
    ///   "AppName/Version (contact@email.com)".
    pub fn new(user_agent: &str) -> Result<Self> {
        let config = EdgarConfig {
            user_agent: user_agent.to_string(),
            ..EdgarConfig::default()
        };
        Self::with_config(config)
    }

    /// Creates an Edgar client with custom configuration settings.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if the user agent is not a valid header value, the
    /// request interval is zero, or the HTTP client cannot be built.
    pub fn with_config(config: EdgarConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| EdgarError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| EdgarError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let quota = Quota::with_period(config.request_interval).ok_or_else(|| {
            EdgarError::ConfigError("Request interval must be greater than zero".to_string())
        })?;

        Ok(Edgar {
            client,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            edgar_archives_url: config.base_urls.archives,
            edgar_data_url: config.base_urls.data,
            edgar_files_url: config.base_urls.files,
        })
    }

    /// Sends one rate-limited GET and maps non-success statuses to errors.
    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("Connecting to: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("{} responded with {}", url, status);

        match status {
            reqwest::StatusCode::OK => Ok(response),
            reqwest::StatusCode::NOT_FOUND => Err(EdgarError::NotFound),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(EdgarError::RateLimitExceeded),
            other_status => {
                let error_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error body".to_string());

                Err(EdgarError::InvalidResponse(format!(
                    "Unexpected status code: {} for URL: {}. Response preview: {}",
                    other_status,
                    url,
                    error_body.chars().take(PREVIEW_CHARS).collect::<String>()
                )))
            }
        }
    }

    /// Fetches raw bytes, used for XBRL instance documents and primary documents.
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - The resource doesn't exist (HTTP 404)
    /// * `EdgarError::RateLimitExceeded` - The server answered HTTP 429
    /// * `EdgarError::RequestError` - Network failure
    /// * `EdgarError::InvalidResponse` - Unexpected HTTP status code
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetches text content from a URL.
    ///
    /// For URLs ending in `.json` the body is checked before it is returned: SEC.gov
    /// sometimes labels JSON as `text/html`, which is accepted when the body looks like JSON,
    /// but a real HTML page (usually an error page) yields
    /// `EdgarError::UnexpectedContentType` with a short preview.
    pub async fn get(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|val| val.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;

        if url.ends_with(".json") {
            if let Some(ct) = content_type.filter(|ct| ct.to_lowercase().contains("text/html")) {
                let trimmed = body.trim_start();
                if trimmed.starts_with('{') || trimmed.starts_with('[') {
                    tracing::warn!(
                        "Received text/html content-type for .json URL, but content appears to be JSON: {}",
                        url
                    );
                    return Ok(body);
                }

                return Err(EdgarError::UnexpectedContentType {
                    url: url.to_string(),
                    expected_pattern: "application/json".to_string(),
                    got_content_type: ct,
                    content_preview: body.chars().take(PREVIEW_CHARS).collect(),
                });
            }
        }

        Ok(body)
    }

    /// Returns the base URL for EDGAR archives.
    pub fn archives_url(&self) -> &str {
        &self.edgar_archives_url
    }

    /// Returns the base URL for EDGAR data.
    pub fn data_url(&self) -> &str {
        &self.edgar_data_url
    }

    /// Returns the base URL for EDGAR files.
    pub fn files_url(&self) -> &str {
        &self.edgar_files_url
    }
}
