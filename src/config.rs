use std::time::Duration;

use super::error::{EdgarError, Result};

/// Environment variable holding the client-identifying `User-Agent`.
pub const USER_AGENT_ENV: &str = "USERAGENT";

/// Configuration for the Edgar client
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Fixed spacing enforced before every request
    pub request_interval: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Base URLs for different EDGAR services
    pub base_urls: EdgarUrls,
}

/// Base URLs for different EDGAR services
#[derive(Debug, Clone)]
pub struct EdgarUrls {
    /// Base URL for EDGAR archives
    pub archives: String,
    /// Base URL for EDGAR data
    pub data: String,
    /// Base URL for EDGAR files
    pub files: String,
}

impl Default for EdgarConfig {
    fn default() -> Self {
        Self {
            user_agent: "edgarfacts/0.1.0".to_string(),
            request_interval: Duration::from_millis(300),
            timeout: Duration::from_secs(30),
            base_urls: EdgarUrls::default(),
        }
    }
}

impl EdgarConfig {
    /// Creates a new EdgarConfig with custom settings
    ///
    /// # Basic usage
    ///
    /// ```ignore
    /// use edgarfacts::{Edgar, EdgarConfig};
    /// use std::time::Duration;
    ///
    /// let config = EdgarConfig::new(
    ///     "YourAppName contact@example.com",
    ///     Duration::from_millis(300),
    ///     Duration::from_secs(30),
    ///     None,
    /// );
    /// let edgar = Edgar::with_config(config)?;
    /// ```
    pub fn new(
        user_agent: impl Into<String>,
        request_interval: Duration,
        timeout: Duration,
        base_urls: Option<EdgarUrls>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            request_interval,
            timeout,
            base_urls: base_urls.unwrap_or_default(),
        }
    }

    /// Builds a default configuration whose user agent comes from the `USERAGENT`
    /// environment variable, loading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` when the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let user_agent = std::env::var(USER_AGENT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                EdgarError::ConfigError(format!("{USER_AGENT_ENV} environment variable required"))
            })?;

        Ok(Self {
            user_agent,
            ..Self::default()
        })
    }
}

impl Default for EdgarUrls {
    fn default() -> Self {
        Self {
            archives: "https://www.sec.gov/Archives/edgar".to_string(),
            data: "https://data.sec.gov".to_string(),
            files: "https://www.sec.gov/files".to_string(),
        }
    }
}

impl EdgarUrls {
    /// Points every service at one base URL. Handy for mock servers.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/');
        Self {
            archives: format!("{base}/Archives/edgar"),
            data: base.to_string(),
            files: format!("{base}/files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_courtesy_delay() {
        let config = EdgarConfig::default();
        assert_eq!(config.request_interval, Duration::from_millis(300));
        assert_eq!(config.base_urls.data, "https://data.sec.gov");
    }

    // The only test touching USERAGENT; every state is checked in sequence.
    #[test]
    fn user_agent_from_env() {
        unsafe { std::env::remove_var(USER_AGENT_ENV) };
        assert!(matches!(
            EdgarConfig::from_env(),
            Err(EdgarError::ConfigError(_))
        ));

        unsafe { std::env::set_var(USER_AGENT_ENV, "   ") };
        assert!(matches!(
            EdgarConfig::from_env(),
            Err(EdgarError::ConfigError(_))
        ));

        unsafe { std::env::set_var(USER_AGENT_ENV, "edgarfacts-tests dev@example.com") };
        let config = EdgarConfig::from_env().unwrap();
        assert_eq!(config.user_agent, "edgarfacts-tests dev@example.com");
        assert_eq!(config.request_interval, Duration::from_millis(300));

        unsafe { std::env::remove_var(USER_AGENT_ENV) };
    }

    #[test]
    fn single_base_strips_trailing_slash() {
        let urls = EdgarUrls::single("http://127.0.0.1:9000/");
        assert_eq!(urls.archives, "http://127.0.0.1:9000/Archives/edgar");
        assert_eq!(urls.data, "http://127.0.0.1:9000");
        assert_eq!(urls.files, "http://127.0.0.1:9000/files");
    }
}
