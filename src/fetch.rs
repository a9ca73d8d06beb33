use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;

use crate::config::AppConfig;
use crate::error::{CalendarError, Result};

pub const WEBCAL_SCHEME: &str = "webcal://";

/// Check that `url` is a well-formed `webcal://` URL and return its `https://` twin.
pub fn validate_webcal_url(url: &str) -> Result<Url> {
    let url = url.trim();
    let Some(rest) = url.strip_prefix(WEBCAL_SCHEME) else {
        return Err(CalendarError::Validation(format!(
            "URL must start with {WEBCAL_SCHEME}: {url}"
        )));
    };
    let https = Url::parse(&format!("https://{rest}"))
        .map_err(|err| CalendarError::Validation(format!("{url}: {err}")))?;
    if https.host_str().map_or(true, str::is_empty) {
        return Err(CalendarError::Validation(format!("{url}: missing host")));
    }
    Ok(https)
}

/// Blocking HTTP client for calendar feeds.
pub struct WebcalFetcher {
    client: Client,
}

impl WebcalFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|err| CalendarError::Network(format!("unable to build http client: {err}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.http_timeout(), &config.user_agent)
    }

    /// Validate a `webcal://` URL and download the feed behind it over HTTPS.
    pub fn fetch(&self, webcal_url: &str) -> Result<String> {
        let url = validate_webcal_url(webcal_url)?;
        self.fetch_url(url.as_str())
    }

    pub fn fetch_url(&self, url: &str) -> Result<String> {
        debug!("fetching calendar feed from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| CalendarError::Network(format!("request failed for {url}: {err}")))?;
        let response = response
            .error_for_status()
            .map_err(|err| CalendarError::Network(format!("non-success status for {url}: {err}")))?;
        response.text().map_err(|err| {
            CalendarError::Network(format!("unable to read response body for {url}: {err}"))
        })
    }
}
