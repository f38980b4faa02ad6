//! HTTP client for sensor node feeds.
//!
//! Each node exposes a handful of plain-text GET endpoints. This client is
//! the whole transport collaborator: it issues the request and hands the raw
//! body to the decoder, which is the only component that interprets the
//! body's grammar.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The feed endpoints a sensor node serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Endpoint {
    /// Current readings for every room, snapshot grammar.
    Data,
    /// Most recent stored sample(s), history grammar.
    LastData,
    /// Full stored sample window, history grammar.
    AllData,
    /// Bare current temperature.
    Temperature,
    /// Bare current humidity.
    Humidity,
}

impl Endpoint {
    /// URL path for this endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Data => "/data",
            Endpoint::LastData => "/last_data",
            Endpoint::AllData => "/all_data",
            Endpoint::Temperature => "/temperature",
            Endpoint::Humidity => "/humidity",
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('/') {
            "data" => Ok(Endpoint::Data),
            "last_data" => Ok(Endpoint::LastData),
            "all_data" => Ok(Endpoint::AllData),
            "temperature" => Ok(Endpoint::Temperature),
            "humidity" => Ok(Endpoint::Humidity),
            other => Err(Error::invalid_config(format!("unknown endpoint: {other}"))),
        }
    }
}

/// HTTP client for one sensor node.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Node base URL (e.g. `http://192.168.1.40`)
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Request)?;
        Self::with_client(base_url, client)
    }

    /// Create a feed client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        // Normalize URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::invalid_config(format!(
                "URL must start with http:// or https://, got: {base_url}"
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one endpoint's raw text body.
    ///
    /// A non-success status is an error; callers skip the cycle and let the
    /// scheduler retry on its next tick.
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<String> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|source| Error::Transport {
                    url: url.clone(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::BadStatus {
                url,
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(Error::Request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = FeedClient::new("http://192.168.1.40").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.40");
    }

    #[test]
    fn client_normalizes_url() {
        let client = FeedClient::new("http://node.local/").unwrap();
        assert_eq!(client.base_url(), "http://node.local");
    }

    #[test]
    fn client_rejects_bare_host() {
        let result = FeedClient::new("node.local:80");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Data.path(), "/data");
        assert_eq!(Endpoint::AllData.path(), "/all_data");
        assert_eq!("last_data".parse::<Endpoint>().unwrap(), Endpoint::LastData);
        assert_eq!(
            "/temperature".parse::<Endpoint>().unwrap(),
            Endpoint::Temperature
        );
        assert!("metrics".parse::<Endpoint>().is_err());
    }
}
