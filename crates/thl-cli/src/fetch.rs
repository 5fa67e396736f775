//! Payload download

use crate::settings::Settings;
use reqwest::{Client, StatusCode};

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP client could not be built
    #[error("cannot create http client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request failed before a response arrived, or the body was cut short
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
}

/// Downloads payload documents
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create fetcher with the configured user agent and timeout
    ///
    /// # Errors
    /// [`FetchError::Client`] if the client cannot be constructed
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Fetch the full response body
    ///
    /// # Errors
    /// Transport failure or non-2xx status
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        tracing::info!(url, "fetching payload");
        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        tracing::debug!(bytes = body.len(), "payload received");
        Ok(body.to_vec())
    }
}
