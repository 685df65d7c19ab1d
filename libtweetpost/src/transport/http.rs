//! `reqwest`-backed transport

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::error::{Result, TweetError};
use crate::transport::Transport;

/// Sends requests with a single `reqwest::Client` and an explicit timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport using the timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns `TweetError::Transport` if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("tweetpost/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TweetError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, authorization, body))]
    async fn post_json(&self, url: &str, authorization: &str, body: Vec<u8>) -> Result<u16> {
        debug!(bytes = body.len(), "Sending POST request");

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        Ok(response.status().as_u16())
    }
}

/// Describe a failed exchange by its kind
fn map_reqwest_error(error: reqwest::Error) -> TweetError {
    let kind = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_builder() {
        "invalid request"
    } else {
        "request failed"
    };

    TweetError::Transport(format!("{}: {}", kind, error))
}
