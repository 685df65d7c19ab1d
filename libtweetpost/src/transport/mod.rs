//! HTTP transport abstraction
//!
//! A [`Transport`] performs exactly one POST of an already-encoded JSON body
//! and reports the status code of the completed exchange. It never inspects
//! the response body and never retries.
//!
//! # Examples
//!
//! ```no_run
//! use libtweetpost::transport::{HttpTransport, Transport};
//! use libtweetpost::config::ApiConfig;
//!
//! # async fn example() -> libtweetpost::error::Result<()> {
//! let transport = HttpTransport::new(&ApiConfig::default())?;
//! let status = transport
//!     .post_json(
//!         "https://api.twitter.com/2/tweets",
//!         "OAuth oauth_consumer_key=\"...\"",
//!         br#"{"text":"hello"}"#.to_vec(),
//!     )
//!     .await?;
//! println!("HTTP {}", status);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;

pub mod http;

// Mock transport is available for all builds (not just tests) to support integration tests
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

/// One-shot JSON POST
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with the given `Authorization` value and
    /// `Content-Type: application/json`.
    ///
    /// # Returns
    ///
    /// The HTTP status code of any completed exchange, 4xx and 5xx included.
    ///
    /// # Errors
    ///
    /// Returns `TweetError::Transport` when the exchange cannot be completed
    /// (connection, DNS, TLS or timeout failure).
    async fn post_json(&self, url: &str, authorization: &str, body: Vec<u8>) -> Result<u16>;
}
