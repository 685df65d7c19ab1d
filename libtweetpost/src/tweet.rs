//! Tweet construction and sending
//!
//! A [`Tweet`] is built from a credential map and content. Construction
//! validates the credentials and computes the OAuth header once, bound to
//! `POST` and the endpoint URL; [`Tweet::send`] then encodes the content and
//! performs exactly one request against that same URL.
//!
//! # Examples
//!
//! ```no_run
//! use std::collections::HashMap;
//! use libtweetpost::config::ApiConfig;
//! use libtweetpost::content::TweetContent;
//! use libtweetpost::transport::HttpTransport;
//! use libtweetpost::tweet::Tweet;
//!
//! # async fn example(credentials: HashMap<String, String>) -> libtweetpost::Result<()> {
//! let tweet = Tweet::new(&credentials, TweetContent::text("Hello world"))?;
//! let transport = HttpTransport::new(&ApiConfig::default())?;
//!
//! let status = tweet.send(&transport).await?;
//! if !(200..300).contains(&status) {
//!     eprintln!("API answered {}", status);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::config::DEFAULT_ENDPOINT;
use crate::content::TweetContent;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::oauth::{HmacSha1Signer, Signer, SIGNATURE_METHOD};
use crate::transport::Transport;

/// The only method a tweet is ever signed for
pub const METHOD: &str = "POST";

/// A signed, ready-to-send tweet
///
/// The header carries a single-use nonce, so a `Tweet` cannot be copied and
/// is consumed by [`Tweet::send`].
///
/// ```compile_fail
/// fn is_clone<T: Clone>() {}
/// is_clone::<libtweetpost::Tweet>();
/// ```
#[derive(Debug)]
pub struct Tweet {
    header: String,
    endpoint: String,
    content: TweetContent,
}

impl Tweet {
    /// Validate `credentials` and sign a tweet for the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns `TweetError::MissingCredentials` naming every missing field.
    /// Nothing is signed in that case.
    pub fn new(credentials: &HashMap<String, String>, content: TweetContent) -> Result<Self> {
        Self::with_signer(credentials, content, &HmacSha1Signer, DEFAULT_ENDPOINT)
    }

    /// Like [`Tweet::new`] with an explicit signer and endpoint.
    pub fn with_signer(
        credentials: &HashMap<String, String>,
        content: TweetContent,
        signer: &dyn Signer,
        endpoint: &str,
    ) -> Result<Self> {
        let credentials = Credentials::from_map(credentials)?;

        if credentials.signature_method() != SIGNATURE_METHOD {
            warn!(
                "SignatureMethod '{}' is not supported, signing with {}",
                credentials.signature_method(),
                SIGNATURE_METHOD
            );
        }

        let header = signer.authorization_header(&credentials, METHOD, endpoint, &BTreeMap::new());

        Ok(Self {
            header,
            endpoint: endpoint.to_string(),
            content,
        })
    }

    /// The precomputed `Authorization` header value.
    pub fn authorization_header(&self) -> &str {
        &self.header
    }

    /// The URL the header was signed for and the request goes to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn content(&self) -> &TweetContent {
        &self.content
    }

    /// Encode the content and POST it once.
    ///
    /// # Returns
    ///
    /// The HTTP status of the completed exchange. Non-2xx codes are returned
    /// as values, not errors; interpreting them is up to the caller.
    ///
    /// # Errors
    ///
    /// - `TweetError::Serialization` if the content cannot be encoded; no
    ///   request is made
    /// - `TweetError::Transport` if the exchange cannot be completed
    pub async fn send(self, transport: &dyn Transport) -> Result<u16> {
        let body = self.content.to_json()?;

        debug!(endpoint = %self.endpoint, bytes = body.len(), "Posting tweet");

        let status = transport.post_json(&self.endpoint, &self.header, body).await?;

        info!(status, "Tweet request completed");
        Ok(status)
    }
}
