//! tweetpost - post a single tweet with OAuth 1.0a signing
//!
//! This library validates a credential set, signs one `POST` to the tweets
//! endpoint, encodes arbitrary JSON content and reports the HTTP status of
//! the exchange. It never retries; the caller decides what a status means.

pub mod config;
pub mod content;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod oauth;
pub mod transport;
pub mod tweet;

// Re-export commonly used types
pub use config::Config;
pub use content::{ContentValue, TweetContent};
pub use credentials::Credentials;
pub use error::{Result, TweetError};
pub use oauth::{HmacSha1Signer, Signer};
pub use transport::{HttpTransport, MockTransport, Transport};
pub use tweet::Tweet;
