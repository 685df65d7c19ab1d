//! OAuth 1.0a credential validation
//!
//! Credentials arrive as a plain name → value map, which is how embedding
//! applications usually hold them (environment, secrets store, config file).
//! [`validate`] checks that every required field is present and non-empty and
//! reports all missing fields at once. [`Credentials::from_map`] validates and
//! then moves the values into a typed set with the secrets wrapped in
//! [`SecretString`].
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use libtweetpost::credentials::{validate, Credentials};
//!
//! let mut map = HashMap::new();
//! map.insert("ConsumerKey".to_string(), "ck".to_string());
//! map.insert("ConsumerSecret".to_string(), "cs".to_string());
//! map.insert("AccessToken".to_string(), "at".to_string());
//! map.insert("AccessSecret".to_string(), "as".to_string());
//! map.insert("SignatureMethod".to_string(), "HMAC-SHA1".to_string());
//!
//! validate(&map).unwrap();
//! let credentials = Credentials::from_map(&map).unwrap();
//! assert_eq!(credentials.consumer_key(), "ck");
//! ```

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{MissingCredentials, Result};

pub const CONSUMER_KEY: &str = "ConsumerKey";
pub const CONSUMER_SECRET: &str = "ConsumerSecret";
pub const ACCESS_TOKEN: &str = "AccessToken";
pub const ACCESS_SECRET: &str = "AccessSecret";
pub const SIGNATURE_METHOD: &str = "SignatureMethod";

/// Required credential fields, in the order they are checked and reported.
pub const REQUIRED_FIELDS: [&str; 5] = [
    CONSUMER_KEY,
    CONSUMER_SECRET,
    ACCESS_TOKEN,
    ACCESS_SECRET,
    SIGNATURE_METHOD,
];

/// Check that every required credential field is present and non-empty.
///
/// Values are not inspected beyond emptiness.
///
/// # Errors
///
/// Returns `TweetError::MissingCredentials` naming every missing field in
/// [`REQUIRED_FIELDS`] order.
pub fn validate(credentials: &HashMap<String, String>) -> Result<()> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| credentials.get(*field).map_or(true, |v| v.is_empty()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingCredentials::new(missing).into())
    }
}

/// A validated credential set
///
/// Secrets are zeroed on drop and redacted from `Debug` output.
#[derive(Debug)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: SecretString,
    access_token: SecretString,
    access_secret: SecretString,
    signature_method: String,
}

impl Credentials {
    /// Validate `map` and build a typed credential set from it.
    ///
    /// # Errors
    ///
    /// Returns the same error as [`validate`] when fields are missing.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        validate(map)?;

        // validate() guarantees every required key is present
        let field = |name: &str| map.get(name).cloned().unwrap_or_default();

        Ok(Self {
            consumer_key: field(CONSUMER_KEY),
            consumer_secret: SecretString::from(field(CONSUMER_SECRET)),
            access_token: SecretString::from(field(ACCESS_TOKEN)),
            access_secret: SecretString::from(field(ACCESS_SECRET)),
            signature_method: field(SIGNATURE_METHOD),
        })
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }

    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn access_secret(&self) -> &str {
        self.access_secret.expose_secret()
    }

    /// The signature method named in the credential set.
    ///
    /// Informational only; signing always uses HMAC-SHA1.
    pub fn signature_method(&self) -> &str {
        &self.signature_method
    }
}
