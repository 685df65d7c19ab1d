//! Error types for tweetpost

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TweetError>;

#[derive(Error, Debug)]
pub enum TweetError {
    #[error("{0}")]
    MissingCredentials(#[from] MissingCredentials),

    #[error("Failed to serialize tweet content: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TweetError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TweetError::MissingCredentials(_) => 2,
            TweetError::Serialization(_) => 3,
            TweetError::InvalidInput(_) => 3,
            TweetError::Transport(_) => 1,
            TweetError::Config(_) => 1,
        }
    }
}

/// Every required credential field that was absent or empty, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCredentials {
    fields: Vec<&'static str>,
}

impl MissingCredentials {
    pub(crate) fn new(fields: Vec<&'static str>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

impl fmt::Display for MissingCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing the following credentials:\n{}",
            self.fields.join("\n")
        )
    }
}

impl std::error::Error for MissingCredentials {}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
