//! Configuration management for tweetpost
//!
//! Configuration is a TOML file with an optional `[api]` section (endpoint,
//! timeout) and an optional `[credentials]` section. Every credential and the
//! endpoint can be overridden from the environment, which is the usual way to
//! supply secrets in automation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credentials::{ACCESS_SECRET, ACCESS_TOKEN, CONSUMER_KEY, CONSUMER_SECRET, SIGNATURE_METHOD};
use crate::error::{ConfigError, Result};

/// The single endpoint tweets are posted to
pub const DEFAULT_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const CONFIG_ENV: &str = "TWEETPOST_CONFIG";
pub const ENDPOINT_ENV: &str = "TWEETPOST_ENDPOINT";

/// Credential field name paired with the environment variable overriding it
pub const CREDENTIAL_ENV_VARS: [(&str, &str); 5] = [
    (CONSUMER_KEY, "TWEETPOST_CONSUMER_KEY"),
    (CONSUMER_SECRET, "TWEETPOST_CONSUMER_SECRET"),
    (ACCESS_TOKEN, "TWEETPOST_ACCESS_TOKEN"),
    (ACCESS_SECRET, "TWEETPOST_ACCESS_SECRET"),
    (SIGNATURE_METHOD, "TWEETPOST_SIGNATURE_METHOD"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Credentials as written in the config file
///
/// Prefer environment variables for secrets; the file is mainly useful for
/// local development.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_secret: Option<String>,
    pub signature_method: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("CredentialsConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &redact(&self.consumer_secret))
            .field("access_token", &redact(&self.access_token))
            .field("access_secret", &redact(&self.access_secret))
            .field("signature_method", &self.signature_method)
            .finish()
    }
}

impl CredentialsConfig {
    fn get(&self, field: &str) -> Option<&String> {
        match field {
            CONSUMER_KEY => self.consumer_key.as_ref(),
            CONSUMER_SECRET => self.consumer_secret.as_ref(),
            ACCESS_TOKEN => self.access_token.as_ref(),
            ACCESS_SECRET => self.access_secret.as_ref(),
            SIGNATURE_METHOD => self.signature_method.as_ref(),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file at the default location is not an error: the default
    /// configuration is returned so credentials can come from the environment
    /// alone. A file named by `TWEETPOST_CONFIG` must exist.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).is_some();
        let config_path = resolve_config_path()?;

        if !explicit && !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.check()?;
        Ok(config)
    }

    /// Apply `TWEETPOST_ENDPOINT` and the credential environment variables.
    ///
    /// Empty variables are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(endpoint) = non_empty_env(ENDPOINT_ENV) {
            self.api.endpoint = Some(endpoint);
        }

        for (field, var) in CREDENTIAL_ENV_VARS {
            let Some(value) = non_empty_env(var) else {
                continue;
            };
            let slot = match field {
                CONSUMER_KEY => &mut self.credentials.consumer_key,
                CONSUMER_SECRET => &mut self.credentials.consumer_secret,
                ACCESS_TOKEN => &mut self.credentials.access_token,
                ACCESS_SECRET => &mut self.credentials.access_secret,
                _ => &mut self.credentials.signature_method,
            };
            *slot = Some(value);
        }
    }

    /// Credentials keyed by their canonical field names
    ///
    /// Only fields that are set appear in the map; validation decides what
    /// is missing.
    pub fn credential_map(&self) -> HashMap<String, String> {
        CREDENTIAL_ENV_VARS
            .iter()
            .filter_map(|(field, _)| {
                self.credentials
                    .get(field)
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect()
    }

    /// Reject a zero timeout and endpoints that are not http(s) URLs.
    ///
    /// Runs on every loaded file; call it again after applying overrides.
    pub fn check(&self) -> Result<()> {
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if let Some(endpoint) = &self.api.endpoint {
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(ConfigError::InvalidValue {
                    field: "api.endpoint".to_string(),
                    reason: format!("'{}' is not an http(s) URL", endpoint),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("tweetpost").join("config.toml"))
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TweetError;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var(CONFIG_ENV);
        std::env::remove_var(ENDPOINT_ENV);
        for (_, var) in CREDENTIAL_ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.credential_map().is_empty());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[api]
endpoint = "http://127.0.0.1:8080/2/tweets"
timeout_secs = 5

[credentials]
consumer_key = "ck"
consumer_secret = "cs"
access_token = "at"
access_secret = "as"
signature_method = "HMAC-SHA1"
"#,
        );

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api.endpoint(), "http://127.0.0.1:8080/2/tweets");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));

        let map = config.credential_map();
        assert_eq!(map.len(), 5);
        assert_eq!(map["ConsumerKey"], "ck");
        assert_eq!(map["AccessSecret"], "as");
        assert_eq!(map["SignatureMethod"], "HMAC-SHA1");
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[api]\ntimeout_secs = 0\n");
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(
            err,
            TweetError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "api.timeout_secs"
        ));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[api]\nendpoint = \"ftp://example.com\"\n");
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[api\nendpoint =");
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, TweetError::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = CredentialsConfig {
            consumer_key: Some("ck".to_string()),
            consumer_secret: Some("super-secret".to_string()),
            access_token: Some("token-value".to_string()),
            access_secret: Some("other-secret".to_string()),
            signature_method: None,
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("ck"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("token-value"));
        assert!(!debug.contains("other-secret"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        clear_env();
        let mut config = Config {
            credentials: CredentialsConfig {
                consumer_key: Some("from-file".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        std::env::set_var("TWEETPOST_CONSUMER_KEY", "from-env");
        std::env::set_var("TWEETPOST_ACCESS_SECRET", "secret-from-env");
        std::env::set_var("TWEETPOST_SIGNATURE_METHOD", "");
        std::env::set_var(ENDPOINT_ENV, "http://localhost:9999/2/tweets");
        config.apply_env_overrides();
        clear_env();

        let map = config.credential_map();
        assert_eq!(map["ConsumerKey"], "from-env");
        assert_eq!(map["AccessSecret"], "secret-from-env");
        assert!(!map.contains_key("SignatureMethod"));
        assert_eq!(config.api.endpoint(), "http://localhost:9999/2/tweets");
    }

    #[test]
    #[serial]
    fn test_check_catches_invalid_env_endpoint() {
        clear_env();
        let mut config = Config::default();
        assert!(config.check().is_ok());

        std::env::set_var(ENDPOINT_ENV, "ftp://example.com/2/tweets");
        config.apply_env_overrides();
        clear_env();

        let err = config.check().unwrap_err();
        assert!(matches!(
            err,
            TweetError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "api.endpoint"
        ));
    }

    #[test]
    fn test_check_catches_zero_timeout_override() {
        let mut config = Config::default();
        config.api.timeout_secs = Some(0);
        assert_eq!(config.check().unwrap_err().exit_code(), 1);
    }

    #[test]
    #[serial]
    fn test_load_uses_defaults_when_default_file_missing() {
        clear_env();
        // Only meaningful when no real config exists at the default path
        if resolve_config_path().map(|p| p.exists()).unwrap_or(true) {
            return;
        }
        let config = Config::load().unwrap();
        assert_eq!(config.api.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    #[serial]
    fn test_load_explicit_missing_path_is_error() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        std::env::set_var(CONFIG_ENV, &missing);
        let result = Config::load();
        clear_env();

        assert!(matches!(
            result,
            Err(TweetError::Config(ConfigError::ReadError(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_load_explicit_path_from_env() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[credentials]\naccess_token = \"at\"\n");
        std::env::set_var(CONFIG_ENV, &path);
        let config = Config::load();
        clear_env();

        assert_eq!(config.unwrap().credential_map()["AccessToken"], "at");
    }
}
