//! OAuth 1.0a request signing
//!
//! Produces the `Authorization` header value for a single request, signed
//! with HMAC-SHA1 over the method, the URL and the OAuth protocol parameters
//! (plus any extra request parameters). Every call draws a fresh nonce and
//! timestamp, so two headers for the same request never match; both still
//! verify against the same secrets.
//!
//! The [`Signer`] trait is the seam used by [`crate::tweet::Tweet`], which
//! lets tests substitute a fake without real secrets.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Url;
use sha1::Sha1;
use tracing::debug;
use zeroize::Zeroizing;

use crate::credentials::Credentials;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LENGTH: usize = 32;

/// RFC 3986 leaves only ALPHA / DIGIT / "-" / "." / "_" / "~" unescaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Computes OAuth 1.0a `Authorization` header values
pub trait Signer: Send + Sync {
    /// Build the header value for `method` + `url`.
    ///
    /// `extra_params` are form parameters that take part in the signature;
    /// they are not repeated in the header itself. Query parameters already
    /// in `url` are signed as well.
    fn authorization_header(
        &self,
        credentials: &Credentials,
        method: &str,
        url: &str,
        extra_params: &BTreeMap<String, String>,
    ) -> String;
}

/// HMAC-SHA1 signer using a random nonce and the current time
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1Signer;

impl Signer for HmacSha1Signer {
    fn authorization_header(
        &self,
        credentials: &Credentials,
        method: &str,
        url: &str,
        extra_params: &BTreeMap<String, String>,
    ) -> String {
        let nonce = generate_nonce();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        debug!(method, url, "Computing OAuth 1.0a authorization header");

        authorization_header_with(credentials, method, url, extra_params, &nonce, &timestamp)
    }
}

/// Build the header value with an explicit nonce and timestamp.
///
/// Deterministic for fixed inputs.
pub fn authorization_header_with(
    credentials: &Credentials,
    method: &str,
    url: &str,
    extra_params: &BTreeMap<String, String>,
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params = protocol_params(credentials, nonce, timestamp);
    let signature = sign(credentials, method, url, &oauth_params, extra_params);
    oauth_params.push(("oauth_signature", signature));
    oauth_params.sort_by(|a, b| a.0.cmp(b.0));

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {fields}")
}

/// Check a header produced by this module against the given secrets.
///
/// The nonce and timestamp are taken from the header itself. Returns `false`
/// for headers that do not parse, name a different consumer key, token or
/// signature method, or carry a signature that does not match.
pub fn verify_authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    extra_params: &BTreeMap<String, String>,
    header: &str,
) -> bool {
    let Some(fields) = parse_authorization_header(header) else {
        return false;
    };

    let field = |name: &'static str| fields.get(name).map(String::as_str);

    if field("oauth_consumer_key") != Some(credentials.consumer_key())
        || field("oauth_token") != Some(credentials.access_token())
        || field("oauth_signature_method") != Some(SIGNATURE_METHOD)
        || field("oauth_version") != Some(OAUTH_VERSION)
    {
        return false;
    }

    let (Some(nonce), Some(timestamp), Some(signature)) = (
        field("oauth_nonce"),
        field("oauth_timestamp"),
        field("oauth_signature"),
    ) else {
        return false;
    };

    let Ok(expected) = BASE64.decode(signature) else {
        return false;
    };

    let oauth_params = protocol_params(credentials, nonce, timestamp);
    let base_string = signature_base_string(method, url, &oauth_params, extra_params);

    let mut mac = keyed_mac(credentials);
    mac.update(base_string.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Split an `OAuth k="v", ...` header into decoded key/value pairs.
pub fn parse_authorization_header(header: &str) -> Option<BTreeMap<String, String>> {
    let rest = header.strip_prefix("OAuth ")?;
    let mut fields = BTreeMap::new();

    for pair in rest.split(", ") {
        let (key, quoted) = pair.split_once('=')?;
        let value = quoted.strip_prefix('"')?.strip_suffix('"')?;
        let value = percent_decode_str(value).decode_utf8().ok()?;
        fields.insert(key.to_string(), value.into_owned());
    }

    Some(fields)
}

fn protocol_params(
    credentials: &Credentials,
    nonce: &str,
    timestamp: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("oauth_consumer_key", credentials.consumer_key().to_string()),
        ("oauth_nonce", nonce.to_string()),
        ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp", timestamp.to_string()),
        ("oauth_token", credentials.access_token().to_string()),
        ("oauth_version", OAUTH_VERSION.to_string()),
    ]
}

fn sign(
    credentials: &Credentials,
    method: &str,
    url: &str,
    oauth_params: &[(&'static str, String)],
    extra_params: &BTreeMap<String, String>,
) -> String {
    let base_string = signature_base_string(method, url, oauth_params, extra_params);

    let mut mac = keyed_mac(credentials);
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

fn signature_base_string(
    method: &str,
    url: &str,
    oauth_params: &[(&'static str, String)],
    extra_params: &BTreeMap<String, String>,
) -> String {
    let (base_url, query_params) = normalize_url(url);

    // Sorted by encoded key, then encoded value
    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            extra_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .chain(
            query_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_url),
        percent_encode(&param_string)
    )
}

/// Split `url` into the base string URI of RFC 5849 section 3.4.1.2 and its
/// decoded query parameters.
///
/// Scheme and host are lowercased, default ports dropped, and the query and
/// fragment removed. Strings that do not parse as URLs are used unchanged.
fn normalize_url(url: &str) -> (String, Vec<(String, String)>) {
    let Ok(parsed) = Url::parse(url) else {
        return (url.to_string(), Vec::new());
    };
    let Some(host) = parsed.host_str() else {
        return (url.to_string(), Vec::new());
    };

    // `port()` is None when the port is the scheme's default
    let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();
    let base = format!(
        "{}://{}{}{}",
        parsed.scheme(),
        host.to_ascii_lowercase(),
        port,
        parsed.path()
    );

    let query = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    (base, query)
}

fn keyed_mac(credentials: &Credentials) -> HmacSha1 {
    let signing_key = Zeroizing::new(format!(
        "{}&{}",
        percent_encode(credentials.consumer_secret()),
        percent_encode(credentials.access_secret())
    ));

    HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts keys of any length")
}

fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}
