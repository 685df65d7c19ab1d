//! tweet-post - Post a single tweet with OAuth 1.0a signing

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use libtweetpost::logging::{LogFormat, LoggingConfig};
use libtweetpost::{Config, HttpTransport, Tweet, TweetContent, TweetError};

#[derive(Parser, Debug)]
#[command(name = "tweet-post")]
#[command(version)]
#[command(about = "Post a single tweet using OAuth 1.0a credentials", long_about = None)]
struct Cli {
    /// Tweet text, or a JSON object with --json (reads from stdin if not provided)
    content: Option<String>,

    /// Treat content as a complete JSON request body
    #[arg(short, long)]
    json: bool,

    /// Path to config file (overrides TWEETPOST_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Endpoint to post to (overrides config and TWEETPOST_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Log format (text, json, pretty)
    #[arg(long, env = "TWEETPOST_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (error, warn, info, debug, trace)
    #[arg(long, env = "TWEETPOST_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_format, cli.log_level.clone(), cli.verbose).init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<TweetError>()
                .map(TweetError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    if cli.format != "text" && cli.format != "json" {
        return Err(TweetError::InvalidInput(format!(
            "Invalid output format '{}'. Valid options: text, json",
            cli.format
        ))
        .into());
    }

    let raw = read_content(cli.content.as_deref())?;
    let content = build_content(&raw, cli.json)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.apply_env_overrides();
    if let Some(endpoint) = cli.endpoint {
        config.api.endpoint = Some(endpoint);
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = Some(timeout);
    }
    config.check()?;

    tracing::debug!(endpoint = config.api.endpoint(), "Loaded configuration");

    let tweet = Tweet::with_signer(
        &config.credential_map(),
        content,
        &libtweetpost::HmacSha1Signer,
        config.api.endpoint(),
    )?;
    let transport = HttpTransport::new(&config.api)?;

    let status = tweet.send(&transport).await?;
    let success = (200..300).contains(&status);

    if cli.format == "json" {
        println!("{}", serde_json::json!({ "status": status, "success": success }));
    } else {
        println!("{}", status);
    }

    Ok(exit_code_for_status(status))
}

/// Content from the argument, or stdin when no argument is given
fn read_content(arg: Option<&str>) -> anyhow::Result<String> {
    let raw = match arg {
        Some(text) => text.to_string(),
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(TweetError::InvalidInput(
                    "No content provided. Pass it as an argument or via stdin".to_string(),
                )
                .into());
            }
            let mut buffer = String::new();
            stdin
                .read_to_string(&mut buffer)
                .context("Failed to read content from stdin")?;
            buffer
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TweetError::InvalidInput("Content cannot be empty".to_string()).into());
    }

    Ok(trimmed.to_string())
}

fn build_content(raw: &str, json: bool) -> libtweetpost::Result<TweetContent> {
    if !json {
        return Ok(TweetContent::text(raw));
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| TweetError::InvalidInput(format!("Content is not valid JSON: {}", e)))?;

    TweetContent::try_from(value)
        .map_err(|_| TweetError::InvalidInput("JSON content must be an object".to_string()))
}

fn exit_code_for_status(status: u16) -> i32 {
    match status {
        200..=299 => 0,
        401 | 403 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plain_text_content() {
        let content = build_content("hello", false).unwrap();
        assert_eq!(content, TweetContent::text("hello"));
    }

    #[test]
    fn test_build_json_content() {
        let content = build_content(r#"{"text": "hi", "reply_settings": "following"}"#, true).unwrap();
        assert_eq!(content.len(), 2);
    }

    #[test]
    fn test_build_json_content_rejects_arrays() {
        let err = build_content("[1, 2]", true).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_build_json_content_rejects_invalid_json() {
        let err = build_content("{not json", true).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_exit_code_for_status() {
        assert_eq!(exit_code_for_status(200), 0);
        assert_eq!(exit_code_for_status(201), 0);
        assert_eq!(exit_code_for_status(401), 2);
        assert_eq!(exit_code_for_status(403), 2);
        assert_eq!(exit_code_for_status(429), 1);
        assert_eq!(exit_code_for_status(500), 1);
    }

    #[test]
    fn test_read_content_trims_argument() {
        assert_eq!(read_content(Some("  hello \n")).unwrap(), "hello");
    }

    #[test]
    fn test_read_content_rejects_blank_argument() {
        let err = read_content(Some("   ")).unwrap_err();
        let tweet_err = err.downcast_ref::<TweetError>().unwrap();
        assert_eq!(tweet_err.exit_code(), 3);
    }
}
