//! Mock transport for testing
//!
//! Records every request it receives and answers with a configured status
//! code or a simulated connection failure, so send-path behaviour can be
//! verified without network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Result, TweetError};
use crate::transport::Transport;

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub authorization: String,
    pub body: Vec<u8>,
}

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    Status(u16),
    ConnectionFailure(String),
}

/// Mock transport; clones share the same request log
#[derive(Debug, Clone)]
pub struct MockTransport {
    response: MockResponse,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that completes every exchange with `status`
    pub fn with_status(status: u16) -> Self {
        Self::new(MockResponse::Status(status))
    }

    /// Create a mock whose every request fails to connect
    pub fn connection_failure(message: &str) -> Self {
        Self::new(MockResponse::ConnectionFailure(message.to_string()))
    }

    /// Number of times `post_json` was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, authorization: &str, body: Vec<u8>) -> Result<u16> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            authorization: authorization.to_string(),
            body,
        });

        match &self.response {
            MockResponse::Status(status) => Ok(*status),
            MockResponse::ConnectionFailure(message) => Err(TweetError::Transport(format!(
                "connection failed: {}",
                message
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_requests() {
        let transport = MockTransport::with_status(201);
        let status = transport
            .post_json("http://localhost/2/tweets", "OAuth a", b"{}".to_vec())
            .await
            .unwrap();

        assert_eq!(status, 201);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(
            transport.requests()[0],
            RecordedRequest {
                url: "http://localhost/2/tweets".to_string(),
                authorization: "OAuth a".to_string(),
                body: b"{}".to_vec(),
            }
        );
    }

    #[tokio::test]
    async fn test_mock_connection_failure() {
        let transport = MockTransport::connection_failure("refused");
        let result = transport.post_json("http://localhost", "OAuth a", Vec::new()).await;

        assert!(matches!(result, Err(TweetError::Transport(ref m)) if m.contains("refused")));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_request_log() {
        let transport = MockTransport::with_status(200);
        let clone = transport.clone();
        clone.post_json("http://localhost", "OAuth a", Vec::new()).await.unwrap();
        assert_eq!(transport.call_count(), 1);
    }
}
