//! HTTP transport port.
//!
//! The acquisition engine only ever issues plain GET requests against the
//! forecast archive. Implementations own timeouts and connection reuse; the
//! engine owns retries.

use async_trait::async_trait;
use thiserror::Error;

/// A response from the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response.
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure to obtain any response at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, TLS or protocol failure.
    #[error("request to {url} failed: {message}")]
    Request {
        /// The URL that was requested.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The request did not finish in time.
    #[error("request to {url} timed out")]
    Timeout {
        /// The URL that was requested.
        url: String,
    },
}

/// Port for fetching raw bytes over HTTP.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request and read the whole body.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, vec![1]).is_success());
        assert!(HttpResponse::new(204, vec![]).is_success());
        assert!(!HttpResponse::new(302, vec![]).is_success());
        assert!(!HttpResponse::new(404, vec![]).is_success());
    }

    #[test]
    fn test_error_messages() {
        let err = TransportError::Timeout {
            url: "https://nomads.example/f000".to_string(),
        };
        assert!(err.to_string().contains("timed out"));
    }
}
