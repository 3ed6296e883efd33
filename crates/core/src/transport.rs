//! HTTP transport abstraction
//!
//! The client never talks to the network directly; it hands fully-built
//! requests to a [`Transport`]. `ell-http` provides the reqwest-backed
//! implementation, tests substitute mocks or in-memory stores.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

/// HTTP methods used by the command URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
        }
    }

    /// POST uses the write budget, everything else the read budget
    pub fn is_write(&self) -> bool {
        matches!(self, Method::Post)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request attempt
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Hard limit for this attempt
    pub timeout: Duration,
    pub body: Option<Bytes>,
}

/// Whatever the server answered, regardless of status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub url: String,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Ways an attempt can fail before a response arrives
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No response within the attempt's timeout
    #[error("{0}")]
    Timeout(String),

    /// The host name could not be resolved
    #[error("{0}")]
    Resolve(String),

    /// Anything else (refused connection, TLS failure, broken body, ...)
    #[error("{0}")]
    Other(String),
}

/// Sends one request and returns the raw response
///
/// Implementations must be safe to share between tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
