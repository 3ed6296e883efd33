//! reqwest-backed transport

use async_trait::async_trait;
use ell_core::{Error, HttpRequest, HttpResponse, Method, Result, Transport, TransportError};

/// Fragments of resolver errors across platforms
const RESOLUTION_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host",
    "temporary failure in name resolution",
];

/// HTTP transport over a shared reqwest client
///
/// Idle connections are never kept: the nodes behind a cluster address come
/// and go, and a pooled connection to a departed node fails the next request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(concat!("ell/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { inner })
    }

    /// Use a preconfigured reqwest client (proxies, TLS roots, ...)
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .inner
            .request(method, &request.url)
            .timeout(request.timeout);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.bytes().await.map_err(classify)?;

        tracing::trace!(status, url = %url, bytes = body.len(), "Received response");

        Ok(HttpResponse { status, url, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let message = describe(&err);

    if err.is_timeout() {
        TransportError::Timeout(message)
    } else if is_resolution_failure(&err) {
        TransportError::Resolve(message)
    } else {
        TransportError::Other(message)
    }
}

/// Whether anything in the error chain says the host name did not resolve
pub(crate) fn is_resolution_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let msg = e.to_string().to_lowercase();
        if RESOLUTION_MARKERS.iter().any(|m| msg.contains(m)) {
            return true;
        }
        current = e.source();
    }
    false
}

/// The error and its sources joined with `: `
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        let msg = e.to_string();
        if !parts.iter().any(|p| p.contains(&msg)) {
            parts.push(msg);
        }
        current = e.source();
    }
    parts.join(": ")
}
