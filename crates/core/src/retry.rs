//! Retrying request executor
//!
//! Turns one HTTP call into a bounded operation: every attempt gets a hard
//! timeout, timed-out attempts are retried up to the policy's budget, and an
//! unresolvable host fails at once. Any response, whatever its status, ends
//! the loop; interpreting the status is up to the caller.

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::error::{Error, HttpError, Result};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Timeout and attempt budget for one class of requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Per-attempt limit
    pub timeout: Duration,
    /// Total attempts, including the first
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_attempts: u32) -> Self {
        Self {
            timeout,
            max_attempts,
        }
    }
}

/// Result of a single attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The server answered
    Response(HttpResponse),
    /// No answer in time; worth another try
    TimedOut(String),
    /// Host name does not resolve; retrying cannot help
    Unresolvable(String),
    /// Some other transport failure
    Failed(String),
}

/// Run one attempt under a hard timeout
pub async fn attempt(transport: &dyn Transport, request: HttpRequest) -> AttemptOutcome {
    let limit = request.timeout;

    match tokio::time::timeout(limit, transport.send(request)).await {
        Ok(Ok(response)) => AttemptOutcome::Response(response),
        Ok(Err(TransportError::Timeout(msg))) => AttemptOutcome::TimedOut(msg),
        Ok(Err(TransportError::Resolve(msg))) => AttemptOutcome::Unresolvable(msg),
        Ok(Err(TransportError::Other(msg))) => AttemptOutcome::Failed(msg),
        Err(_) => AttemptOutcome::TimedOut(format!(
            "no response within {:.3} seconds",
            limit.as_secs_f64()
        )),
    }
}

/// Execute a request, retrying timed-out attempts
///
/// # Errors
/// * [`Error::Config`] when the host cannot be resolved (first attempt, no retry)
/// * [`HttpError::timeout`] when every attempt timed out
/// * [`Error::Network`] for any other transport failure
pub async fn execute(
    transport: &dyn Transport,
    method: Method,
    url: &str,
    policy: RetryPolicy,
    body: Option<Bytes>,
) -> Result<HttpResponse> {
    let timeout_secs = policy.timeout.as_secs_f64();
    let mut error_message = String::new();
    let mut failed = 0u32;

    for attempt_no in 1..=policy.max_attempts {
        let request = HttpRequest {
            method,
            url: url.to_string(),
            timeout: policy.timeout,
            body: body.clone(),
        };

        let started = Instant::now();
        match attempt(transport, request).await {
            AttemptOutcome::Response(response) => {
                tracing::info!(
                    method = %method,
                    url,
                    timeout_secs,
                    attempt = attempt_no,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Elliptics request completed"
                );

                if failed > 0 {
                    tracing::warn!(
                        method = %method,
                        url,
                        timeout_secs,
                        "{failed} failed attempts of {} to connect to Elliptics: {error_message}",
                        policy.max_attempts
                    );
                }

                return Ok(response);
            }
            AttemptOutcome::TimedOut(msg) => {
                tracing::debug!(
                    method = %method,
                    url,
                    attempt = attempt_no,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %msg,
                    "Elliptics request timed out"
                );
                failed += 1;
                error_message = msg;
            }
            AttemptOutcome::Unresolvable(msg) => {
                tracing::error!(method = %method, url, error = %msg, "Cannot resolve Elliptics host");
                return Err(Error::Config(format!(
                    "incorrect elliptics request {method} \"{url}\": {msg}"
                )));
            }
            AttemptOutcome::Failed(msg) => {
                tracing::error!(method = %method, url, error = %msg, "Elliptics request failed");
                return Err(Error::Network(format!("{method} {url}: {msg}")));
            }
        }
    }

    tracing::error!(
        method = %method,
        url,
        timeout_secs,
        "{failed} failed attempts of {} to connect to Elliptics: {error_message}",
        policy.max_attempts
    );

    Err(HttpError::timeout(error_message).into())
}
