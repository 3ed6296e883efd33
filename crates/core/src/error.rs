//! Error types for ell-core
//!
//! A single `Error` enum covers every failure the library can surface.
//! Remote failures are grouped under [`HttpError`], which carries the
//! offending response when one exists and only a diagnostic message when
//! the request never produced a response (timeouts).

use thiserror::Error;

/// Result type alias for ell-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the object store
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration is invalid, or the target host cannot be resolved
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote store rejected a request or never answered
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Operation incompatible with the handle's access mode
    #[error("Mode error: {0}")]
    Mode(String),

    /// Mode string rejected when opening a handle
    #[error("Invalid access mode: {0}")]
    InvalidMode(String),

    /// I/O attempted on a handle that has been closed
    #[error("I/O operation on closed file: {0}")]
    Closed(String),

    /// Transport failure that is neither a timeout nor a resolution failure
    #[error("Network error: {0}")]
    Network(String),

    /// Property name not declared in the schema
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Local I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Status code of the remote response behind this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(e) => e.response.as_ref().map(|r| r.status),
            _ => None,
        }
    }

    /// Whether this error is an exhausted retry budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.kind == HttpErrorKind::Timeout)
    }
}

/// What the failed remote request was doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// Fetching an object
    Read,
    /// Storing an object
    Save,
    /// Every attempt timed out
    Timeout,
}

/// Status line and URL of a response kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status: u16,
    pub url: String,
}

/// A request to the object store that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub kind: HttpErrorKind,
    pub response: Option<ResponseSummary>,
    message: String,
}

impl HttpError {
    /// Non-200 answer to a fetch
    pub fn read(status: u16, url: impl Into<String>) -> Self {
        Self::with_response(HttpErrorKind::Read, status, url.into())
    }

    /// Non-200 answer to an upload
    pub fn save(status: u16, url: impl Into<String>) -> Self {
        Self::with_response(HttpErrorKind::Save, status, url.into())
    }

    /// Retry budget exhausted; no response is available
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: HttpErrorKind::Timeout,
            response: None,
            message: message.into(),
        }
    }

    fn with_response(kind: HttpErrorKind, status: u16, url: String) -> Self {
        let verb = match kind {
            HttpErrorKind::Save => "sending to",
            _ => "reading",
        };
        Self {
            kind,
            message: format!("got status code {status} while {verb} {url}"),
            response: Some(ResponseSummary { status, url }),
        }
    }

    /// Diagnostic text
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::Http(e) if e.kind == HttpErrorKind::Timeout => std::io::ErrorKind::TimedOut,
            Error::Mode(_) | Error::Closed(_) => std::io::ErrorKind::Unsupported,
            _ => std::io::ErrorKind::Other,
        };
        match err {
            Error::Io(io_err) => io_err,
            other => std::io::Error::new(kind, other),
        }
    }
}
