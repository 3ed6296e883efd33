//! ell-http: reqwest transport for ell-core
//!
//! Implements the `Transport` trait from ell-core on top of reqwest and
//! classifies failures the way the retrying executor expects: timeouts are
//! retryable, unresolvable hosts are fatal, everything else is reported as is.

mod transport;

pub use transport::HttpTransport;

use std::sync::Arc;

use ell_core::{Config, ObjectStoreClient, Result};

/// Build a client for `config` backed by a fresh [`HttpTransport`]
pub fn connect(config: Config) -> Result<ObjectStoreClient> {
    let transport = HttpTransport::new()?;
    Ok(ObjectStoreClient::new(config, Arc::new(transport)))
}
