//! Object store client
//!
//! Maps the storage operations onto the Elliptics command URL scheme and
//! turns HTTP statuses into typed outcomes.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::Config;
use crate::error::{HttpError, Result};
use crate::file::{AccessMode, RemoteFile};
use crate::retry::{self, RetryPolicy};
use crate::transport::{HttpResponse, Method, Transport};
use crate::url_builder::{self, APPEND_FLAG, CMD_DELETE, CMD_GET, CMD_UPLOAD};

/// Client for one Elliptics cluster
///
/// Cheap to clone; clones share the configuration and the transport.
#[derive(Clone)]
pub struct ObjectStoreClient {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreClient {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether `name` exists
    ///
    /// True only for a 200 answer to HEAD. Other statuses and request
    /// failures all count as "does not exist".
    pub async fn exists(&self, name: &str) -> bool {
        let url = self.private_url(CMD_GET, name, &[]);
        match self.request(Method::Head, &url, None).await {
            Ok(response) => response.is_ok(),
            Err(e) => {
                tracing::debug!(name, error = %e, "Existence check failed");
                false
            }
        }
    }

    /// Public URL serving `name`; no network access
    pub fn url(&self, name: &str) -> String {
        url_builder::build(&self.config.public_url, &self.config.prefix, CMD_GET, name, &[])
    }

    /// Remove `name`, best effort
    ///
    /// The response status is not checked; only a request that never got an
    /// answer is reported as an error.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let url = self.private_url(CMD_DELETE, name, &[]);
        let response = self.request(Method::Get, &url, None).await?;

        if !response.is_ok() {
            tracing::warn!(name, status = response.status, url = %url, "Elliptics delete not confirmed");
        }

        Ok(())
    }

    /// Whole content of `name`
    pub async fn fetch(&self, name: &str) -> Result<Bytes> {
        let url = self.private_url(CMD_GET, name, &[]);
        let response = self.request(Method::Get, &url, None).await?;

        if !response.is_ok() {
            tracing::warn!(status = response.status, url = %url, "Elliptics read error");
            return Err(HttpError::read(response.status, response.url).into());
        }

        Ok(response.body)
    }

    /// Store `content` under `name`, appending when `append` is set
    ///
    /// Returns the stored name.
    pub async fn save(&self, name: &str, content: impl Into<Bytes>, append: bool) -> Result<String> {
        let query: &[(&str, &str)] = if append { &[APPEND_FLAG] } else { &[] };
        let url = self.private_url(CMD_UPLOAD, name, query);
        let response = self.request(Method::Post, &url, Some(content.into())).await?;

        if !response.is_ok() {
            return Err(HttpError::save(response.status, response.url).into());
        }

        Ok(name.to_string())
    }

    /// Drain `reader` and store everything it produced in one upload
    pub async fn save_reader<R>(&self, name: &str, reader: &mut R, append: bool) -> Result<String>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut content = Vec::new();
        reader.read_to_end(&mut content).await?;
        self.save(name, content, append).await
    }

    /// Open a buffered handle; `mode` follows `open(2)`-style strings (`"r"`, `"wb"`, `"a"`)
    pub fn open(&self, name: &str, mode: &str) -> Result<RemoteFile> {
        let mode = AccessMode::parse(mode)?;
        Ok(RemoteFile::new(name, self.clone(), mode))
    }

    fn private_url(&self, command: &str, name: &str, query: &[(&str, &str)]) -> String {
        url_builder::build(&self.config.private_url, &self.config.prefix, command, name, query)
    }

    async fn request(&self, method: Method, url: &str, body: Option<Bytes>) -> Result<HttpResponse> {
        retry::execute(self.transport.as_ref(), method, url, self.policy(method), body).await
    }

    fn policy(&self, method: Method) -> RetryPolicy {
        if method.is_write() {
            self.config.write_policy()
        } else {
            self.config.read_policy()
        }
    }
}
