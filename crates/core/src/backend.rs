//! Storage backend contract
//!
//! The narrow interface a hosting application drives: it decides when to
//! call these, the only lifecycle assumption is that write handles are
//! eventually closed.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::client::ObjectStoreClient;
use crate::error::Result;
use crate::file::RemoteFile;

/// Pluggable file storage as seen by a host application
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Whether `name` is taken; never fails
    async fn exists(&self, name: &str) -> bool;

    /// Public URL for `name`
    fn url(&self, name: &str) -> String;

    /// Remove `name`
    async fn delete(&self, name: &str) -> Result<()>;

    /// Open a file-like handle
    fn open(&self, name: &str, mode: &str) -> Result<RemoteFile>;

    /// Store a content stream under `name`, returning the stored name
    async fn save(&self, name: &str, content: &mut (dyn AsyncRead + Unpin + Send)) -> Result<String>;
}

#[async_trait]
impl StorageBackend for ObjectStoreClient {
    async fn exists(&self, name: &str) -> bool {
        ObjectStoreClient::exists(self, name).await
    }

    fn url(&self, name: &str) -> String {
        ObjectStoreClient::url(self, name)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        ObjectStoreClient::delete(self, name).await
    }

    fn open(&self, name: &str, mode: &str) -> Result<RemoteFile> {
        ObjectStoreClient::open(self, name, mode)
    }

    async fn save(&self, name: &str, content: &mut (dyn AsyncRead + Unpin + Send)) -> Result<String> {
        self.save_reader(name, content, false).await
    }
}
