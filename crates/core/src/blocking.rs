//! Blocking `std::io` adapter for [`RemoteFile`]
//!
//! Drives the async handle on a shared Tokio runtime so synchronous code can
//! use `Read`, `Write` and `Seek`. Do not use from inside an async context;
//! blocking on the runtime from one of its own workers panics.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::OnceLock;

use tokio::runtime::Runtime;

use crate::client::ObjectStoreClient;
use crate::error::Result;
use crate::file::RemoteFile;

/// Shared runtime used by every blocking handle
fn runtime() -> io::Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();

    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("ell-blocking")
        .build()?;

    // Losing the race drops our runtime and keeps the winner's.
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| io::Error::other("blocking runtime unavailable"))
}

/// Synchronous wrapper around a [`RemoteFile`]
#[derive(Debug)]
pub struct BlockingFile {
    inner: RemoteFile,
}

impl BlockingFile {
    pub fn new(inner: RemoteFile) -> Self {
        Self { inner }
    }

    /// Open `name` through `client`, see [`ObjectStoreClient::open`]
    pub fn open(client: &ObjectStoreClient, name: &str, mode: &str) -> Result<Self> {
        Ok(Self::new(client.open(name, mode)?))
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn closed(&self) -> bool {
        self.inner.closed()
    }

    /// Upload buffered content (write/append handles) and finish the handle
    pub fn close(&mut self) -> Result<()> {
        runtime()?.block_on(self.inner.close())
    }

    pub fn into_inner(self) -> RemoteFile {
        self.inner
    }
}

impl Read for BlockingFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let data = runtime()?.block_on(self.inner.read(Some(buf.len())))?;
        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }
}

impl Write for BlockingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(runtime()?.block_on(self.inner.write(buf))?)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Content only leaves the process on close
        Ok(())
    }
}

impl Seek for BlockingFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(runtime()?.block_on(self.inner.seek(pos))?)
    }
}
