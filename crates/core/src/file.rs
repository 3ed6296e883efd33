//! Buffered remote file
//!
//! A [`RemoteFile`] maps stream operations onto whole-object requests:
//! reading fetches the object once on first use, writing accumulates in
//! memory and the single upload happens on [`RemoteFile::close`].

use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::client::ObjectStoreClient;
use crate::error::{Error, Result};

/// How a handle may be used; fixed for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    Append,
}

impl AccessMode {
    /// Parse a mode string such as `"r"`, `"rb"`, `"w"` or `"a"`
    ///
    /// Exactly one of `r`, `w`, `a` must be present. `b` and `t` are
    /// accepted and ignored; `+` and any other character are rejected.
    pub fn parse(mode: &str) -> Result<Self> {
        let mut found = None;

        for c in mode.chars() {
            let this = match c {
                'r' => AccessMode::Read,
                'w' => AccessMode::Write,
                'a' => AccessMode::Append,
                'b' | 't' => continue,
                '+' => {
                    return Err(Error::InvalidMode(format!(
                        "'{mode}': mixed mode access not supported"
                    )));
                }
                other => {
                    return Err(Error::InvalidMode(format!(
                        "'{mode}': unexpected character '{other}'"
                    )));
                }
            };

            if found.is_some() {
                return Err(Error::InvalidMode(format!(
                    "'{mode}': only one of \"r\", \"w\" or \"a\" may be given"
                )));
            }
            found = Some(this);
        }

        found.ok_or_else(|| {
            Error::InvalidMode(format!(
                "'{mode}': mode must contain at least one of \"r\", \"w\" or \"a\""
            ))
        })
    }

    pub fn is_read(&self) -> bool {
        matches!(self, AccessMode::Read)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Read => "r",
            AccessMode::Write => "w",
            AccessMode::Append => "a",
        }
    }
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccessMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// File-like handle bound to one object and one access mode
///
/// Not meant to be shared; open one handle per user.
#[derive(Debug)]
pub struct RemoteFile {
    name: String,
    client: ObjectStoreClient,
    mode: AccessMode,
    stream: Option<Cursor<Vec<u8>>>,
    finished: bool,
}

impl RemoteFile {
    pub(crate) fn new(name: &str, client: ObjectStoreClient, mode: AccessMode) -> Self {
        Self {
            name: name.to_string(),
            client,
            mode,
            stream: None,
            finished: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// True while no buffer is allocated
    ///
    /// A handle that never read or wrote counts as closed; one that held data
    /// keeps its buffer after [`RemoteFile::close`] and does not.
    pub fn closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Read up to `limit` bytes, or everything left when `limit` is `None`
    ///
    /// The first call fetches the object.
    pub async fn read(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        if !self.mode.is_read() {
            return Err(Error::Mode("reading from a file opened for writing".into()));
        }

        let stream = self.loaded_stream().await?;
        let mut out = Vec::new();
        match limit {
            None => {
                stream.read_to_end(&mut out)?;
            }
            Some(n) => {
                Read::by_ref(stream).take(n as u64).read_to_end(&mut out)?;
            }
        }
        Ok(out)
    }

    /// Append `content` to the buffer; nothing is sent until close
    pub async fn write(&mut self, content: &[u8]) -> Result<usize> {
        if self.mode.is_read() {
            return Err(Error::Mode("writing to a file opened for reading".into()));
        }
        self.ensure_open()?;

        let stream = self.stream.get_or_insert_with(|| Cursor::new(Vec::new()));
        stream.get_mut().extend_from_slice(content);
        let end = stream.get_ref().len() as u64;
        stream.set_position(end);
        Ok(content.len())
    }

    /// Move the read cursor, fetching the object first if nothing was read yet
    ///
    /// Write and append handles only grow, so they cannot seek.
    pub async fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        if !self.mode.is_read() {
            return Err(Error::Mode(format!(
                "seeking in a file opened with mode '{}'",
                self.mode
            )));
        }
        let stream = self.loaded_stream().await?;
        Ok(stream.seek(pos)?)
    }

    /// Current cursor position
    pub fn position(&self) -> u64 {
        self.stream.as_ref().map_or(0, |s| s.position())
    }

    /// Finish the handle
    ///
    /// Write and append handles upload their whole buffer exactly once,
    /// even if nothing was written. The handle is finished before the
    /// upload starts, so a failed upload is not retried by a second call.
    /// The buffer is kept; only further I/O is refused.
    pub async fn close(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        if self.mode.is_read() {
            return Ok(());
        }
        let buffer = self
            .stream
            .as_ref()
            .map(|s| s.get_ref().clone())
            .unwrap_or_default();

        let append = self.mode == AccessMode::Append;
        tracing::debug!(name = %self.name, bytes = buffer.len(), append, "Flushing remote file");
        self.client.save(&self.name, buffer, append).await?;
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            return Err(Error::Closed(self.name.clone()));
        }
        Ok(())
    }

    async fn loaded_stream(&mut self) -> Result<&mut Cursor<Vec<u8>>> {
        self.ensure_open()?;
        if self.stream.is_none() {
            let content = self.client.fetch(&self.name).await?;
            tracing::debug!(name = %self.name, bytes = content.len(), "Fetched remote file");
            self.stream = Some(Cursor::new(content.to_vec()));
        }
        Ok(self.stream.get_or_insert_with(|| Cursor::new(Vec::new())))
    }
}

impl Drop for RemoteFile {
    fn drop(&mut self) {
        if !self.finished && !self.mode.is_read() {
            tracing::warn!(
                name = %self.name,
                mode = %self.mode,
                "Remote file dropped without close; buffered data was not uploaded"
            );
        }
    }
}
