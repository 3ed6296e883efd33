//! ell-core: Core library for the ell Elliptics client
//!
//! This crate provides the core functionality for talking to an Elliptics
//! object store over its HTTP command interface, including:
//! - Configuration resolution
//! - Command URL construction
//! - A timeout-aware retrying request executor
//! - The object store client and its buffered file handles
//! - The `StorageBackend` contract for host applications
//!
//! This crate is independent of any specific HTTP library; the network is
//! reached through the `Transport` trait (see `ell-http`).

pub mod backend;
pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod props;
pub mod retry;
pub mod transport;
pub mod url_builder;

pub use backend::StorageBackend;
pub use blocking::BlockingFile;
pub use client::ObjectStoreClient;
pub use config::{Config, ConfigBuilder, ConfigFile};
pub use error::{Error, HttpError, HttpErrorKind, ResponseSummary, Result};
pub use file::{AccessMode, RemoteFile};
pub use props::{PropDefaults, PropsSchema, SerializedProps};
pub use retry::{AttemptOutcome, RetryPolicy};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
