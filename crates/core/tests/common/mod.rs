//! In-memory stand-in for an Elliptics cluster

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use ell_core::{
    ConfigBuilder, HttpRequest, HttpResponse, Method, ObjectStoreClient, Transport, TransportError,
};

pub const PRIVATE_URL: &str = "http://priv:9000";
pub const PUBLIC_URL: &str = "http://pub:8080";

/// Stores the last body uploaded per key and answers like the HTTP API
#[derive(Default)]
pub struct MemoryTransport {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<(Method, String)>>,
    forced_status: Mutex<Option<u16>>,
}

impl MemoryTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every request sent so far
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Answer every following request with `status`
    pub fn force_status(&self, status: u16) {
        *self.forced_status.lock().unwrap() = Some(status);
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn put_object(&self, key: &str, content: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), content.to_vec());
    }
}

/// Split `<base>/<prefix>/<command>/<name>?<query>` into (command, key, query)
fn parse(url: &str) -> (String, String, String) {
    let rest = url.strip_prefix(PRIVATE_URL).expect("private URL");
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

    for command in ["get", "upload", "delete"] {
        let marker = format!("/{command}/");
        if let Some(idx) = path.find(&marker) {
            let prefix = path[..idx].trim_start_matches('/');
            let name = &path[idx + marker.len()..];
            let key = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            };
            let key = urlencoding::decode(&key).unwrap().into_owned();
            return (command.to_string(), key, query.to_string());
        }
    }
    panic!("no command in {url}");
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.method, request.url.clone()));

        if let Some(status) = *self.forced_status.lock().unwrap() {
            return Ok(HttpResponse::new(status, request.url, Bytes::new()));
        }

        let (command, key, query) = parse(&request.url);
        let mut objects = self.objects.lock().unwrap();

        let (status, body) = match (request.method, command.as_str()) {
            (Method::Get | Method::Head, "get") => match objects.get(&key) {
                Some(content) if request.method == Method::Get => (200, content.clone()),
                Some(_) => (200, Vec::new()),
                None => (404, Vec::new()),
            },
            (Method::Post, "upload") => {
                let content = request.body.unwrap_or_default();
                let entry = objects.entry(key).or_default();
                if query == "ioflags=2" {
                    entry.extend_from_slice(&content);
                } else {
                    *entry = content.to_vec();
                }
                (200, Vec::new())
            }
            (Method::Get, "delete") => match objects.remove(&key) {
                Some(_) => (200, Vec::new()),
                None => (404, Vec::new()),
            },
            _ => (400, Vec::new()),
        };

        Ok(HttpResponse::new(status, request.url, body))
    }
}

pub fn client_with(transport: Arc<MemoryTransport>, prefix: &str) -> ObjectStoreClient {
    let config = ConfigBuilder::new()
        .prefix(prefix)
        .public_url(PUBLIC_URL)
        .private_url(PRIVATE_URL)
        .build()
        .unwrap();
    ObjectStoreClient::new(config, transport)
}

pub fn client(transport: Arc<MemoryTransport>) -> ObjectStoreClient {
    client_with(transport, "")
}
