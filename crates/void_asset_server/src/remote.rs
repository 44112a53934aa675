//! Fetching asset bytes from a void-assets server.
//!
//! The persistence layer only needs "GET this url, give me the body or tell
//! me it failed". [`AssetFetcher`] is that contract; [`RemoteAssetSource`]
//! implements it over plain HTTP and [`MemoryAssetSource`] serves bytes
//! registered in-process (offline projects, tests).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use url::Url;

/// Errors returned by an [`AssetFetcher`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Server responded {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid HTTP response: {0}")]
    InvalidResponse(String),

    #[error("Asset not found: {0}")]
    NotFound(String),
}

/// Source of raw asset bytes.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the body of the asset at `url`. Any non-success outcome is an error.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Join an asset path (absolute or server-relative) onto the server base url.
pub fn resolve_url(base: &str, path: &str) -> Result<Url, FetchError> {
    let base = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;
    base.join(path)
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
}

/// Configuration for the remote asset source
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the asset server (e.g., "http://localhost:3001")
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// HTTP asset source with an in-memory response cache.
#[cfg(feature = "remote")]
pub struct RemoteAssetSource {
    config: RemoteConfig,
    cache: RwLock<HashMap<String, Arc<Vec<u8>>>>,
}

#[cfg(feature = "remote")]
impl RemoteAssetSource {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Resolve `path` against the configured base url.
    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        resolve_url(&self.config.base_url, path)
    }

    /// Invalidate a cached response (forces re-fetch on next access)
    pub fn invalidate(&self, url: &Url) {
        self.cache.write().remove(url.as_str());
    }

    /// Clear all cached responses
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }
}

#[cfg(feature = "remote")]
#[async_trait]
impl AssetFetcher for RemoteAssetSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let cached = self.cache.read().get(url.as_str()).cloned();
        if let Some(data) = cached {
            log::debug!("RemoteAssetSource: cache hit for {}", url);
            return Ok(data.as_ref().clone());
        }

        let timeout = std::time::Duration::from_millis(self.config.timeout_ms);
        let data = tokio::time::timeout(timeout, http_get(url))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
                timeout_ms: self.config.timeout_ms,
            })??;

        log::debug!("RemoteAssetSource: fetched {} ({} bytes)", url, data.len());
        self.cache
            .write()
            .insert(url.to_string(), Arc::new(data.clone()));
        Ok(data)
    }
}

/// In-process asset source keyed by full url.
#[derive(Default)]
pub struct MemoryAssetSource {
    assets: RwLock<HashMap<String, Vec<u8>>>,
    requests: AtomicUsize,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.assets.write().insert(url.into(), data.into());
    }

    pub fn remove(&self, url: &str) -> Option<Vec<u8>> {
        self.assets.write().remove(url)
    }

    /// Number of fetches served or refused so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AssetFetcher for MemoryAssetSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.assets
            .read()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

// ============================================================================
// Internal HTTP helpers
// ============================================================================

#[cfg(feature = "remote")]
async fn http_get(url: &Url) -> Result<Vec<u8>, FetchError> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    if url.scheme() != "http" {
        return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
    }
    let host = url
        .host_str()
        .ok_or_else(|| FetchError::InvalidUrl(format!("No host in URL: {}", url)))?;
    let port = url.port_or_known_default().unwrap_or(80);
    let path = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };

    let mut stream = tokio::net::TcpStream::connect((host, port))
        .await
        .map_err(|e| FetchError::Connection(e.to_string()))?;

    // HTTP/1.0 keeps the response un-chunked, so the body is everything
    // after the header block.
    let request = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nAccept: */*\r\nConnection: close\r\n\r\n",
        path, host
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| FetchError::Connection(format!("Write failed: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .map_err(|e| FetchError::Connection(format!("Read failed: {}", e)))?;

    let (status, body) = parse_response(&response)?;
    if !(200..300).contains(&status) {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(body.to_vec())
}

/// Split a raw HTTP response into status code and body.
fn parse_response(response: &[u8]) -> Result<(u16, &[u8]), FetchError> {
    let header_end = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or_else(|| FetchError::InvalidResponse("missing header terminator".to_string()))?;
    let head = std::str::from_utf8(&response[..header_end])
        .map_err(|_| FetchError::InvalidResponse("headers are not UTF-8".to_string()))?;

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.split_whitespace();
    match parts.next() {
        Some(version) if version.starts_with("HTTP/") => {}
        _ => {
            return Err(FetchError::InvalidResponse(format!(
                "bad status line: {}",
                status_line
            )))
        }
    }
    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| FetchError::InvalidResponse(format!("bad status line: {}", status_line)))?;

    let content_length = lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse::<usize>().ok()
        } else {
            None
        }
    });

    let mut body = &response[header_end + 4..];
    if let Some(len) = content_length {
        if body.len() > len {
            body = &body[..len];
        }
    }
    Ok((status, body))
}
