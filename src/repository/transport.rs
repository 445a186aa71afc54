//! Transports moving artifact bytes out of remote repositories.

use crate::error::TransportError;
use crate::repository::remote::{Proxy, RemoteRepository};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Fetches repository-relative paths for the URL schemes it supports.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn supports(&self, url: &Url) -> bool;

    /// Fetch `relative_path` from `repository`.
    async fn get(
        &self,
        repository: &RemoteRepository,
        relative_path: &str,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Reads artifacts from a `file://` repository.
#[derive(Debug, Default)]
pub struct FileTransport;

impl FileTransport {
    pub fn new() -> Self {
        Self
    }

    fn local_path(repository: &RemoteRepository, relative_path: &str) -> Result<PathBuf, TransportError> {
        let base = repository
            .url
            .to_file_path()
            .map_err(|_| TransportError::InvalidUrl(repository.url.to_string()))?;
        Ok(relative_path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(base, |path, segment| path.join(segment)))
    }
}

#[async_trait]
impl Transport for FileTransport {
    fn name(&self) -> &'static str {
        "file"
    }

    fn supports(&self, url: &Url) -> bool {
        url.scheme() == "file"
    }

    async fn get(
        &self,
        repository: &RemoteRepository,
        relative_path: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let path = Self::local_path(repository, relative_path)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TransportError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

/// Fetches artifacts over HTTP(S), honoring per-repository proxies.
///
/// Each distinct proxy (address plus credentials) gets one client, built on
/// first use and shared by clones of the transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    proxied: Arc<Mutex<HashMap<Proxy, reqwest::Client>>>,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            proxied: Arc::new(Mutex::new(HashMap::new())),
            user_agent: user_agent.to_string(),
        })
    }

    fn client_for(&self, repository: &RemoteRepository) -> Result<reqwest::Client, TransportError> {
        let Some(proxy) = &repository.proxy else {
            return Ok(self.client.clone());
        };

        let mut proxied = self.proxied.lock();
        if let Some(client) = proxied.get(proxy) {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .proxy(
                reqwest::Proxy::all(proxy.address())?
                    .basic_auth(&proxy.auth.username, &proxy.auth.password),
            )
            .build()?;
        tracing::debug!(proxy = %proxy.address(), "Built proxied HTTP client");
        proxied.insert(proxy.clone(), client.clone());
        Ok(client)
    }

    #[cfg(test)]
    fn proxied_clients(&self) -> usize {
        self.proxied.lock().len()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    fn supports(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    async fn get(
        &self,
        repository: &RemoteRepository,
        relative_path: &str,
    ) -> Result<Vec<u8>, TransportError> {
        let url = repository
            .resolve_path(relative_path)
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let client = self.client_for(repository)?;

        tracing::debug!(url = %url, proxied = repository.proxy.is_some(), "GET artifact");
        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// The set of transports a session can pick from.
#[derive(Clone, Default)]
pub struct TransportSet {
    transports: Vec<Arc<dyn Transport>>,
}

impl TransportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transports.push(transport);
        self
    }

    /// First registered transport that supports `url`.
    pub fn for_url(&self, url: &Url) -> Result<Arc<dyn Transport>, TransportError> {
        self.transports
            .iter()
            .find(|t| t.supports(url))
            .cloned()
            .ok_or_else(|| TransportError::UnsupportedScheme(url.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }
}
