//! Remote repository definitions built from request configs.

use crate::request::RepositoryConfig;
use std::fmt;
use url::Url;

pub const DEFAULT_REPOSITORY_ID: &str = "central";
pub const DEFAULT_REPOSITORY_TYPE: &str = "default";
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2/";
pub const DEFAULT_PROXY_PROTOCOL: &str = "http";

/// Username/password pair presented to an authenticating proxy.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Authentication {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated proxy in front of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Proxy {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub auth: Authentication,
}

impl Proxy {
    /// Proxy address in `protocol://host:port` form.
    pub fn address(&self) -> String {
        let host = self
            .host
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.host)
            .trim_end_matches('/');
        format!("{}://{}:{}", self.protocol, host, self.port)
    }
}

/// A fully-defaulted remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub layout: String,
    pub url: Url,
    pub proxy: Option<Proxy>,
}

impl RemoteRepository {
    /// Apply defaults to a request config.
    ///
    /// A proxy is attached only when host, port, username and password are all
    /// present; anything less yields a plain repository.
    pub fn from_config(config: &RepositoryConfig) -> Result<Self, String> {
        let id = config
            .id
            .clone()
            .unwrap_or_else(|| DEFAULT_REPOSITORY_ID.to_string());
        let layout = config
            .repo_type
            .clone()
            .unwrap_or_else(|| DEFAULT_REPOSITORY_TYPE.to_string());
        let raw_url = config.url.as_deref().unwrap_or(DEFAULT_REPOSITORY_URL);
        let url = parse_base_url(raw_url)?;

        let proxy = match (
            &config.proxy_url,
            config.proxy_port,
            &config.username,
            &config.password,
        ) {
            (Some(host), Some(port), Some(username), Some(password)) => Some(Proxy {
                protocol: config
                    .protocol
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROXY_PROTOCOL.to_string()),
                host: host.clone(),
                port,
                auth: Authentication {
                    username: username.clone(),
                    password: password.clone(),
                },
            }),
            _ => None,
        };

        Ok(Self {
            id,
            layout,
            url,
            proxy,
        })
    }

    /// URL of a repository-relative path.
    pub fn resolve_path(&self, relative: &str) -> Result<Url, url::ParseError> {
        self.url.join(relative)
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.url, self.layout)
    }
}

/// Parse a repository base URL, forcing a trailing slash so joins append.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| format!("invalid repository URL '{}': {}", raw, e))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
