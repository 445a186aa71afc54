//! Declarative request schema.
//!
//! A request names a context, optionally names its parent, and carries one
//! repository config or an ordered list of them. Requests and scripts decode
//! from JSON, YAML or TOML.

use crate::artifact::ArtifactCoordinate;
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// A single repository and the dependencies to fetch from it.
///
/// Every field except `dependencies` is optional; defaults are applied when the
/// remote repository is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub repo_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,

    /// Proxy protocol; only consulted when a full proxy definition is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub proxy_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    pub dependencies: Vec<ArtifactCoordinate>,
}

impl RepositoryConfig {
    /// Config for the default repository with the given dependencies.
    pub fn with_dependencies(dependencies: Vec<ArtifactCoordinate>) -> Self {
        Self {
            id: None,
            repo_type: None,
            url: None,
            proxy_url: None,
            protocol: None,
            proxy_port: None,
            username: None,
            password: None,
            dependencies,
        }
    }
}

/// Ports are accepted both as numbers and as numeric strings.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Option::<Port>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Port::Number(port)) => Ok(Some(port)),
        Some(Port::Text(text)) => text
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid proxy port: {}", text))),
    }
}

/// One repository config or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepositorySpec {
    Many(Vec<RepositoryConfig>),
    One(RepositoryConfig),
}

impl RepositorySpec {
    /// Configs in declaration order.
    pub fn configs(&self) -> &[RepositoryConfig] {
        match self {
            RepositorySpec::Many(configs) => configs,
            RepositorySpec::One(config) => std::slice::from_ref(config),
        }
    }

    /// Total number of declared dependencies across all configs.
    pub fn dependency_count(&self) -> usize {
        self.configs().iter().map(|c| c.dependencies.len()).sum()
    }
}

impl From<RepositoryConfig> for RepositorySpec {
    fn from(config: RepositoryConfig) -> Self {
        RepositorySpec::One(config)
    }
}

impl From<Vec<RepositoryConfig>> for RepositorySpec {
    fn from(configs: Vec<RepositoryConfig>) -> Self {
        RepositorySpec::Many(configs)
    }
}

/// Request to create (or replace) a loading context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    pub data: RepositorySpec,
}

impl ContextRequest {
    pub fn new(name: impl Into<String>, parent: Option<&str>, data: RepositorySpec) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
            data,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        decode_path(path)
    }
}

/// One step of a batch script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ScriptOperation {
    Create { request: ContextRequest },
    Remove { name: String },
}

/// Ordered batch of operations executed against one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub operations: Vec<ScriptOperation>,
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        decode_path(path)
    }
}

/// Supported encodings for requests and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
    Toml,
}

impl RequestFormat {
    /// Pick a format from a file extension; unknown extensions fall back to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => RequestFormat::Yaml,
            Some("toml") => RequestFormat::Toml,
            _ => RequestFormat::Json,
        }
    }
}

/// Decode a request-schema value from text.
pub fn decode<T: DeserializeOwned>(content: &str, format: RequestFormat) -> Result<T, ApiError> {
    match format {
        RequestFormat::Json => serde_json::from_str(content)
            .map_err(|e| ApiError::RequestError(format!("Failed to parse JSON: {}", e))),
        RequestFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| ApiError::RequestError(format!("Failed to parse YAML: {}", e))),
        RequestFormat::Toml => toml::from_str(content)
            .map_err(|e| ApiError::RequestError(format!("Failed to parse TOML: {}", e))),
    }
}

fn decode_path<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ApiError::RequestError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    decode(&content, RequestFormat::from_path(path))
}
