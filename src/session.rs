//! Repository Session
//!
//! Process-wide resolution state: the transport connectors, the resolution
//! policy, and the handle to the local artifact store. Construct it once with
//! [`RepositorySession::init`] before resolving or installing anything.

use crate::artifact::{validate_location, ArtifactCoordinate, ResolvedArtifact};
use crate::config::{SessionConfig, UpdatePolicy};
use crate::error::{ApiError, TransportError};
use crate::repository::remote::{RemoteRepository, DEFAULT_REPOSITORY_TYPE};
use crate::repository::transport::{FileTransport, HttpTransport, TransportSet};
use crate::store::{LocalStore, PayloadSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Resolution policy carried by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Never touch the network; only artifacts already in the store resolve.
    pub offline: bool,
    pub update_policy: UpdatePolicy,
}

pub struct RepositorySession {
    transports: TransportSet,
    policy: SessionPolicy,
    store: LocalStore,
}

impl RepositorySession {
    /// Build the transport set (file and HTTP), the policy, and bind the store.
    ///
    /// Each call creates independent state.
    pub fn init(config: &SessionConfig, store: LocalStore) -> Result<Self, ApiError> {
        let http = HttpTransport::new(&config.user_agent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to initialize HTTP transport: {}", e))
        })?;
        let transports = TransportSet::new()
            .with(Arc::new(FileTransport::new()))
            .with(Arc::new(http));
        Ok(Self::with_transports(config, store, transports))
    }

    /// Build a session over an explicit transport set.
    pub fn with_transports(
        config: &SessionConfig,
        store: LocalStore,
        transports: TransportSet,
    ) -> Self {
        tracing::info!(
            store = %store.root().display(),
            transports = ?transports.names(),
            offline = config.offline,
            "Repository session initialized"
        );
        Self {
            transports,
            policy: SessionPolicy {
                offline: config.offline,
                update_policy: config.update_policy,
            },
            store,
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Resolve one coordinate against one repository into the local store.
    pub async fn resolve_artifact(
        &self,
        coordinate: &ArtifactCoordinate,
        repository: &RemoteRepository,
    ) -> Result<ResolvedArtifact, ApiError> {
        let failure = |cause: String| ApiError::ResolutionFailure {
            coordinate: coordinate.to_string(),
            repository: repository.id.clone(),
            cause,
        };

        coordinate.validate().map_err(failure)?;
        if repository.layout != DEFAULT_REPOSITORY_TYPE {
            return Err(failure(format!(
                "unsupported repository layout '{}'",
                repository.layout
            )));
        }

        let cached = self.store.contains(coordinate);
        if cached && self.policy.update_policy == UpdatePolicy::Never {
            tracing::debug!(artifact = %coordinate, "Resolved from local store");
        } else if self.policy.offline {
            if !cached {
                return Err(failure(
                    "artifact is not in the local store and the session is offline".to_string(),
                ));
            }
        } else {
            let transport = self
                .transports
                .for_url(&repository.url)
                .map_err(|e| failure(e.to_string()))?;
            let bytes = transport
                .get(repository, &coordinate.remote_path())
                .await
                .map_err(|e: TransportError| failure(e.to_string()))?;
            self.store
                .write_artifact(coordinate, &bytes)
                .map_err(|e| failure(e.to_string()))?;
            tracing::info!(
                artifact = %coordinate,
                repository = %repository.id,
                transport = transport.name(),
                bytes = bytes.len(),
                "Fetched artifact"
            );
        }

        let url = self
            .store
            .artifact_url(coordinate)
            .map_err(|e| failure(e.to_string()))?;
        Ok(ResolvedArtifact {
            coordinate: coordinate.clone(),
            url,
        })
    }

    /// Install `payload` under `coordinate`, replacing anything stored there.
    ///
    /// The payload is consumed and its file removed whether or not the
    /// installation succeeds.
    pub fn install_artifact(
        &self,
        coordinate: &ArtifactCoordinate,
        payload: PayloadSource,
    ) -> Result<PathBuf, ApiError> {
        let failure = |cause: String| ApiError::InstallFailure {
            coordinate: coordinate.to_string(),
            cause,
        };
        coordinate.validate().map_err(failure)?;

        let path = self
            .store
            .install(coordinate, &payload)
            .map_err(|e| failure(e.to_string()))?;
        drop(payload);

        tracing::info!(artifact = %coordinate, path = %path.display(), "Installed artifact");
        Ok(path)
    }

    /// Raw bytes of the artifact's metadata descriptor.
    pub fn read_metadata(&self, group_id: &str, artifact_id: &str) -> Result<Vec<u8>, ApiError> {
        validate_location(group_id, artifact_id).map_err(ApiError::RequestError)?;
        self.store
            .read_metadata(group_id, artifact_id)?
            .ok_or_else(|| ApiError::MetadataNotFound {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
            })
    }
}
