//! Multi-repository dependency resolution.

use crate::artifact::ResolvedArtifact;
use crate::error::ApiError;
use crate::repository::remote::{RemoteRepository, DEFAULT_REPOSITORY_ID};
use crate::request::{RepositoryConfig, RepositorySpec};
use crate::session::RepositorySession;
use url::Url;

/// Resolves request repository configs through a session.
pub struct RepositoryResolver<'a> {
    session: &'a RepositorySession,
}

impl<'a> RepositoryResolver<'a> {
    pub fn new(session: &'a RepositorySession) -> Self {
        Self { session }
    }

    /// Resolve every dependency of every config.
    ///
    /// Results follow config declaration order, then dependency declaration
    /// order within each config. The first failure aborts the whole call.
    pub async fn resolve(&self, spec: &RepositorySpec) -> Result<Vec<ResolvedArtifact>, ApiError> {
        let mut resolved = Vec::with_capacity(spec.dependency_count());
        for config in spec.configs() {
            resolved.extend(self.resolve_single(config).await?);
        }
        Ok(resolved)
    }

    /// Same as [`resolve`](Self::resolve), keeping only the local URLs.
    pub async fn resolve_urls(&self, spec: &RepositorySpec) -> Result<Vec<Url>, ApiError> {
        Ok(self
            .resolve(spec)
            .await?
            .into_iter()
            .map(|artifact| artifact.url)
            .collect())
    }

    async fn resolve_single(
        &self,
        config: &RepositoryConfig,
    ) -> Result<Vec<ResolvedArtifact>, ApiError> {
        let repository =
            RemoteRepository::from_config(config).map_err(|cause| ApiError::ResolutionFailure {
                coordinate: "-".to_string(),
                repository: config
                    .id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REPOSITORY_ID.to_string()),
                cause,
            })?;
        tracing::debug!(
            repository = %repository,
            proxied = repository.proxy.is_some(),
            dependencies = config.dependencies.len(),
            "Resolving repository"
        );

        let mut resolved = Vec::with_capacity(config.dependencies.len());
        for coordinate in &config.dependencies {
            resolved.push(self.session.resolve_artifact(coordinate, &repository).await?);
        }
        Ok(resolved)
    }
}
