//! Loader Service
//!
//! The entry point embedders use: it owns one [`RepositorySession`] and one
//! [`ContextRegistry`] and turns context requests into registered contexts.
//! Cloning the service shares both.

use crate::artifact::{ArtifactCoordinate, ResolvedArtifact};
use crate::config::LoadtreeConfig;
use crate::context::{ContextRegistry, HostLoader, LoadingContext, ParentLink};
use crate::error::ApiError;
use crate::repository::RepositoryResolver;
use crate::request::{ContextRequest, RepositorySpec, Script, ScriptOperation};
use crate::session::RepositorySession;
use crate::store::{LocalStore, PayloadSource};
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Serializable view of a registered context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSummary {
    pub name: String,
    pub parent: ParentLink,
    pub load_path: Vec<String>,
}

impl From<&LoadingContext> for ContextSummary {
    fn from(context: &LoadingContext) -> Self {
        Self {
            name: context.name().to_string(),
            parent: context.parent().clone(),
            load_path: context.load_path().iter().map(|u| u.to_string()).collect(),
        }
    }
}

/// Result of one script step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ScriptOutcome {
    Create { name: String, load_path: usize },
    Remove { name: String, removed: usize },
}

#[derive(Clone)]
pub struct LoaderService {
    session: Arc<RepositorySession>,
    registry: Arc<Mutex<ContextRegistry>>,
}

impl LoaderService {
    pub fn new(session: RepositorySession, registry: ContextRegistry) -> Self {
        Self {
            session: Arc::new(session),
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    /// Open the store, initialize the session and chain the registry to a host
    /// loader built from `host.load_path`.
    pub fn from_config(config: &LoadtreeConfig) -> Result<Self, ApiError> {
        let root = config.store.resolve_root()?;
        let store = LocalStore::open(&root)?;
        let session = RepositorySession::init(&config.session, store)?;
        let host = HostLoader::from_paths(&config.host.load_path);
        Ok(Self::new(session, ContextRegistry::with_host(Arc::new(host))))
    }

    pub fn session(&self) -> &RepositorySession {
        &self.session
    }

    /// Resolve the request's dependencies and register a context over them.
    ///
    /// Name and parent are checked before any resolution, so a request that
    /// would be rejected never reaches a repository. The registry is unchanged
    /// on every error path.
    pub async fn create(&self, request: ContextRequest) -> Result<String, ApiError> {
        let parent = request.parent.as_deref();
        let composed = self.registry.lock().compose_name(&request.name, parent)?;
        tracing::debug!(context = %composed, "Resolving context dependencies");

        let urls = RepositoryResolver::new(&self.session)
            .resolve_urls(&request.data)
            .await?;

        self.registry
            .lock()
            .create(&request.name, parent, request.data, urls)
    }

    /// Cascading removal; returns the number of contexts removed.
    pub fn remove(&self, name: &str) -> usize {
        self.registry.lock().remove(name)
    }

    /// Resolve without registering anything.
    pub async fn resolve(&self, spec: &RepositorySpec) -> Result<Vec<ResolvedArtifact>, ApiError> {
        RepositoryResolver::new(&self.session).resolve(spec).await
    }

    pub fn install(
        &self,
        coordinate: &ArtifactCoordinate,
        payload: PayloadSource,
    ) -> Result<PathBuf, ApiError> {
        self.session.install_artifact(coordinate, payload)
    }

    pub fn metadata(&self, group_id: &str, artifact_id: &str) -> Result<Vec<u8>, ApiError> {
        self.session.read_metadata(group_id, artifact_id)
    }

    pub fn list_installed(&self) -> Result<Vec<ArtifactCoordinate>, ApiError> {
        Ok(self.session.store().list_installed()?)
    }

    /// Run script operations in order, stopping at the first failure.
    pub async fn apply(&self, script: Script) -> Result<Vec<ScriptOutcome>, ApiError> {
        let mut outcomes = Vec::with_capacity(script.operations.len());
        for operation in script.operations {
            let outcome = match operation {
                ScriptOperation::Create { request } => {
                    let name = self.create(request).await?;
                    let load_path = self
                        .get(&name)
                        .map(|c| c.load_path.len())
                        .unwrap_or_default();
                    ScriptOutcome::Create { name, load_path }
                }
                ScriptOperation::Remove { name } => {
                    let removed = self.remove(&name);
                    ScriptOutcome::Remove { name, removed }
                }
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    pub fn get(&self, name: &str) -> Option<ContextSummary> {
        self.registry.lock().get(name).map(ContextSummary::from)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.lock().contains(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.registry.lock().names()
    }

    /// Every registered context, sorted by composed name.
    pub fn snapshot(&self) -> Vec<ContextSummary> {
        let registry = self.registry.lock();
        registry
            .names()
            .iter()
            .filter_map(|name| registry.get(name))
            .map(ContextSummary::from)
            .collect()
    }

    /// Run `f` with the registry locked.
    pub fn with_registry<R>(&self, f: impl FnOnce(&ContextRegistry) -> R) -> R {
        f(&self.registry.lock())
    }
}
