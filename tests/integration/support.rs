use loadtree::config::SessionConfig;
use loadtree::context::ContextRegistry;
use loadtree::store::LocalStore;
use loadtree::{
    ArtifactCoordinate, ContextRequest, LoaderService, RepositoryConfig, RepositorySession,
    RepositorySpec,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const GROUP: &str = "org.example";
pub const VERSION: &str = "1.0";

/// A `file://` repository and a store under one temporary directory.
pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn repo_dir(&self, id: &str) -> PathBuf {
        self.temp.path().join("repos").join(id)
    }

    pub fn store_dir(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    /// Publish `artifact` (content = its id) to repository `id`.
    pub fn publish(&self, id: &str, artifact: &str) {
        let coordinate = ArtifactCoordinate::new(GROUP, artifact, VERSION);
        let path = self.repo_dir(id).join(coordinate.relative_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, artifact.as_bytes()).unwrap();
    }

    pub fn service(&self) -> LoaderService {
        self.service_with(&SessionConfig::default())
    }

    pub fn service_with(&self, config: &SessionConfig) -> LoaderService {
        let store = LocalStore::open(&self.store_dir()).unwrap();
        let session = RepositorySession::init(config, store).unwrap();
        LoaderService::new(session, ContextRegistry::new())
    }

    pub fn repo_config(&self, id: &str, artifacts: &[&str]) -> RepositoryConfig {
        let mut config = RepositoryConfig::with_dependencies(
            artifacts
                .iter()
                .map(|a| ArtifactCoordinate::new(GROUP, *a, VERSION))
                .collect(),
        );
        config.id = Some(id.to_string());
        config.url = Some(file_url(&self.repo_dir(id)));
        config
    }

    pub fn request(
        &self,
        name: &str,
        parent: Option<&str>,
        artifacts: &[&str],
    ) -> ContextRequest {
        ContextRequest::new(
            name,
            parent,
            RepositorySpec::One(self.repo_config("central", artifacts)),
        )
    }
}

pub fn file_url(path: &Path) -> String {
    std::fs::create_dir_all(path).unwrap();
    url::Url::from_directory_path(path).unwrap().to_string()
}

/// File names of a context's load path entries, in order.
pub fn load_path_files(service: &LoaderService, name: &str) -> Vec<String> {
    service
        .get(name)
        .unwrap()
        .load_path
        .iter()
        .map(|u| u.rsplit('/').next().unwrap().to_string())
        .collect()
}
