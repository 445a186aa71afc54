//! Local Artifact Store
//!
//! On-disk area holding fetched and installed artifacts in the standard
//! repository layout (`<group path>/<artifact>/<version>/<artifact>-<version>.jar`),
//! with a `maven-metadata-local.xml` descriptor per installed artifact.

pub mod metadata;
pub mod payload;

pub use metadata::{ArtifactMetadata, METADATA_FILENAME};
pub use payload::PayloadSource;

use crate::artifact::{group_path, validate_location, ArtifactCoordinate, ARTIFACT_EXTENSION};
use crate::error::StoreError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use url::Url;
use walkdir::WalkDir;

/// Well-known root of the local store when no override is configured.
pub const DEFAULT_STORE_ROOT: &str = "/var/lib/loadtree/repository";

/// Handle to the local artifact store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open (creating if needed) the store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root)?;
        let root = dunce::canonicalize(root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact_path(&self, coordinate: &ArtifactCoordinate) -> PathBuf {
        self.root.join(coordinate.relative_path())
    }

    pub fn contains(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.artifact_path(coordinate).is_file()
    }

    /// `file://` URL of the stored artifact.
    pub fn artifact_url(&self, coordinate: &ArtifactCoordinate) -> Result<Url, StoreError> {
        let path = self.artifact_path(coordinate);
        Url::from_file_path(&path)
            .map_err(|_| StoreError::InvalidPath(path.display().to_string()))
    }

    /// Write fetched bytes for `coordinate`, replacing any previous file atomically.
    ///
    /// Each writer stages into its own temporary file in the version directory,
    /// so concurrent writers of one coordinate never clobber each other.
    pub fn write_artifact(
        &self,
        coordinate: &ArtifactCoordinate,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        let target = self.artifact_path(coordinate);
        let dir = self.root.join(coordinate.version_dir());
        std::fs::create_dir_all(&dir)?;

        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(bytes)?;
        staged.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        Ok(target)
    }

    /// Install `payload` under `coordinate`.
    ///
    /// The version directory is deleted first, so the result holds exactly the
    /// new payload. The metadata descriptor keeps every previously installed version.
    /// The descriptor is read and rendered before anything on disk changes, so a
    /// corrupt descriptor fails the install without touching the store.
    pub fn install(
        &self,
        coordinate: &ArtifactCoordinate,
        payload: &PayloadSource,
    ) -> Result<PathBuf, StoreError> {
        let mut metadata = match self.read_metadata(&coordinate.group_id, &coordinate.artifact_id)? {
            Some(bytes) => ArtifactMetadata::parse(&bytes)?,
            None => ArtifactMetadata::new(&coordinate.group_id, &coordinate.artifact_id),
        };
        metadata.record_install(&coordinate.version, chrono::Utc::now());
        let descriptor = metadata.to_xml()?;

        let dir = self.root.join(coordinate.version_dir());
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        let target = self.artifact_path(coordinate);
        let mut staged = NamedTempFile::new_in(&dir)?;
        std::io::copy(&mut std::fs::File::open(payload.path())?, &mut staged)?;
        staged.persist(&target).map_err(|e| StoreError::Io(e.error))?;

        let metadata_path = self.metadata_path(&coordinate.group_id, &coordinate.artifact_id);
        let artifact_dir = self.root.join(coordinate.artifact_dir());
        let mut staged = NamedTempFile::new_in(&artifact_dir)?;
        staged.write_all(&descriptor)?;
        staged
            .persist(&metadata_path)
            .map_err(|e| StoreError::Io(e.error))?;

        Ok(target)
    }

    pub fn metadata_path(&self, group_id: &str, artifact_id: &str) -> PathBuf {
        self.root
            .join(group_path(group_id))
            .join(artifact_id)
            .join(METADATA_FILENAME)
    }

    /// Raw descriptor bytes, or `None` when no descriptor exists.
    ///
    /// Ids that would address anything outside the store are rejected.
    pub fn read_metadata(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        validate_location(group_id, artifact_id).map_err(StoreError::InvalidPath)?;
        match std::fs::read(self.metadata_path(group_id, artifact_id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Every coordinate with an artifact file in the store, sorted.
    pub fn list_installed(&self) -> Result<Vec<ArtifactCoordinate>, StoreError> {
        let suffix = format!(".{}", ARTIFACT_EXTENSION);
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(4) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read store entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let parts: Vec<&str> = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect();
            let Some((file_name, rest)) = parts.split_last() else {
                continue;
            };
            if !file_name.ends_with(&suffix) || rest.len() < 3 {
                continue;
            }
            let (group, tail) = rest.split_at(rest.len() - 2);
            let coordinate = ArtifactCoordinate::new(group.join("."), tail[0], tail[1]);
            if coordinate.file_name() == *file_name {
                found.push(coordinate);
            }
        }
        found.sort();
        Ok(found)
    }
}
