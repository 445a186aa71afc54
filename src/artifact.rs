//! Artifact coordinates and their repository layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Extension of every artifact fetched or installed through this crate.
pub const ARTIFACT_EXTENSION: &str = "jar";

/// The (group, artifact, version) triple identifying a fetchable unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Check that every field can be mapped onto a repository path.
    pub fn validate(&self) -> Result<(), String> {
        validate_location(&self.group_id, &self.artifact_id)?;
        check_field("version", &self.version)?;
        if matches!(self.version.as_str(), "." | "..") {
            return Err("version cannot be a relative path segment".to_string());
        }
        Ok(())
    }

    /// Group id with `.` mapped to path separators, e.g. `org/slf4j`.
    pub fn group_path(&self) -> PathBuf {
        group_path(&self.group_id)
    }

    /// Directory holding every version of this artifact.
    pub fn artifact_dir(&self) -> PathBuf {
        self.group_path().join(&self.artifact_id)
    }

    /// Directory holding this exact version.
    pub fn version_dir(&self) -> PathBuf {
        self.artifact_dir().join(&self.version)
    }

    /// `<artifact>-<version>.jar`
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.artifact_id, self.version, ARTIFACT_EXTENSION
        )
    }

    /// Store-relative path of the artifact file.
    pub fn relative_path(&self) -> PathBuf {
        self.version_dir().join(self.file_name())
    }

    /// Repository-relative path of the artifact, always `/`-separated.
    pub fn remote_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group_id, self.artifact_id, ARTIFACT_EXTENSION, self.version
        )
    }
}

/// Check that a group and artifact id address a directory inside the store.
pub fn validate_location(group_id: &str, artifact_id: &str) -> Result<(), String> {
    check_field("groupId", group_id)?;
    check_field("artifactId", artifact_id)?;
    if group_id.split('.').any(str::is_empty) {
        return Err(format!("groupId has an empty segment: '{}'", group_id));
    }
    if matches!(artifact_id, "." | "..") {
        return Err("artifactId cannot be a relative path segment".to_string());
    }
    Ok(())
}

fn check_field(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | ':'))
    {
        return Err(format!("{} contains an illegal character: '{}'", field, value));
    }
    Ok(())
}

pub(crate) fn group_path(group_id: &str) -> PathBuf {
    group_id.split('.').collect()
}

/// A coordinate paired with the local URL it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
    pub coordinate: ArtifactCoordinate,
    pub url: Url,
}
