//! Scoped payload files handed to the store for installation.

use crate::error::StoreError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// A temporary payload file owned by this guard.
///
/// The file is deleted when the guard drops, so installation disposes of it on
/// every exit path.
#[derive(Debug)]
pub struct PayloadSource {
    path: TempPath,
}

impl PayloadSource {
    /// Take ownership of an existing temporary file.
    pub fn from_temp_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path.into()),
        }
    }

    /// Copy `source` into a fresh temporary file; `source` itself is left alone.
    pub fn copy_of(source: &Path) -> Result<Self, StoreError> {
        let mut file = Self::staging_file()?;
        std::io::copy(&mut std::fs::File::open(source)?, &mut file)?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    /// Write `bytes` into a fresh temporary file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let mut file = Self::staging_file()?;
        file.write_all(bytes)?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_file() -> Result<NamedTempFile, StoreError> {
        Ok(tempfile::Builder::new()
            .prefix("loadtree-payload-")
            .tempfile()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_deletes_owned_file() {
        let payload = PayloadSource::from_bytes(b"jar bytes").unwrap();
        let path = payload.path().to_path_buf();
        assert!(path.exists());
        drop(payload);
        assert!(!path.exists());
    }

    #[test]
    fn test_copy_of_leaves_source_in_place() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("lib.jar");
        std::fs::write(&source, b"original").unwrap();

        let payload = PayloadSource::copy_of(&source).unwrap();
        assert_eq!(std::fs::read(payload.path()).unwrap(), b"original");
        drop(payload);
        assert!(source.exists());
    }

    #[test]
    fn test_adopted_file_is_deleted_on_drop() {
        let temp = tempfile::tempdir().unwrap();
        let staged = temp.path().join("upload.jar");
        std::fs::write(&staged, b"jar").unwrap();

        drop(PayloadSource::from_temp_file(staged.clone()));
        assert!(!staged.exists());
    }

    #[test]
    fn test_payload_paths_are_unique() {
        let first = PayloadSource::from_bytes(b"a").unwrap();
        let second = PayloadSource::from_bytes(b"a").unwrap();
        assert_ne!(first.path(), second.path());
    }
}
