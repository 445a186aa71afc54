//! Loaders: the code-visible half of a loading context.
//!
//! A loader owns an ordered load path and delegates to its parent first, so
//! anything the parent can see shadows the child's own entries, and earlier
//! load-path entries shadow later ones.

use crate::context::HOST_CONTEXT_NAME;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

pub trait Loader: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn load_path(&self) -> &[Url];

    fn parent(&self) -> Option<&Arc<dyn Loader>>;

    /// Find `resource`, asking the parent chain before the own load path.
    ///
    /// Directory entries match `dir/resource`; archive entries are addressed by
    /// their file name.
    fn locate(&self, resource: &str) -> Option<Url> {
        if let Some(found) = self.parent().and_then(|p| p.locate(resource)) {
            return Some(found);
        }
        self.load_path()
            .iter()
            .find_map(|entry| locate_in(entry, resource))
    }
}

fn locate_in(entry: &Url, resource: &str) -> Option<Url> {
    let path = entry.to_file_path().ok()?;
    if path.is_dir() {
        let candidate = resource
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .fold(path, |p, segment| p.join(segment));
        if candidate.is_file() {
            return Url::from_file_path(candidate).ok();
        }
        return None;
    }
    let file_name = path.file_name().and_then(|n| n.to_str())?;
    (file_name == resource && path.is_file()).then(|| entry.clone())
}

/// Names along the delegation chain, starting with `loader` itself.
pub fn delegation_chain(loader: &dyn Loader) -> Vec<String> {
    let mut chain = vec![loader.name().to_string()];
    let mut next = loader.parent().cloned();
    while let Some(current) = next {
        chain.push(current.name().to_string());
        next = current.parent().cloned();
    }
    chain
}

/// The embedding process's own loading context.
#[derive(Debug, Clone, Default)]
pub struct HostLoader {
    load_path: Vec<Url>,
}

impl HostLoader {
    /// Host loader over configured filesystem paths; relative or missing
    /// paths are skipped with a warning.
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let load_path = paths
            .iter()
            .filter_map(|path| match path_to_url(path) {
                Some(url) => Some(url),
                None => {
                    tracing::warn!("Ignoring host load path entry {}", path.display());
                    None
                }
            })
            .collect();
        Self { load_path }
    }
}

fn path_to_url(path: &Path) -> Option<Url> {
    if path.is_dir() {
        Url::from_directory_path(path).ok()
    } else if path.is_file() {
        Url::from_file_path(path).ok()
    } else {
        None
    }
}

impl Loader for HostLoader {
    fn name(&self) -> &str {
        HOST_CONTEXT_NAME
    }

    fn load_path(&self) -> &[Url] {
        &self.load_path
    }

    fn parent(&self) -> Option<&Arc<dyn Loader>> {
        None
    }
}

/// Loader owned by a single registered context.
#[derive(Debug)]
pub struct IsolatedLoader {
    name: String,
    load_path: Vec<Url>,
    parent: Option<Arc<dyn Loader>>,
}

impl IsolatedLoader {
    pub fn new(name: String, load_path: Vec<Url>, parent: Option<Arc<dyn Loader>>) -> Self {
        Self {
            name,
            load_path,
            parent,
        }
    }
}

impl Loader for IsolatedLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_path(&self) -> &[Url] {
        &self.load_path
    }

    fn parent(&self) -> Option<&Arc<dyn Loader>> {
        self.parent.as_ref()
    }
}
