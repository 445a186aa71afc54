//! Loading Contexts
//!
//! Named, hierarchical, isolated loading contexts. Each context owns an
//! [`IsolatedLoader`] and names its parent by composed name; the
//! [`ContextRegistry`] is the only place contexts are created or destroyed.

pub mod loader;
pub mod registry;

pub use loader::{delegation_chain, HostLoader, IsolatedLoader, Loader};
pub use registry::ContextRegistry;

use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Separator between segments of a composed context name.
pub const SEPARATOR: char = '/';

/// Reserved parent name denoting the ambient host context.
pub const HOST_CONTEXT_NAME: &str = "system";

/// How a context refers to its parent. Never an ownership edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ParentLink {
    None,
    Host,
    Context(String),
}

/// A registered loading context.
#[derive(Debug, Clone)]
pub struct LoadingContext {
    name: String,
    parent: ParentLink,
    loader: Arc<IsolatedLoader>,
}

impl LoadingContext {
    pub(crate) fn new(name: String, parent: ParentLink, loader: IsolatedLoader) -> Self {
        Self {
            name,
            parent,
            loader: Arc::new(loader),
        }
    }

    /// Composed (registry) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &ParentLink {
        &self.parent
    }

    pub fn loader(&self) -> Arc<IsolatedLoader> {
        Arc::clone(&self.loader)
    }

    pub fn load_path(&self) -> &[Url] {
        self.loader.load_path()
    }

    pub fn locate(&self, resource: &str) -> Option<Url> {
        self.loader.locate(resource)
    }

    /// The requested name, i.e. the last segment of the composed name.
    pub fn leaf_name(&self) -> &str {
        self.name
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or(self.name.as_str())
    }
}
