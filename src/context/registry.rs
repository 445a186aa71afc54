//! Context registry: creation, replacement and cascading removal.

use crate::context::loader::{HostLoader, IsolatedLoader, Loader};
use crate::context::{LoadingContext, ParentLink, HOST_CONTEXT_NAME, SEPARATOR};
use crate::error::ApiError;
use crate::request::RepositorySpec;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use url::Url;

/// A registered context and the repository configuration that produced it.
#[derive(Debug, Clone)]
struct RegistryEntry {
    context: LoadingContext,
    config: RepositorySpec,
}

/// Where a new context will land.
struct Placement {
    composed: String,
    link: ParentLink,
    parent_loader: Option<Arc<dyn Loader>>,
}

/// Registry mapping composed names to loading contexts.
///
/// Alongside the entries it keeps a segment index (segment -> composed names
/// containing it) so removals do not split every key.
pub struct ContextRegistry {
    entries: HashMap<String, RegistryEntry>,
    segments: HashMap<String, BTreeSet<String>>,
    host: Arc<dyn Loader>,
}

impl ContextRegistry {
    /// Create an empty registry whose host context has an empty load path.
    pub fn new() -> Self {
        Self::with_host(Arc::new(HostLoader::default()))
    }

    /// Create an empty registry chained to the given host loader.
    pub fn with_host(host: Arc<dyn Loader>) -> Self {
        Self {
            entries: HashMap::new(),
            segments: HashMap::new(),
            host,
        }
    }

    /// Validate `name` and `parent` and return the composed name a create
    /// would use, without touching the registry.
    pub fn compose_name(&self, name: &str, parent: Option<&str>) -> Result<String, ApiError> {
        self.place(name, parent).map(|p| p.composed)
    }

    fn place(&self, name: &str, parent: Option<&str>) -> Result<Placement, ApiError> {
        if name.is_empty() || name.contains(SEPARATOR) {
            return Err(ApiError::InvalidName(name.to_string()));
        }

        match parent.filter(|p| !p.is_empty()) {
            None => Ok(Placement {
                composed: name.to_string(),
                link: ParentLink::None,
                parent_loader: None,
            }),
            Some(HOST_CONTEXT_NAME) => Ok(Placement {
                composed: format!("{}{}{}", HOST_CONTEXT_NAME, SEPARATOR, name),
                link: ParentLink::Host,
                parent_loader: Some(Arc::clone(&self.host)),
            }),
            Some(parent) => {
                let entry = self
                    .entries
                    .get(parent)
                    .ok_or_else(|| ApiError::UnknownParent(parent.to_string()))?;
                let loader: Arc<dyn Loader> = entry.context.loader();
                Ok(Placement {
                    composed: format!("{}{}{}", parent, SEPARATOR, name),
                    link: ParentLink::Context(parent.to_string()),
                    parent_loader: Some(loader),
                })
            }
        }
    }

    /// Create (or replace) a context and return its composed name.
    ///
    /// An existing entry under the same composed name is removed first, together
    /// with whatever else that removal matches.
    pub fn create(
        &mut self,
        name: &str,
        parent: Option<&str>,
        config: RepositorySpec,
        urls: Vec<Url>,
    ) -> Result<String, ApiError> {
        let Placement {
            composed,
            link,
            parent_loader,
        } = self.place(name, parent)?;

        if self.entries.contains_key(&composed) {
            let removed = self.remove(&composed);
            tracing::info!(context = %composed, removed, "Replacing existing context");
        }

        let loader = IsolatedLoader::new(composed.clone(), urls, parent_loader);
        let context = LoadingContext::new(composed.clone(), link, loader);
        self.index(&composed);
        self.entries
            .insert(composed.clone(), RegistryEntry { context, config });

        tracing::info!(
            context = %composed,
            load_path = self.entries[&composed].context.load_path().len(),
            "Created context"
        );
        Ok(composed)
    }

    /// Remove every entry matching `target` and return how many were removed.
    ///
    /// A bare name matches any composed name that has it as one of its segments,
    /// so `remove("a")` drops `a`, `a/b`, and also `x/a`. A name containing the
    /// separator matches that exact composed name and everything beneath it.
    /// Removing a name that matches nothing is a no-op.
    pub fn remove(&mut self, target: &str) -> usize {
        let matched: Vec<String> = if target.contains(SEPARATOR) {
            let first = target.split(SEPARATOR).next().unwrap_or(target);
            let prefix = format!("{}{}", target, SEPARATOR);
            self.segments
                .get(first)
                .map(|names| {
                    names
                        .iter()
                        .filter(|n| n.as_str() == target || n.starts_with(&prefix))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        } else {
            self.segments
                .get(target)
                .map(|names| names.iter().cloned().collect())
                .unwrap_or_default()
        };

        let mut removed = 0;
        for composed in matched {
            if let Some(entry) = self.entries.remove(&composed) {
                self.unindex(&composed);
                tracing::debug!(context = %composed, "Removed context");
                drop(entry);
                removed += 1;
            }
        }

        if removed > 0 {
            self.reclaim();
            tracing::info!(name = target, removed, "Removed contexts");
        }
        removed
    }

    /// Release spare map capacity once the registry has shrunk well below it.
    fn reclaim(&mut self) {
        let floor = self.entries.len().max(16);
        if self.entries.capacity() > floor * 4 {
            self.entries.shrink_to_fit();
            self.segments.shrink_to_fit();
        }
    }

    fn index(&mut self, composed: &str) {
        for segment in composed.split(SEPARATOR) {
            self.segments
                .entry(segment.to_string())
                .or_default()
                .insert(composed.to_string());
        }
    }

    fn unindex(&mut self, composed: &str) {
        for segment in composed.split(SEPARATOR) {
            if let Some(names) = self.segments.get_mut(segment) {
                names.remove(composed);
                if names.is_empty() {
                    self.segments.remove(segment);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&LoadingContext> {
        self.entries.get(name).map(|e| &e.context)
    }

    /// Repository configuration the context was created from.
    pub fn config(&self, name: &str) -> Option<&RepositorySpec> {
        self.entries.get(name).map(|e| &e.config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Composed names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Contexts whose parent link names `name`, sorted by composed name.
    pub fn children(&self, name: &str) -> Vec<&LoadingContext> {
        let mut children: Vec<&LoadingContext> = self
            .entries
            .values()
            .map(|e| &e.context)
            .filter(|c| matches!(c.parent(), ParentLink::Context(p) if p == name))
            .collect();
        children.sort_by(|a, b| a.name().cmp(b.name()));
        children
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}
