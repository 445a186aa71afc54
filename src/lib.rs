//! Loadtree: Isolated Loading Contexts over Maven Repositories
//!
//! Resolves artifacts from remote (or `file://`) Maven-layout repositories into a
//! local store, and registers named, hierarchical loading contexts whose load
//! paths point at the resolved artifacts. Contexts are replaced and removed as a
//! cascade over their composed names.

pub mod artifact;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod repository;
pub mod request;
pub mod service;
pub mod session;
pub mod store;
pub mod tooling;

pub use artifact::{ArtifactCoordinate, ResolvedArtifact};
pub use context::{ContextRegistry, LoadingContext, ParentLink};
pub use error::ApiError;
pub use request::{ContextRequest, RepositoryConfig, RepositorySpec};
pub use service::LoaderService;
pub use session::RepositorySession;
