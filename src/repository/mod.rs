//! Remote repositories, transports, and the resolver built on them.

pub mod remote;
pub mod resolver;
pub mod transport;

pub use remote::{Authentication, Proxy, RemoteRepository};
pub use resolver::RepositoryResolver;
pub use transport::{FileTransport, HttpTransport, Transport, TransportSet};
