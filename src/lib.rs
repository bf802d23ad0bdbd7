//! Posts/comments proxy library.
//!
//! Exposes `/posts` and `/comments` backed by a remote JSONPlaceholder-style
//! REST API, with local pagination of list results.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pagination;
pub mod resources;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::UpstreamClient;
