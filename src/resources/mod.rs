//! Resource proxies.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → handler (extract path/query/body, reject malformed input)
//!     → PostsProxy / CommentsProxy operation
//!     → UpstreamClient (one call)
//!     → Pagination::apply for lists
//!     → JSON response or ApiError
//! ```
//!
//! # Design Decisions
//! - Proxies hold only the upstream client and pagination defaults
//! - Nothing fetched is kept between requests
//! - Fetched items are relayed as opaque JSON; only caller input is typed

pub mod comments;
pub mod posts;
pub mod types;

pub use comments::CommentsProxy;
pub use posts::PostsProxy;
pub use types::{Deleted, PostPayload};
