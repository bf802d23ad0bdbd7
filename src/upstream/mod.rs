//! Upstream API subsystem.
//!
//! # Data Flow
//! ```text
//! Resource proxy operation
//!     → client.rs (build URL from configured base, JSON headers)
//!     → remote REST API
//!     → client.rs (status check, JSON decode)
//!     → UpstreamResult<T> back to the proxy
//! ```
//!
//! # Design Decisions
//! - One outbound call per operation, no retries
//! - Every failure is an `UpstreamError`; callers must handle both branches

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{UpstreamError, UpstreamResult};
