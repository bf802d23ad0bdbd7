//! Pagination for collection endpoints.
//!
//! # Data Flow
//! ```text
//! ?start=&limit= (raw strings, possibly absent)
//!     → params.rs (fill defaults, parse, reject malformed)
//!     → Pagination { start, limit }
//!     → slice.rs (apply window to the full upstream list)
//! ```
//!
//! # Design Decisions
//! - Upstream is always asked for the whole collection; slicing is local
//! - Malformed numbers are a client error, never forwarded

pub mod params;
pub mod slice;

pub use params::{parse_optional, parse_required, PageQuery, Pagination, ParamError};
