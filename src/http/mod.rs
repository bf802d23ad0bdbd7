//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (add / propagate request ID)
//!     → middleware (metrics per matched route)
//!     → resources (posts, comments)
//!     → response.rs (error → status + JSON body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, MessageBody};
pub use server::{build_router, HttpServer};
