//! Axum middleware applied to every resource route.

pub mod metrics;

pub use metrics::track_metrics;
