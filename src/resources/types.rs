//! Caller-facing DTOs.
//!
//! Upstream posts and comments are passed through as raw JSON and have no
//! type here.

use serde::{Deserialize, Serialize};

/// Fields a caller may send when creating or updating a post.
///
/// Only these three fields are forwarded upstream; absent ones are omitted
/// so a PATCH stays partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Acknowledgement returned by DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}
