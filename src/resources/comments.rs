//! Comments resource proxy.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::config::PaginationConfig;
use crate::http::response::ApiError;
use crate::pagination::{parse_required, PageQuery, Pagination};
use crate::upstream::UpstreamClient;

/// Raw query for `GET /comments/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentsQuery {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
    pub start: Option<String>,
    pub limit: Option<String>,
}

impl CommentsQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            start: self.start.clone(),
            limit: self.limit.clone(),
        }
    }
}

/// Forwards comment lookups to the upstream `/comments` collection.
#[derive(Clone, Debug)]
pub struct CommentsProxy {
    upstream: UpstreamClient,
    defaults: PaginationConfig,
}

impl CommentsProxy {
    pub fn new(upstream: UpstreamClient, defaults: PaginationConfig) -> Self {
        Self { upstream, defaults }
    }

    /// Fetch a post's comments upstream and return the requested window.
    pub async fn list_by_post(&self, query: &CommentsQuery) -> Result<Vec<Value>, ApiError> {
        let page = Pagination::resolve(&query.page(), self.defaults)?;
        let post_id = parse_required::<u64>("postId", query.post_id.as_deref())?;

        let comments: Vec<Value> = self
            .upstream
            .get("/comments", &[("postId", post_id.to_string())])
            .await?;
        Ok(page.apply(comments))
    }
}

/// Routes for the comments collection.
pub fn router(proxy: CommentsProxy) -> Router {
    Router::new()
        .route("/comments", get(list_comments))
        .route("/comments/", get(list_comments))
        .with_state(proxy)
}

pub async fn list_comments(
    State(proxy): State<CommentsProxy>,
    query: Result<Query<CommentsQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query?;
    proxy.list_by_post(&query).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::ParamError;

    fn offline_proxy() -> CommentsProxy {
        let upstream = crate::upstream::client::offline_upstream();
        CommentsProxy::new(upstream, PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_missing_post_id() {
        let err = offline_proxy()
            .list_by_post(&CommentsQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParam(ParamError::Missing("postId"))));
    }

    #[tokio::test]
    async fn test_non_numeric_post_id() {
        let query = CommentsQuery {
            post_id: Some("NaN".into()),
            ..Default::default()
        };
        let err = offline_proxy().list_by_post(&query).await.unwrap_err();
        assert_eq!(err.to_string(), "postId must be a non-negative integer, got 'NaN'");
    }
}
