//! Posts resource proxy.
//!
//! # Routes
//! - `GET    /posts/`      list, paginated locally
//! - `GET    /posts/{id}`  single post, upstream answer relayed verbatim
//! - `POST   /posts/`      create
//! - `PATCH  /posts/{id}`  partial update
//! - `DELETE /posts/{id}`  delete, acknowledged with `{deleted: true}`

use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::config::PaginationConfig;
use crate::http::response::ApiError;
use crate::pagination::{parse_required, PageQuery, Pagination};
use crate::resources::types::{Deleted, PostPayload};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Message returned when a post id is absent.
pub const NO_POST_FOUND: &str = "No post found";

/// Forwards post operations to the upstream `/posts` collection.
#[derive(Clone, Debug)]
pub struct PostsProxy {
    upstream: UpstreamClient,
    defaults: PaginationConfig,
}

impl PostsProxy {
    pub fn new(upstream: UpstreamClient, defaults: PaginationConfig) -> Self {
        Self { upstream, defaults }
    }

    /// Fetch every post upstream and return the requested window.
    ///
    /// Items are relayed as upstream sent them.
    pub async fn list(&self, query: &PageQuery) -> Result<Vec<Value>, ApiError> {
        let page = Pagination::resolve(query, self.defaults)?;
        let posts: Vec<Value> = self.upstream.get("/posts", &[]).await?;
        Ok(page.apply(posts))
    }

    /// Fetch one post. An absent or blank id short-circuits to 404.
    ///
    /// A non-success upstream status is relayed with its body unchanged.
    pub async fn get(&self, id: Option<&str>) -> Result<Value, ApiError> {
        let id = match id.map(str::trim) {
            None | Some("") => return Err(ApiError::NotFound(NO_POST_FOUND.to_string())),
            Some(raw) => parse_required::<u64>("id", Some(raw))?,
        };

        match self.upstream.get(&format!("/posts/{}", id), &[]).await {
            Ok(post) => Ok(post),
            Err(UpstreamError::Status { status, body }) => Err(ApiError::Relayed { status, body }),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a post. Upstream's body, including its assigned id, is returned as-is.
    pub async fn create(&self, payload: &PostPayload) -> Result<Value, ApiError> {
        Ok(self.upstream.post("/posts", payload).await?)
    }

    /// Delete a post. Upstream's body is ignored.
    pub async fn delete(&self, id: &str) -> Result<Deleted, ApiError> {
        let id = parse_required::<u64>("id", Some(id))?;
        self.upstream.delete(&format!("/posts/{}", id)).await?;
        Ok(Deleted { deleted: true })
    }

    /// Partially update a post with the supplied fields.
    pub async fn update(&self, id: &str, payload: &PostPayload) -> Result<Value, ApiError> {
        let id = parse_required::<u64>("id", Some(id))?;
        Ok(self.upstream.patch(&format!("/posts/{}", id), payload).await?)
    }
}

/// Routes for the posts collection.
pub fn router(proxy: PostsProxy) -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).delete(delete_post).patch(update_post),
        )
        .with_state(proxy)
}

pub async fn list_posts(
    State(proxy): State<PostsProxy>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query?;
    proxy.list(&query).await.map(Json)
}

pub async fn get_post(
    State(proxy): State<PostsProxy>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    proxy.get(Some(&id)).await.map(Json)
}

pub async fn create_post(
    State(proxy): State<PostsProxy>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    proxy.create(&payload).await.map(Json)
}

pub async fn delete_post(
    State(proxy): State<PostsProxy>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    proxy.delete(&id).await.map(Json)
}

pub async fn update_post(
    State(proxy): State<PostsProxy>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<PostPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    proxy.update(&id, &payload).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::ParamError;

    fn offline_proxy() -> PostsProxy {
        let upstream = crate::upstream::client::offline_upstream();
        PostsProxy::new(upstream, PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_absent_id_short_circuits() {
        let proxy = offline_proxy();
        for id in [None, Some(""), Some("   ")] {
            let err = proxy.get(id).await.unwrap_err();
            assert!(matches!(err, ApiError::NotFound(ref m) if m == NO_POST_FOUND));
        }
    }

    #[tokio::test]
    async fn test_non_numeric_id_rejected_before_upstream() {
        let proxy = offline_proxy();
        let err = proxy.get(Some("abc")).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidParam(ParamError::Invalid { name: "id", .. })
        ));

        let err = proxy.delete("-4").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParam(_)));

        let err = proxy.update("1e3", &PostPayload::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParam(_)));
    }

    #[tokio::test]
    async fn test_bad_pagination_rejected_before_upstream() {
        let proxy = offline_proxy();
        let query = PageQuery {
            start: Some("x".into()),
            limit: None,
        };
        let err = proxy.list(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParam(_)));
    }

    #[tokio::test]
    async fn test_upstream_down_surfaces_as_upstream_error() {
        let proxy = offline_proxy();
        let err = proxy.list(&PageQuery::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(UpstreamError::Transport(_))));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
