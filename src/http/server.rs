//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the posts and comments resources
//! - Wire up middleware (tracing, request ID, timeout, metrics)
//! - Bind server to listener
//! - Serve until shutdown is triggered

use std::time::Duration;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    http::Request,
    middleware,
    routing::get,
    BoxError, Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::middleware::track_metrics;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::ApiError;
use crate::lifecycle::signals;
use crate::resources::{comments, posts, CommentsProxy, PostsProxy};
use crate::upstream::{UpstreamClient, UpstreamResult};

/// HTTP server for the posts/comments proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let router = build_router(&config, upstream);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once `shutdown` fires or the process receives Ctrl+C/SIGTERM.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = signals::shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Build the Axum router with all resources and middleware layers.
pub fn build_router(config: &ProxyConfig, upstream: UpstreamClient) -> Router {
    let posts = PostsProxy::new(upstream.clone(), config.pagination);
    let comments = CommentsProxy::new(upstream, config.pagination);

    let router = Router::new()
        .route("/health", get(health))
        .merge(posts::router(posts))
        .merge(comments::router(comments))
        .route_layer(middleware::from_fn(track_metrics))
        .fallback(route_not_found);

    with_request_timeout(router, Duration::from_secs(config.timeouts.request_secs))
        .layer(propagate_request_id_layer())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }),
        )
        .layer(set_request_id_layer())
}

/// Abort requests running longer than `timeout` with a JSON 408.
///
/// Dropping the handler also drops its in-flight upstream call.
fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(timeout),
    )
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn offline_router() -> Router {
        let upstream = crate::upstream::client::offline_upstream();
        build_router(&ProxyConfig::default(), upstream)
    }

    async fn send(
        router: Router,
        method: &str,
        uri: &str,
    ) -> (StatusCode, serde_json::Value, Option<String>) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap(), request_id)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body, request_id) = send(offline_router(), "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(request_id.is_some());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body, _) = send(offline_router(), "GET", "/users").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }

    #[tokio::test]
    async fn test_blank_post_id_is_404() {
        let (status, body, _) = send(offline_router(), "GET", "/posts/%20").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No post found");
    }

    #[tokio::test]
    async fn test_malformed_input_is_400() {
        for uri in [
            "/posts/abc",
            "/posts/?start=-1",
            "/posts?limit=lots",
            "/comments/?postId=x",
            "/comments/",
        ] {
            let (status, body, _) = send(offline_router(), "GET", uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_upstream_down_is_500() {
        let (status, body, _) = send(offline_router(), "GET", "/posts/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("upstream request failed"));
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_json_body() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let router = with_request_timeout(slow, Duration::from_millis(20));

        let (status, body, _) = send(router, "GET", "/slow").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["message"], "Request timed out");
    }

    #[tokio::test]
    async fn test_non_timeout_middleware_error_is_500() {
        let err = handle_middleware_error("boom".into()).await;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
