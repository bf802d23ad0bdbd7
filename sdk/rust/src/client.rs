use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Body for create and update calls. `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub post_id: Option<u64>,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Proxy answered with a non-success status. `body` is the JSON payload.
    #[error("proxy returned status {status}: {body}")]
    Status { status: u16, body: Value },
}

impl SdkError {
    /// `message` field of an error body, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            SdkError::Status { body, .. } => body.get("message").and_then(Value::as_str),
            SdkError::Http(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Status { status, .. } => Some(*status),
            SdkError::Http(_) => None,
        }
    }
}

pub struct ProxyClient {
    client: Client,
    proxy_url: String,
}

impl ProxyClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::builder().no_proxy().build().unwrap_or_default(),
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    /// List posts, optionally overriding the proxy's default window.
    pub async fn list_posts(
        &self,
        start: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<Post>, SdkError> {
        let req = self
            .request(Method::GET, "/posts/")
            .query(&page_query(start, limit));
        self.send(req).await
    }

    pub async fn get_post(&self, id: u64) -> Result<Post, SdkError> {
        self.send(self.request(Method::GET, &format!("/posts/{}", id))).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, SdkError> {
        self.send(self.request(Method::POST, "/posts/").json(post)).await
    }

    pub async fn update_post(&self, id: u64, post: &NewPost) -> Result<Post, SdkError> {
        self.send(self.request(Method::PATCH, &format!("/posts/{}", id)).json(post))
            .await
    }

    /// Delete a post. Returns the proxy's `deleted` flag.
    pub async fn delete_post(&self, id: u64) -> Result<bool, SdkError> {
        let ack: Value = self
            .send(self.request(Method::DELETE, &format!("/posts/{}", id)))
            .await?;
        Ok(ack.get("deleted").and_then(Value::as_bool).unwrap_or(false))
    }

    pub async fn list_comments(
        &self,
        post_id: u64,
        start: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<Comment>, SdkError> {
        let mut query = vec![("postId", post_id.to_string())];
        query.extend(page_query(start, limit));
        self.send(self.request(Method::GET, "/comments/").query(&query))
            .await
    }

    /// Send a raw GET and return the JSON body for any status.
    pub async fn get_raw(&self, path_and_query: &str) -> Result<(u16, Value), SdkError> {
        let resp = self.request(Method::GET, path_and_query).send().await?;
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.proxy_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, SdkError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            return Err(SdkError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

fn page_query(start: Option<usize>, limit: Option<usize>) -> Vec<(&'static str, String)> {
    start
        .map(|s| ("start", s.to_string()))
        .into_iter()
        .chain(limit.map(|l| ("limit", l.to_string())))
        .collect()
}
