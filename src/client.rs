//! Async client for the Figma REST API.
//!
//! Every endpoint method issues exactly one request. Non-2xx responses become
//! [`FigmaError::Api`] carrying the status, the server's message and the
//! decoded body. Nothing is retried implicitly; wrap calls in
//! [`FigmaClient::with_retry`] to opt into the configured backoff.

use std::future::Future;
use std::time::Duration;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{FigmaAuth, FigmaClientConfig};
use crate::error::{FigmaError, Result};
use crate::helpers::RetryPolicy;
use crate::types::params::{FileNodesQuery, OptionalQuery};
use crate::types::{
    ActivityLogParams, ActivityLogsResponse, Comment, CommentReactionsResponse, CommentsParams,
    CommentsResponse, ComponentResponse, ComponentSetResponse, ComponentSetsResponse,
    ComponentsResponse, CreateDevResourceParams, CreateWebhookParams, DevResource,
    DevResourceParams, DevResourcesResponse, FileMetaResponse, FileNodesParams,
    FileNodesResponse, FileParams, FileResponse, FileVersionsResponse, GetImageParams,
    ImageFillsResponse, ImageResponse, PaginationParams, PostCommentParams, ProjectFilesParams,
    ProjectFilesResponse, StyleResponse, StylesResponse, TeamProjectsResponse,
    UpdateDevResourceParams, UpdateWebhookParams, User, VariablesResponse, Webhook,
    WebhookRequestsResponse, WebhooksResponse,
};

const USER_AGENT: &str = concat!("figkit/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: reqwest::Client,
    base_url: Url,
    auth: FigmaAuth,
    timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl FigmaClient {
    pub fn new(config: FigmaClientConfig) -> Result<Self> {
        if config.auth.token().trim().is_empty() {
            return Err(FigmaError::config("Figma access token is empty"));
        }
        if config.base_url.cannot_be_a_base() {
            return Err(FigmaError::config(format!(
                "base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url,
            auth: config.auth,
            timeout: config.timeout,
            retry: config.retry,
        })
    }

    /// Personal-token client against the public API with default settings.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(FigmaClientConfig::new(token))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run `op` under the client's [`RetryPolicy`], retrying only errors
    /// for which [`FigmaError::is_retryable`] holds.
    pub async fn with_retry<'a, T, F, Fut>(&'a self, mut op: F) -> Result<T>
    where
        F: FnMut(&'a FigmaClient) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.retry
            .run_if(|| op(self), FigmaError::is_retryable)
            .await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FigmaError::config("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> FigmaError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => FigmaError::Timeout(timeout),
            _ => FigmaError::Network(err),
        }
    }

    async fn send<Q, B>(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Response>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "figma request");

        let (header, value) = self.auth.header();
        let mut request = self.http.request(method, url).header(header, value);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "figma response");
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(text) => error_body(text),
            Err(e) => {
                warn!(status = status.as_u16(), error = %e, "failed to read error body");
                None
            }
        };
        let field = |name: &str| {
            body.as_ref()
                .and_then(|b| b.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let message = field("err")
            .or_else(|| field("message"))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Err(FigmaError::api(status, message, body))
    }

    async fn parse<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.get_query::<T, ()>(segments, None).await
    }

    async fn get_query<T, Q>(&self, segments: &[&str], query: Option<&Q>) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .send::<Q, ()>(Method::GET, segments, query, None)
            .await?;
        self.parse(response).await
    }

    async fn post<T, B>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send::<(), B>(Method::POST, segments, None, Some(body))
            .await?;
        self.parse(response).await
    }

    async fn put<T, B>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send::<(), B>(Method::PUT, segments, None, Some(body))
            .await?;
        self.parse(response).await
    }

    /// For endpoints whose success body (often 204) is not needed.
    async fn request_empty<Q, B>(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<()>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.send(method, segments, query, body).await?;
        Ok(())
    }

    // Users

    pub async fn get_current_user(&self) -> Result<User> {
        self.get(&["v1", "me"]).await
    }

    // Files

    pub async fn get_file(
        &self,
        file_key: &str,
        params: Option<&FileParams>,
    ) -> Result<FileResponse> {
        self.get_query(&["v1", "files", file_key], params).await
    }

    /// `ids` are sent comma-joined; ids missing from the file map to `None`.
    pub async fn get_file_nodes(
        &self,
        file_key: &str,
        ids: &[String],
        params: Option<&FileNodesParams>,
    ) -> Result<FileNodesResponse> {
        let defaults = FileNodesParams::default();
        let query = FileNodesQuery {
            ids,
            params: params.unwrap_or(&defaults),
        };
        self.get_query(&["v1", "files", file_key, "nodes"], Some(&query))
            .await
    }

    pub async fn get_file_meta(&self, file_key: &str) -> Result<FileMetaResponse> {
        self.get(&["v1", "files", file_key, "meta"]).await
    }

    pub async fn get_file_versions(
        &self,
        file_key: &str,
        params: Option<&PaginationParams>,
    ) -> Result<FileVersionsResponse> {
        self.get_query(&["v1", "files", file_key, "versions"], params)
            .await
    }

    // Images

    pub async fn get_image(
        &self,
        file_key: &str,
        params: &GetImageParams,
    ) -> Result<ImageResponse> {
        self.get_query(&["v1", "images", file_key], Some(params)).await
    }

    pub async fn get_image_fills(&self, file_key: &str) -> Result<ImageFillsResponse> {
        self.get(&["v1", "files", file_key, "images"]).await
    }

    /// Fetch the bytes behind a rendered image URL. The URL is pre-signed,
    /// so no credentials are attached.
    pub async fn download_image(&self, image_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(image_url)?;
        debug!(%url, "image download");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = self.check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }

    // Comments

    pub async fn get_comments(
        &self,
        file_key: &str,
        params: Option<&CommentsParams>,
    ) -> Result<CommentsResponse> {
        self.get_query(&["v1", "files", file_key, "comments"], params)
            .await
    }

    pub async fn post_comment(
        &self,
        file_key: &str,
        params: &PostCommentParams,
    ) -> Result<Comment> {
        self.post(&["v1", "files", file_key, "comments"], params).await
    }

    pub async fn delete_comment(&self, file_key: &str, comment_id: &str) -> Result<()> {
        self.request_empty::<(), ()>(
            Method::DELETE,
            &["v1", "files", file_key, "comments", comment_id],
            None,
            None,
        )
        .await
    }

    pub async fn get_comment_reactions(
        &self,
        file_key: &str,
        comment_id: &str,
        cursor: Option<&str>,
    ) -> Result<CommentReactionsResponse> {
        let query = OptionalQuery {
            cursor,
            team_id: None,
            emoji: None,
        };
        self.get_query(
            &["v1", "files", file_key, "comments", comment_id, "reactions"],
            Some(&query),
        )
        .await
    }

    pub async fn post_comment_reaction(
        &self,
        file_key: &str,
        comment_id: &str,
        emoji: &str,
    ) -> Result<()> {
        self.request_empty::<(), _>(
            Method::POST,
            &["v1", "files", file_key, "comments", comment_id, "reactions"],
            None,
            Some(&serde_json::json!({ "emoji": emoji })),
        )
        .await
    }

    pub async fn delete_comment_reaction(
        &self,
        file_key: &str,
        comment_id: &str,
        emoji: &str,
    ) -> Result<()> {
        let query = OptionalQuery {
            cursor: None,
            team_id: None,
            emoji: Some(emoji),
        };
        self.request_empty::<_, ()>(
            Method::DELETE,
            &["v1", "files", file_key, "comments", comment_id, "reactions"],
            Some(&query),
            None,
        )
        .await
    }

    // Components and styles

    pub async fn get_component(&self, component_key: &str) -> Result<ComponentResponse> {
        self.get(&["v1", "components", component_key]).await
    }

    pub async fn get_file_components(
        &self,
        file_key: &str,
        params: Option<&PaginationParams>,
    ) -> Result<ComponentsResponse> {
        self.get_query(&["v1", "files", file_key, "components"], params)
            .await
    }

    pub async fn get_team_components(
        &self,
        team_id: &str,
        params: Option<&PaginationParams>,
    ) -> Result<ComponentsResponse> {
        self.get_query(&["v1", "teams", team_id, "components"], params)
            .await
    }

    pub async fn get_component_set(
        &self,
        component_set_key: &str,
    ) -> Result<ComponentSetResponse> {
        self.get(&["v1", "component_sets", component_set_key]).await
    }

    pub async fn get_file_component_sets(
        &self,
        file_key: &str,
        params: Option<&PaginationParams>,
    ) -> Result<ComponentSetsResponse> {
        self.get_query(&["v1", "files", file_key, "component_sets"], params)
            .await
    }

    pub async fn get_team_component_sets(
        &self,
        team_id: &str,
        params: Option<&PaginationParams>,
    ) -> Result<ComponentSetsResponse> {
        self.get_query(&["v1", "teams", team_id, "component_sets"], params)
            .await
    }

    pub async fn get_style(&self, style_key: &str) -> Result<StyleResponse> {
        self.get(&["v1", "styles", style_key]).await
    }

    pub async fn get_file_styles(
        &self,
        file_key: &str,
        params: Option<&PaginationParams>,
    ) -> Result<StylesResponse> {
        self.get_query(&["v1", "files", file_key, "styles"], params)
            .await
    }

    pub async fn get_team_styles(
        &self,
        team_id: &str,
        params: Option<&PaginationParams>,
    ) -> Result<StylesResponse> {
        self.get_query(&["v1", "teams", team_id, "styles"], params)
            .await
    }

    // Projects

    pub async fn get_team_projects(&self, team_id: &str) -> Result<TeamProjectsResponse> {
        self.get(&["v1", "teams", team_id, "projects"]).await
    }

    pub async fn get_project_files(
        &self,
        project_id: &str,
        params: Option<&ProjectFilesParams>,
    ) -> Result<ProjectFilesResponse> {
        self.get_query(&["v1", "projects", project_id, "files"], params)
            .await
    }

    // Webhooks (v2)

    pub async fn create_webhook(&self, params: &CreateWebhookParams) -> Result<Webhook> {
        self.post(&["v2", "webhooks"], params).await
    }

    pub async fn get_webhook(&self, webhook_id: &str) -> Result<Webhook> {
        self.get(&["v2", "webhooks", webhook_id]).await
    }

    pub async fn get_webhooks(&self, team_id: Option<&str>) -> Result<WebhooksResponse> {
        let query = OptionalQuery {
            cursor: None,
            team_id,
            emoji: None,
        };
        self.get_query(&["v2", "webhooks"], Some(&query)).await
    }

    pub async fn update_webhook(
        &self,
        webhook_id: &str,
        params: &UpdateWebhookParams,
    ) -> Result<Webhook> {
        self.put(&["v2", "webhooks", webhook_id], params).await
    }

    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.request_empty::<(), ()>(Method::DELETE, &["v2", "webhooks", webhook_id], None, None)
            .await
    }

    pub async fn get_webhook_requests(&self, webhook_id: &str) -> Result<WebhookRequestsResponse> {
        self.get(&["v2", "webhooks", webhook_id, "requests"]).await
    }

    // Variables

    pub async fn get_local_variables(&self, file_key: &str) -> Result<VariablesResponse> {
        self.get(&["v1", "files", file_key, "variables", "local"])
            .await
    }

    pub async fn get_published_variables(&self, file_key: &str) -> Result<VariablesResponse> {
        self.get(&["v1", "files", file_key, "variables", "published"])
            .await
    }

    // Dev resources

    pub async fn get_dev_resources(
        &self,
        file_key: &str,
        params: Option<&DevResourceParams>,
    ) -> Result<DevResourcesResponse> {
        self.get_query(&["v1", "files", file_key, "dev_resources"], params)
            .await
    }

    pub async fn create_dev_resource(
        &self,
        params: &CreateDevResourceParams,
    ) -> Result<DevResource> {
        self.post(&["v1", "dev_resources"], params).await
    }

    pub async fn update_dev_resource(
        &self,
        dev_resource_id: &str,
        params: &UpdateDevResourceParams,
    ) -> Result<DevResource> {
        self.put(&["v1", "dev_resources", dev_resource_id], params)
            .await
    }

    pub async fn delete_dev_resource(&self, dev_resource_id: &str) -> Result<()> {
        self.request_empty::<(), ()>(
            Method::DELETE,
            &["v1", "dev_resources", dev_resource_id],
            None,
            None,
        )
        .await
    }

    // Activity logs

    pub async fn get_activity_logs(
        &self,
        params: &ActivityLogParams,
    ) -> Result<ActivityLogsResponse> {
        self.get_query(&["v1", "activity_logs"], Some(params)).await
    }
}

/// JSON error bodies are kept parsed; anything else non-empty is kept as raw text.
fn error_body(text: String) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_bodies_keep_raw_text() {
        assert_eq!(
            error_body("upstream exploded".to_string()),
            Some(Value::String("upstream exploded".into()))
        );
        assert_eq!(
            error_body(r#"{"status":404,"err":"Not found"}"#.to_string()),
            Some(json!({ "status": 404, "err": "Not found" }))
        );
        assert_eq!(error_body("  ".to_string()), None);
    }

    #[test]
    fn rejects_blank_tokens() {
        let err = FigmaClient::with_token("   ").unwrap_err();
        assert!(matches!(err, FigmaError::Config(_)));
    }

    #[test]
    fn rejects_base_urls_without_paths() {
        let config = FigmaClientConfig::new("t")
            .base_url(Url::parse("mailto:someone@example.com").unwrap());
        assert!(matches!(
            FigmaClient::new(config),
            Err(FigmaError::Config(_))
        ));
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let client = FigmaClient::with_token("t").unwrap();
        let url = client.endpoint(&["v1", "files", "abc", "nodes"]).unwrap();
        assert_eq!(url.as_str(), "https://api.figma.com/v1/files/abc/nodes");

        let config = FigmaClientConfig::new("t")
            .base_url(Url::parse("http://127.0.0.1:8080/proxy/").unwrap());
        let client = FigmaClient::new(config).unwrap();
        let url = client.endpoint(&["v1", "me"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/proxy/v1/me");
    }

    #[test]
    fn endpoint_escapes_segment_content() {
        let client = FigmaClient::with_token("t").unwrap();
        let url = client.endpoint(&["v1", "files", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://api.figma.com/v1/files/a%2Fb");
    }
}
