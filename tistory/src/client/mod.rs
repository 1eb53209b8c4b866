//! HTTP client and configuration.

mod auth;
mod http;

pub use auth::{AccessToken, DEFAULT_TOKEN_FILE};
pub use http::{
    HttpConfig, RawResponse, ResponseFormat, API_PATH, BROWSER_USER_AGENT, DEFAULT_BASE_URL,
};

use crate::api::{BlogApi, CategoryApi, CommentApi, EndpointCall, PostApi};
use crate::error::{Error, Result};
use crate::response::TistoryResponse;
use http::{build_client, HttpExecutor};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating TistoryClient.
pub struct TistoryClientBuilder {
    token: Option<String>,
    format: ResponseFormat,
    http_config: HttpConfig,
}

impl std::fmt::Debug for TistoryClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TistoryClientBuilder")
            .field("token", &self.token.as_ref().map(|_| "..."))
            .field("format", &self.format)
            .field("http_config", &self.http_config)
            .finish()
    }
}

impl Default for TistoryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TistoryClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            token: None,
            format: ResponseFormat::default(),
            http_config: HttpConfig::default(),
        }
    }

    /// Set the access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use a token loaded from a file or an OAuth flow.
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token.as_str().to_owned());
        self
    }

    /// Set the response format.
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Set base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Set custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http_config.custom_user_agent = Some(ua.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Build TistoryClient.
    pub fn build(self) -> Result<TistoryClient> {
        let token = self.token.map(AccessToken::new).transpose()?;
        let http_client = build_client(&self.http_config)?;

        Ok(TistoryClient {
            inner: Arc::new(TistoryClientInner {
                http: http_client,
                config: self.http_config,
                token,
                format: self.format,
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct TistoryClientInner {
    pub http: reqwest::Client,
    pub config: HttpConfig,
    pub token: Option<AccessToken>,
    pub format: ResponseFormat,
}

impl TistoryClientInner {
    /// Get the token or error.
    pub fn require_token(&self) -> Result<&AccessToken> {
        self.token.as_ref().ok_or(Error::AuthRequired)
    }

    /// Create HTTP executor.
    pub fn executor(&self) -> HttpExecutor<'_> {
        HttpExecutor::new(&self.http, &self.config)
    }

    /// Form body for a call: user params, then `access_token` and `output`,
    /// which always replace any user-supplied value.
    fn payload(&self, params: &[(String, String)]) -> Result<Vec<(String, String)>> {
        let token = self.require_token()?;

        let mut form: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| k != "access_token" && k != "output")
            .cloned()
            .collect();
        form.push(("access_token".to_owned(), token.as_str().to_owned()));
        form.push(("output".to_owned(), self.format.param().to_owned()));
        Ok(form)
    }

    /// Call an endpoint with form parameters.
    pub async fn call(&self, endpoint: &str, params: &[(String, String)]) -> Result<TistoryResponse> {
        let form = self.payload(params)?;
        let raw = self.executor().post_form(endpoint, &form).await?;
        TistoryResponse::from_raw(raw, self.format)
    }

    /// Call an endpoint with a multipart body carrying one file.
    pub async fn call_multipart(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        file_field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<TistoryResponse> {
        let form = self.payload(params)?;
        let raw = self
            .executor()
            .post_multipart(endpoint, &form, file_field, file_name, bytes)
            .await?;
        TistoryResponse::from_raw(raw, self.format)
    }
}

/// Tistory Open API client.
#[derive(Clone)]
pub struct TistoryClient {
    pub(crate) inner: Arc<TistoryClientInner>,
}

impl TistoryClient {
    /// Create a new client builder.
    pub fn builder() -> TistoryClientBuilder {
        TistoryClientBuilder::new()
    }

    /// Start a call to an arbitrary endpoint, e.g. `"post/read"`.
    pub fn endpoint(&self, path: &str) -> EndpointCall {
        EndpointCall::new(self.inner.clone()).path(path)
    }

    /// Start a call built one segment at a time: `call().segment("post").segment("read")`.
    pub fn call(&self) -> EndpointCall {
        EndpointCall::new(self.inner.clone())
    }

    /// Get the blog API.
    pub fn blog(&self) -> BlogApi {
        BlogApi::new(self.inner.clone())
    }

    /// Get the post API.
    pub fn posts(&self) -> PostApi {
        PostApi::new(self.inner.clone())
    }

    /// Get the category API.
    pub fn categories(&self) -> CategoryApi {
        CategoryApi::new(self.inner.clone())
    }

    /// Get the comment API.
    pub fn comments(&self) -> CommentApi {
        CommentApi::new(self.inner.clone())
    }

    /// Check if the client has an access token.
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.is_some()
    }

    /// The configured access token.
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.inner.token.as_ref()
    }

    /// The configured response format.
    pub fn format(&self) -> ResponseFormat {
        self.inner.format
    }
}

impl std::fmt::Debug for TistoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TistoryClient")
            .field("authenticated", &self.is_authenticated())
            .field("format", &self.inner.format)
            .field("base_url", &self.inner.config.base_url)
            .finish()
    }
}
