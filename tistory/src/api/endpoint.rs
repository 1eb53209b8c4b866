//! Calls to arbitrary API endpoints.

use std::fmt::Display;
use std::sync::Arc;

use crate::{
    client::TistoryClientInner,
    error::{Error, Result},
    response::TistoryResponse,
};

/// A call to an API endpoint assembled from path segments and parameters.
///
/// ```no_run
/// # async fn run(client: tistory::TistoryClient) -> tistory::Result<()> {
/// let response = client
///     .call()
///     .segment("post")
///     .segment("read")
///     .param("blogName", "sample")
///     .param("postId", 74)
///     .send()
///     .await?;
/// response.raise_for_status()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EndpointCall {
    client: Arc<TistoryClientInner>,
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl EndpointCall {
    pub(crate) fn new(client: Arc<TistoryClientInner>) -> Self {
        Self {
            client,
            segments: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Append every segment of a `/`-separated path.
    pub fn path(mut self, path: &str) -> Self {
        self.segments.extend(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        );
        self
    }

    /// Append one path segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Set a parameter, replacing an earlier value for the same key.
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Set a parameter only when a value is present.
    pub fn param_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Endpoint path, e.g. `post/read`.
    pub fn endpoint(&self) -> String {
        self.segments.join("/")
    }

    /// Parameters set so far.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn checked_endpoint(&self) -> Result<String> {
        if self.segments.is_empty() {
            return Err(Error::InvalidArgument("Endpoint path is empty".into()));
        }
        Ok(self.endpoint())
    }

    /// Send the call and return the parsed response, whatever its status.
    pub async fn send(self) -> Result<TistoryResponse> {
        let endpoint = self.checked_endpoint()?;
        self.client.call(&endpoint, &self.params).await
    }

    /// Send the call and fail unless the API reports status 200.
    pub async fn send_checked(self) -> Result<TistoryResponse> {
        let response = self.send().await?;
        response.raise_for_status()?;
        Ok(response)
    }

    /// Send the call as multipart with one file part.
    pub async fn send_multipart(
        self,
        file_field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<TistoryResponse> {
        let endpoint = self.checked_endpoint()?;
        self.client
            .call_multipart(&endpoint, &self.params, file_field, file_name, bytes)
            .await
    }
}

impl std::fmt::Debug for EndpointCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointCall")
            .field("endpoint", &self.endpoint())
            .field("params", &self.params)
            .finish()
    }
}
