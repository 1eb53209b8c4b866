//! HTTP client configuration and request execution.

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default Tistory base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.tistory.com/";

/// Path prefix of the Open API below the base URL.
pub const API_PATH: &str = "apis/";

/// User agent sent unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("tistory-rs/", env!("CARGO_PKG_VERSION"));

/// Browser user agent for the web login flow.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Decode a body using the charset from the `Content-Type` header.
pub(crate) fn decode_body(bytes: &[u8], headers: &HeaderMap) -> String {
    let encoding = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| {
            ct.split(';').skip(1).find_map(|param| {
                let (name, value) = param.split_once('=')?;
                name.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| value.trim().trim_matches('"').to_owned())
            })
        })
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Response body format requested with the `output` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `output=xml`
    #[default]
    Xml,
    /// `output=json`
    Json,
}

impl ResponseFormat {
    /// Value of the `output` parameter.
    pub fn param(&self) -> &'static str {
        match self {
            ResponseFormat::Xml => "xml",
            ResponseFormat::Json => "json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

impl FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(ResponseFormat::Xml),
            "json" => Ok(ResponseFormat::Json),
            other => Err(Error::InvalidArgument(format!(
                "Format needs to be either xml or json. Got: {}",
                other
            ))),
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL for requests.
    pub base_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// Custom user agent.
    pub custom_user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(20),
            custom_user_agent: None,
        }
    }
}

impl HttpConfig {
    /// User agent for API calls.
    pub fn user_agent(&self) -> &str {
        self.custom_user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolve a relative path to a full URL.
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(Error::Url);
        }

        Url::parse(&self.base_url)
            .and_then(|b| b.join(path))
            .map_err(Error::Url)
    }

    /// Resolve an API endpoint path such as `post/read`.
    pub fn api_url(&self, endpoint: &str) -> Result<Url> {
        self.resolve_url(&format!("{}{}", API_PATH, endpoint.trim_start_matches('/')))
    }
}

/// Build a reqwest client with the given configuration.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .gzip(true)
        .build()
        .map_err(Error::Network)
}

/// A decoded HTTP response before payload parsing.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Final request URL.
    pub url: Url,
    /// Decoded body.
    pub text: String,
}

impl RawResponse {
    pub(crate) async fn read(response: Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let bytes = response.bytes().await.map_err(Error::Network)?;

        Ok(Self {
            status,
            text: decode_body(&bytes, &headers),
            headers,
            url,
        })
    }

    /// HTTP error for this response.
    pub fn http_error(&self) -> Error {
        Error::Http {
            status: self.status.as_u16(),
            message: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_owned(),
        }
    }
}

/// HTTP request executor.
pub struct HttpExecutor<'a> {
    client: &'a Client,
    config: &'a HttpConfig,
}

impl<'a> HttpExecutor<'a> {
    /// Create a new executor.
    pub fn new(client: &'a Client, config: &'a HttpConfig) -> Self {
        Self { client, config }
    }

    /// Build a request with common headers.
    fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("User-Agent", self.config.user_agent())
    }

    /// POST a form to an API endpoint.
    pub async fn post_form(&self, endpoint: &str, form: &[(String, String)]) -> Result<RawResponse> {
        let url = self.config.api_url(endpoint)?;
        log::debug!("POST {}", url);

        let response = self
            .build_request(Method::POST, url)
            .form(form)
            .send()
            .await
            .map_err(Error::Network)?;

        RawResponse::read(response).await
    }

    /// POST a multipart form with a single file part to an API endpoint.
    pub async fn post_multipart(
        &self,
        endpoint: &str,
        form: &[(String, String)],
        file_field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<RawResponse> {
        let url = self.config.api_url(endpoint)?;
        log::debug!("POST {} (multipart, {} bytes)", url, bytes.len());

        let mut multipart = Form::new();
        for (key, value) in form {
            multipart = multipart.text(key.clone(), value.clone());
        }
        let part = Part::bytes(bytes).file_name(file_name.to_owned());
        multipart = multipart.part(file_field.to_owned(), part);

        let response = self
            .build_request(Method::POST, url)
            .multipart(multipart)
            .send()
            .await
            .map_err(Error::Network)?;

        RawResponse::read(response).await
    }
}
