//! Error types.

use std::fmt;

use thiserror::Error;

/// Known categories of API error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The access token was rejected.
    InvalidAccessToken,
    /// The blog or post does not exist.
    DoesNotExist,
    /// The post does not exist or the token has no rights on it.
    DoesNotExistOrUnauthorized,
    /// Message not recognised.
    Unknown,
}

/// Message fragments returned by Tistory and their classification.
const KNOWN_MESSAGES: &[(&str, ApiErrorKind)] = &[
    ("access_token 이 유효하지 않습니다.", ApiErrorKind::InvalidAccessToken),
    ("블로그 정보가 없습니다.", ApiErrorKind::DoesNotExist),
    (
        "글이 존재하지 않 거나 권한이 없습니다.",
        ApiErrorKind::DoesNotExistOrUnauthorized,
    ),
    (
        "글이 존재하지 않거나, 범위가 유효하지 않습니다.",
        ApiErrorKind::DoesNotExist,
    ),
];

impl ApiErrorKind {
    /// Classify an `error_message` returned by the API.
    pub fn classify(message: &str) -> Self {
        KNOWN_MESSAGES
            .iter()
            .find(|(fragment, _)| message.contains(fragment))
            .map(|(_, kind)| *kind)
            .unwrap_or(ApiErrorKind::Unknown)
    }

    /// Short machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::InvalidAccessToken => "access_token",
            ApiErrorKind::DoesNotExist => "does_not_exist",
            ApiErrorKind::DoesNotExistOrUnauthorized => "does_not_exist_or_unauthorized",
            ApiErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for Tistory operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status with no usable API body.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Tistory API returned a non-200 status.
    #[error("Tistory API error [{status}/{kind}]: {message}")]
    Api {
        status: i64,
        kind: ApiErrorKind,
        message: String,
    },

    /// Failed to parse response data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Operation requires an access token but none was provided.
    #[error("Access token required")]
    AuthRequired,

    /// A required field was missing in the response.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The login/authorization web flow failed.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// XPath evaluation error.
    #[error("XPath error: {0}")]
    XPath(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an API error, classifying the message.
    pub fn api(status: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        Error::Api {
            status,
            kind: ApiErrorKind::classify(&message),
            message,
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Error::MissingField(field.into())
    }

    /// Create an OAuth flow error.
    pub fn oauth(msg: impl Into<String>) -> Self {
        Error::OAuth(msg.into())
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::AuthRequired | Error::OAuth(_) => true,
            Error::Api { kind, .. } => *kind == ApiErrorKind::InvalidAccessToken,
            Error::Http { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// Result type alias for Tistory operations.
pub type Result<T> = std::result::Result<T, Error>;
