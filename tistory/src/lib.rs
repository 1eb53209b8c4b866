//! Rust client library for the Tistory Open API.
//!
//! Every endpoint is reached through [`TistoryClient`], either with the typed
//! wrappers ([`TistoryClient::posts`], [`TistoryClient::comments`], ...) or
//! with a raw [`EndpointCall`]. Tokens come from [`oauth::OAuthFlow`] or a
//! saved [`AccessToken`] file.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod oauth;
pub mod parser;
pub mod response;

// Re-export main types
pub use client::{AccessToken, HttpConfig, ResponseFormat, TistoryClient, TistoryClientBuilder};
pub use error::{ApiErrorKind, Error, Result};
pub use response::{Payload, TistoryResponse};

// Re-export commonly used models
pub use models::{
    Attachment, Blog, BlogId, BlogInfo, Category, CategoryId, Comment, CommentId, CommentList,
    CommentWriteResult, Post, PostId, PostList, PostSummary, PostWriteResult, Visibility,
};

// Re-export API types
pub use api::{
    BlogApi, CategoryApi, CommentApi, CommentWriteBuilder, EndpointCall, PostApi,
    PostWriteBuilder,
};
pub use oauth::{OAuthConfig, OAuthFlow};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = TistoryClient::builder().build();
        assert!(client.is_ok());

        let client = client.unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.format(), ResponseFormat::Xml);
    }

    #[test]
    fn test_client_with_token() {
        let client = TistoryClient::builder()
            .access_token(" test_token\n")
            .format(ResponseFormat::Json)
            .build()
            .unwrap();

        assert!(client.is_authenticated());
        assert_eq!(client.access_token().map(|t| t.as_str()), Some("test_token"));
        assert_eq!(client.format(), ResponseFormat::Json);

        let token = AccessToken::new("saved").unwrap();
        let client = TistoryClient::builder().with_token(token).build().unwrap();
        assert_eq!(client.access_token().map(|t| t.as_str()), Some("saved"));
    }

    #[test]
    fn test_client_rejects_blank_token() {
        let err = TistoryClient::builder().access_token("  ").build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
