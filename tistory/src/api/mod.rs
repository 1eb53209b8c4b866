//! API modules.

mod blog;
mod category;
mod comment;
mod endpoint;
mod post;

pub use blog::BlogApi;
pub use category::CategoryApi;
pub use comment::{CommentApi, CommentWriteBuilder, MAX_NEWEST_COUNT};
pub use endpoint::EndpointCall;
pub use post::{PostApi, PostWriteBuilder};

use crate::error::{Error, Result};

/// Reject an empty `blogName`.
pub(crate) fn require_blog(blog_name: &str) -> Result<&str> {
    let name = blog_name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("blogName cannot be empty".into()));
    }
    Ok(name)
}

/// Build a response from a canned body.
#[cfg(test)]
pub(crate) fn fixture(
    text: &str,
    format: crate::client::ResponseFormat,
) -> crate::response::TistoryResponse {
    let raw = crate::client::RawResponse {
        status: reqwest::StatusCode::OK,
        headers: reqwest::header::HeaderMap::new(),
        url: url::Url::parse("https://www.tistory.com/apis/").unwrap(),
        text: text.to_owned(),
    };
    crate::response::TistoryResponse::from_raw(raw, format).unwrap()
}
