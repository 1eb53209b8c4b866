//! Comment API.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    api::{require_blog, EndpointCall},
    client::TistoryClientInner,
    error::{Error, Result},
    models::{Comment, CommentId, CommentList, CommentWriteResult, PostId},
    parser::Record,
    response::TistoryResponse,
};

lazy_static! {
    static ref COMMENT_ANCHOR_RE: Regex = Regex::new(r"#comment(\d+)").unwrap();
}

/// Largest `count` accepted by `comment/newest`.
pub const MAX_NEWEST_COUNT: u32 = 10;

/// API for comment operations.
pub struct CommentApi {
    client: Arc<TistoryClientInner>,
}

impl CommentApi {
    pub(crate) fn new(client: Arc<TistoryClientInner>) -> Self {
        Self { client }
    }

    fn call(&self, endpoint: &str) -> EndpointCall {
        EndpointCall::new(self.client.clone()).path(endpoint)
    }

    /// Most recent comments across the blog.
    pub async fn newest(&self, blog_name: &str, page: u32, count: u32) -> Result<Vec<Comment>> {
        let blog = require_blog(blog_name)?;
        if count == 0 || count > MAX_NEWEST_COUNT {
            return Err(Error::InvalidArgument(format!(
                "count must be between 1 and {}",
                MAX_NEWEST_COUNT
            )));
        }

        let response = self
            .call("comment/newest")
            .param("blogName", blog)
            .param("page", page.max(1))
            .param("count", count)
            .send_checked()
            .await?;

        Ok(response
            .records(&["item", "comments", "comment"])
            .iter()
            .map(|r| parse_comment(r, None))
            .collect())
    }

    /// Every comment on a post.
    pub async fn list(&self, blog_name: &str, post_id: impl Into<PostId>) -> Result<CommentList> {
        let blog = require_blog(blog_name)?;
        let post_id: PostId = post_id.into();

        let response = self
            .call("comment/list")
            .param("blogName", blog)
            .param("postId", post_id.checked()?)
            .send_checked()
            .await?;

        Ok(parse_comment_list(&response, &post_id))
    }

    /// Start writing a comment on a post.
    pub fn write(&self, blog_name: &str, post_id: impl Into<PostId>) -> CommentWriteBuilder {
        CommentWriteBuilder::new(self.client.clone(), blog_name, post_id.into(), None)
    }

    /// Start modifying a comment.
    pub fn modify(
        &self,
        blog_name: &str,
        post_id: impl Into<PostId>,
        comment_id: impl Into<CommentId>,
    ) -> CommentWriteBuilder {
        CommentWriteBuilder::new(
            self.client.clone(),
            blog_name,
            post_id.into(),
            Some(comment_id.into()),
        )
    }

    /// Delete a comment.
    pub async fn delete(
        &self,
        blog_name: &str,
        post_id: impl Into<PostId>,
        comment_id: impl Into<CommentId>,
    ) -> Result<()> {
        let blog = require_blog(blog_name)?;
        let post_id: PostId = post_id.into();
        let comment_id: CommentId = comment_id.into();

        self.call("comment/delete")
            .param("blogName", blog)
            .param("postId", post_id.checked()?)
            .param("commentId", comment_id.checked()?)
            .send_checked()
            .await?;
        Ok(())
    }
}

/// Builder for `comment/write` and `comment/modify`.
pub struct CommentWriteBuilder {
    client: Arc<TistoryClientInner>,
    blog_name: String,
    post_id: PostId,
    comment_id: Option<CommentId>,
    parent_id: Option<CommentId>,
    content: String,
    secret: bool,
}

impl CommentWriteBuilder {
    fn new(
        client: Arc<TistoryClientInner>,
        blog_name: &str,
        post_id: PostId,
        comment_id: Option<CommentId>,
    ) -> Self {
        Self {
            client,
            blog_name: blog_name.to_owned(),
            post_id,
            comment_id,
            parent_id: None,
            content: String::new(),
            secret: false,
        }
    }

    /// Set the comment body.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Reply to another comment.
    pub fn parent(mut self, parent_id: impl Into<CommentId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Only the blog owner can read a secret comment.
    pub fn secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    pub(crate) fn prepare(&self) -> Result<EndpointCall> {
        let blog = require_blog(&self.blog_name)?;
        if self.content.trim().is_empty() {
            return Err(Error::InvalidArgument("Comment content cannot be empty".into()));
        }

        let post_id = self.post_id.checked()?;
        let comment_id = self.comment_id.as_ref().map(CommentId::checked).transpose()?;
        let parent_id = self.parent_id.as_ref().map(CommentId::checked).transpose()?;

        let endpoint = if comment_id.is_some() {
            "comment/modify"
        } else {
            "comment/write"
        };

        Ok(EndpointCall::new(self.client.clone())
            .path(endpoint)
            .param("blogName", blog)
            .param("postId", post_id)
            .param_opt("commentId", comment_id)
            .param_opt("parentId", parent_id)
            .param("content", &self.content)
            .param("secret", if self.secret { 1 } else { 0 }))
    }

    /// Execute the request.
    pub async fn send(self) -> Result<CommentWriteResult> {
        let response = self.prepare()?.send_checked().await?;
        let comment_url = response.text(&["commentUrl"]).unwrap_or_default();

        let comment_id = comment_id_from_url(&comment_url).or(self.comment_id);

        Ok(CommentWriteResult {
            comment_url,
            comment_id,
        })
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn comment_id_from_url(url: &str) -> Option<CommentId> {
    COMMENT_ANCHOR_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| CommentId::new(m.as_str()))
}

fn parse_comment_list(response: &TistoryResponse, post_id: &PostId) -> CommentList {
    let item = response.record(&["item"]).unwrap_or_default();
    let post_id = item.opt("postId").map(PostId::new).unwrap_or_else(|| post_id.clone());

    CommentList {
        url: item.string("url"),
        total_count: item.int("totalCount"),
        comments: response
            .records(&["item", "comments", "comment"])
            .iter()
            .map(|r| parse_comment(r, Some(&post_id)))
            .collect(),
        post_id,
    }
}

fn parse_comment(r: &Record, post_id: Option<&PostId>) -> Comment {
    Comment {
        id: r.string("id").into(),
        post_id: r
            .opt("postId")
            .map(PostId::new)
            .or_else(|| post_id.cloned())
            .unwrap_or_default(),
        parent_id: r.opt("parentId").filter(|p| p != "0").map(CommentId::new),
        name: r.string("name"),
        homepage: r.opt("homepage"),
        content: r.string("comment"),
        date: r.datetime("date"),
        is_open: r.bool("open"),
        link: r.string("link"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixture;
    use crate::client::ResponseFormat;
    use crate::TistoryClient;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMMENT_LIST_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<tistory>
  <status>200</status>
  <item>
    <url>http://oauth.tistory.com/4</url>
    <secondaryUrl></secondaryUrl>
    <postId>4</postId>
    <totalCount>3</totalCount>
    <comments>
      <comment>
        <id>8176918</id>
        <date>2011-08-23 10:26:46</date>
        <name>jk</name>
        <parentId></parentId>
        <homepage>http://shiyaz.com</homepage>
        <visibility>2</visibility>
        <comment>좋은 글 감사합니다.</comment>
        <open>Y</open>
        <link>http://oauth.tistory.com/4#comment8176918</link>
      </comment>
      <comment>
        <id>8176926</id>
        <date>2011-08-23 10:30:01</date>
        <name>Tistory API</name>
        <parentId>8176918</parentId>
        <comment>감사합니다</comment>
        <open>N</open>
        <link>http://oauth.tistory.com/4#comment8176926</link>
      </comment>
    </comments>
  </item>
</tistory>"#;

    fn client(server: &MockServer) -> TistoryClient {
        TistoryClient::builder()
            .access_token("secret")
            .base_url(format!("{}/", server.uri()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_comment_list() {
        let list = parse_comment_list(
            &fixture(COMMENT_LIST_XML, ResponseFormat::Xml),
            &PostId::new("4"),
        );

        assert_eq!(list.total_count, 3);
        assert_eq!(list.comments.len(), 2);

        let first = &list.comments[0];
        assert_eq!(first.id.as_str(), "8176918");
        assert_eq!(first.post_id.as_str(), "4");
        assert!(!first.is_reply());
        assert!(first.is_open);
        assert_eq!(first.homepage.as_deref(), Some("http://shiyaz.com"));

        let reply = &list.comments[1];
        assert_eq!(reply.parent_id.as_ref().map(|p| p.as_str()), Some("8176918"));
        assert!(!reply.is_open);
        assert_eq!(reply.homepage, None);
    }

    #[test]
    fn test_comment_id_from_url() {
        assert_eq!(
            comment_id_from_url("http://oauth.tistory.com/4#comment8176926"),
            Some(CommentId::new("8176926"))
        );
        assert_eq!(comment_id_from_url("http://oauth.tistory.com/4"), None);
    }

    #[test]
    fn test_write_requires_content() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();
        let err = client.comments().write("oauth", "4").prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let call = client
            .comments()
            .modify("oauth", "4", "8176926")
            .content("수정")
            .secret(true)
            .prepare()
            .unwrap();
        assert_eq!(call.endpoint(), "comment/modify");
        assert!(call
            .params()
            .contains(&("commentId".to_owned(), "8176926".to_owned())));
        assert!(call.params().contains(&("secret".to_owned(), "1".to_owned())));
    }

    #[test]
    fn test_non_numeric_ids_rejected() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();

        let err = client.comments().write("oauth", "hello-world").content("hi").prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = client
            .comments()
            .write("oauth", "4")
            .parent("#comment8176918")
            .content("hi")
            .prepare()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = client.comments().modify("oauth", "4", "").content("hi").prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_delete_non_numeric_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .comments()
            .delete("oauth", "4", "comment8176926")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = client(&server).comments().list("oauth", "x4").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_newest_count_bounds() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();
        for count in [0, 11] {
            let err = client.comments().newest("oauth", 1, count).await.unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn test_write_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/comment/write"))
            .and(body_string_contains("parentId=8176918"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<tistory><status>200</status><commentUrl>http://oauth.tistory.com/4#comment8176926</commentUrl><result>OK</result></tistory>",
            ))
            .mount(&server)
            .await;

        let result = client(&server)
            .comments()
            .write("oauth", "4")
            .parent("8176918")
            .content("reply")
            .send()
            .await
            .unwrap();
        assert_eq!(result.comment_id, Some(CommentId::new("8176926")));
    }

    #[tokio::test]
    async fn test_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/comment/delete"))
            .and(body_string_contains("commentId=8176926"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<tistory><status>200</status></tistory>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .comments()
            .delete("oauth", "4", "8176926")
            .await
            .unwrap();
    }
}
