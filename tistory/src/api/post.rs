//! Post API.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    api::{require_blog, EndpointCall},
    client::TistoryClientInner,
    error::{Error, Result},
    models::{
        Attachment, CategoryId, Post, PostId, PostList, PostSummary, PostWriteResult, Visibility,
    },
    parser::Record,
    response::TistoryResponse,
};

/// Multipart field carrying the uploaded file.
const ATTACH_FIELD: &str = "uploadedfile";

/// API for post operations.
pub struct PostApi {
    client: Arc<TistoryClientInner>,
}

impl PostApi {
    pub(crate) fn new(client: Arc<TistoryClientInner>) -> Self {
        Self { client }
    }

    fn call(&self, endpoint: &str) -> EndpointCall {
        EndpointCall::new(self.client.clone()).path(endpoint)
    }

    /// List posts of a blog, newest first. Pages start at 1.
    pub async fn list(&self, blog_name: &str, page: u32) -> Result<PostList> {
        let blog = require_blog(blog_name)?;
        let response = self
            .call("post/list")
            .param("blogName", blog)
            .param("page", page.max(1))
            .send_checked()
            .await?;

        Ok(parse_post_list(&response))
    }

    /// Read a single post.
    pub async fn read(&self, blog_name: &str, post_id: impl Into<PostId>) -> Result<Post> {
        let blog = require_blog(blog_name)?;
        let post_id: PostId = post_id.into();
        let response = self
            .call("post/read")
            .param("blogName", blog)
            .param("postId", post_id.checked()?)
            .send_checked()
            .await?;

        parse_post(&response)
    }

    /// Start writing a new post.
    pub fn write(&self, blog_name: &str) -> PostWriteBuilder {
        PostWriteBuilder::new(self.client.clone(), blog_name, None)
    }

    /// Start modifying an existing post. Every field is sent again, so set
    /// everything that should be kept.
    pub fn modify(&self, blog_name: &str, post_id: impl Into<PostId>) -> PostWriteBuilder {
        PostWriteBuilder::new(self.client.clone(), blog_name, Some(post_id.into()))
    }

    /// Upload a file for use in post content.
    pub async fn attach(
        &self,
        blog_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment> {
        let blog = require_blog(blog_name)?;
        if bytes.is_empty() {
            return Err(Error::InvalidArgument("Attachment is empty".into()));
        }

        let response = self
            .call("post/attach")
            .param("blogName", blog)
            .send_multipart(ATTACH_FIELD, file_name, bytes)
            .await?;
        response.raise_for_status()?;

        parse_attachment(&response)
    }

    /// Upload a file from disk.
    pub async fn attach_file(&self, blog_name: &str, path: impl AsRef<Path>) -> Result<Attachment> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidArgument(format!("Not a file: {}", path.display())))?
            .to_owned();
        let bytes = tokio::fs::read(path).await?;

        self.attach(blog_name, &file_name, bytes).await
    }
}

/// Builder for `post/write` and `post/modify`.
pub struct PostWriteBuilder {
    client: Arc<TistoryClientInner>,
    blog_name: String,
    post_id: Option<PostId>,
    title: String,
    content: String,
    visibility: Visibility,
    category: Option<CategoryId>,
    published: Option<DateTime<Utc>>,
    slogan: Option<String>,
    tags: Vec<String>,
    accept_comment: bool,
    password: Option<String>,
}

impl PostWriteBuilder {
    fn new(client: Arc<TistoryClientInner>, blog_name: &str, post_id: Option<PostId>) -> Self {
        Self {
            client,
            blog_name: blog_name.to_owned(),
            post_id,
            title: String::new(),
            content: String::new(),
            visibility: Visibility::default(),
            category: None,
            published: None,
            slogan: None,
            tags: Vec::new(),
            accept_comment: true,
            password: None,
        }
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the HTML content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set who can see the post.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Put the post in a category.
    pub fn category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Publication time; a future time schedules the post.
    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published = Some(at);
        self
    }

    /// Set the URL slogan.
    pub fn slogan(mut self, slogan: impl Into<String>) -> Self {
        self.slogan = Some(slogan.into());
        self
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add several tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Allow or refuse comments.
    pub fn accept_comment(mut self, accept: bool) -> Self {
        self.accept_comment = accept;
        self
    }

    /// Password for a protected post.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Endpoint and parameters this builder will send.
    pub(crate) fn prepare(&self) -> Result<EndpointCall> {
        let blog = require_blog(&self.blog_name)?;
        if self.title.trim().is_empty() {
            return Err(Error::InvalidArgument("Post title cannot be empty".into()));
        }

        let post_id = self.post_id.as_ref().map(PostId::checked).transpose()?;
        let category = self.category.as_ref().map(CategoryId::checked).transpose()?;
        let endpoint = if post_id.is_some() {
            "post/modify"
        } else {
            "post/write"
        };

        let tags = (!self.tags.is_empty()).then(|| self.tags.join(","));

        Ok(EndpointCall::new(self.client.clone())
            .path(endpoint)
            .param("blogName", blog)
            .param_opt("postId", post_id)
            .param("title", &self.title)
            .param("content", &self.content)
            .param("visibility", self.visibility.param())
            .param_opt("category", category)
            .param_opt("published", self.published.map(|at| at.timestamp()))
            .param_opt("slogan", self.slogan.as_ref())
            .param_opt("tag", tags)
            .param("acceptComment", if self.accept_comment { 1 } else { 0 })
            .param_opt("password", self.password.as_ref()))
    }

    /// Execute the request.
    pub async fn send(self) -> Result<PostWriteResult> {
        let response = self.prepare()?.send_checked().await?;

        let post_id = response
            .text(&["postId"])
            .filter(|id| !id.is_empty())
            .or_else(|| self.post_id.as_ref().map(|id| id.to_string()))
            .ok_or_else(|| Error::missing("postId"))?;

        Ok(PostWriteResult {
            post_id: post_id.into(),
            url: response.text(&["url"]).unwrap_or_default(),
        })
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_post_list(response: &TistoryResponse) -> PostList {
    let item = response.record(&["item"]).unwrap_or_default();

    PostList {
        url: item.string("url"),
        secondary_url: item.opt("secondaryUrl"),
        page: item.int("page") as u32,
        count: item.int("count") as u32,
        total_count: item.int("totalCount") as u32,
        posts: response
            .records(&["item", "posts", "post"])
            .iter()
            .map(parse_post_summary)
            .collect(),
    }
}

fn parse_post_summary(r: &Record) -> PostSummary {
    PostSummary {
        id: r.string("id").into(),
        title: r.string("title"),
        post_url: r.string("postUrl"),
        visibility: Visibility::from_code(r.int("visibility")).unwrap_or_default(),
        category_id: r.string("categoryId").into(),
        comments: r.int("comments"),
        trackbacks: r.int("trackbacks"),
        date: r.datetime("date"),
    }
}

fn parse_post(response: &TistoryResponse) -> Result<Post> {
    let r = response
        .record(&["item"])
        .ok_or_else(|| Error::missing("item"))?;

    Ok(Post {
        id: r.require("id")?.into(),
        url: r.string("url"),
        title: r.string("title"),
        content: r.string("content"),
        category_id: r.string("categoryId").into(),
        post_url: r.string("postUrl"),
        visibility: Visibility::from_code(r.int("visibility")).unwrap_or_default(),
        accept_comment: r.bool("acceptComment"),
        accept_trackback: r.bool("acceptTrackback"),
        tags: response
            .texts(&["item", "tags", "tag"])
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect(),
        comments: r.int("comments"),
        trackbacks: r.int("trackbacks"),
        date: r.datetime("date"),
    })
}

fn parse_attachment(response: &TistoryResponse) -> Result<Attachment> {
    Ok(Attachment {
        url: response
            .text(&["url"])
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::missing("url"))?,
        replacer: response.text(&["replacer"]).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixture;
    use crate::client::ResponseFormat;
    use crate::TistoryClient;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const POST_LIST_JSON: &str = r#"{"tistory":{"status":"200","item":{
        "url":"http://oauth-test.tistory.com","secondaryUrl":"","page":"1","count":"2","totalCount":"181",
        "posts":[
          {"id":"201","title":"티스토리 OAuth2.0 API 오픈!","postUrl":"http://oauth-test.tistory.com/201",
           "visibility":"20","categoryId":"0","comments":"0","trackbacks":"0","date":"2018-06-01 17:54:28"},
          {"id":"200","title":"임시 글","postUrl":"http://oauth-test.tistory.com/200",
           "visibility":"0","categoryId":"403929","comments":"3","trackbacks":"0","date":"2018-05-30 11:02:00"}
        ]}}}"#;

    const POST_READ_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<tistory>
  <status>200</status>
  <item>
    <url>http://oauth-test.tistory.com</url>
    <secondaryUrl></secondaryUrl>
    <id>201</id>
    <title>티스토리 OAuth2.0 API 오픈!</title>
    <content><![CDATA[<p>안녕하세요 Tistory API 입니다.</p>]]></content>
    <categoryId>0</categoryId>
    <postUrl>http://oauth-test.tistory.com/201</postUrl>
    <visibility>20</visibility>
    <acceptComment>1</acceptComment>
    <acceptTrackback>1</acceptTrackback>
    <tags><tag>open</tag><tag>api</tag></tags>
    <comments>0</comments>
    <trackbacks>0</trackbacks>
    <date>2018-06-01 17:54:28</date>
  </item>
</tistory>"#;

    fn client(server: &MockServer) -> TistoryClient {
        TistoryClient::builder()
            .access_token("secret")
            .format(ResponseFormat::Json)
            .base_url(format!("{}/", server.uri()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_post_list() {
        let list = parse_post_list(&fixture(POST_LIST_JSON, ResponseFormat::Json));

        assert_eq!(list.page, 1);
        assert_eq!(list.total_count, 181);
        assert_eq!(list.secondary_url, None);
        assert_eq!(list.posts.len(), 2);
        assert_eq!(list.posts[0].visibility, Visibility::Public);
        assert_eq!(list.posts[1].visibility, Visibility::Private);
        assert_eq!(list.posts[1].category_id.as_str(), "403929");
        assert_eq!(list.posts[1].comments, 3);
        assert!(list.posts[0].date.is_some());
    }

    #[test]
    fn test_parse_post_read_xml() {
        let post = parse_post(&fixture(POST_READ_XML, ResponseFormat::Xml)).unwrap();

        assert_eq!(post.id.as_str(), "201");
        assert_eq!(post.content, "<p>안녕하세요 Tistory API 입니다.</p>");
        assert_eq!(post.tags, vec!["open".to_owned(), "api".to_owned()]);
        assert!(post.accept_comment);
        assert_eq!(post.visibility, Visibility::Public);
    }

    #[test]
    fn test_parse_post_read_json_single_tag() {
        let body = r#"{"tistory":{"status":"200","item":{"id":"7","title":"t","tags":{"tag":"solo"}}}}"#;
        let post = parse_post(&fixture(body, ResponseFormat::Json)).unwrap();
        assert_eq!(post.tags, vec!["solo".to_owned()]);
        assert_eq!(post.date, None);
    }

    #[test]
    fn test_write_params() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();
        let published = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let call = client
            .posts()
            .write("sample")
            .title("제목")
            .content("<p>본문</p>")
            .visibility(Visibility::Public)
            .category("403929")
            .tags(["rust", "tistory"])
            .published(published)
            .accept_comment(false)
            .prepare()
            .unwrap();

        assert_eq!(call.endpoint(), "post/write");
        let params: Vec<(&str, &str)> = call
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("blogName", "sample"),
                ("title", "제목"),
                ("content", "<p>본문</p>"),
                ("visibility", "3"),
                ("category", "403929"),
                ("published", "1704164645"),
                ("tag", "rust,tistory"),
                ("acceptComment", "0"),
            ]
        );
    }

    #[test]
    fn test_modify_requires_title() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();

        let call = client.posts().modify("sample", "74").title("x").prepare().unwrap();
        assert_eq!(call.endpoint(), "post/modify");
        assert_eq!(call.params()[1], ("postId".to_owned(), "74".to_owned()));

        let err = client.posts().modify("sample", "74").prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = client.posts().write(" ").title("x").prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_non_numeric_ids_rejected() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();

        let err = client.posts().modify("sample", "first-post").title("x").prepare().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = client
            .posts()
            .write("sample")
            .title("x")
            .category("rust")
            .prepare()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let call = client.posts().modify("sample", " 74 ").title("x").prepare().unwrap();
        assert_eq!(call.params()[1], ("postId".to_owned(), "74".to_owned()));
    }

    #[tokio::test]
    async fn test_read_non_numeric_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .posts()
            .read("oauth-test", "about")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_list_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/post/list"))
            .and(body_string_contains("page=2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(POST_LIST_JSON))
            .mount(&server)
            .await;

        let list = client(&server).posts().list("oauth-test", 2).await.unwrap();
        assert_eq!(list.posts.len(), 2);
    }

    #[tokio::test]
    async fn test_read_missing_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/post/read"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"tistory":{"status":"400","error_message":"글이 존재하지 않 거나 권한이 없습니다."}}"#,
            ))
            .mount(&server)
            .await;

        let err = client(&server)
            .posts()
            .read("oauth-test", "999")
            .await
            .unwrap_err();
        match err {
            Error::Api { kind, .. } => {
                assert_eq!(kind, crate::error::ApiErrorKind::DoesNotExistOrUnauthorized)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_returns_post_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/post/write"))
            .and(body_string_contains("title=hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"tistory":{"status":"200","postId":"74","url":"http://sampleUrl.tistory.com/74"}}"#,
            ))
            .mount(&server)
            .await;

        let result = client(&server)
            .posts()
            .write("sampleUrl")
            .title("hello")
            .send()
            .await
            .unwrap();
        assert_eq!(result.post_id.as_str(), "74");
        assert_eq!(result.url, "http://sampleUrl.tistory.com/74");
    }

    #[tokio::test]
    async fn test_attach_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apis/post/attach"))
            .and(body_string_contains("name=\"uploadedfile\"; filename=\"cat.png\""))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"tistory":{"status":"200","url":"http://cfile6.uf.tistory.com/image/1328CE504DB79F5932DA4E","replacer":"[##_1N|cfile6.uf@1328CE504DB79F5932DA4E|width=\"500\" height=\"300\"|_##]"}}"#,
            ))
            .mount(&server)
            .await;

        let attachment = client(&server)
            .posts()
            .attach("sample", "cat.png", b"GIF89a".to_vec())
            .await
            .unwrap();
        assert!(attachment.url.starts_with("http://cfile6.uf.tistory.com/"));
        assert!(attachment.replacer.starts_with("[##_1N|"));
    }

    #[tokio::test]
    async fn test_attach_empty_file() {
        let client = TistoryClient::builder().access_token("t").build().unwrap();
        let err = client.posts().attach("sample", "a.png", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
