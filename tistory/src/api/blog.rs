//! Blog API.

use std::sync::Arc;

use crate::{
    api::EndpointCall,
    client::TistoryClientInner,
    error::Result,
    models::{Blog, BlogInfo, BlogStatistics},
    parser::Record,
    response::TistoryResponse,
};

/// API for blog information.
pub struct BlogApi {
    client: Arc<TistoryClientInner>,
}

impl BlogApi {
    pub(crate) fn new(client: Arc<TistoryClientInner>) -> Self {
        Self { client }
    }

    /// Account information and every blog the token can access.
    pub async fn info(&self) -> Result<BlogInfo> {
        let response = EndpointCall::new(self.client.clone())
            .path("blog/info")
            .send_checked()
            .await?;

        Ok(parse_blog_info(&response))
    }
}

fn parse_blog_info(response: &TistoryResponse) -> BlogInfo {
    BlogInfo {
        id: response.text(&["item", "id"]).unwrap_or_default(),
        user_id: response.text(&["item", "userId"]).unwrap_or_default(),
        blogs: response
            .records(&["item", "blogs", "blog"])
            .iter()
            .map(parse_blog)
            .collect(),
    }
}

fn parse_blog(r: &Record) -> Blog {
    Blog {
        name: r.string("name"),
        url: r.string("url"),
        secondary_url: r.opt("secondaryUrl"),
        nickname: r.string("nickname"),
        title: r.string("title"),
        description: r.string("description"),
        is_default: r.bool("default"),
        blog_icon_url: r.opt("blogIconUrl"),
        favicon_url: r.opt("faviconUrl"),
        profile_image_url: r.opt("profileImageUrl"),
        role: r.string("role"),
        blog_id: r.string("blogId").into(),
        statistics: BlogStatistics {
            posts: r.int("statistics.post"),
            comments: r.int("statistics.comment"),
            trackbacks: r.int("statistics.trackback"),
            guestbook: r.int("statistics.guestbook"),
            invitations: r.int("statistics.invitation"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixture as response;
    use crate::client::ResponseFormat;

    #[test]
    fn test_parse_blog_info_json() {
        let body = r#"{"tistory":{"status":"200","item":{
            "id":"blogtest_080@naver.com","userId":"12345",
            "blogs":[
              {"name":"oauth-test","url":"http://oauth-test.tistory.com","secondaryUrl":"",
               "nickname":"Tistory API","title":"테스트 블로그","description":"",
               "default":"Y","blogIconUrl":"https://blog_icon_url","faviconUrl":"https://favicon_url",
               "profileImageUrl":"https://profile_image","role":"소유자","blogId":"3247301",
               "statistics":{"post":"182","comment":"146","trackback":"0","guestbook":"0","invitation":"0"}},
              {"name":"oauth2","url":"http://oauth2.tistory.com","default":"N","role":"소유자","blogId":"3247302"}
            ]}}}"#;

        let info = parse_blog_info(&response(body, ResponseFormat::Json));
        assert_eq!(info.user_id, "12345");
        assert_eq!(info.blogs.len(), 2);

        let blog = info.default_blog().unwrap();
        assert_eq!(blog.name, "oauth-test");
        assert_eq!(blog.secondary_url, None);
        assert_eq!(blog.blog_id.as_str(), "3247301");
        assert_eq!(blog.statistics.posts, 182);
        assert_eq!(blog.statistics.comments, 146);
        assert!(!info.blogs[1].is_default);
    }

    #[test]
    fn test_parse_blog_info_xml() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<tistory>
  <status>200</status>
  <item>
    <id>blogtest_080@naver.com</id>
    <userId>12345</userId>
    <blogs>
      <blog>
        <name>oauth-test</name>
        <url>http://oauth-test.tistory.com</url>
        <default>Y</default>
        <blogId>3247301</blogId>
        <statistics><post>182</post><comment>146</comment></statistics>
      </blog>
    </blogs>
  </item>
</tistory>"#;

        let info = parse_blog_info(&response(body, ResponseFormat::Xml));
        assert_eq!(info.id, "blogtest_080@naver.com");
        assert_eq!(info.blogs.len(), 1);
        assert!(info.blogs[0].is_default);
        assert_eq!(info.blogs[0].statistics.comments, 146);
        assert_eq!(info.blogs[0].statistics.guestbook, 0);
    }
}
