//! Category API.

use std::sync::Arc;

use crate::{
    api::{require_blog, EndpointCall},
    client::TistoryClientInner,
    error::Result,
    models::Category,
    parser::Record,
    response::TistoryResponse,
};

/// API for blog categories.
pub struct CategoryApi {
    client: Arc<TistoryClientInner>,
}

impl CategoryApi {
    pub(crate) fn new(client: Arc<TistoryClientInner>) -> Self {
        Self { client }
    }

    /// List every category of a blog, parents before their children.
    pub async fn list(&self, blog_name: &str) -> Result<Vec<Category>> {
        let blog = require_blog(blog_name)?;
        let response = EndpointCall::new(self.client.clone())
            .path("category/list")
            .param("blogName", blog)
            .send_checked()
            .await?;

        Ok(parse_categories(&response))
    }
}

fn parse_categories(response: &TistoryResponse) -> Vec<Category> {
    response
        .records(&["item", "categories", "category"])
        .iter()
        .map(parse_category)
        .collect()
}

fn parse_category(r: &Record) -> Category {
    Category {
        id: r.string("id").into(),
        name: r.string("name"),
        parent: r.opt("parent").filter(|p| p != "0").map(Into::into),
        label: r.string("label"),
        entries: r.int("entries"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixture;
    use crate::client::ResponseFormat;

    #[test]
    fn test_parse_categories_xml() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<tistory>
  <status>200</status>
  <item>
    <url>oauth</url>
    <secondaryUrl></secondaryUrl>
    <categories>
      <category><id>403929</id><name>OAuth2.0 Athentication</name><parent></parent><label>OAuth2.0 Athentication</label><entries>0</entries></category>
      <category><id>403930</id><name>Blog API Series</name><parent>403929</parent><label>OAuth2.0 Athentication/Blog API Series</label><entries>12</entries></category>
    </categories>
  </item>
</tistory>"#;

        let categories = parse_categories(&fixture(body, ResponseFormat::Xml));
        assert_eq!(categories.len(), 2);
        assert!(categories[0].is_top_level());
        assert_eq!(categories[1].parent.as_ref().map(|p| p.as_str()), Some("403929"));
        assert_eq!(categories[1].label, "OAuth2.0 Athentication/Blog API Series");
        assert_eq!(categories[1].entries, 12);
    }

    #[test]
    fn test_parse_categories_empty_json() {
        let body = r#"{"tistory":{"status":"200","item":{"url":"oauth","categories":[]}}}"#;
        assert!(parse_categories(&fixture(body, ResponseFormat::Json)).is_empty());
    }
}
