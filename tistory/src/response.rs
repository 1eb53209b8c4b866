//! Parsed API responses.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::client::{RawResponse, ResponseFormat};
use crate::error::{Error, Result};
use crate::parser::json::{self, scalar_text};
use crate::parser::xml::parse_int;
use crate::parser::{Record, XmlDocument};

/// Root element of every XML response.
const XML_ROOT: &str = "tistory";

/// Response body in the requested format.
#[derive(Debug)]
pub enum Payload {
    /// `output=xml`
    Xml(XmlDocument),
    /// `output=json`, with the `tistory` envelope removed.
    Json(Value),
}

/// A response from the Tistory API.
///
/// Behaves the same way regardless of the requested format: values are
/// addressed by a path of element/key names below the `tistory` root.
#[derive(Debug)]
pub struct TistoryResponse {
    format: ResponseFormat,
    payload: Payload,
    http_status: StatusCode,
    headers: HeaderMap,
    url: Url,
}

impl TistoryResponse {
    /// Parse a raw HTTP response in the given format.
    ///
    /// A body that cannot be parsed on a non-success HTTP status is reported
    /// as [`Error::Http`].
    pub fn from_raw(raw: RawResponse, format: ResponseFormat) -> Result<Self> {
        let parsed = match format {
            ResponseFormat::Xml => XmlDocument::parse(&raw.text).map(Payload::Xml),
            ResponseFormat::Json => json::parse_envelope(&raw.text).map(Payload::Json),
        };

        let payload = match parsed {
            Ok(payload) => payload,
            Err(_) if !raw.status.is_success() => return Err(raw.http_error()),
            Err(e) => return Err(e),
        };

        Ok(Self {
            format,
            payload,
            http_status: raw.status,
            headers: raw.headers,
            url: raw.url,
        })
    }

    /// Requested format.
    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Parsed body.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// HTTP status of the response.
    pub fn http_status(&self) -> StatusCode {
        self.http_status
    }

    /// HTTP response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// URL the request was sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Status code reported by the API in the body.
    pub fn status_code(&self) -> Result<i64> {
        let status = self
            .text(&["status"])
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::missing("status"))?;
        parse_int(&status)
    }

    /// Fail with [`Error::Api`] unless the API reported status 200.
    pub fn raise_for_status(&self) -> Result<()> {
        let status = self.status_code()?;
        if status == 200 {
            return Ok(());
        }

        let message = self.text(&["error_message"]).unwrap_or_default();
        log::debug!("API error {} from {}: {}", status, self.url.path(), message);
        Err(Error::api(status, message))
    }

    /// First text value at a path.
    pub fn text(&self, path: &[&str]) -> Option<String> {
        self.texts(path).into_iter().next()
    }

    /// Every text value at a path.
    pub fn texts(&self, path: &[&str]) -> Vec<String> {
        match &self.payload {
            Payload::Xml(doc) => doc
                .select(&xpath(path))
                .map(|nodes| nodes.iter().map(|n| n.text()).collect())
                .unwrap_or_default(),
            Payload::Json(value) => json::walk(value, path)
                .into_iter()
                .filter_map(scalar_text)
                .collect(),
        }
    }

    /// Record at a path, if present.
    pub fn record(&self, path: &[&str]) -> Option<Record> {
        self.records(path).into_iter().next()
    }

    /// Every record at a path.
    pub fn records(&self, path: &[&str]) -> Vec<Record> {
        match &self.payload {
            Payload::Xml(doc) => doc
                .select(&xpath(path))
                .map(|nodes| nodes.iter().map(Record::from_xml).collect())
                .unwrap_or_default(),
            Payload::Json(value) => json::walk(value, path)
                .into_iter()
                .map(Record::from_json)
                .collect(),
        }
    }

    /// Body re-rendered as a string: pretty JSON, or the XML text of the root.
    pub fn to_pretty_string(&self) -> String {
        match &self.payload {
            Payload::Json(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
            Payload::Xml(doc) => {
                let mut out = String::new();
                if let Some(root) = doc.root() {
                    render_xml(&root, 0, &mut out);
                }
                out
            }
        }
    }
}

fn xpath(path: &[&str]) -> String {
    let mut expr = format!("/{}", XML_ROOT);
    for segment in path {
        expr.push('/');
        expr.push_str(segment);
    }
    expr
}

fn render_xml(node: &crate::parser::XmlNode<'_>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let children = node.children();
    if children.is_empty() {
        out.push_str(&format!(
            "{}{}: {}\n",
            indent,
            node.name(),
            node.text().trim()
        ));
    } else {
        out.push_str(&format!("{}{}:\n", indent, node.name()));
        for child in children {
            render_xml(&child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;

    fn raw(status: u16, text: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            url: Url::parse("https://www.tistory.com/apis/post/list").unwrap(),
            text: text.to_owned(),
        }
    }

    const POST_LIST_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<tistory>
  <status>200</status>
  <item>
    <url>http://oauth-test.tistory.com</url>
    <page>1</page>
    <totalCount>2</totalCount>
    <posts>
      <post><id>201</id><title>첫 글</title></post>
      <post><id>202</id><title>둘째 글</title></post>
    </posts>
  </item>
</tistory>"#;

    const POST_LIST_JSON: &str = r#"{"tistory":{"status":"200","item":{
        "url":"http://oauth-test.tistory.com","page":"1","totalCount":"2",
        "posts":[{"id":"201","title":"첫 글"},{"id":"202","title":"둘째 글"}]}}}"#;

    #[test]
    fn test_same_paths_for_both_formats() {
        let xml = TistoryResponse::from_raw(raw(200, POST_LIST_XML), ResponseFormat::Xml).unwrap();
        let json = TistoryResponse::from_raw(raw(200, POST_LIST_JSON), ResponseFormat::Json).unwrap();

        for response in [&xml, &json] {
            assert_eq!(response.status_code().unwrap(), 200);
            assert!(response.raise_for_status().is_ok());
            assert_eq!(
                response.text(&["item", "url"]).as_deref(),
                Some("http://oauth-test.tistory.com")
            );

            let posts = response.records(&["item", "posts", "post"]);
            assert_eq!(posts.len(), 2);
            assert_eq!(posts[1].string("title"), "둘째 글");
        }
    }

    #[test]
    fn test_raise_for_status_json() {
        let body = r#"{"tistory":{"status":"400","error_message":"블로그 정보가 없습니다."}}"#;
        let response = TistoryResponse::from_raw(raw(400, body), ResponseFormat::Json).unwrap();

        match response.raise_for_status() {
            Err(Error::Api { status, kind, message }) => {
                assert_eq!(status, 400);
                assert_eq!(kind, ApiErrorKind::DoesNotExist);
                assert_eq!(message, "블로그 정보가 없습니다.");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_raise_for_status_xml() {
        let body = "<tistory><status>401</status><error_message>access_token 이 유효하지 않습니다.</error_message></tistory>";
        let response = TistoryResponse::from_raw(raw(401, body), ResponseFormat::Xml).unwrap();
        let err = response.raise_for_status().unwrap_err();
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_unparseable_error_page() {
        let err = TistoryResponse::from_raw(raw(502, "<html>Bad Gateway"), ResponseFormat::Xml)
            .unwrap_err();
        assert!(matches!(err, Error::Http { status: 502, .. }));

        let err = TistoryResponse::from_raw(raw(200, "not json"), ResponseFormat::Json)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_numeric_json_status() {
        let body = r#"{"tistory":{"status":200}}"#;
        let response = TistoryResponse::from_raw(raw(200, body), ResponseFormat::Json).unwrap();
        assert_eq!(response.status_code().unwrap(), 200);
    }

    #[test]
    fn test_blank_status_is_missing() {
        let xml = raw(200, "<tistory><status/></tistory>");
        let xml = TistoryResponse::from_raw(xml, ResponseFormat::Xml).unwrap();
        let json = raw(200, r#"{"tistory":{"status":""}}"#);
        let json = TistoryResponse::from_raw(json, ResponseFormat::Json).unwrap();

        for response in [&xml, &json] {
            match response.status_code() {
                Err(Error::MissingField(field)) => assert_eq!(field, "status"),
                other => panic!("unexpected: {:?}", other),
            }
            assert!(matches!(response.raise_for_status(), Err(Error::MissingField(_))));
        }

        let absent = TistoryResponse::from_raw(raw(200, "<tistory/>"), ResponseFormat::Xml).unwrap();
        assert!(matches!(absent.status_code(), Err(Error::MissingField(_))));
    }

    #[test]
    fn test_pretty_xml() {
        let response =
            TistoryResponse::from_raw(raw(200, POST_LIST_XML), ResponseFormat::Xml).unwrap();
        let text = response.to_pretty_string();
        assert!(text.starts_with("tistory:\n  status: 200\n"));
        assert!(text.contains("      post:\n        id: 201\n"));
    }
}
