//! XML parsing for Tistory responses.

use crate::error::{Error, Result};
use std::collections::HashMap;
use sxd_document::dom::{ChildOfElement, Element};
use sxd_document::parser;
use sxd_xpath::{nodeset::Node, Context, Factory, Value};

/// Wrapper around an XML document providing convenient access methods.
pub struct XmlDocument {
    package: sxd_document::Package,
}

impl std::fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlDocument")
            .field("root", &self.root_name())
            .finish()
    }
}

impl XmlDocument {
    /// Parse XML text into a document.
    pub fn parse(xml: &str) -> Result<Self> {
        let xml = xml.trim_start_matches('\u{feff}').trim_start();
        let package = parser::parse(xml).map_err(|e| Error::Xml(e.to_string()))?;
        Ok(Self { package })
    }

    /// Get the root document.
    fn doc(&self) -> sxd_document::dom::Document<'_> {
        self.package.as_document()
    }

    /// Name of the root element, if any.
    pub fn root_name(&self) -> Option<String> {
        self.root().map(|n| n.name().to_owned())
    }

    /// The root element.
    pub fn root(&self) -> Option<XmlNode<'_>> {
        self.doc().root().children().into_iter().find_map(|c| match c {
            sxd_document::dom::ChildOfRoot::Element(e) => Some(XmlNode(Node::Element(e))),
            _ => None,
        })
    }

    /// Select all nodes matching an XPath expression.
    pub fn select(&self, expr: &str) -> Result<Vec<XmlNode<'_>>> {
        let factory = Factory::new();
        let xpath = factory
            .build(expr)
            .map_err(|e| Error::XPath(e.to_string()))?
            .ok_or_else(|| Error::XPath("Empty XPath".into()))?;

        let context = Context::new();
        let value = xpath
            .evaluate(&context, self.doc().root())
            .map_err(|e| Error::XPath(e.to_string()))?;

        match value {
            Value::Nodeset(ns) => Ok(ns.document_order().into_iter().map(XmlNode).collect()),
            _ => Ok(vec![]),
        }
    }
}

/// An element or text node in a response document.
#[derive(Clone, Copy)]
pub struct XmlNode<'a>(Node<'a>);

impl<'a> XmlNode<'a> {
    /// Attributes and child element text as a flat map.
    ///
    /// Elements that have element children of their own are flattened with a
    /// dotted key, so `<statistics><post>3</post></statistics>` becomes
    /// `statistics.post = 3`.
    pub fn fields(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(e) = self.as_element() {
            collect_fields(e, "", &mut map);
        }
        map
    }

    /// Get text content.
    pub fn text(&self) -> String {
        match self.0 {
            Node::Text(t) => t.text().to_owned(),
            Node::Element(e) => e
                .children()
                .iter()
                .filter_map(|c| {
                    if let ChildOfElement::Text(t) = c {
                        Some(t.text())
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
                .join(""),
            _ => String::new(),
        }
    }

    /// Get element name.
    pub fn name(&self) -> &str {
        self.as_element()
            .map(|e| e.name().local_part())
            .unwrap_or("")
    }

    /// Get as element.
    fn as_element(&self) -> Option<Element<'a>> {
        match self.0 {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Select child nodes.
    pub fn children(&self) -> Vec<XmlNode<'a>> {
        self.as_element()
            .map(|e| {
                e.children()
                    .iter()
                    .filter_map(|c| match c {
                        ChildOfElement::Element(el) => Some(XmlNode(Node::Element(*el))),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn collect_fields(element: Element<'_>, prefix: &str, map: &mut HashMap<String, String>) {
    for attr in element.attributes() {
        map.insert(
            format!("{}{}", prefix, attr.name().local_part()),
            attr.value().to_owned(),
        );
    }

    for child in element.children() {
        if let ChildOfElement::Element(child_el) = child {
            let key = format!("{}{}", prefix, child_el.name().local_part());
            let node = XmlNode(Node::Element(child_el));
            if node.children().is_empty() {
                map.insert(key, node.text());
            } else {
                collect_fields(child_el, &format!("{}.", key), map);
            }
        }
    }
}

/// Parse integer.
pub(crate) fn parse_int(s: &str) -> Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    if s.contains('e') || s.contains('E') || s.contains('.') {
        let f: f64 = s
            .parse()
            .map_err(|_| Error::parse(format!("Invalid number: {}", s)))?;
        return Ok(f as i64);
    }

    s.parse()
        .map_err(|_| Error::parse(format!("Invalid integer: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("123").unwrap(), 123);
        assert_eq!(parse_int("-456").unwrap(), -456);
        assert_eq!(parse_int("1.5e9").unwrap(), 1500000000);
        assert_eq!(parse_int("123.45").unwrap(), 123);
        assert_eq!(parse_int("").unwrap(), 0);
        assert!(parse_int("abc").is_err());
    }

    #[test]
    fn test_xml_parse() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?><tistory><status>200</status><item id="1"/></tistory>"#;
        let doc = XmlDocument::parse(xml).unwrap();

        assert_eq!(doc.root_name().as_deref(), Some("tistory"));
        let status = doc.select("/tistory/status").unwrap();
        assert_eq!(status[0].text(), "200");

        let items = doc.select("/tistory/item").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].fields().get("id").map(String::as_str), Some("1"));
        assert!(doc.select("/tistory/missing").unwrap().is_empty());
    }

    #[test]
    fn test_fields_flatten_nested() {
        let xml = r#"<blog><name>sample</name><statistics><post>3</post><comment>7</comment></statistics></blog>"#;
        let doc = XmlDocument::parse(xml).unwrap();
        let fields = doc.root().unwrap().fields();

        assert_eq!(fields.get("name").map(String::as_str), Some("sample"));
        assert_eq!(fields.get("statistics.post").map(String::as_str), Some("3"));
        assert_eq!(fields.get("statistics.comment").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_cdata_content() {
        let xml = "<item><content><![CDATA[<p>hello & bye</p>]]></content></item>";
        let doc = XmlDocument::parse(xml).unwrap();
        let content = doc.select("/item/content").unwrap();
        assert_eq!(content[0].text(), "<p>hello & bye</p>");
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(XmlDocument::parse("<tistory>"), Err(Error::Xml(_))));
    }
}
