//! Parsers for Tistory responses and web pages.

pub mod html;
pub mod json;
pub mod record;
pub mod xml;

pub use html::{HtmlForm, HtmlPage};
pub use record::{parse_datetime, Record, DATE_FORMAT};
pub use xml::{XmlDocument, XmlNode};
