//! Flat field records shared by the XML and JSON payloads.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::json::scalar_text;
use super::xml::{parse_int, XmlNode};
use crate::error::{Error, Result};

/// Date format used throughout the Tistory API.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A flat map of field name to text value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(HashMap<String, String>);

impl Record {
    /// Build a record from an XML element.
    pub fn from_xml(node: &XmlNode<'_>) -> Self {
        Record(node.fields())
    }

    /// Build a record from a JSON value. Scalars become a record with an
    /// empty key; nested objects are flattened with dotted keys.
    pub fn from_json(value: &Value) -> Self {
        let mut map = HashMap::new();
        match value {
            Value::Object(_) => flatten_json(value, "", &mut map),
            other => {
                if let Some(text) = scalar_text(other) {
                    map.insert(String::new(), text);
                }
            }
        }
        Record(map)
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Field as an owned string, empty when missing.
    pub fn string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_owned()
    }

    /// Field as a non-empty string.
    pub fn opt(&self, key: &str) -> Option<String> {
        self.get(key).filter(|s| !s.is_empty()).map(str::to_owned)
    }

    /// Required non-empty field.
    pub fn require(&self, key: &str) -> Result<String> {
        self.opt(key).ok_or_else(|| Error::missing(key))
    }

    /// Field as an integer, 0 when missing or malformed.
    pub fn int(&self, key: &str) -> i64 {
        self.get(key).and_then(|s| parse_int(s).ok()).unwrap_or(0)
    }

    /// Field as a boolean (`1`, `true` or `Y`).
    pub fn bool(&self, key: &str) -> bool {
        matches!(
            self.get(key).map(|s| s.trim().to_lowercase()).as_deref(),
            Some("1") | Some("true") | Some("y")
        )
    }

    /// Field as a date in the API's `YYYY-MM-DD hh:mm:ss` form.
    pub fn datetime(&self, key: &str) -> Option<NaiveDateTime> {
        self.get(key).and_then(parse_datetime)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for Record {
    fn from(map: HashMap<String, String>) -> Self {
        Record(map)
    }
}

fn flatten_json(value: &Value, prefix: &str, map: &mut HashMap<String, String>) {
    if let Value::Object(obj) = value {
        for (key, child) in obj {
            let full = format!("{}{}", prefix, key);
            match child {
                Value::Object(_) => flatten_json(child, &format!("{}.", full), map),
                Value::Array(_) => {}
                scalar => {
                    if let Some(text) = scalar_text(scalar) {
                        map.insert(full, text);
                    }
                }
            }
        }
    }
}

/// Parse an API date string.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT).ok()
}
