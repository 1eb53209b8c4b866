//! JSON navigation for Tistory responses.

use serde_json::Value;

use crate::error::{Error, Result};

/// Parse a JSON body and unwrap the top-level `tistory` object.
pub fn parse_envelope(text: &str) -> Result<Value> {
    let mut value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;

    match value.get_mut("tistory") {
        Some(inner) => Ok(inner.take()),
        None => Err(Error::missing("tistory")),
    }
}

/// Walk a path of object keys.
///
/// The walk stops at the first array it meets; the remaining segments are
/// treated as element wrappers that only exist in the XML form, so
/// `["item", "posts", "post"]` resolves to the `posts` array.
pub fn walk<'a>(root: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut current = root;

    for segment in path {
        match current {
            Value::Object(map) => match map.get(*segment) {
                Some(next) => current = next,
                None => return vec![],
            },
            Value::Array(_) => break,
            _ => return vec![],
        }
    }

    match current {
        Value::Array(items) => items.iter().collect(),
        Value::Null => vec![],
        other => vec![other],
    }
}

/// Render a scalar as the string the XML form would carry.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_owned()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_unwrapped() {
        let value = parse_envelope(r#"{"tistory":{"status":"200","item":{"url":"x"}}}"#).unwrap();
        assert_eq!(value["status"], "200");

        assert!(matches!(
            parse_envelope(r#"{"status":"200"}"#),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn test_walk_stops_at_array() {
        let value = json!({
            "item": {
                "posts": [{"id": "1"}, {"id": "2"}],
                "url": "http://sample.tistory.com"
            }
        });

        assert_eq!(walk(&value, &["item", "posts", "post"]).len(), 2);
        assert_eq!(walk(&value, &["item", "posts"]).len(), 2);
        assert_eq!(
            walk(&value, &["item", "url"]),
            vec![&json!("http://sample.tistory.com")]
        );
        assert!(walk(&value, &["item", "missing"]).is_empty());
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(200)).as_deref(), Some("200"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }
}
