//! Object identifiers.
//!
//! The API sends every id as a decimal string (`"403929"`). Ids are kept as
//! text so they go back out exactly as received, and checked with
//! [`PostId::number`] and friends before they are put into a request.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Blank ids are unset.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The id as a number, if it is one.
            pub fn number(&self) -> Option<u64> {
                let digits = self.0.trim();
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                digits.parse().ok()
            }

            /// Trimmed id text, or [`Error::InvalidArgument`] if it is not a number.
            pub(crate) fn checked(&self) -> Result<&str> {
                match self.number() {
                    Some(_) => Ok(self.0.trim()),
                    None => Err(Error::InvalidArgument(format!(
                        concat!($what, " must be numeric, got `{}`"),
                        self.0
                    ))),
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let id = $name(s.trim().to_owned());
                id.checked()?;
                Ok(id)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                $name(n.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

numeric_id!(
    /// Numeric id of a blog, as returned by `blog/info`.
    BlogId,
    "blog id"
);
numeric_id!(
    /// A post number, unique within a blog. It is the last segment of the
    /// post's URL.
    PostId,
    "post id"
);
numeric_id!(
    /// A category id. `0` is the blog's uncategorised bucket.
    CategoryId,
    "category id"
);
numeric_id!(CommentId, "comment id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = PostId::new("74");
        assert_eq!(id.as_str(), "74");
        assert_eq!(format!("{}", id), "74");
        assert_eq!(PostId::from(74u64), id);
    }

    #[test]
    fn test_id_is_empty() {
        assert!(CategoryId::default().is_empty());
        assert!(CategoryId::new(" ").is_empty());
        assert!(!CategoryId::new("0").is_empty());
    }

    #[test]
    fn test_number() {
        assert_eq!(CommentId::new("8176926").number(), Some(8176926));
        assert_eq!(CategoryId::new("0").number(), Some(0));
        assert_eq!(PostId::new(" 74 ").number(), Some(74));
        assert_eq!(PostId::new("+74").number(), None);
        assert_eq!(PostId::new("74abc").number(), None);
        assert_eq!(PostId::default().number(), None);
    }

    #[test]
    fn test_checked_and_from_str() {
        assert_eq!(PostId::new(" 74").checked().unwrap(), "74");
        match PostId::new("latest").checked() {
            Err(Error::InvalidArgument(msg)) => {
                assert_eq!(msg, "post id must be numeric, got `latest`")
            }
            other => panic!("unexpected: {:?}", other),
        }

        assert_eq!("403929".parse::<CategoryId>().unwrap(), CategoryId::new("403929"));
        assert!("".parse::<CommentId>().is_err());
    }

    #[test]
    fn test_serialize_transparent() {
        let id = CommentId::new("8176918");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"8176918\"");
    }
}
