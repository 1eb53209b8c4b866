//! Post models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CategoryId, PostId};

/// Page size of `post/list`.
pub const POSTS_PER_PAGE: u32 = 10;

/// Who can see a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Only the author.
    #[default]
    Private,
    /// Password protected.
    Protected,
    /// Published.
    Public,
}

impl Visibility {
    /// Value sent in `post/write` and `post/modify`.
    pub fn param(&self) -> &'static str {
        match self {
            Visibility::Private => "0",
            Visibility::Protected => "1",
            Visibility::Public => "3",
        }
    }

    /// Parse a visibility code. Write calls use 0/1/3, read calls
    /// report 0/15/20.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Visibility::Private),
            1 | 15 => Some(Visibility::Protected),
            3 | 20 => Some(Visibility::Public),
            _ => None,
        }
    }
}

/// A post as it appears in `post/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSummary {
    /// Post id.
    pub id: PostId,
    /// Title.
    pub title: String,
    /// Permalink.
    pub post_url: String,
    /// Visibility.
    pub visibility: Visibility,
    /// Category, `0` when uncategorised.
    pub category_id: CategoryId,
    /// Comment count.
    pub comments: i64,
    /// Trackback count.
    pub trackbacks: i64,
    /// Publication time.
    pub date: Option<NaiveDateTime>,
}

/// A page of posts from `post/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostList {
    /// Blog URL.
    pub url: String,
    /// Custom domain URL.
    pub secondary_url: Option<String>,
    /// Current page.
    pub page: u32,
    /// Posts on this page.
    pub count: u32,
    /// Total posts in the blog.
    pub total_count: u32,
    /// Posts on this page.
    pub posts: Vec<PostSummary>,
}

impl PostList {
    /// Number of pages at the API's fixed page size.
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            return 1;
        }
        self.total_count.div_ceil(POSTS_PER_PAGE)
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// A full post from `post/read`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    /// Post id.
    pub id: PostId,
    /// Blog URL.
    pub url: String,
    /// Title.
    pub title: String,
    /// HTML content.
    pub content: String,
    /// Category, `0` when uncategorised.
    pub category_id: CategoryId,
    /// Permalink.
    pub post_url: String,
    /// Visibility.
    pub visibility: Visibility,
    /// Whether comments are accepted.
    pub accept_comment: bool,
    /// Whether trackbacks are accepted.
    pub accept_trackback: bool,
    /// Tags.
    pub tags: Vec<String>,
    /// Comment count.
    pub comments: i64,
    /// Trackback count.
    pub trackbacks: i64,
    /// Publication time.
    pub date: Option<NaiveDateTime>,
}

/// Result of `post/write` and `post/modify`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostWriteResult {
    /// Post id.
    pub post_id: PostId,
    /// Permalink.
    pub url: String,
}

/// An uploaded file from `post/attach`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attachment {
    /// Public URL of the file.
    pub url: String,
    /// Substitution tag to embed the file in post content.
    pub replacer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_codes() {
        assert_eq!(Visibility::from_code(0), Some(Visibility::Private));
        assert_eq!(Visibility::from_code(15), Some(Visibility::Protected));
        assert_eq!(Visibility::from_code(20), Some(Visibility::Public));
        assert_eq!(Visibility::from_code(3), Some(Visibility::Public));
        assert_eq!(Visibility::from_code(7), None);
        assert_eq!(Visibility::Public.param(), "3");
    }

    #[test]
    fn test_total_pages() {
        let list = PostList {
            page: 1,
            count: 10,
            total_count: 181,
            ..Default::default()
        };
        assert_eq!(list.total_pages(), 19);
        assert!(list.has_next());

        let last = PostList {
            page: 19,
            count: 1,
            ..list
        };
        assert!(!last.has_next());

        let empty = PostList::default();
        assert_eq!(empty.total_pages(), 1);
    }
}
