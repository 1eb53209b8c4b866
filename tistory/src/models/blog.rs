//! Blog models.

use serde::{Deserialize, Serialize};

use super::BlogId;

/// Result of `blog/info`: the account and every blog it can access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogInfo {
    /// Account id (e-mail).
    pub id: String,
    /// Numeric user id.
    pub user_id: String,
    /// Blogs owned by or shared with the account.
    pub blogs: Vec<Blog>,
}

impl BlogInfo {
    /// The blog marked as default, if any.
    pub fn default_blog(&self) -> Option<&Blog> {
        self.blogs.iter().find(|b| b.is_default)
    }
}

/// A blog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blog {
    /// Blog name, the `xxx` of `xxx.tistory.com`. Used as `blogName`.
    pub name: String,
    /// Blog URL.
    pub url: String,
    /// Custom domain URL.
    pub secondary_url: Option<String>,
    /// Owner nickname.
    pub nickname: String,
    /// Blog title.
    pub title: String,
    /// Blog description.
    pub description: String,
    /// Whether this is the account's default blog.
    pub is_default: bool,
    /// Blog icon URL.
    pub blog_icon_url: Option<String>,
    /// Favicon URL.
    pub favicon_url: Option<String>,
    /// Profile image URL.
    pub profile_image_url: Option<String>,
    /// Account role on this blog (owner, editor, ...).
    pub role: String,
    /// Numeric blog id.
    pub blog_id: BlogId,
    /// Counters.
    pub statistics: BlogStatistics,
}

/// Blog counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStatistics {
    pub posts: i64,
    pub comments: i64,
    pub trackbacks: i64,
    pub guestbook: i64,
    pub invitations: i64,
}
