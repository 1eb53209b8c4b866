//! Comment models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CommentId, PostId};

/// A comment on a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id.
    pub id: CommentId,
    /// Post the comment belongs to.
    pub post_id: PostId,
    /// Parent comment for replies.
    pub parent_id: Option<CommentId>,
    /// Author name.
    pub name: String,
    /// Author homepage.
    pub homepage: Option<String>,
    /// Comment body.
    pub content: String,
    /// Time of writing.
    pub date: Option<NaiveDateTime>,
    /// Whether the comment is public (`open=Y`).
    pub is_open: bool,
    /// Permalink.
    pub link: String,
}

impl Comment {
    /// Whether this comment replies to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Comments of one post, from `comment/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentList {
    /// Blog URL.
    pub url: String,
    /// Post the comments belong to.
    pub post_id: PostId,
    /// Total comment count.
    pub total_count: i64,
    /// Comments in API order.
    pub comments: Vec<Comment>,
}

/// Result of writing or modifying a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentWriteResult {
    /// Permalink of the comment.
    pub comment_url: String,
    /// Id of the comment, when returned.
    pub comment_id: Option<CommentId>,
}
