//! Data models for Tistory entities.

mod blog;
mod category;
mod comment;
mod ids;
mod post;

pub use blog::{Blog, BlogInfo, BlogStatistics};
pub use category::Category;
pub use comment::{Comment, CommentList, CommentWriteResult};
pub use ids::{BlogId, CategoryId, CommentId, PostId};
pub use post::{Attachment, Post, PostList, PostSummary, PostWriteResult, Visibility, POSTS_PER_PAGE};
