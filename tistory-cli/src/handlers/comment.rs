//! Comment handlers.

use anyhow::Result;
use colored::Colorize;
use rust_i18n::t;
use serde::Serialize;
use tistory::models::Comment;
use tistory::TistoryClient;

use crate::output::{format_time, truncate, PlainPrint, TableRow};

/// Comment information.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub content: String,
    pub is_open: bool,
    pub date: String,
    pub link: String,
}

impl From<&Comment> for CommentRow {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id.to_string(),
            post_id: c.post_id.to_string(),
            parent_id: c.parent_id.as_ref().map(|p| p.to_string()),
            name: c.name.clone(),
            content: c.content.clone(),
            is_open: c.is_open,
            date: format_time(c.date),
            link: c.link.clone(),
        }
    }
}

impl TableRow for CommentRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Post", "Author", "Comment", "Date"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.post_id.clone(),
            self.name.clone(),
            truncate(&self.content, 50),
            self.date.clone(),
        ]
    }
}

impl PlainPrint for CommentRow {
    fn plain_print(&self) {
        let indent = if self.parent_id.is_some() { "   ↳ " } else { "" };
        let secret = if self.is_open {
            String::new()
        } else {
            format!(" {}", t!("secret_label")).red().to_string()
        };
        println!(
            "{}{} {} {}{}",
            indent,
            format!("[{}]", self.id).cyan(),
            self.name.green(),
            self.date.dimmed(),
            secret
        );
        for line in self.content.lines() {
            if !line.trim().is_empty() {
                println!("{}   {}", indent, line);
            }
        }
    }
}

/// Comments on one post.
#[derive(Debug, Clone, Serialize)]
pub struct CommentListResult {
    pub post_id: String,
    pub url: String,
    pub total_count: i64,
    pub comments: Vec<CommentRow>,
}

/// Result of writing or modifying a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWriteInfo {
    pub comment_id: Option<String>,
    pub comment_url: String,
}

impl PlainPrint for CommentWriteInfo {
    fn plain_print(&self) {
        println!("{}", t!("comment_saved", url = &self.comment_url).to_string().green());
    }
}

/// Newest comments across a blog.
pub async fn newest(
    client: &TistoryClient,
    blog: &str,
    page: u32,
    count: u32,
) -> Result<Vec<CommentRow>> {
    let comments = client.comments().newest(blog, page, count).await?;
    Ok(comments.iter().map(CommentRow::from).collect())
}

/// All comments on a post.
pub async fn list(client: &TistoryClient, blog: &str, post_id: &str) -> Result<CommentListResult> {
    let list = client.comments().list(blog, post_id).await?;
    Ok(CommentListResult {
        post_id: list.post_id.to_string(),
        url: list.url.clone(),
        total_count: list.total_count,
        comments: list.comments.iter().map(CommentRow::from).collect(),
    })
}

/// Write a comment, or modify `comment_id` when given.
pub async fn write(
    client: &TistoryClient,
    blog: &str,
    post_id: &str,
    comment_id: Option<&str>,
    content: &str,
    parent: Option<&str>,
    secret: bool,
) -> Result<CommentWriteInfo> {
    let mut builder = match comment_id {
        Some(id) => client.comments().modify(blog, post_id, id),
        None => client.comments().write(blog, post_id),
    };
    builder = builder.content(content).secret(secret);
    if let Some(parent) = parent {
        builder = builder.parent(parent);
    }

    let result = builder.send().await?;
    Ok(CommentWriteInfo {
        comment_id: result.comment_id.map(|id| id.to_string()),
        comment_url: result.comment_url,
    })
}

/// Delete a comment.
pub async fn delete(
    client: &TistoryClient,
    blog: &str,
    post_id: &str,
    comment_id: &str,
) -> Result<()> {
    client.comments().delete(blog, post_id, comment_id).await?;
    Ok(())
}
