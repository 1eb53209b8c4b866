//! Post handlers.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use colored::Colorize;
use rust_i18n::t;
use serde::Serialize;
use std::path::Path;
use tistory::models::*;
use tistory::parser::parse_datetime;
use tistory::TistoryClient;

use crate::output::{format_time, truncate, PlainPrint, TableRow};

fn visibility_label(v: Visibility) -> &'static str {
    match v {
        Visibility::Private => "private",
        Visibility::Protected => "protected",
        Visibility::Public => "public",
    }
}

/// Post list entry.
#[derive(Debug, Clone, Serialize)]
pub struct PostRow {
    pub id: String,
    pub title: String,
    pub post_url: String,
    pub visibility: Visibility,
    pub category_id: String,
    pub comments: i64,
    pub date: String,
}

impl From<&PostSummary> for PostRow {
    fn from(p: &PostSummary) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title.clone(),
            post_url: p.post_url.clone(),
            visibility: p.visibility,
            category_id: p.category_id.to_string(),
            comments: p.comments,
            date: format_time(p.date),
        }
    }
}

impl TableRow for PostRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Visibility", "Comments", "Date"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            truncate(&self.title, 40),
            visibility_label(self.visibility).to_string(),
            self.comments.to_string(),
            self.date.clone(),
        ]
    }
}

impl PlainPrint for PostRow {
    fn plain_print(&self) {
        let title = match self.visibility {
            Visibility::Public => self.title.bold(),
            _ => self.title.dimmed(),
        };
        println!("{} {}", format!("[{}]", self.id).cyan(), title);
        println!(
            "   {} | {} | {}",
            self.date.dimmed(),
            visibility_label(self.visibility),
            t!("comments_label", count = self.comments)
        );
    }
}

/// One page of posts.
#[derive(Debug, Clone, Serialize)]
pub struct PostListResult {
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub has_next: bool,
    pub posts: Vec<PostRow>,
}

/// Full post.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub post_url: String,
    pub visibility: Visibility,
    pub category_id: String,
    pub tags: Vec<String>,
    pub accept_comment: bool,
    pub comments: i64,
    pub date: String,
    pub content: String,
}

impl From<&Post> for PostDetail {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title.clone(),
            post_url: p.post_url.clone(),
            visibility: p.visibility,
            category_id: p.category_id.to_string(),
            tags: p.tags.clone(),
            accept_comment: p.accept_comment,
            comments: p.comments,
            date: format_time(p.date),
            content: p.content.clone(),
        }
    }
}

impl PlainPrint for PostDetail {
    fn plain_print(&self) {
        println!("{} {}", format!("[{}]", self.id).cyan(), self.title.bold());
        println!(
            "   {} | {} | {}",
            self.post_url,
            self.date.dimmed(),
            visibility_label(self.visibility)
        );
        if !self.tags.is_empty() {
            println!("   {}", t!("tags_label", tags = self.tags.join(", ")).to_string().dimmed());
        }
        println!();
        for line in self.content.lines() {
            if !line.trim().is_empty() {
                println!("   {}", line);
            }
        }
    }
}

/// Result of writing or modifying a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostWriteInfo {
    pub post_id: String,
    pub url: String,
}

impl PlainPrint for PostWriteInfo {
    fn plain_print(&self) {
        println!("{}", t!("post_saved", id = &self.post_id, url = &self.url).to_string().green());
    }
}

/// Uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentInfo {
    pub url: String,
    pub replacer: String,
}

impl PlainPrint for AttachmentInfo {
    fn plain_print(&self) {
        println!("{}", self.url.green());
        println!("   {}", self.replacer.dimmed());
    }
}

/// Fields for `post write` and `post modify`.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub category: Option<String>,
    pub published: Option<String>,
    pub slogan: Option<String>,
    pub tags: Vec<String>,
    pub no_comments: bool,
    pub password: Option<String>,
}

impl PostDraft {
    /// Publication time given as `YYYY-MM-DD HH:MM:SS` local time.
    fn published_at(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(text) = &self.published else {
            return Ok(None);
        };
        let naive = parse_datetime(text)
            .with_context(|| t!("invalid_date", value = text).to_string())?;
        let local = Local
            .from_local_datetime(&naive)
            .single()
            .with_context(|| t!("invalid_date", value = text).to_string())?;
        Ok(Some(local.with_timezone(&Utc)))
    }
}

/// Load post content from a file when the argument starts with `@`.
pub fn read_content(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path)),
        None => Ok(arg.to_string()),
    }
}

/// List one page of posts.
pub async fn list(client: &TistoryClient, blog: &str, page: u32) -> Result<PostListResult> {
    let list = client.posts().list(blog, page).await?;
    Ok(PostListResult {
        page: list.page,
        total_pages: list.total_pages(),
        total_count: list.total_count,
        has_next: list.has_next(),
        posts: list.posts.iter().map(PostRow::from).collect(),
    })
}

/// Read one post.
pub async fn read(client: &TistoryClient, blog: &str, post_id: &str) -> Result<PostDetail> {
    let post = client.posts().read(blog, post_id).await?;
    Ok(PostDetail::from(&post))
}

/// Write a new post, or modify `post_id` when given.
pub async fn write(
    client: &TistoryClient,
    blog: &str,
    post_id: Option<&str>,
    draft: PostDraft,
) -> Result<PostWriteInfo> {
    let published = draft.published_at()?;

    let mut builder = match post_id {
        Some(id) => client.posts().modify(blog, id),
        None => client.posts().write(blog),
    };
    builder = builder
        .title(draft.title)
        .content(draft.content)
        .visibility(draft.visibility)
        .tags(draft.tags)
        .accept_comment(!draft.no_comments);

    if let Some(category) = draft.category {
        builder = builder.category(category);
    }
    if let Some(at) = published {
        builder = builder.published(at);
    }
    if let Some(slogan) = draft.slogan {
        builder = builder.slogan(slogan);
    }
    if let Some(password) = draft.password {
        builder = builder.password(password);
    }

    let result = builder.send().await?;
    Ok(PostWriteInfo {
        post_id: result.post_id.to_string(),
        url: result.url,
    })
}

/// Upload a file.
pub async fn attach(client: &TistoryClient, blog: &str, path: &Path) -> Result<AttachmentInfo> {
    let attachment = client.posts().attach_file(blog, path).await?;
    Ok(AttachmentInfo {
        url: attachment.url,
        replacer: attachment.replacer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_at() {
        let draft = PostDraft {
            published: Some("2024-03-01 09:30:00".into()),
            ..Default::default()
        };
        let at = draft.published_at().unwrap().unwrap();
        assert_eq!(
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-03-01 09:30:00"
        );

        let bad = PostDraft {
            published: Some("tomorrow".into()),
            ..Default::default()
        };
        assert!(bad.published_at().is_err());
        assert!(PostDraft::default().published_at().unwrap().is_none());
    }

    #[test]
    fn test_read_content() {
        assert_eq!(read_content("inline").unwrap(), "inline");
        assert!(read_content("@/definitely/not/here.html").is_err());
    }
}
