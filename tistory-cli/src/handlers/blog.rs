//! Blog handlers.

use anyhow::Result;
use colored::Colorize;
use rust_i18n::t;
use serde::Serialize;
use tistory::models::Blog;
use tistory::TistoryClient;

use crate::output::{PlainPrint, TableRow};

/// Blog information.
#[derive(Debug, Clone, Serialize)]
pub struct BlogRow {
    pub name: String,
    pub title: String,
    pub url: String,
    pub nickname: String,
    pub role: String,
    pub is_default: bool,
    pub posts: i64,
    pub comments: i64,
}

impl From<&Blog> for BlogRow {
    fn from(b: &Blog) -> Self {
        Self {
            name: b.name.clone(),
            title: b.title.clone(),
            url: b.url.clone(),
            nickname: b.nickname.clone(),
            role: b.role.clone(),
            is_default: b.is_default,
            posts: b.statistics.posts,
            comments: b.statistics.comments,
        }
    }
}

impl TableRow for BlogRow {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Title", "URL", "Role", "Posts", "Comments"]
    }
    fn row(&self) -> Vec<String> {
        let name = if self.is_default {
            format!("{} *", self.name)
        } else {
            self.name.clone()
        };
        vec![
            name,
            self.title.clone(),
            self.url.clone(),
            self.role.clone(),
            self.posts.to_string(),
            self.comments.to_string(),
        ]
    }
}

impl PlainPrint for BlogRow {
    fn plain_print(&self) {
        let marker = if self.is_default {
            format!(" {}", t!("default_label")).yellow().to_string()
        } else {
            String::new()
        };
        println!("[{}] {}{}", self.name.cyan(), self.title.bold(), marker);
        println!("   {} | {} | {}", self.url, self.nickname.green(), self.role.dimmed());
        println!(
            "   {}",
            t!("blog_counts", posts = self.posts, comments = self.comments)
        );
    }
}

/// Account with its blogs.
#[derive(Debug, Clone, Serialize)]
pub struct BlogInfoResult {
    pub id: String,
    pub user_id: String,
    pub blogs: Vec<BlogRow>,
}

/// Fetch the account's blogs.
pub async fn info(client: &TistoryClient) -> Result<BlogInfoResult> {
    let info = client.blog().info().await?;
    Ok(BlogInfoResult {
        id: info.id.clone(),
        user_id: info.user_id.clone(),
        blogs: info.blogs.iter().map(BlogRow::from).collect(),
    })
}
