//! Category handlers.

use anyhow::Result;
use colored::Colorize;
use rust_i18n::t;
use serde::Serialize;
use tistory::models::Category;
use tistory::TistoryClient;

use crate::output::{PlainPrint, TableRow};

/// Category information.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub label: String,
    pub parent: Option<String>,
    pub entries: i64,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            label: c.label.clone(),
            parent: c.parent.as_ref().map(|p| p.to_string()),
            entries: c.entries,
        }
    }
}

impl TableRow for CategoryRow {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Category", "Posts"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.label.clone(), self.entries.to_string()]
    }
}

impl PlainPrint for CategoryRow {
    fn plain_print(&self) {
        let indent = if self.parent.is_some() { "   " } else { "" };
        println!(
            "{}[{}] {} {}",
            indent,
            self.id.cyan(),
            self.name.bold(),
            t!("posts_count", count = self.entries).to_string().dimmed()
        );
    }
}

/// List a blog's categories.
pub async fn list(client: &TistoryClient, blog: &str) -> Result<Vec<CategoryRow>> {
    let categories = client.categories().list(blog).await?;
    Ok(categories.iter().map(CategoryRow::from).collect())
}
