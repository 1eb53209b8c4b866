//! Comment commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rust_i18n::t;

use crate::config::{build_authed_client, resolve_blog};
use crate::handlers::comment as handlers;
use crate::output::{print_item, print_table, OutputFormat};

#[derive(Subcommand)]
pub enum CommentAction {
    /// Newest comments across the blog
    Newest {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Comments per page (1-10)
        #[arg(short, long, default_value = "10")]
        count: u32,
    },

    /// Comments on a post
    #[command(alias = "ls")]
    List {
        /// Post ID
        post_id: String,
    },

    /// Write a comment
    Write {
        /// Post ID
        post_id: String,
        /// Comment content
        content: String,
        /// Reply to this comment
        #[arg(long)]
        parent: Option<String>,
        /// Only visible to the blog owner
        #[arg(long)]
        secret: bool,
    },

    /// Modify a comment
    Modify {
        /// Post ID
        post_id: String,
        /// Comment ID
        comment_id: String,
        /// New content
        content: String,
        /// Parent comment ID
        #[arg(long)]
        parent: Option<String>,
        /// Only visible to the blog owner
        #[arg(long)]
        secret: bool,
    },

    /// Delete a comment
    Delete {
        /// Post ID
        post_id: String,
        /// Comment ID
        comment_id: String,
    },
}

pub async fn handle(
    action: CommentAction,
    blog: Option<&str>,
    format: OutputFormat,
    _verbose: bool,
) -> Result<()> {
    let blog = resolve_blog(blog)?;
    match action {
        CommentAction::Newest { page, count } => newest(&blog, page, count, format).await,
        CommentAction::List { post_id } => list(&blog, &post_id, format).await,
        CommentAction::Write {
            post_id,
            content,
            parent,
            secret,
        } => write(&blog, &post_id, None, &content, parent.as_deref(), secret, format).await,
        CommentAction::Modify {
            post_id,
            comment_id,
            content,
            parent,
            secret,
        } => {
            write(
                &blog,
                &post_id,
                Some(&comment_id),
                &content,
                parent.as_deref(),
                secret,
                format,
            )
            .await
        }
        CommentAction::Delete {
            post_id,
            comment_id,
        } => delete(&blog, &post_id, &comment_id).await,
    }
}

async fn newest(blog: &str, page: u32, count: u32, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let comments = handlers::newest(&client, blog, page, count).await?;

    if comments.is_empty() {
        if matches!(format, OutputFormat::Plain) {
            println!("{}", t!("no_comments"));
        }
        return Ok(());
    }

    print_table(comments, format);
    Ok(())
}

async fn list(blog: &str, post_id: &str, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::list(&client, blog, post_id).await?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.comments.is_empty() {
        if matches!(format, OutputFormat::Plain) {
            println!("{}", t!("no_comments"));
        }
        return Ok(());
    }

    if matches!(format, OutputFormat::Plain) {
        println!(
            "{}\n",
            t!("comments_on_post", id = &result.post_id, count = result.total_count)
        );
    }
    print_table(result.comments, format);
    Ok(())
}

async fn write(
    blog: &str,
    post_id: &str,
    comment_id: Option<&str>,
    content: &str,
    parent: Option<&str>,
    secret: bool,
    format: OutputFormat,
) -> Result<()> {
    let client = build_authed_client()?;
    let result =
        handlers::write(&client, blog, post_id, comment_id, content, parent, secret).await?;

    print_item(&result, format);
    Ok(())
}

async fn delete(blog: &str, post_id: &str, comment_id: &str) -> Result<()> {
    let client = build_authed_client()?;
    handlers::delete(&client, blog, post_id, comment_id).await?;

    println!("{}", t!("comment_deleted", id = comment_id).to_string().green());
    Ok(())
}
