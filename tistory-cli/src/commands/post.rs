//! Post commands.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use rust_i18n::t;
use std::path::PathBuf;
use tistory::Visibility;

use crate::config::{build_authed_client, resolve_blog};
use crate::handlers::post::{self as handlers, PostDraft};
use crate::output::{print_item, print_table, OutputFormat};

/// Post visibility on the command line.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum VisibilityArg {
    #[default]
    Private,
    Protected,
    Public,
}

impl From<VisibilityArg> for Visibility {
    fn from(v: VisibilityArg) -> Self {
        match v {
            VisibilityArg::Private => Visibility::Private,
            VisibilityArg::Protected => Visibility::Protected,
            VisibilityArg::Public => Visibility::Public,
        }
    }
}

/// Fields shared by `write` and `modify`.
#[derive(Args)]
pub struct PostFields {
    /// Post title
    #[arg(short, long)]
    title: String,
    /// Post content (HTML), or @file to read it from a file
    #[arg(short, long)]
    content: String,
    /// Visibility
    #[arg(long, value_enum, default_value_t = VisibilityArg::Private)]
    visibility: VisibilityArg,
    /// Category ID
    #[arg(long)]
    category: Option<String>,
    /// Publication time, "YYYY-MM-DD HH:MM:SS" local time
    #[arg(long)]
    published: Option<String>,
    /// URL slogan
    #[arg(long)]
    slogan: Option<String>,
    /// Tag, may be repeated or comma separated
    #[arg(long = "tag", value_delimiter = ',')]
    tags: Vec<String>,
    /// Do not accept comments
    #[arg(long)]
    no_comments: bool,
    /// Password for protected posts
    #[arg(long)]
    password: Option<String>,
}

impl PostFields {
    fn into_draft(self) -> Result<PostDraft> {
        Ok(PostDraft {
            title: self.title,
            content: handlers::read_content(&self.content)?,
            visibility: self.visibility.into(),
            category: self.category,
            published: self.published,
            slogan: self.slogan,
            tags: self.tags,
            no_comments: self.no_comments,
            password: self.password,
        })
    }
}

#[derive(Subcommand)]
pub enum PostAction {
    /// List posts
    #[command(alias = "ls")]
    List {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Read a post
    Read {
        /// Post ID
        post_id: String,
    },

    /// Write a new post
    Write {
        #[command(flatten)]
        fields: PostFields,
    },

    /// Modify a post
    Modify {
        /// Post ID
        post_id: String,
        #[command(flatten)]
        fields: PostFields,
    },

    /// Upload a file to embed in posts
    Attach {
        /// File to upload
        file: PathBuf,
    },
}

pub async fn handle(
    action: PostAction,
    blog: Option<&str>,
    format: OutputFormat,
    _verbose: bool,
) -> Result<()> {
    let blog = resolve_blog(blog)?;
    match action {
        PostAction::List { page } => list(&blog, page, format).await,
        PostAction::Read { post_id } => read(&blog, &post_id, format).await,
        PostAction::Write { fields } => write(&blog, None, fields, format).await,
        PostAction::Modify { post_id, fields } => {
            write(&blog, Some(&post_id), fields, format).await
        }
        PostAction::Attach { file } => attach(&blog, file, format).await,
    }
}

async fn list(blog: &str, page: u32, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::list(&client, blog, page).await?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if matches!(format, OutputFormat::Plain) {
        println!(
            "{}\n",
            t!(
                "posts_page",
                page = result.page,
                total = result.total_pages,
                count = result.total_count
            )
        );
    }
    print_table(result.posts, format);
    Ok(())
}

async fn read(blog: &str, post_id: &str, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let post = handlers::read(&client, blog, post_id).await?;

    print_item(&post, format);
    Ok(())
}

async fn write(
    blog: &str,
    post_id: Option<&str>,
    fields: PostFields,
    format: OutputFormat,
) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::write(&client, blog, post_id, fields.into_draft()?).await?;

    print_item(&result, format);
    Ok(())
}

async fn attach(blog: &str, file: PathBuf, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::attach(&client, blog, &file).await?;

    print_item(&result, format);
    Ok(())
}
