//! Category commands.

use anyhow::Result;
use clap::Subcommand;

use crate::config::{build_authed_client, resolve_blog};
use crate::handlers::category as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories of a blog
    #[command(alias = "ls")]
    List,
}

pub async fn handle(
    action: CategoryAction,
    blog: Option<&str>,
    format: OutputFormat,
    _verbose: bool,
) -> Result<()> {
    match action {
        CategoryAction::List => list(blog, format).await,
    }
}

async fn list(blog: Option<&str>, format: OutputFormat) -> Result<()> {
    let blog = resolve_blog(blog)?;
    let client = build_authed_client()?;
    let categories = handlers::list(&client, &blog).await?;

    print_table(categories, format);
    Ok(())
}
