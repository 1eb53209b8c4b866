//! Blog commands.

use anyhow::Result;
use clap::Subcommand;
use rust_i18n::t;

use crate::config::build_authed_client;
use crate::handlers::blog as handlers;
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum BlogAction {
    /// Show the account and its blogs
    Info,
}

pub async fn handle(action: BlogAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        BlogAction::Info => info(format).await,
    }
}

async fn info(format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let result = handlers::info(&client).await?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if matches!(format, OutputFormat::Plain) {
        println!("{}\n", t!("account_label", id = &result.id, user_id = &result.user_id));
    }
    print_table(result.blogs, format);
    Ok(())
}
