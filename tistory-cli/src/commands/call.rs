//! Raw endpoint calls.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tistory::Payload;

use crate::config::build_authed_client;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct CallArgs {
    /// Endpoint path, e.g. post/list
    path: String,

    /// Parameters as key=value
    params: Vec<String>,

    /// Fail unless the API reports status 200
    #[arg(long)]
    check: bool,
}

/// Split `key=value`.
fn parse_param(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("Expected key=value, got `{}`", arg))?;
    if key.is_empty() {
        bail!("Empty parameter name in `{}`", arg);
    }
    Ok((key.to_string(), value.to_string()))
}

pub async fn handle(args: CallArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let client = build_authed_client()?;

    let mut call = client.endpoint(&args.path);
    for param in &args.params {
        let (key, value) = parse_param(param)?;
        call = call.param(key, value);
    }

    let response = call.send().await?;
    if verbose {
        eprintln!(
            "{} {} (status {})",
            response.http_status().as_u16().to_string().dimmed(),
            response.url().as_str().dimmed(),
            response.status_code().map(|s| s.to_string()).unwrap_or_else(|_| "-".into())
        );
    }
    if args.check {
        response.raise_for_status()?;
    }

    match (format, response.payload()) {
        (OutputFormat::Json, Payload::Json(value)) => {
            println!("{}", serde_json::to_string_pretty(value)?)
        }
        _ => println!("{}", response.to_pretty_string()),
    }
    Ok(())
}
