//! Tistory CLI.

mod commands;
mod config;
mod handlers;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{blog, call, category, comment, post};
use handlers::auth::LoginSource;
use rust_i18n::t;
use std::path::PathBuf;
use tistory::client::DEFAULT_TOKEN_FILE;

rust_i18n::i18n!("src/locales", fallback = "en");

/// Command-line client for the Tistory Open API
#[derive(Parser)]
#[command(name = "tistory")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language for output (en, ko)
    #[arg(short, long, global = true, default_value = "en")]
    lang: String,

    /// Blog name, defaults to `blog` in the config file
    #[arg(short, long, global = true, env = "TISTORY_BLOG")]
    blog: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Blog information
    Blog {
        #[command(subcommand)]
        action: blog::BlogAction,
    },

    /// Post operations
    #[command(alias = "p")]
    Post {
        #[command(subcommand)]
        action: post::PostAction,
    },

    /// Category operations
    Category {
        #[command(subcommand)]
        action: category::CategoryAction,
    },

    /// Comment operations
    #[command(alias = "c")]
    Comment {
        #[command(subcommand)]
        action: comment::CommentAction,
    },

    /// Call any API endpoint and print the raw response
    Call(call::CallArgs),

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Obtain a token through the web authorization flow
    Login {
        /// JSON file with client, cookies and login sections
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write the token to a JSON file
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_TOKEN_FILE)]
        save: Option<PathBuf>,
    },
    /// Store an access token, or the path of a saved token file
    Token {
        /// Token or token file
        token: String,
    },
    /// Forget the stored token and session cookies
    Logout,
    /// Show current auth status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rust_i18n::set_locale(&cli.lang);

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let command = cli
        .command
        .ok_or_else(|| anyhow::anyhow!("{}", t!("no_command")))?;
    let blog_name = cli.blog.as_deref();

    match command {
        Commands::Auth { action } => handle_auth(action).await,
        Commands::Blog { action } => blog::handle(action, cli.format, cli.verbose).await,
        Commands::Post { action } => {
            post::handle(action, blog_name, cli.format, cli.verbose).await
        }
        Commands::Category { action } => {
            category::handle(action, blog_name, cli.format, cli.verbose).await
        }
        Commands::Comment { action } => {
            comment::handle(action, blog_name, cli.format, cli.verbose).await
        }
        Commands::Call(args) => call::handle(args, cli.format, cli.verbose).await,
        Commands::Config => {
            let cfg = config::load_config()?;
            println!(
                "{}",
                t!("config_file", path = config::config_path()?.display())
            );
            println!("{}", t!("authenticated", status = cfg.token().is_some()));
            if let Some(client) = &cfg.client {
                println!("{}", t!("client_id", id = &client.client_id));
            }
            if let Some(blog) = &cfg.blog {
                println!("{}", t!("default_blog", blog = blog));
            }
            let format = cfg.response_format()?;
            println!("{}", t!("response_format", format = format));
            Ok(())
        }
    }
}

async fn handle_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login { config, save } => {
            let source = match &config {
                Some(path) => LoginSource::JsonFile(path),
                None => LoginSource::Config,
            };
            handlers::auth::login(source, save.as_deref()).await?;
            println!("{}", t!("logged_in").to_string().green());
            if let Some(path) = &save {
                println!("{}", t!("token_saved", path = path.display()));
            }
            Ok(())
        }
        AuthAction::Token { token } => {
            handlers::auth::set_token(&token)?;
            println!("{}", t!("token_stored"));
            Ok(())
        }
        AuthAction::Logout => {
            handlers::auth::logout()?;
            println!("{}", t!("logged_out"));
            Ok(())
        }
        AuthAction::Status => {
            let client = config::build_client()?;
            match client.access_token() {
                Some(token) => {
                    let preview: String = token.as_str().chars().take(4).collect();
                    println!("{}", t!("token_present", preview = preview));
                }
                None => println!("{}", t!("not_logged_in")),
            }
            Ok(())
        }
    }
}
