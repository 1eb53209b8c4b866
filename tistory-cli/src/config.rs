//! Configuration management for the Tistory CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use tistory::oauth::{ClientCredentials, LoginCredentials, OAuthConfig};
use tistory::{AccessToken, ResponseFormat, TistoryClient};

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV: &str = "TISTORY_ACCESS_TOKEN";

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registered app used by `auth login`.
    pub client: Option<ClientCredentials>,
    /// Account used when no session cookie is stored.
    pub login: Option<LoginCredentials>,
    /// Browser cookies, typically `TSSESSION`.
    #[serde(default)]
    pub cookies: HashMap<String, String>,
    /// Access token from the last login.
    pub access_token: Option<String>,
    /// Blog used when `--blog` is not given.
    pub blog: Option<String>,
    /// `xml` or `json`.
    pub response_format: Option<String>,
}

impl Config {
    /// OAuth settings stored in this file.
    pub fn oauth_config(&self) -> Result<OAuthConfig> {
        let client = self
            .client
            .clone()
            .context("No [client] section in config. Add client_id, client_secret and callback.")?;

        Ok(OAuthConfig {
            client,
            cookies: self.cookies.clone(),
            login: self.login.clone(),
        })
    }

    /// Response format requested from the API.
    pub fn response_format(&self) -> Result<ResponseFormat> {
        match &self.response_format {
            Some(format) => format.parse().context("Invalid response_format in config"),
            None => Ok(ResponseFormat::default()),
        }
    }

    /// Token from the environment, then from the file.
    pub fn token(&self) -> Option<String> {
        env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.access_token.clone())
    }
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("tistory.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Blog name from the command line, then from the config.
pub fn resolve_blog(blog: Option<&str>) -> Result<String> {
    if let Some(blog) = blog {
        return Ok(blog.to_owned());
    }

    load_config()?
        .blog
        .context("No blog given. Pass --blog or set `blog` in the config file.")
}

/// Build a client from the current configuration, with a token if one is stored.
pub fn build_client() -> Result<TistoryClient> {
    let config = load_config()?;

    let mut builder = TistoryClient::builder().format(config.response_format()?);

    if let Some(token) = config.token() {
        builder = builder.access_token(token);
    }

    builder.build().context("Failed to build Tistory client")
}

/// Build a client that requires an access token.
pub fn build_authed_client() -> Result<TistoryClient> {
    let config = load_config()?;

    let token = config
        .token()
        .context("Authentication required. Run 'tistory auth login' first.")?;
    let token = AccessToken::new(token).context("Stored access token is invalid")?;

    TistoryClient::builder()
        .with_token(token)
        .format(config.response_format()?)
        .build()
        .context("Failed to build Tistory client")
}
