//! Authentication handlers.

use anyhow::{Context, Result};
use std::path::Path;
use tistory::oauth::{OAuthConfig, OAuthFlow};
use tistory::AccessToken;
use tracing::{debug, info};

use crate::config::{load_config, save_config};

/// Where the OAuth settings for a login come from.
pub enum LoginSource<'a> {
    /// The CLI config file.
    Config,
    /// A JSON file with `client`, `cookies` and optional `login`.
    JsonFile(&'a Path),
}

/// Run the web authorization flow and store the token in the config.
pub async fn login(source: LoginSource<'_>, save_to: Option<&Path>) -> Result<AccessToken> {
    let oauth = match source {
        LoginSource::Config => load_config()?.oauth_config()?,
        LoginSource::JsonFile(path) => OAuthConfig::from_json_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
    };

    if !oauth.has_session_cookie() && oauth.login.is_none() {
        anyhow::bail!("No TSSESSION cookie or login credentials configured");
    }

    debug!(client_id = %oauth.client.client_id, "starting authorization flow");
    let mut flow = OAuthFlow::new(oauth).context("Failed to set up authorization flow")?;
    let token = flow.run().await.context("Authorization failed")?;
    info!("authorization succeeded");

    store_token(&token)?;
    if let Some(path) = save_to {
        token
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(token)
}

/// Store a token obtained elsewhere. A path to a token file is also accepted.
pub fn set_token(value: &str) -> Result<AccessToken> {
    let path = Path::new(value);
    let token = if path.is_file() {
        AccessToken::load(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        AccessToken::new(value)?
    };

    store_token(&token)?;
    Ok(token)
}

/// Forget the stored token and session cookies.
pub fn logout() -> Result<()> {
    let mut cfg = load_config()?;
    cfg.access_token = None;
    cfg.cookies.clear();
    save_config(&cfg)
}

fn store_token(token: &AccessToken) -> Result<()> {
    let mut cfg = load_config()?;
    cfg.access_token = Some(token.as_str().to_owned());
    save_config(&cfg)
}
