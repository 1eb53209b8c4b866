//! Access token handling.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name used when saving a token without an explicit path.
pub const DEFAULT_TOKEN_FILE: &str = "tistory_access_token.json";

/// Access token issued by the authorization flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    access_token: String,
}

impl AccessToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_owned();
        if token.is_empty() {
            return Err(Error::InvalidArgument("Missing access_token".into()));
        }
        Ok(Self {
            access_token: token,
        })
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    /// Write the token as `{"access_token": "..."}`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path.as_ref(), json)?;
        log::debug!("access token written to {}", path.as_ref().display());
        Ok(())
    }

    /// Read a token previously written with [`AccessToken::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let token: AccessToken = serde_json::from_str(&text)?;
        AccessToken::new(token.access_token)
    }
}

// Keep the secret out of logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.access_token.chars().take(4).collect();
        write!(f, "AccessToken({}…)", shown)
    }
}
