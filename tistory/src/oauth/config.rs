//! Configuration of the authorization flow.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the session cookie set by a successful login.
pub const SESSION_COOKIE: &str = "TSSESSION";

/// Registered application credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// App id.
    pub client_id: String,
    /// Secret key.
    pub client_secret: String,
    /// Callback URL registered with the app.
    pub callback: String,
}

/// Account credentials for the login form.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub login_id: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("login_id", &self.login_id)
            .field("password", &"***")
            .finish()
    }
}

/// Everything the flow needs, as stored in a JSON file:
///
/// ```json
/// {
///   "client": {"client_id": "…", "client_secret": "…", "callback": "http://…"},
///   "cookies": {"TSSESSION": "…"}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// App credentials.
    pub client: ClientCredentials,
    /// Cookies of an existing browser session.
    #[serde(default)]
    pub cookies: HashMap<String, String>,
    /// Used to log in when no session cookie is available.
    #[serde(default)]
    pub login: Option<LoginCredentials>,
}

impl OAuthConfig {
    /// Parse a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Whether a session cookie was supplied.
    pub fn has_session_cookie(&self) -> bool {
        self.cookies
            .get(SESSION_COOKIE)
            .map_or(false, |v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_config() {
        let config = OAuthConfig::from_json_str(
            r#"{
                "client": {
                    "client_id": "8c1e3a3b1f",
                    "client_secret": "8c1e3a3b1f7d2e",
                    "callback": "http://client.example.com/callback"
                },
                "cookies": {"TSSESSION": "a1b2c3"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.client.client_id, "8c1e3a3b1f");
        assert_eq!(config.client.callback, "http://client.example.com/callback");
        assert!(config.has_session_cookie());
        assert_eq!(config.login, None);
    }

    #[test]
    fn test_missing_client_section() {
        assert!(OAuthConfig::from_json_str(r#"{"cookies": {}}"#).is_err());
    }

    #[test]
    fn test_password_hidden() {
        let login = LoginCredentials {
            login_id: "me@example.com".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", login).contains("hunter2"));
    }
}
