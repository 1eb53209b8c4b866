//! Browser-style authorization to obtain an access token.
//!
//! The flow logs in with a session cookie (or the configured credentials),
//! approves the app on the authorization page, then exchanges the returned
//! code for a token.

mod config;
mod flow;

pub use config::{ClientCredentials, LoginCredentials, OAuthConfig, SESSION_COOKIE};
pub use flow::OAuthFlow;
