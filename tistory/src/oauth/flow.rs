//! The login/authorization web flow.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{LOCATION, REFERER};
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder};
use url::Url;

use super::config::{OAuthConfig, SESSION_COOKIE};
use crate::client::{AccessToken, RawResponse, BROWSER_USER_AGENT, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::parser::{HtmlForm, HtmlPage};

const LOGIN_PATH: &str = "auth/login";
const AUTHORIZE_PATH: &str = "oauth/authorize";
const ACCESS_TOKEN_PATH: &str = "oauth/access_token";

/// Drives the site's own login and authorization pages to obtain an access
/// token, the way a browser would.
///
/// Steps run strictly in order: log in (only without a session cookie),
/// authorize the app to get a code, exchange the code for a token.
pub struct OAuthFlow {
    config: OAuthConfig,
    http: Client,
    jar: Arc<Jar>,
    base_url: Url,
    token: Option<AccessToken>,
}

impl OAuthFlow {
    /// Create a flow against www.tistory.com.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a flow against another host.
    pub fn with_base_url(config: OAuthConfig, base_url: &str) -> Result<Self> {
        if config.client.client_id.is_empty() || config.client.callback.is_empty() {
            return Err(Error::InvalidArgument(
                "client_id and callback are required".into(),
            ));
        }

        let base_url = Url::parse(base_url)?;
        let jar = Arc::new(Jar::default());
        for (name, value) in &config.cookies {
            jar.add_cookie_str(&format!("{}={}; Path=/", name, value), &base_url);
        }

        let http = Client::builder()
            .cookie_provider(jar.clone())
            .redirect(Policy::none())
            .user_agent(BROWSER_USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            config,
            http,
            jar,
            base_url,
            token: None,
        })
    }

    /// The flow configuration.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Token obtained by an earlier run, if any.
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Whether the cookie jar holds a session cookie.
    pub fn has_session(&self) -> bool {
        self.jar
            .cookies(&self.base_url)
            .and_then(|v| v.to_str().map(str::to_owned).ok())
            .map_or(false, |cookies| {
                cookies
                    .split(';')
                    .filter_map(|c| c.trim().split_once('='))
                    .any(|(name, value)| name == SESSION_COOKIE && !value.is_empty())
            })
    }

    /// The cached token, running the whole flow on first use.
    pub async fn access_token(&mut self) -> Result<AccessToken> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => self.run().await,
        }
    }

    /// Run every step and cache the resulting token.
    pub async fn run(&mut self) -> Result<AccessToken> {
        if !self.has_session() && self.config.login.is_some() {
            self.login().await?;
        }

        let code = self.authorize().await?;
        let token = self.exchange(&code).await?;
        log::info!("access token obtained for client {}", self.config.client.client_id);

        self.token = Some(token.clone());
        Ok(token)
    }

    /// Submit the login form with the configured credentials.
    pub async fn login(&mut self) -> Result<()> {
        let credentials = self
            .config
            .login
            .clone()
            .ok_or_else(|| Error::oauth("no login credentials configured"))?;

        let login_url = self.url(LOGIN_PATH)?;
        let raw = self.send(self.http.get(login_url)).await?;
        let page = HtmlPage::parse(&raw.text);

        let mut form = page
            .form_with_field("loginId")
            .or_else(|| page.form_with_field("password"))
            .cloned()
            .ok_or_else(|| Error::oauth("login form not found"))?;
        form.set("loginId", credentials.login_id.as_str());
        form.set("password", credentials.password.as_str());

        log::debug!("submitting login form as {}", credentials.login_id);
        let response = self.submit(&form, &raw.url).await?;

        if !self.has_session() {
            let page = HtmlPage::parse(&response.text);
            log::warn!(
                "login returned {} without a session cookie: {}",
                response.status,
                page.text().chars().take(120).collect::<String>()
            );
            return Err(Error::oauth("login rejected"));
        }
        Ok(())
    }

    /// Authorize the app for the logged-in account and return the code.
    pub async fn authorize(&self) -> Result<String> {
        let callback = self.config.client.callback.as_str();

        let mut url = self.url(AUTHORIZE_PATH)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client.client_id)
            .append_pair("redirect_uri", callback)
            .append_pair("response_type", "code");

        let raw = self.send(self.http.get(url)).await?;
        if let Some(code) = self.code_from_response(&raw)? {
            return Ok(code);
        }

        let page = HtmlPage::parse(&raw.text);
        if page
            .form_with_field("loginId")
            .or_else(|| page.form_with_field("password"))
            .is_some()
        {
            return Err(Error::oauth("session is not logged in"));
        }

        // The app has not been approved yet: confirm it through the page's form.
        let form = page
            .form_with_action(AUTHORIZE_PATH)
            .or_else(|| page.form_with_field("client_id"))
            .or_else(|| page.forms.first())
            .map(|form| form.with_submit(None))
            .ok_or_else(|| Error::oauth("authorization code not found"))?;

        log::debug!("submitting authorization form");
        let confirmed = self.submit(&form, &raw.url).await?;
        self.code_from_response(&confirmed)?
            .ok_or_else(|| Error::oauth("authorization code not found"))
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange(&self, code: &str) -> Result<AccessToken> {
        let client = &self.config.client;

        let mut url = self.url(ACCESS_TOKEN_PATH)?;
        url.query_pairs_mut()
            .append_pair("client_id", &client.client_id)
            .append_pair("client_secret", &client.client_secret)
            .append_pair("redirect_uri", &client.callback)
            .append_pair("code", code)
            .append_pair("grant_type", "authorization_code");

        let raw = self.send(self.http.get(url)).await?;
        match parse_token_body(&raw.text) {
            Ok(token) => Ok(token),
            Err(_) if !raw.status.is_success() => Err(raw.http_error()),
            Err(e) => Err(e),
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Error::Url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<RawResponse> {
        let response = request.send().await?;
        log::debug!("{} {}", response.status(), response.url().path());
        RawResponse::read(response).await
    }

    async fn submit(&self, form: &HtmlForm, page_url: &Url) -> Result<RawResponse> {
        let action = form.action_url(page_url)?;
        let request = if form.is_post() {
            self.http.post(action).form(&form.fields)
        } else {
            self.http.get(action).query(&form.fields)
        };
        self.send(request.header(REFERER, page_url.as_str())).await
    }

    /// Find the code in a redirect or in the page body.
    fn code_from_response(&self, raw: &RawResponse) -> Result<Option<String>> {
        if let Some(location) = raw.headers.get(LOCATION).and_then(|v| v.to_str().ok()) {
            let target = raw.url.join(location)?;

            if let Some(code) = query_value(&target, "code") {
                log::debug!("authorization code found in redirect");
                return Ok(Some(code));
            }
            if let Some(error) = query_value(&target, "error") {
                let description = query_value(&target, "error_description").unwrap_or_default();
                let message = format!("authorization denied: {} {}", error, description);
                return Err(Error::oauth(message.trim_end()));
            }
            if target.path().contains(LOGIN_PATH) {
                return Err(Error::oauth("session is not logged in"));
            }
        }

        let code = code_from_html(&raw.text, &self.config.client.callback)?;
        if code.is_some() {
            log::debug!("authorization code found in page");
        }
        Ok(code)
    }
}

impl std::fmt::Debug for OAuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthFlow")
            .field("client_id", &self.config.client.client_id)
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Look for `{callback}?code=…` in a page, e.g. inside a script redirect.
fn code_from_html(html: &str, callback: &str) -> Result<Option<String>> {
    let pattern = format!(r#"{}\?code=([^'"&\s<>]+)"#, regex::escape(callback));
    let re = regex::Regex::new(&pattern).map_err(|e| Error::parse(e.to_string()))?;

    let decoded = html_escape::decode_html_entities(html);
    Ok(re
        .captures(&decoded)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned()))
}

/// Read the token from an `access_token=…` body.
fn parse_token_body(body: &str) -> Result<AccessToken> {
    let body = body.trim();

    if body.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if let Some(token) = value.get("access_token").and_then(|t| t.as_str()) {
            return AccessToken::new(token);
        }
    } else if let Some((_, rest)) = body.rsplit_once("access_token=") {
        let token = rest.split('&').next().unwrap_or_default();
        return AccessToken::new(token);
    }

    Err(Error::oauth(format!("token exchange failed: {}", body)))
}
