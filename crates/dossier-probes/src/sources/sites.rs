//! Per-site username existence checks.
//!
//! Presence is inferred from the HTTP status of the profile URL only. Many
//! sites answer 200 for every path or block automated clients, so results
//! are guesses.

use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// A site with a profile URL template (`{u}` is replaced by the username).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Short site name
    pub name: String,
    /// Profile URL template
    pub url_template: String,
}

impl Site {
    /// Create a site entry.
    #[must_use]
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
        }
    }

    /// Profile URL for `username`.
    #[must_use]
    pub fn profile_url(&self, username: &str) -> String {
        self.url_template.replace("{u}", username)
    }
}

/// Sites checked by default.
#[must_use]
pub fn default_sites() -> Vec<Site> {
    vec![
        Site::new("github", "https://github.com/{u}"),
        Site::new("twitter", "https://twitter.com/{u}"),
        Site::new("instagram", "https://www.instagram.com/{u}/"),
        Site::new("reddit", "https://www.reddit.com/user/{u}"),
        Site::new("keybase", "https://keybase.io/{u}"),
        Site::new("facebook", "https://www.facebook.com/{u}"),
        Site::new("twitch", "https://www.twitch.tv/{u}"),
        Site::new("youtube", "https://www.youtube.com/{u}"),
    ]
}

/// Bucket a profile URL status falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// 200
    Found,
    /// 401 or 403: the page exists but access is restricted
    Forbidden,
    /// 404
    NotFound,
    /// Anything else
    Unknown,
}

impl Presence {
    /// Classify an HTTP status.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Self::Found,
            401 | 403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Unknown,
        }
    }
}

/// Returns the HTTP status of a profile URL.
#[async_trait]
pub trait SiteChecker: Send + Sync {
    /// Status code for `url`.
    async fn status(&self, url: &str) -> Result<u16>;
}

/// `HEAD` first, falling back to `GET` when `HEAD` fails or is rejected.
#[derive(Debug, Clone)]
pub struct HttpSiteChecker {
    client: Client,
}

impl HttpSiteChecker {
    /// Create a checker using `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SiteChecker for HttpSiteChecker {
    async fn status(&self, url: &str) -> Result<u16> {
        match self.client.head(url).send().await {
            Ok(response) if response.status().as_u16() < 400 => Ok(response.status().as_u16()),
            Ok(_) | Err(_) => {
                let response = self.client.get(url).send().await?;
                Ok(response.status().as_u16())
            }
        }
    }
}
