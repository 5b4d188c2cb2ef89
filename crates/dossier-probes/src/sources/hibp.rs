//! HaveIBeenPwned v3 breach lookups.

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

/// Outcome of a breach lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum BreachLookup {
    /// The account appears in these breaches (raw records)
    Breaches(Vec<Value>),
    /// The account is not in any known breach
    NotFound,
    /// The API answered with an unexpected status
    Status(u16),
}

/// A breach-exposure data source.
#[async_trait]
pub trait BreachSource: Send + Sync {
    /// Look up `account` using `api_key`.
    async fn breached_account(&self, account: &str, api_key: &str) -> Result<BreachLookup>;
}

/// HTTP client for the HIBP v3 API.
#[derive(Debug, Clone)]
pub struct HibpClient {
    client: Client,
    base_url: String,
}

impl HibpClient {
    /// Create a client against `base_url` (normally `https://haveibeenpwned.com/api/v3`).
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn account_url(&self, account: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProbeError::Internal(format!("invalid HIBP base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ProbeError::Internal("HIBP base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("breachedaccount")
            .push(account);
        url.query_pairs_mut().append_pair("truncateResponse", "false");
        Ok(url)
    }
}

#[async_trait]
impl BreachSource for HibpClient {
    async fn breached_account(&self, account: &str, api_key: &str) -> Result<BreachLookup> {
        let url = self.account_url(account)?;
        tracing::debug!(%url, "querying HIBP");

        let response = self
            .client
            .get(url)
            .header("hibp-api-key", api_key)
            .header("accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let breaches: Vec<Value> = response.json().await?;
                Ok(BreachLookup::Breaches(breaches))
            }
            StatusCode::NOT_FOUND => Ok(BreachLookup::NotFound),
            other => Ok(BreachLookup::Status(other.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_url_encodes_account() {
        let client = HibpClient::new(Client::new(), "https://haveibeenpwned.com/api/v3/");
        let url = client.account_url("user+tag@example.org").expect("build url");
        assert_eq!(
            url.as_str(),
            "https://haveibeenpwned.com/api/v3/breachedaccount/user+tag@example.org?truncateResponse=false"
        );
    }

    #[test]
    fn test_account_url_rejects_bad_base() {
        let client = HibpClient::new(Client::new(), "not a url");
        assert!(client.account_url("user@example.org").is_err());
    }
}
