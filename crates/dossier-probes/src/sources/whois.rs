//! WHOIS queries over TCP port 43.
//!
//! The client asks the IANA root server first and follows a single `refer:`
//! line to the registry server for the TLD. Field extraction understands the
//! common `Key: value` layouts used by gTLD and most ccTLD registries.

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Standard WHOIS port
const WHOIS_PORT: u16 = 43;

/// Responses larger than this are truncated
const MAX_RESPONSE_BYTES: u64 = 256 * 1024;

/// Registration facts for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhoisRecord {
    /// Sponsoring registrar
    pub registrar: Option<String>,
    /// Creation date as reported
    pub creation_date: Option<String>,
    /// Expiration date as reported
    pub expiration_date: Option<String>,
    /// Delegated name servers, lowercased
    pub name_servers: Vec<String>,
    /// Server the answer came from
    pub whois_server: Option<String>,
    /// Unparsed response
    pub raw: String,
}

/// A WHOIS data source.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    /// Registration record for `domain`.
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord>;
}

/// Plain-TCP WHOIS client.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    root_server: String,
    port: u16,
    timeout: Duration,
}

impl WhoisClient {
    /// Client starting at `whois.iana.org`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_server("whois.iana.org", WHOIS_PORT, timeout)
    }

    /// Client starting at a specific server.
    #[must_use]
    pub fn with_server(root_server: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            root_server: root_server.into(),
            port,
            timeout,
        }
    }

    async fn query(&self, server: &str, port: u16, domain: &str) -> Result<String> {
        debug!(%server, %domain, "querying WHOIS");

        let exchange = async {
            let mut stream = TcpStream::connect((server, port)).await?;
            stream.write_all(format!("{domain}\r\n").as_bytes()).await?;

            let mut buf = Vec::new();
            stream.take(MAX_RESPONSE_BYTES).read_to_end(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        let bytes = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ProbeError::Whois(format!("{server} timed out")))?
            .map_err(|e| ProbeError::Whois(format!("{server}: {e}")))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
impl WhoisSource for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
        let root = self.query(&self.root_server, self.port, domain).await?;
        let referral = referral_server(&root);

        let (server, raw) = match referral {
            Some(refer) if !refer.eq_ignore_ascii_case(&self.root_server) => {
                let raw = self.query(&refer, WHOIS_PORT, domain).await?;
                (refer, raw)
            }
            _ => (self.root_server.clone(), root),
        };

        let mut record = parse_whois(&raw);
        record.whois_server = Some(server);
        Ok(record)
    }
}

fn fields<'a>(raw: &'a str) -> impl Iterator<Item = (String, &'a str)> + 'a {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('%') && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim()))
        .filter(|(_, value)| !value.is_empty())
}

fn referral_server(raw: &str) -> Option<String> {
    fields(raw)
        .find(|(key, _)| key == "refer")
        .map(|(_, value)| value.to_string())
}

/// Extract registration fields from a raw WHOIS response.
#[must_use]
pub fn parse_whois(raw: &str) -> WhoisRecord {
    let mut record = WhoisRecord {
        raw: raw.to_string(),
        ..WhoisRecord::default()
    };

    for (key, value) in fields(raw) {
        match key.as_str() {
            "registrar" | "registrar name" | "sponsoring registrar" => {
                record.registrar.get_or_insert_with(|| value.to_string());
            }
            "creation date" | "created" | "created on" | "registered on" | "registration time" => {
                record.creation_date.get_or_insert_with(|| value.to_string());
            }
            "registry expiry date"
            | "registrar registration expiration date"
            | "expiration date"
            | "expiry date"
            | "expires"
            | "paid-till" => {
                record
                    .expiration_date
                    .get_or_insert_with(|| value.to_string());
            }
            "name server" | "nserver" | "nameserver" => {
                if let Some(host) = value.split_whitespace().next() {
                    let host = host.trim_end_matches('.').to_ascii_lowercase();
                    if !record.name_servers.contains(&host) {
                        record.name_servers.push(host);
                    }
                }
            }
            _ => {}
        }
    }

    record
}
