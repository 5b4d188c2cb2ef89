//! DNS record lookups.

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::fmt;
use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

/// Record types collected for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// IPv4 addresses
    A,
    /// Mail exchangers
    Mx,
    /// Name servers
    Ns,
    /// Text records
    Txt,
}

impl RecordKind {
    /// Every kind, in report order.
    pub const ALL: [RecordKind; 4] = [RecordKind::A, RecordKind::Mx, RecordKind::Ns, RecordKind::Txt];

    /// Record type mnemonic.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS data source.
#[async_trait]
pub trait DnsSource: Send + Sync {
    /// Records of `kind` for `domain`, rendered as text.
    async fn records(&self, domain: &str, kind: RecordKind) -> Result<Vec<String>>;

    /// PTR names for `ip`.
    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>>;
}

/// Resolver using the system DNS configuration.
pub struct HickoryDns {
    resolver: TokioResolver,
    timeout: Duration,
}

impl HickoryDns {
    /// Create a resolver from the system configuration.
    pub fn new(timeout: Duration) -> Result<Self> {
        let resolver = TokioResolver::builder(TokioConnectionProvider::default())
            .map_err(|e| ProbeError::Dns(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self { resolver, timeout })
    }

    async fn bounded<T, E, F>(&self, lookup: F) -> Result<T>
    where
        E: fmt::Display,
        F: Future<Output = std::result::Result<T, E>>,
    {
        tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| ProbeError::Dns("lookup timed out".to_string()))?
            .map_err(|e| ProbeError::Dns(e.to_string()))
    }
}

#[async_trait]
impl DnsSource for HickoryDns {
    async fn records(&self, domain: &str, kind: RecordKind) -> Result<Vec<String>> {
        match kind {
            RecordKind::A => {
                let response = self.bounded(self.resolver.lookup_ip(domain)).await?;
                Ok(response
                    .iter()
                    .filter(IpAddr::is_ipv4)
                    .map(|ip| ip.to_string())
                    .collect())
            }
            RecordKind::Mx => {
                let response = self.bounded(self.resolver.mx_lookup(domain)).await?;
                Ok(response
                    .iter()
                    .map(|mx| format!("{} {}", mx.preference(), mx.exchange()))
                    .collect())
            }
            RecordKind::Ns => {
                let response = self.bounded(self.resolver.ns_lookup(domain)).await?;
                Ok(response.iter().map(ToString::to_string).collect())
            }
            RecordKind::Txt => {
                let response = self.bounded(self.resolver.txt_lookup(domain)).await?;
                Ok(response
                    .iter()
                    .map(|txt| {
                        txt.iter()
                            .map(|data| String::from_utf8_lossy(data).into_owned())
                            .collect::<String>()
                    })
                    .collect())
            }
        }
    }

    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>> {
        let response = self.bounded(self.resolver.reverse_lookup(ip)).await?;
        Ok(response.iter().map(ToString::to_string).collect())
    }
}
