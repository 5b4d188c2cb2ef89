//! Network collaborators used by the built-in probes.
//!
//! Each collaborator is a trait so probes can be exercised against fakes;
//! the implementations here talk to the real services.

pub mod dns;
pub mod hibp;
pub mod http_meta;
pub mod sites;
pub mod whois;

pub use dns::{DnsSource, HickoryDns, RecordKind};
pub use hibp::{BreachLookup, BreachSource, HibpClient};
pub use http_meta::{extract_page_meta, HttpMetaClient, HttpMetaSource, PageFetch, PageMeta};
pub use sites::{default_sites, HttpSiteChecker, Presence, Site, SiteChecker};
pub use whois::{parse_whois, WhoisClient, WhoisRecord, WhoisSource};

use dossier_core::NetworkConfig;
use reqwest::Client;

/// Build the shared HTTP client for network probes.
pub fn http_client(config: &NetworkConfig) -> crate::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| crate::ProbeError::Internal(format!("failed to create HTTP client: {e}")))
}
