//! Username presence across popular sites.

use super::pause;
use crate::error::Result;
use crate::probe::{Probe, ProbeResult};
use crate::sources::{Presence, Site, SiteChecker};
use async_trait::async_trait;
use dossier_core::Context;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Registry name.
pub const NAME: &str = "username_check";

/// Statuses counted as "the profile probably exists".
const EXISTS_STATUSES: [u16; 3] = [200, 301, 302];

/// Checks whether a profile URL answers for the context username.
pub struct UsernameProbe {
    checker: Arc<dyn SiteChecker>,
    sites: Vec<Site>,
    delay: Duration,
}

impl UsernameProbe {
    /// Create a probe checking `sites` through `checker`.
    #[must_use]
    pub fn new(checker: Arc<dyn SiteChecker>, sites: Vec<Site>, delay: Duration) -> Self {
        Self {
            checker,
            sites,
            delay,
        }
    }
}

#[async_trait]
impl Probe for UsernameProbe {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &Context) -> Result<ProbeResult> {
        let mut out = ProbeResult::new();
        out.insert("note".to_string(), Value::Null);

        let Some(username) = ctx.username() else {
            out.insert("checked".to_string(), json!([]));
            out.insert("note".to_string(), json!("No username provided; skipping."));
            return Ok(out);
        };

        let mut checked = Vec::with_capacity(self.sites.len());
        for site in &self.sites {
            let url = site.profile_url(username);
            let entry = match self.checker.status(&url).await {
                Ok(status) => json!({
                    "site": site.name,
                    "url": url,
                    "http_status": status,
                    "exists_guess": EXISTS_STATUSES.contains(&status),
                    "classification": Presence::from_status(status),
                }),
                Err(e) => json!({
                    "site": site.name,
                    "url": url,
                    "error": e.to_string(),
                }),
            };
            checked.push(entry);
            pause(self.delay).await;
        }

        out.insert("checked".to_string(), Value::Array(checked));
        Ok(out)
    }
}
