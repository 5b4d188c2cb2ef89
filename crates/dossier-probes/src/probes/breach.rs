//! Breach exposure for an email address.

use super::pause;
use crate::error::Result;
use crate::probe::{Probe, ProbeResult};
use crate::sources::{BreachLookup, BreachSource};
use async_trait::async_trait;
use dossier_core::Context;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Registry name.
pub const NAME: &str = "haveibeenpwned";

/// Longest description kept in a breach summary, in characters.
const SUMMARY_DESCRIPTION_CHARS: usize = 200;

/// Looks up the context email in a breach database.
pub struct BreachProbe {
    source: Arc<dyn BreachSource>,
    delay: Duration,
}

impl BreachProbe {
    /// Create a probe over `source`, sleeping `delay` after the lookup.
    #[must_use]
    pub fn new(source: Arc<dyn BreachSource>, delay: Duration) -> Self {
        Self { source, delay }
    }
}

#[async_trait]
impl Probe for BreachProbe {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &Context) -> Result<ProbeResult> {
        let mut out = ProbeResult::new();
        out.insert("note".to_string(), Value::Null);
        out.insert("breaches".to_string(), Value::Null);

        let Some(email) = ctx.email() else {
            out.insert("note".to_string(), json!("No email provided; skipping HIBP."));
            return Ok(out);
        };

        let Some(api_key) = ctx.config().hibp_api_key() else {
            out.insert(
                "note".to_string(),
                json!(format!(
                    "No HIBP API key; check manually: https://haveibeenpwned.com/unifiedsearch/{email}"
                )),
            );
            return Ok(out);
        };

        match self.source.breached_account(email, api_key).await {
            Ok(BreachLookup::Breaches(breaches)) => {
                debug!(count = breaches.len(), "breaches found");
                out.insert("summary".to_string(), Value::Array(summarize(&breaches)));
                out.insert("breaches".to_string(), Value::Array(breaches));
            }
            Ok(BreachLookup::NotFound) => {
                out.insert("summary".to_string(), json!([]));
                out.insert("breaches".to_string(), json!([]));
            }
            Ok(BreachLookup::Status(status)) => {
                out.insert("note".to_string(), json!(format!("HIBP HTTP {status}")));
            }
            Err(e) => {
                out.insert("note".to_string(), json!(format!("Error calling HIBP: {e}")));
            }
        }

        pause(self.delay).await;
        Ok(out)
    }
}

fn summarize(breaches: &[Value]) -> Vec<Value> {
    breaches
        .iter()
        .map(|breach| {
            let field = |keys: &[&str]| {
                keys.iter()
                    .find_map(|k| breach.get(*k).and_then(Value::as_str))
                    .map(ToString::to_string)
            };

            let description = field(&["Description"]).map(|text| truncate(&text));
            json!({
                "name": field(&["Name", "Title", "name"]),
                "date": field(&["BreachDate", "breachDate"]),
                "description": description,
            })
        })
        .collect()
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProbeError;
    use std::sync::Mutex;

    struct FakeSource {
        answer: Mutex<Option<Result<BreachLookup>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeSource {
        fn new(answer: Result<BreachLookup>) -> Arc<Self> {
            Arc::new(Self {
                answer: Mutex::new(Some(answer)),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl BreachSource for FakeSource {
        async fn breached_account(&self, account: &str, api_key: &str) -> Result<BreachLookup> {
            self.calls
                .lock()
                .unwrap()
                .push((account.to_string(), api_key.to_string()));
            self.answer.lock().unwrap().take().expect("single call")
        }
    }

    fn keyed_context() -> Context {
        Context::builder()
            .email("user@example.org")
            .hibp_api_key(Some("secret".to_string()))
            .build()
    }

    #[tokio::test]
    async fn test_no_email() {
        let source = FakeSource::new(Ok(BreachLookup::NotFound));
        let probe = BreachProbe::new(source.clone(), Duration::ZERO);
        let out = probe.run(&Context::builder().domain("example.org").build()).await.unwrap();

        assert_eq!(out["note"], "No email provided; skipping HIBP.");
        assert!(out["breaches"].is_null());
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_key_points_to_manual_lookup() {
        let source = FakeSource::new(Ok(BreachLookup::NotFound));
        let probe = BreachProbe::new(source.clone(), Duration::ZERO);
        let ctx = Context::builder().email("user@example.org").build();
        let out = probe.run(&ctx).await.unwrap();

        assert_eq!(
            out["note"],
            "No HIBP API key; check manually: https://haveibeenpwned.com/unifiedsearch/user@example.org"
        );
        assert!(out["breaches"].is_null());
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_breaches_are_kept_and_summarized() {
        let long = "x".repeat(250);
        let source = FakeSource::new(Ok(BreachLookup::Breaches(vec![json!({
            "Name": "Adobe",
            "BreachDate": "2013-10-04",
            "Description": long,
            "PwnCount": 152_445_165,
        })])));
        let probe = BreachProbe::new(source.clone(), Duration::ZERO);
        let out = probe.run(&keyed_context()).await.unwrap();

        assert!(out["note"].is_null());
        assert_eq!(out["breaches"][0]["PwnCount"], 152_445_165);
        let summary = &out["summary"][0];
        assert_eq!(summary["name"], "Adobe");
        assert_eq!(summary["date"], "2013-10-04");
        let description = summary["description"].as_str().unwrap();
        assert_eq!(description.len(), 203);
        assert!(description.ends_with("..."));

        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            [("user@example.org".to_string(), "secret".to_string())]
        );
    }

    #[tokio::test]
    async fn test_not_found_is_empty_list() {
        let probe = BreachProbe::new(FakeSource::new(Ok(BreachLookup::NotFound)), Duration::ZERO);
        let out = probe.run(&keyed_context()).await.unwrap();
        assert_eq!(out["breaches"], json!([]));
        assert!(out["note"].is_null());
    }

    #[tokio::test]
    async fn test_unexpected_status_and_transport_error() {
        let probe = BreachProbe::new(FakeSource::new(Ok(BreachLookup::Status(429))), Duration::ZERO);
        let out = probe.run(&keyed_context()).await.unwrap();
        assert_eq!(out["note"], "HIBP HTTP 429");
        assert!(out["breaches"].is_null());

        let probe = BreachProbe::new(
            FakeSource::new(Err(ProbeError::Internal("connection reset".to_string()))),
            Duration::ZERO,
        );
        let out = probe.run(&keyed_context()).await.unwrap();
        assert_eq!(out["note"], "Error calling HIBP: internal error: connection reset");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short"), "short");
        let accented = "é".repeat(201);
        let cut = truncate(&accented);
        assert_eq!(cut.chars().count(), 203);
    }
}
