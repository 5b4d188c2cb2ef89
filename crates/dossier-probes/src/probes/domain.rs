//! Registration, DNS and front-page facts for a domain.

use super::pause;
use crate::error::Result;
use crate::probe::{error_result, Probe, ProbeResult};
use crate::sources::{extract_page_meta, DnsSource, HttpMetaSource, RecordKind, WhoisSource};
use async_trait::async_trait;
use dossier_core::Context;
use serde_json::{json, Map, Value};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Registry name.
pub const NAME: &str = "domain_info";

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Collects WHOIS, DNS and HTTP metadata for the context domain.
pub struct DomainProbe {
    whois: Arc<dyn WhoisSource>,
    dns: Arc<dyn DnsSource>,
    http: Arc<dyn HttpMetaSource>,
    delay: Duration,
}

impl DomainProbe {
    /// Create a probe over the three collaborators.
    #[must_use]
    pub fn new(
        whois: Arc<dyn WhoisSource>,
        dns: Arc<dyn DnsSource>,
        http: Arc<dyn HttpMetaSource>,
        delay: Duration,
    ) -> Self {
        Self {
            whois,
            dns,
            http,
            delay,
        }
    }

    async fn whois(&self, domain: &str) -> Value {
        match self.whois.lookup(domain).await {
            Ok(record) => serde_json::to_value(record)
                .unwrap_or_else(|e| Value::Object(error_result(e.to_string()))),
            Err(e) => Value::Object(error_result(e.to_string())),
        }
    }

    async fn dns(&self, domain: &str) -> Value {
        let mut records = Map::new();
        let mut first_ipv4: Option<IpAddr> = None;

        for kind in RecordKind::ALL {
            let value = match self.dns.records(domain, kind).await {
                Ok(answers) => {
                    if kind == RecordKind::A {
                        first_ipv4 = answers.iter().find_map(|a| a.parse().ok());
                    }
                    json!(answers)
                }
                Err(e) => json!(format!("error: {e}")),
            };
            records.insert(kind.to_string(), value);
        }

        if let Some(ip) = first_ipv4 {
            let names = match self.dns.reverse(ip).await {
                Ok(names) => json!(names),
                Err(e) => json!(format!("error: {e}")),
            };
            let mut ptr = Map::new();
            ptr.insert(ip.to_string(), names);
            records.insert("PTR".to_string(), Value::Object(ptr));
        }

        Value::Object(records)
    }

    async fn http_meta(&self, domain: &str) -> Value {
        let mut http = Map::new();
        let mut meta = Map::new();

        for scheme in SCHEMES {
            let url = format!("{scheme}{domain}");
            match self.http.fetch(&url).await {
                Ok(page) => {
                    http.insert(
                        url.clone(),
                        json!({ "status": page.status, "resp_headers": page.headers }),
                    );
                    let entry = match &page.body {
                        Some(body) => serde_json::to_value(extract_page_meta(body))
                            .unwrap_or_else(|e| Value::Object(error_result(e.to_string()))),
                        None => json!({ "note": format!("status {} or non-html", page.status) }),
                    };
                    meta.insert(url, entry);
                }
                Err(e) => {
                    let error = Value::Object(error_result(e.to_string()));
                    http.insert(url.clone(), error.clone());
                    meta.insert(url, error);
                }
            }
            pause(self.delay).await;
        }

        json!({ "http": http, "meta": meta })
    }
}

#[async_trait]
impl Probe for DomainProbe {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &Context) -> Result<ProbeResult> {
        let mut out = ProbeResult::new();
        for key in ["note", "whois", "dns", "http_meta"] {
            out.insert(key.to_string(), Value::Null);
        }

        let Some(domain) = ctx.domain() else {
            out.insert(
                "note".to_string(),
                json!("No domain provided; skipping domain module."),
            );
            return Ok(out);
        };

        out.insert("whois".to_string(), self.whois(domain).await);
        out.insert("dns".to_string(), self.dns(domain).await);
        out.insert("http_meta".to_string(), self.http_meta(domain).await);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{PageFetch, WhoisRecord};
    use crate::ProbeError;
    use std::collections::BTreeMap;

    struct FakeWhois;

    #[async_trait]
    impl WhoisSource for FakeWhois {
        async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
            Ok(WhoisRecord {
                registrar: Some("Example Registrar".to_string()),
                name_servers: vec![format!("ns1.{domain}")],
                raw: "Registrar: Example Registrar".to_string(),
                ..WhoisRecord::default()
            })
        }
    }

    struct FailingWhois;

    #[async_trait]
    impl WhoisSource for FailingWhois {
        async fn lookup(&self, _domain: &str) -> Result<WhoisRecord> {
            Err(ProbeError::Whois("whois.iana.org timed out".to_string()))
        }
    }

    struct FakeDns;

    #[async_trait]
    impl DnsSource for FakeDns {
        async fn records(&self, _domain: &str, kind: RecordKind) -> Result<Vec<String>> {
            match kind {
                RecordKind::A => Ok(vec!["192.0.2.10".to_string(), "192.0.2.11".to_string()]),
                RecordKind::Mx => Ok(vec!["10 mail.example.org.".to_string()]),
                RecordKind::Ns => Ok(vec!["ns1.example.org.".to_string()]),
                RecordKind::Txt => Err(ProbeError::Dns("no records found".to_string())),
            }
        }

        async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>> {
            assert_eq!(ip.to_string(), "192.0.2.10");
            Ok(vec!["host.example.org.".to_string()])
        }
    }

    struct FakeHttp;

    #[async_trait]
    impl HttpMetaSource for FakeHttp {
        async fn fetch(&self, url: &str) -> Result<PageFetch> {
            if url.starts_with("https://") {
                Ok(PageFetch {
                    status: 200,
                    headers: BTreeMap::from([("server".to_string(), "test".to_string())]),
                    body: Some("<title> Home </title><meta name=\"author\" content=\"me\">".to_string()),
                })
            } else {
                Ok(PageFetch {
                    status: 301,
                    headers: BTreeMap::new(),
                    body: None,
                })
            }
        }
    }

    fn probe(whois: Arc<dyn WhoisSource>) -> DomainProbe {
        DomainProbe::new(whois, Arc::new(FakeDns), Arc::new(FakeHttp), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_no_domain() {
        let out = probe(Arc::new(FakeWhois))
            .run(&Context::builder().username("jdoe").build())
            .await
            .unwrap();
        assert_eq!(out["note"], "No domain provided; skipping domain module.");
        assert!(out["whois"].is_null());
        assert!(out["dns"].is_null());
        assert!(out["http_meta"].is_null());
    }

    #[tokio::test]
    async fn test_collects_all_sections() {
        let ctx = Context::builder().domain("example.org").build();
        let out = probe(Arc::new(FakeWhois)).run(&ctx).await.unwrap();

        assert!(out["note"].is_null());
        assert_eq!(out["whois"]["registrar"], "Example Registrar");
        assert_eq!(out["whois"]["name_servers"], json!(["ns1.example.org"]));

        let dns = &out["dns"];
        assert_eq!(dns["A"], json!(["192.0.2.10", "192.0.2.11"]));
        assert_eq!(dns["MX"], json!(["10 mail.example.org."]));
        assert_eq!(dns["TXT"], "error: DNS error: no records found");
        assert_eq!(dns["PTR"]["192.0.2.10"], json!(["host.example.org."]));

        let http = &out["http_meta"];
        assert_eq!(http["http"]["https://example.org"]["status"], 200);
        assert_eq!(http["http"]["https://example.org"]["resp_headers"]["server"], "test");
        assert_eq!(http["meta"]["https://example.org"]["title"], "Home");
        assert_eq!(http["meta"]["https://example.org"]["metas"]["author"], "me");
        assert_eq!(http["meta"]["http://example.org"]["note"], "status 301 or non-html");
    }

    #[tokio::test]
    async fn test_whois_failure_is_recorded() {
        let ctx = Context::builder().domain("example.org").build();
        let out = probe(Arc::new(FailingWhois)).run(&ctx).await.unwrap();
        assert_eq!(out["whois"]["error"], "WHOIS error: whois.iana.org timed out");
        assert!(out["dns"].is_object());
    }
}
