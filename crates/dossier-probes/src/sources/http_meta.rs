//! Front-page fetches and HTML metadata extraction.

use crate::error::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Title selector is hardcoded and valid"));

static META: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("Meta selector is hardcoded and valid"));

/// A fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFetch {
    /// Final HTTP status after redirects
    pub status: u16,
    /// Response headers; repeated headers are joined with `, `
    pub headers: BTreeMap<String, String>,
    /// Body text, read only for `200` responses with an HTML content type
    pub body: Option<String>,
}

/// Fetches pages for metadata extraction.
#[async_trait]
pub trait HttpMetaSource: Send + Sync {
    /// GET `url`, following redirects.
    async fn fetch(&self, url: &str) -> Result<PageFetch>;
}

/// reqwest-backed page fetcher.
#[derive(Debug, Clone)]
pub struct HttpMetaClient {
    client: Client,
}

impl HttpMetaClient {
    /// Create a fetcher using `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpMetaSource for HttpMetaClient {
    async fn fetch(&self, url: &str) -> Result<PageFetch> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("text/html"));

        let body = if status == 200 && html {
            Some(response.text().await?)
        } else {
            None
        };

        Ok(PageFetch {
            status,
            headers,
            body,
        })
    }
}

/// Title and `<meta>` values of an HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Trimmed `<title>` text
    pub title: Option<String>,
    /// `<meta>` content keyed by lowercased `name`, or `property` when no name
    pub metas: BTreeMap<String, String>,
}

/// Extract the title and meta tags from `html`.
#[must_use]
pub fn extract_page_meta(html: &str) -> PageMeta {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());

    let mut metas = BTreeMap::new();
    for el in document.select(&META) {
        let attrs = el.value();
        let key = attrs
            .attr("name")
            .filter(|k| !k.is_empty())
            .or_else(|| attrs.attr("property").filter(|k| !k.is_empty()));
        if let Some(key) = key {
            let content = attrs.attr("content").unwrap_or_default();
            metas.insert(key.to_lowercase(), content.to_string());
        }
    }

    PageMeta { title, metas }
}
