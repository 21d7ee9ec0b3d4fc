//! Source text retrieval.

use std::time::Duration;

use async_trait::async_trait;
use robovid_common::config::TextConfig;
use robovid_common::error::{RobovidError, RobovidResult};
use serde::Deserialize;

/// Provider of raw article text for a search term.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the article body for `term` in `locale`.
    async fn fetch(&self, term: &str, locale: &str) -> RobovidResult<String>;

    /// Source name for logs.
    fn name(&self) -> &str;
}

/// Plain-text article extracts from the MediaWiki API.
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: reqwest::Client,
    endpoint_template: String,
}

impl WikipediaSource {
    /// Build a client honoring the configured endpoint and request deadline.
    pub fn new(config: &TextConfig) -> RobovidResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("robovid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RobovidError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config.wikipedia_endpoint.clone()))
    }

    /// Use an existing client. `endpoint_template` may contain `{locale}`.
    pub fn with_client(client: reqwest::Client, endpoint_template: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_template: endpoint_template.into(),
        }
    }

    fn endpoint(&self, locale: &str) -> String {
        self.endpoint_template.replace("{locale}", locale)
    }
}

#[async_trait]
impl TextSource for WikipediaSource {
    async fn fetch(&self, term: &str, locale: &str) -> RobovidResult<String> {
        let endpoint = self.endpoint(locale);
        tracing::debug!(%endpoint, term, "Requesting article extract");

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", term),
            ])
            .send()
            .await
            .map_err(|e| RobovidError::source_unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RobovidError::source_unavailable(format!(
                "{endpoint} returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RobovidError::source_unavailable(format!("cannot read body: {e}")))?;
        parse_extract_response(&body, term)
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    title: String,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
}

/// Pull the first non-empty extract out of a `formatversion=2` response.
pub fn parse_extract_response(body: &str, term: &str) -> RobovidResult<String> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| RobovidError::source_unavailable(format!("malformed response: {e}")))?;

    let pages = response.query.map(|q| q.pages).unwrap_or_default();
    pages
        .into_iter()
        .filter(|page| !page.missing)
        .find_map(|page| {
            tracing::debug!(title = %page.title, "Found article");
            page.extract.filter(|text| !text.trim().is_empty())
        })
        .ok_or_else(|| RobovidError::source_unavailable(format!("no article found for '{term}'")))
}
