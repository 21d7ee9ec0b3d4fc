//! Keyword extraction.

use std::time::Duration;

use async_trait::async_trait;
use robovid_common::config::TextConfig;
use robovid_common::error::{RobovidError, RobovidResult};
use serde::{Deserialize, Serialize};

/// API version pinned for the NLU service.
const NLU_API_VERSION: &str = "2021-08-01";

/// Provider of ranked keywords for a sentence.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// At most `limit` keywords for `text`, most relevant first.
    async fn extract(&self, text: &str, locale: &str, limit: usize) -> RobovidResult<Vec<String>>;

    /// Extractor name for logs.
    fn name(&self) -> &str;
}

/// Client for a Watson Natural Language Understanding compatible service.
#[derive(Debug, Clone)]
pub struct NluKeywordExtractor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
    features: AnalyzeFeatures,
}

#[derive(Debug, Serialize)]
struct AnalyzeFeatures {
    keywords: KeywordOptions,
}

#[derive(Debug, Serialize)]
struct KeywordOptions {
    emotion: bool,
    sentiment: bool,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    keywords: Vec<KeywordResult>,
}

#[derive(Debug, Deserialize)]
struct KeywordResult {
    text: String,
}

impl NluKeywordExtractor {
    /// Build from config. The API key is required.
    pub fn new(config: &TextConfig) -> RobovidResult<Self> {
        let api_key = config
            .keyword_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RobovidError::config("text.keyword_api_key is not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RobovidError::config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.keyword_service_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn analyze_url(&self) -> String {
        format!("{}/v1/analyze", self.base_url)
    }
}

#[async_trait]
impl KeywordExtractor for NluKeywordExtractor {
    async fn extract(&self, text: &str, locale: &str, limit: usize) -> RobovidResult<Vec<String>> {
        let request = AnalyzeRequest {
            text,
            language: locale,
            features: AnalyzeFeatures {
                keywords: KeywordOptions {
                    emotion: true,
                    sentiment: true,
                    limit,
                },
            },
        };

        let response = self
            .client
            .post(self.analyze_url())
            .query(&[("version", NLU_API_VERSION)])
            .basic_auth("apikey", Some(&self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| RobovidError::extraction_unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RobovidError::extraction_unavailable(format!(
                "service returned {status}: {}",
                body.trim()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RobovidError::extraction_unavailable(format!("cannot read body: {e}")))?;
        parse_keywords_response(&body, limit)
    }

    fn name(&self) -> &str {
        "nlu"
    }
}

/// Keyword texts from an analyze response, in service order, capped at
/// `limit`.
pub fn parse_keywords_response(body: &str, limit: usize) -> RobovidResult<Vec<String>> {
    let response: AnalyzeResponse = serde_json::from_str(body)
        .map_err(|e| RobovidError::extraction_unavailable(format!("malformed response: {e}")))?;
    Ok(response
        .keywords
        .into_iter()
        .map(|k| k.text)
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords_keeps_order_and_limit() {
        let body = r#"{
            "language": "pt",
            "keywords": [
                {"text": "Santos Dumont", "relevance": 0.98},
                {"text": "aviação", "relevance": 0.71},
                {"text": "Paris", "relevance": 0.40}
            ]
        }"#;
        assert_eq!(
            parse_keywords_response(body, 2).unwrap(),
            vec!["Santos Dumont", "aviação"]
        );
    }

    #[test]
    fn test_parse_without_keywords_is_empty() {
        assert!(parse_keywords_response(r#"{"language": "pt"}"#, 2)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_garbage_is_extraction_unavailable() {
        let err = parse_keywords_response("not json", 2).unwrap_err();
        assert!(matches!(err, RobovidError::ExtractionUnavailable { .. }));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = NluKeywordExtractor::new(&TextConfig::default()).unwrap_err();
        assert!(matches!(err, RobovidError::Config { .. }));
    }

    #[test]
    fn test_request_body_shape() {
        let request = AnalyzeRequest {
            text: "Frase.",
            language: "pt",
            features: AnalyzeFeatures {
                keywords: KeywordOptions {
                    emotion: true,
                    sentiment: true,
                    limit: 2,
                },
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["features"]["keywords"]["limit"], 2);
        assert_eq!(json["language"], "pt");
    }
}
