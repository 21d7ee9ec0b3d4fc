//! Text stage steps operating on the content document.

use robovid_common::error::RobovidResult;
use robovid_content_model::Content;

use crate::keywords::KeywordExtractor;
use crate::sanitize::sanitize_text;
use crate::source::TextSource;

/// Fetch the article for `content.search_term` into
/// `source_content_original`.
pub async fn fetch_content_from_source(
    content: &mut Content,
    source: &dyn TextSource,
    locale: &str,
) -> RobovidResult<()> {
    tracing::info!(
        source = source.name(),
        term = %content.search_term,
        locale,
        "Fetching source content"
    );
    content.source_content_original = source.fetch(&content.search_term, locale).await?;
    tracing::info!(
        chars = content.source_content_original.len(),
        "Fetched source content"
    );
    Ok(())
}

/// Derive `source_content_sanitized` from `source_content_original`.
pub fn sanitize_content(content: &mut Content) {
    content.source_content_sanitized = sanitize_text(&content.source_content_original);
}

/// Fill `keywords` for every sentence, one request at a time.
///
/// The first failure aborts; sentences already enriched keep their
/// keywords in memory but nothing is persisted by this function.
pub async fn fetch_keywords_of_all_sentences(
    content: &mut Content,
    extractor: &dyn KeywordExtractor,
    locale: &str,
    limit: usize,
) -> RobovidResult<()> {
    tracing::info!(
        extractor = extractor.name(),
        sentences = content.sentences.len(),
        "Fetching keywords"
    );
    for (index, sentence) in content.sentences.iter_mut().enumerate() {
        tracing::debug!(index, text = %sentence.text, "Extracting keywords");
        let mut keywords = extractor.extract(&sentence.text, locale, limit).await?;
        keywords.truncate(limit);
        sentence.keywords = keywords;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use robovid_common::error::RobovidError;
    use robovid_content_model::Sentence;

    struct FixedSource(&'static str);

    #[async_trait]
    impl TextSource for FixedSource {
        async fn fetch(&self, _term: &str, _locale: &str) -> RobovidResult<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Returns every word, ignoring the limit, and fails on a marker text.
    struct WordsExtractor;

    #[async_trait]
    impl KeywordExtractor for WordsExtractor {
        async fn extract(&self, text: &str, _locale: &str, _limit: usize) -> RobovidResult<Vec<String>> {
            if text.contains("FAIL") {
                return Err(RobovidError::extraction_unavailable("marker"));
            }
            Ok(text.split_whitespace().map(str::to_string).collect())
        }

        fn name(&self) -> &str {
            "words"
        }
    }

    #[tokio::test]
    async fn test_fetch_then_sanitize() {
        let mut content = Content::new("Topic", 3);
        fetch_content_from_source(&mut content, &FixedSource("A (1).\n\n== H ==\nB."), "pt")
            .await
            .unwrap();
        sanitize_content(&mut content);

        assert_eq!(content.source_content_original, "A (1).\n\n== H ==\nB.");
        assert_eq!(content.source_content_sanitized, "A. B.");
    }

    #[tokio::test]
    async fn test_keywords_are_capped() {
        let mut content = Content::new("Topic", 2);
        content.sentences = vec![Sentence::new("one two three"), Sentence::new("four")];

        fetch_keywords_of_all_sentences(&mut content, &WordsExtractor, "pt", 2)
            .await
            .unwrap();

        assert_eq!(content.sentences[0].keywords, vec!["one", "two"]);
        assert_eq!(content.sentences[1].keywords, vec!["four"]);
    }

    #[tokio::test]
    async fn test_keyword_failure_propagates() {
        let mut content = Content::new("Topic", 2);
        content.sentences = vec![Sentence::new("FAIL here"), Sentence::new("never")];

        let err = fetch_keywords_of_all_sentences(&mut content, &WordsExtractor, "pt", 2)
            .await
            .unwrap_err();

        assert!(matches!(err, RobovidError::ExtractionUnavailable { .. }));
        assert!(content.sentences[1].keywords.is_empty());
    }
}
