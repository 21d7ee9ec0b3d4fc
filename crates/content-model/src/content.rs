//! The content document shared by all stages.
//!
//! Field names serialize in camelCase so snapshots stay readable by the
//! renderer template and by older `content.json` files.

use serde::{Deserialize, Serialize};

/// Top-level content document (`content.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Topic to research. Never changed after creation.
    pub search_term: String,

    /// Cap applied by the limiting stage.
    pub maximum_sentences: usize,

    /// Raw text as returned by the text source.
    #[serde(default)]
    pub source_content_original: String,

    /// Text after blank-line, markup, and parenthetical removal.
    #[serde(default)]
    pub source_content_sanitized: String,

    /// Narration units in narration order.
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

/// One narration unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Sentence text.
    pub text: String,

    /// Extracted keywords, empty until enrichment runs.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Generated asset references, relative to the content directory.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Fields of [`Content`] a stage may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentField {
    SearchTerm,
    MaximumSentences,
    SourceContentOriginal,
    SourceContentSanitized,
    Sentences,
}

impl ContentField {
    pub const ALL: [ContentField; 5] = [
        ContentField::SearchTerm,
        ContentField::MaximumSentences,
        ContentField::SourceContentOriginal,
        ContentField::SourceContentSanitized,
        ContentField::Sentences,
    ];

    /// Whether this field differs between two documents.
    pub fn differs(self, a: &Content, b: &Content) -> bool {
        match self {
            ContentField::SearchTerm => a.search_term != b.search_term,
            ContentField::MaximumSentences => a.maximum_sentences != b.maximum_sentences,
            ContentField::SourceContentOriginal => {
                a.source_content_original != b.source_content_original
            }
            ContentField::SourceContentSanitized => {
                a.source_content_sanitized != b.source_content_sanitized
            }
            ContentField::Sentences => a.sentences != b.sentences,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentField::SearchTerm => "searchTerm",
            ContentField::MaximumSentences => "maximumSentences",
            ContentField::SourceContentOriginal => "sourceContentOriginal",
            ContentField::SourceContentSanitized => "sourceContentSanitized",
            ContentField::Sentences => "sentences",
        }
    }
}

impl Content {
    /// Create a fresh document for a topic.
    pub fn new(search_term: impl Into<String>, maximum_sentences: usize) -> Self {
        Self {
            search_term: search_term.into(),
            maximum_sentences,
            source_content_original: String::new(),
            source_content_sanitized: String::new(),
            sentences: vec![],
        }
    }

    /// Fields that differ between `self` and `other`.
    pub fn changed_fields(&self, other: &Content) -> Vec<ContentField> {
        ContentField::ALL
            .into_iter()
            .filter(|field| field.differs(self, other))
            .collect()
    }
}

impl Sentence {
    /// A sentence with no keywords or images yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keywords: vec![],
            images: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let mut content = Content::new("Ada Lovelace", 7);
        content.sentences.push(Sentence::new("Ada was a mathematician."));
        let json = serde_json::to_value(&content).unwrap();

        assert_eq!(json["searchTerm"], "Ada Lovelace");
        assert_eq!(json["maximumSentences"], 7);
        assert_eq!(json["sentences"][0]["keywords"], serde_json::json!([]));
    }

    #[test]
    fn test_deserializes_minimal_snapshot() {
        let parsed: Content =
            serde_json::from_str(r#"{"searchTerm": "Rust", "maximumSentences": 3}"#).unwrap();
        assert_eq!(parsed, Content::new("Rust", 3));
    }

    #[test]
    fn test_changed_fields() {
        let before = Content::new("Rust", 3);
        let mut after = before.clone();
        after.source_content_original = "text".to_string();
        after.sentences.push(Sentence::new("text"));

        assert_eq!(
            before.changed_fields(&after),
            vec![ContentField::SourceContentOriginal, ContentField::Sentences]
        );
        assert!(before.changed_fields(&before).is_empty());
    }
}
