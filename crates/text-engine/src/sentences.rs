//! Sentence boundary detection and the sentence cap.

use robovid_content_model::{Content, Sentence};
use unicode_segmentation::UnicodeSegmentation;

/// Words that end in a period without ending a sentence.
///
/// Portuguese and English forms; compared lowercased, without the period.
const ABBREVIATIONS: &[&str] = &[
    "sr", "sra", "srta", "dr", "dra", "prof", "profa", "mr", "mrs", "ms", "st", "jr", "vs", "av",
    "cf", "pp", "fig", "vol", "cap", "ed", "eds", "gen", "col", "lt", "sgt", "capt", "inc", "ltd",
    "co", "corp", "jan", "fev", "feb", "abr", "apr", "ago", "aug", "set", "sep", "sept", "out",
    "oct", "nov", "dez", "dec", "séc", "núm", "approx", "aprox",
];

const CLOSERS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', ')', ']', '\u{BB}'];

const OPENERS: &[char] = &['"', '\'', '(', '[', '\u{201C}', '\u{2018}', '\u{AB}'];

/// Split text into sentences.
///
/// Boundaries are the Unicode sentence bounds (UAX #29), so a period
/// followed by a lowercase word never ends a sentence. A bound that falls
/// right after an abbreviation, an initial (`J.`), or a dotted abbreviation
/// (`U.S.`) is ignored. Whitespace inside each sentence is collapsed.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = vec![];
    let mut pending = String::new();

    for segment in text.split_sentence_bounds() {
        pending.push_str(segment);
        if !ends_in_abbreviation(&pending) {
            push_collapsed(&mut sentences, &pending);
            pending.clear();
        }
    }
    push_collapsed(&mut sentences, &pending);

    sentences
}

fn push_collapsed(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

fn ends_in_abbreviation(segment: &str) -> bool {
    let Some(word) = segment.split_whitespace().last() else {
        return false;
    };
    match word.trim_end_matches(CLOSERS).strip_suffix('.') {
        // "word..." is an ellipsis, not an abbreviation.
        Some(stem) if !stem.ends_with('.') => is_abbreviation(stem),
        _ => false,
    }
}

fn is_abbreviation(stem: &str) -> bool {
    let stem = stem.trim_start_matches(OPENERS);
    if stem.is_empty() {
        return false;
    }
    // Single-letter initials: "J. R. R. Tolkien".
    if stem.chars().count() == 1 && stem.chars().all(char::is_alphabetic) {
        return true;
    }
    // Dotted abbreviations: "U.S.", "e.g.".
    if stem.contains('.') && stem.split('.').all(|part| part.chars().count() <= 2) {
        return true;
    }
    let lower = stem.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Replace `content.sentences` with the sentences of the sanitized text.
pub fn break_content_into_sentences(content: &mut Content) {
    content.sentences = split_sentences(&content.source_content_sanitized)
        .into_iter()
        .map(Sentence::new)
        .collect();
    tracing::debug!(count = content.sentences.len(), "Split content into sentences");
}

/// Keep only the first `content.maximum_sentences` sentences.
pub fn limit_maximum_sentences(content: &mut Content) {
    let before = content.sentences.len();
    content.sentences.truncate(content.maximum_sentences);
    if before > content.sentences.len() {
        tracing::debug!(
            kept = content.sentences.len(),
            dropped = before - content.sentences.len(),
            "Applied sentence cap"
        );
    }
}
