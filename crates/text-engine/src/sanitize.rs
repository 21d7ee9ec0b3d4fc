//! Source text cleanup.
//!
//! Article extracts arrive as newline-separated paragraphs interleaved with
//! `== Heading ==` markup. Narration wants one flowing paragraph without
//! headings or parenthetical asides such as birth dates.

use std::sync::OnceLock;

use regex::Regex;

/// Matches a parenthetical (one level of nesting) plus the blanks before it.
fn parenthetical_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[ \t]*\((?:\([^()]*\)|[^()])*\)").expect("parenthetical pattern is valid")
    })
}

fn whitespace_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"))
}

/// Drop blank lines and lines starting with `=`, joining the rest with
/// single spaces.
pub fn remove_blank_lines_and_markup(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('=')
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove parentheticals, innermost first, until none remain, then collapse
/// runs of whitespace.
pub fn remove_dates_in_parentheses(text: &str) -> String {
    let re = parenthetical_regex();
    let mut current = text.to_string();
    while re.is_match(&current) {
        current = re.replace_all(&current, "").into_owned();
    }
    whitespace_run_regex().replace_all(&current, " ").into_owned()
}

/// Full sanitization pass.
///
/// Applied until the text stops changing, so sanitizing an already
/// sanitized text is a no-op.
pub fn sanitize_text(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = remove_dates_in_parentheses(&remove_blank_lines_and_markup(&current))
            .trim()
            .to_string();
        if next == current {
            return next;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_removes_blank_and_markup_lines() {
        let text = "First line.\n\n== History ==\n  \nSecond line.\n=== Early life ===\nThird.";
        assert_eq!(
            remove_blank_lines_and_markup(text),
            "First line. Second line. Third."
        );
    }

    #[test]
    fn test_removes_nested_parentheticals() {
        assert_eq!(
            remove_dates_in_parentheses("Pedro (born 1798 (Lisbon)) was emperor."),
            "Pedro was emperor."
        );
        assert_eq!(
            remove_dates_in_parentheses("A (x (y (z))) b."),
            "A b."
        );
    }

    #[test]
    fn test_parenthetical_before_period_leaves_no_gap() {
        assert_eq!(
            remove_dates_in_parentheses("Line two (1990). Line three."),
            "Line two. Line three."
        );
    }

    #[test]
    fn test_sanitize_scenario() {
        let text = "Line one.\n=heading=\nLine two (1990). Line three.";
        assert_eq!(sanitize_text(text), "Line one. Line two. Line three.");
    }

    #[test]
    fn test_unbalanced_parenthesis_is_kept() {
        assert_eq!(sanitize_text("Open ( without close."), "Open ( without close.");
    }

    #[test]
    fn test_parenthetical_spanning_lines_is_removed() {
        assert_eq!(sanitize_text("Start (note\ncontinued) end."), "Start end.");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(text in "[a-zA-Z0-9 ().=\n\t]{0,120}") {
            let once = sanitize_text(&text);
            let twice = sanitize_text(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn sanitized_text_has_no_newlines_or_double_spaces(text in "[a-z ()=\n]{0,80}") {
            let clean = sanitize_text(&text);
            prop_assert!(!clean.contains('\n'));
            prop_assert!(!clean.contains("  "));
        }
    }
}
