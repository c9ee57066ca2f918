//! Dictionary-based person-name detector

use super::Detector;
use crate::dictionary::NameDictionary;
use crate::types::{PiiCategory, Span};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Capitalized word: `Sarah`, `SARAH`, `McDonald`
fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b[A-Z][a-zA-Z]+\b").expect("valid token regex"))
}

/// Flags capitalized tokens found in the name dictionary
///
/// Two flagged tokens separated only by spaces merge into one span, so
/// `Sarah Johnson` is reported once as a full name.
pub struct NameDetector {
    dictionary: Arc<NameDictionary>,
}

impl NameDetector {
    pub fn new(dictionary: Arc<NameDictionary>) -> Self {
        Self { dictionary }
    }
}

impl Detector for NameDetector {
    fn category(&self) -> PiiCategory {
        PiiCategory::PersonName
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let tokens: Vec<(usize, usize)> = token_regex()
            .find_iter(text)
            .filter(|m| self.dictionary.contains(m.as_str()))
            .filter(|m| is_standalone(text, m.start(), m.end()))
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut spans = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let (start, mut end) = tokens[i];
            if let Some(&(next_start, next_end)) = tokens.get(i + 1) {
                if is_blank_gap(&text[end..next_start]) {
                    end = next_end;
                    i += 1;
                }
            }
            spans.push(Span::new(PiiCategory::PersonName, start, end, &text[start..end]));
            i += 1;
        }
        spans
    }
}

fn is_blank_gap(gap: &str) -> bool {
    !gap.is_empty() && gap.chars().all(|c| c == ' ' || c == '\t')
}

/// Reject tokens that are part of an email, handle, path or hostname,
/// e.g. the `Sarah` in `Sarah.J@mail.com` or `/home/Sarah`.
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    if let Some(prev) = text[..start].chars().next_back() {
        if matches!(prev, '@' | '.' | '_' | '-' | '+' | '/' | '\\') {
            return false;
        }
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some('@' | '_') => false,
        Some('.' | '-') => !after.next().is_some_and(|c| c.is_alphanumeric()),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        NameDetector::new(Arc::new(NameDictionary::builtin()))
            .detect(text)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn test_full_name_merges_into_one_span() {
        assert_eq!(names("My name is John Smith"), vec!["John Smith"]);
    }

    #[test]
    fn test_single_tokens() {
        assert_eq!(names("Ask Sarah, then Garcia."), vec!["Sarah", "Garcia"]);
    }

    #[test]
    fn test_lowercase_words_are_ignored() {
        assert!(names("the mark of a brown jack").is_empty());
        assert_eq!(names("Mark my words"), vec!["Mark"]);
    }

    #[test]
    fn test_upper_case_names() {
        assert_eq!(names("PATIENT: SARAH JOHNSON"), vec!["SARAH JOHNSON"]);
    }

    #[test]
    fn test_pair_limit() {
        assert_eq!(
            names("John Smith Brown arrived"),
            vec!["John Smith", "Brown"]
        );
    }

    #[test]
    fn test_punctuation_breaks_pairs() {
        assert_eq!(names("Sarah, Johnson"), vec!["Sarah", "Johnson"]);
    }

    #[test]
    fn test_tokens_inside_addresses_are_skipped() {
        assert!(names("Sarah.J@mail.com").is_empty());
        assert!(names("ping @Sarah or see /home/Sarah").is_empty());
        assert!(names("Sarah_Johnson").is_empty());
    }

    #[test]
    fn test_sentence_end_is_standalone() {
        assert_eq!(names("I met Lisa."), vec!["Lisa"]);
        assert_eq!(names("Lisa-"), vec!["Lisa"]);
    }

    #[test]
    fn test_spans_point_into_text() {
        let text = "Dear Emma Wilson,";
        let spans = NameDetector::new(Arc::new(NameDictionary::builtin())).detect(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "Emma Wilson");
        assert_eq!(spans[0].category, PiiCategory::PersonName);
    }

    #[test]
    fn test_custom_dictionary() {
        let dict = NameDictionary::from_lists(["ada"], ["lovelace"]).unwrap();
        let spans = NameDetector::new(Arc::new(dict)).detect("Ada Lovelace met John");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Ada Lovelace");
    }
}
