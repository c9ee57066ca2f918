//! Rewriter: splices synthetic values into the text

use crate::config::PreviewPolicy;
use crate::synth::{Replacements, Synthesizer};
use crate::types::{Redaction, RedactionRecord, Span};

/// Replace every span in one left-to-right pass
///
/// `spans` must be non-overlapping and sorted by start, as produced by the
/// matcher. Text between spans is copied verbatim. Every detected literal is
/// reserved up front, so no span is replaced by another span's real value.
pub fn rewrite(
    text: &str,
    spans: &[Span],
    synthesizer: &Synthesizer,
    replacements: &mut Replacements,
    preview: &PreviewPolicy,
) -> Redaction {
    if spans.is_empty() {
        return Redaction {
            sanitized_text: text.to_string(),
            redactions: Vec::new(),
        };
    }

    replacements.reserve(spans.iter().map(|span| &text[span.start..span.end]));

    let mut sanitized = String::with_capacity(text.len() + text.len() / 8);
    let mut redactions = Vec::with_capacity(spans.len());
    let mut cursor = 0;

    for span in spans {
        debug_assert!(span.start >= cursor, "spans must be sorted and disjoint");
        let original = &text[span.start..span.end];
        let synthetic = synthesizer.synthesize(span.category, original, replacements);

        sanitized.push_str(&text[cursor..span.start]);
        sanitized.push_str(&synthetic);
        cursor = span.end;

        redactions.push(RedactionRecord {
            category: span.category,
            original: preview.render(span.category, original),
            synthetic,
            start: span.start,
            end: span.end,
        });
    }
    sanitized.push_str(&text[cursor..]);

    Redaction {
        sanitized_text: sanitized,
        redactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::dictionary::NameDictionary;
    use crate::types::PiiCategory;
    use std::sync::Arc;

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(Arc::new(NameDictionary::builtin()), &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_no_spans_returns_input() {
        let redaction = rewrite(
            "nothing here",
            &[],
            &synthesizer(),
            &mut Replacements::new(Some(1)),
            &PreviewPolicy::Full,
        );
        assert_eq!(redaction.sanitized_text, "nothing here");
        assert!(redaction.is_clean());
    }

    #[test]
    fn test_splice_keeps_surrounding_text() {
        let text = "Zip 90210, then 10001.";
        let spans = vec![
            Span::new(PiiCategory::PostalCode, 4, 9, "90210"),
            Span::new(PiiCategory::PostalCode, 16, 21, "10001"),
        ];

        let redaction = rewrite(
            text,
            &spans,
            &synthesizer(),
            &mut Replacements::new(Some(2)),
            &PreviewPolicy::Full,
        );

        let out = &redaction.sanitized_text;
        assert_eq!(out.len(), text.len());
        assert!(out.starts_with("Zip "));
        assert_eq!(&out[9..16], ", then ");
        assert!(out.ends_with('.'));
        assert_ne!(&out[4..9], "90210");

        assert_eq!(redaction.redactions.len(), 2);
        assert_eq!(redaction.redactions[0].original, "90210");
        assert_eq!(redaction.redactions[0].start, 4);
        assert_eq!(redaction.redactions[1].end, 21);
        assert_eq!(&out[16..21], redaction.redactions[1].synthetic);
    }

    #[test]
    fn test_repeated_values_share_synthetic() {
        let text = "a@b.io and a@b.io";
        let spans = vec![
            Span::new(PiiCategory::Email, 0, 6, "a@b.io"),
            Span::new(PiiCategory::Email, 11, 17, "a@b.io"),
        ];
        let redaction = rewrite(
            text,
            &spans,
            &synthesizer(),
            &mut Replacements::new(Some(3)),
            &PreviewPolicy::Full,
        );
        assert_eq!(
            redaction.redactions[0].synthetic,
            redaction.redactions[1].synthetic
        );
    }

    #[test]
    fn test_synthetic_never_reuses_another_detected_literal() {
        let text = "Call 555-0123 or 555-0145";
        let spans = vec![
            Span::new(PiiCategory::Phone, 5, 13, "555-0123"),
            Span::new(PiiCategory::Phone, 17, 25, "555-0145"),
        ];
        let synth = synthesizer();
        for seed in 0..500 {
            let redaction = rewrite(
                text,
                &spans,
                &synth,
                &mut Replacements::new(Some(seed)),
                &PreviewPolicy::Full,
            );
            let out = &redaction.sanitized_text;
            assert!(!out.contains("555-0123"), "seed {}: {}", seed, out);
            assert!(!out.contains("555-0145"), "seed {}: {}", seed, out);
        }
    }

    #[test]
    fn test_preview_policy_applies_to_records_only() {
        let text = "SSN 123-45-6789";
        let spans = vec![Span::new(PiiCategory::NationalId, 4, 15, "123-45-6789")];
        let redaction = rewrite(
            text,
            &spans,
            &synthesizer(),
            &mut Replacements::new(Some(4)),
            &PreviewPolicy::CategoryOnly,
        );
        assert_eq!(redaction.redactions[0].original, "[NATIONAL_ID]");
        assert!(redaction.sanitized_text.starts_with("SSN 9"));
    }

    #[test]
    fn test_multibyte_text_around_spans() {
        let text = "Café ☕ 90210 ünd";
        let start = text.find("90210").unwrap();
        let spans = vec![Span::new(PiiCategory::PostalCode, start, start + 5, "90210")];
        let redaction = rewrite(
            text,
            &spans,
            &synthesizer(),
            &mut Replacements::new(Some(5)),
            &PreviewPolicy::Full,
        );
        assert!(redaction.sanitized_text.starts_with("Café ☕ "));
        assert!(redaction.sanitized_text.ends_with(" ünd"));
    }
}
