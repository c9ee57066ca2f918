//! PiiEngine: the caller-facing facade
//!
//! Wires Matcher → Synthesizer → Rewriter. The engine holds only read-only
//! state, so one instance can be shared across threads and called through
//! `&self` without locking.

use crate::config::EngineConfig;
use crate::dictionary::NameDictionary;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::rewriter;
use crate::synth::{Replacements, Synthesizer};
use crate::types::{PiiCategory, Redaction, Span};
use std::sync::Arc;

/// PII detection and synthetic substitution engine
pub struct PiiEngine {
    config: EngineConfig,
    dictionary: Arc<NameDictionary>,
    matcher: Matcher,
    synthesizer: Synthesizer,
}

impl PiiEngine {
    /// Build an engine, loading the configured name dictionary
    ///
    /// Fails if the config is invalid, the dictionary cannot be loaded, or a
    /// pattern override does not compile.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let dictionary = Arc::new(NameDictionary::load(&config.dictionary)?);
        Self::with_dictionary(config, dictionary)
    }

    /// Build an engine around an already-loaded dictionary
    pub fn with_dictionary(config: EngineConfig, dictionary: Arc<NameDictionary>) -> Result<Self> {
        config.validate()?;
        let matcher = Matcher::new(&config, dictionary.clone())?;
        let synthesizer = Synthesizer::new(dictionary.clone(), &config)?;

        tracing::info!(
            categories = ?matcher.categories(),
            seeded = config.seed.is_some(),
            "PII engine ready"
        );

        Ok(Self {
            config,
            dictionary,
            matcher,
            synthesizer,
        })
    }

    /// Every category the engine knows how to detect
    pub fn supported_categories() -> &'static [PiiCategory] {
        &PiiCategory::ALL
    }

    /// Categories enabled by this engine's config
    pub fn enabled_categories(&self) -> Vec<PiiCategory> {
        self.matcher.categories()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &Arc<NameDictionary> {
        &self.dictionary
    }

    /// Detect PII spans without rewriting
    pub fn detect(&self, text: &str) -> Vec<Span> {
        self.matcher.detect(text)
    }

    /// Replace every detected PII occurrence with a synthetic value
    ///
    /// Uses the configured seed if any, otherwise fresh entropy per call.
    pub fn redact(&self, text: &str) -> Redaction {
        self.redact_with(text, Replacements::new(self.config.seed))
    }

    /// Like [`redact`](Self::redact) with an explicit RNG seed
    pub fn redact_seeded(&self, text: &str, seed: u64) -> Redaction {
        self.redact_with(text, Replacements::new(Some(seed)))
    }

    fn redact_with(&self, text: &str, mut replacements: Replacements) -> Redaction {
        let spans = self.matcher.detect(text);
        let redaction = rewriter::rewrite(
            text,
            &spans,
            &self.synthesizer,
            &mut replacements,
            &self.config.preview,
        );

        tracing::debug!(
            input_len = text.len(),
            spans = spans.len(),
            categories = ?redaction.categories(),
            "Redaction complete"
        );
        redaction
    }
}

impl std::fmt::Debug for PiiEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiiEngine")
            .field("categories", &self.matcher.categories())
            .field("seed", &self.config.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DictionarySource, PreviewPolicy};
    use crate::error::PiiError;

    fn engine() -> PiiEngine {
        PiiEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PiiEngine>();
    }

    #[test]
    fn test_supported_categories() {
        assert_eq!(PiiEngine::supported_categories().len(), 7);
        assert_eq!(engine().enabled_categories().len(), 7);
    }

    #[test]
    fn test_redact_empty_text() {
        let redaction = engine().redact("");
        assert_eq!(redaction.sanitized_text, "");
        assert!(redaction.is_clean());
    }

    #[test]
    fn test_redact_replaces_all_spans() {
        let engine = engine();
        let text = "Mail jane.doe@example.com or call 555-123-4567";
        let redaction = engine.redact(text);

        assert_eq!(redaction.redactions.len(), 2);
        assert!(!redaction.sanitized_text.contains("jane.doe@example.com"));
        assert!(!redaction.sanitized_text.contains("555-123-4567"));
        assert!(redaction.sanitized_text.starts_with("Mail "));
    }

    #[test]
    fn test_configured_seed_is_deterministic() {
        let engine = PiiEngine::new(EngineConfig::default().with_seed(42)).unwrap();
        let text = "SSN 123-45-6789";
        assert_eq!(engine.redact(text), engine.redact(text));
        assert_eq!(engine.redact(text), engine.redact_seeded(text, 42));
    }

    #[test]
    fn test_disabled_category_passes_through() {
        let config = EngineConfig::default().with_categories(vec![PiiCategory::Email]);
        let engine = PiiEngine::new(config).unwrap();
        let redaction = engine.redact("Call 555-123-4567");
        assert!(redaction.is_clean());
        assert_eq!(redaction.sanitized_text, "Call 555-123-4567");
    }

    #[test]
    fn test_preview_policy_flows_into_records() {
        let config = EngineConfig::default().with_preview(PreviewPolicy::CategoryOnly);
        let engine = PiiEngine::new(config).unwrap();
        let redaction = engine.redact("Zip 90210");
        assert_eq!(redaction.redactions[0].original, "[POSTAL_CODE]");
    }

    #[test]
    fn test_missing_dictionary_fails_fast() {
        let config = EngineConfig {
            dictionary: DictionarySource::File {
                path: "/nonexistent/a3s-pii/names.json".into(),
            },
            ..Default::default()
        };
        assert!(matches!(
            PiiEngine::new(config),
            Err(PiiError::Dictionary(_))
        ));
    }

    #[test]
    fn test_bad_pattern_override_fails() {
        let mut config = EngineConfig::default();
        config
            .pattern_overrides
            .insert(PiiCategory::Phone, "[".to_string());
        assert!(matches!(
            PiiEngine::new(config),
            Err(PiiError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_shared_dictionary() {
        let dictionary = Arc::new(NameDictionary::builtin());
        let a = PiiEngine::with_dictionary(EngineConfig::default(), dictionary.clone()).unwrap();
        let b = PiiEngine::with_dictionary(EngineConfig::default(), dictionary.clone()).unwrap();
        assert!(Arc::ptr_eq(a.dictionary(), b.dictionary()));
    }

    #[test]
    fn test_debug_omits_dictionary() {
        let debug = format!("{:?}", engine());
        assert!(debug.starts_with("PiiEngine"));
        assert!(!debug.contains("sarah"));
    }
}
