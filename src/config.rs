//! Engine configuration
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a working engine.

use crate::error::{PiiError, Result};
use crate::types::PiiCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// How the `original` field of a redaction record is rendered for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PreviewPolicy {
    /// The raw matched text
    #[default]
    Full,
    /// First `max_chars` characters followed by `...`
    Truncated { max_chars: usize },
    /// Keep a few characters at each edge, mask the middle with `*`
    Masked {
        visible_start: usize,
        visible_end: usize,
    },
    /// Only a `[CATEGORY]` tag; the original never leaves the engine
    CategoryOnly,
}

impl PreviewPolicy {
    /// Render `original` according to this policy
    pub fn render(&self, category: PiiCategory, original: &str) -> String {
        match self {
            Self::Full => original.to_string(),
            Self::Truncated { max_chars } => {
                if original.chars().count() > *max_chars {
                    let head: String = original.chars().take(*max_chars).collect();
                    format!("{}...", head)
                } else {
                    original.to_string()
                }
            }
            Self::Masked {
                visible_start,
                visible_end,
            } => {
                let chars: Vec<char> = original.chars().collect();
                if chars.len() <= visible_start + visible_end {
                    return "*".repeat(chars.len());
                }
                chars
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        if i < *visible_start || i >= chars.len() - visible_end {
                            *c
                        } else {
                            '*'
                        }
                    })
                    .collect()
            }
            Self::CategoryOnly => format!("[{}]", category.label()),
        }
    }
}

/// Where the name dictionary comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DictionarySource {
    /// The dictionary compiled into the crate
    #[default]
    Builtin,
    /// A JSON file `{"firstNames": [...], "lastNames": [...]}`
    File { path: PathBuf },
}

/// Inclusive range of years for synthetic dates of birth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: u16,
    pub max: u16,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1950,
            max: 2005,
        }
    }
}

/// PII engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Categories to detect; anything else passes through untouched
    pub categories: Vec<PiiCategory>,

    /// Rendering of originals in redaction records
    pub preview: PreviewPolicy,

    /// Fixed RNG seed. `None` draws fresh entropy for every call.
    pub seed: Option<u64>,

    /// Attempts to draw a synthetic value distinct from the original
    /// before falling back to a sentinel suffix
    pub max_synthesis_attempts: usize,

    /// Year range for synthetic dates of birth
    pub dob_years: YearRange,

    /// Name dictionary source
    pub dictionary: DictionarySource,

    /// Replacement regexes for structured-pattern categories
    pub pattern_overrides: HashMap<PiiCategory, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            categories: PiiCategory::ALL.to_vec(),
            preview: PreviewPolicy::default(),
            seed: None,
            max_synthesis_attempts: 8,
            dob_years: YearRange::default(),
            dictionary: DictionarySource::default(),
            pattern_overrides: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PiiError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: EngineConfig = serde_json::from_str(&json).map_err(|e| {
            PiiError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Engine config loaded");
        Ok(config)
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set a fixed RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the preview policy
    pub fn with_preview(mut self, preview: PreviewPolicy) -> Self {
        self.preview = preview;
        self
    }

    /// Restrict detection to the given categories
    pub fn with_categories(mut self, categories: impl Into<Vec<PiiCategory>>) -> Self {
        self.categories = categories.into();
        self
    }

    /// Check semantic invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(PiiError::Config(
                "at least one category must be enabled".to_string(),
            ));
        }
        if self.max_synthesis_attempts == 0 {
            return Err(PiiError::Config(
                "maxSynthesisAttempts must be at least 1".to_string(),
            ));
        }
        if self.dob_years.min > self.dob_years.max {
            return Err(PiiError::Config(format!(
                "dobYears.min ({}) is greater than dobYears.max ({})",
                self.dob_years.min, self.dob_years.max
            )));
        }
        let four_digits = 1000..=9999;
        if !four_digits.contains(&self.dob_years.min) || !four_digits.contains(&self.dob_years.max) {
            return Err(PiiError::Config("dobYears must be four-digit years".to_string()));
        }
        if self.pattern_overrides.contains_key(&PiiCategory::PersonName) {
            return Err(PiiError::InvalidPattern {
                category: PiiCategory::PersonName,
                reason: "names are detected from the dictionary, not a pattern".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.categories.len(), PiiCategory::ALL.len());
        assert_eq!(config.preview, PreviewPolicy::Full);
        assert!(config.seed.is_none());
        assert_eq!(config.dictionary, DictionarySource::Builtin);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"seed": 42}"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_synthesis_attempts, 8);
        assert_eq!(config.dob_years, YearRange::default());
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "categories": ["EMAIL", "PHONE"],
            "preview": {"type": "truncated", "maxChars": 4},
            "maxSynthesisAttempts": 3,
            "dobYears": {"min": 1960, "max": 1999},
            "dictionary": {"type": "file", "path": "/etc/a3s/names.json"},
            "patternOverrides": {"POSTAL_CODE": "\\b\\d{6}\\b"}
        }"#;

        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.categories, vec![PiiCategory::Email, PiiCategory::Phone]);
        assert_eq!(config.preview, PreviewPolicy::Truncated { max_chars: 4 });
        assert_eq!(config.max_synthesis_attempts, 3);
        assert_eq!(
            config.dictionary,
            DictionarySource::File {
                path: PathBuf::from("/etc/a3s/names.json")
            }
        );
        assert_eq!(
            config.pattern_overrides[&PiiCategory::PostalCode],
            r"\b\d{6}\b"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = EngineConfig::from_json(r#"{"preview": {"type": "category_only"}}"#).unwrap();
        assert_eq!(config.preview, PreviewPolicy::CategoryOnly);

        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PiiError::Serialization(_)));

        let err = EngineConfig::from_json(r#"{"categories": []}"#).unwrap_err();
        assert!(matches!(err, PiiError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_empty_categories() {
        let config = EngineConfig::default().with_categories(Vec::new());
        assert!(matches!(config.validate(), Err(PiiError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_years() {
        let config = EngineConfig {
            dob_years: YearRange { min: 2000, max: 1990 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PiiError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = EngineConfig {
            max_synthesis_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_name_pattern_override() {
        let mut config = EngineConfig::default();
        config
            .pattern_overrides
            .insert(PiiCategory::PersonName, r"\b[A-Z]\w+\b".to_string());

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            PiiError::InvalidPattern {
                category: PiiCategory::PersonName,
                ..
            }
        ));
    }

    #[test]
    fn test_preview_full_and_category_only() {
        assert_eq!(
            PreviewPolicy::Full.render(PiiCategory::Email, "jane@corp.io"),
            "jane@corp.io"
        );
        assert_eq!(
            PreviewPolicy::CategoryOnly.render(PiiCategory::Email, "jane@corp.io"),
            "[EMAIL]"
        );
    }

    #[test]
    fn test_preview_truncated() {
        let policy = PreviewPolicy::Truncated { max_chars: 4 };
        assert_eq!(policy.render(PiiCategory::Email, "jane@corp.io"), "jane...");
        assert_eq!(policy.render(PiiCategory::PostalCode, "9021"), "9021");
    }

    #[test]
    fn test_preview_masked() {
        let policy = PreviewPolicy::Masked {
            visible_start: 2,
            visible_end: 2,
        };
        assert_eq!(
            policy.render(PiiCategory::NationalId, "123-45-6789"),
            "12*******89"
        );
        assert_eq!(policy.render(PiiCategory::PersonName, "Ann"), "***");
    }

    #[test]
    fn test_preview_masked_is_char_safe() {
        let policy = PreviewPolicy::Masked {
            visible_start: 1,
            visible_end: 1,
        };
        assert_eq!(policy.render(PiiCategory::PersonName, "Zoë"), "Z*ë");
    }

    #[test]
    fn test_preview_policy_serialization() {
        let policy = PreviewPolicy::Masked {
            visible_start: 1,
            visible_end: 3,
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"type\":\"masked\""));
        assert!(json.contains("\"visibleStart\":1"));
        assert!(json.contains("\"visibleEnd\":3"));

        let parsed: PreviewPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, policy);
    }
}
