//! Matcher: finds PII spans in free text
//!
//! A `Matcher` runs a set of [`Detector`]s over the input and reduces their
//! raw matches to a pairwise non-overlapping set of spans, ordered by start.
//!
//! ## Conflict resolution
//!
//! Spans are resolved in two tiers. Structured-pattern spans go first,
//! sorted by start ascending, length descending, then
//! [`PiiCategory::priority`], and are accepted greedily when they do not
//! overlap an accepted span. Name-dictionary spans are then accepted under the
//! same rule, so a name-like word can never cut into an address, email or
//! phone number. Matching is deterministic: identical input always yields
//! identical spans.
//!
//! "Longer match wins" therefore holds within each tier. Across tiers the
//! structured span wins even when a name span is longer, because a name span
//! covers at most two dictionary words and never legitimately extends over a
//! pattern match; the longer name there is the false positive.

use crate::config::EngineConfig;
use crate::dictionary::NameDictionary;
use crate::error::Result;
use crate::types::{PiiCategory, Span};
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod names;
pub mod patterns;

pub use names::NameDetector;
pub use patterns::PatternDetector;

/// A category-specific PII detector
///
/// Implementations must be pure: same text in, same spans out. Spans from a
/// single detector may overlap each other; the `Matcher` resolves conflicts.
pub trait Detector: Send + Sync {
    /// Category of every span this detector produces
    fn category(&self) -> PiiCategory;

    /// Scan `text` and return raw candidate spans
    fn detect(&self, text: &str) -> Vec<Span>;

    /// Detector name for logging
    fn name(&self) -> &str {
        self.category().label()
    }
}

/// Runs detectors and resolves overlapping matches
pub struct Matcher {
    detectors: Vec<Box<dyn Detector>>,
}

impl Matcher {
    /// Build the standard detector set for the enabled categories
    pub fn new(config: &EngineConfig, dictionary: Arc<NameDictionary>) -> Result<Self> {
        let mut detectors: Vec<Box<dyn Detector>> = Vec::new();

        for category in PiiCategory::ALL {
            if !config.categories.contains(&category) {
                continue;
            }
            if category.is_structured() {
                let pattern = config.pattern_overrides.get(&category).map(String::as_str);
                detectors.push(Box::new(PatternDetector::for_category(category, pattern)?));
            } else {
                detectors.push(Box::new(NameDetector::new(dictionary.clone())));
            }
        }

        Ok(Self::with_detectors(detectors))
    }

    /// Build from an explicit detector set
    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Categories covered by the configured detectors
    pub fn categories(&self) -> Vec<PiiCategory> {
        let mut categories: Vec<PiiCategory> =
            self.detectors.iter().map(|d| d.category()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Detect non-overlapping PII spans, ordered by start position
    pub fn detect(&self, text: &str) -> Vec<Span> {
        if text.is_empty() {
            return Vec::new();
        }

        let raw: Vec<Span> = self
            .detectors
            .iter()
            .flat_map(|detector| {
                let spans = detector.detect(text);
                tracing::trace!(detector = detector.name(), count = spans.len(), "Detector ran");
                spans
            })
            .collect();

        resolve_overlaps(raw)
    }
}

/// Reduce raw spans to a non-overlapping set, ordered by start
pub fn resolve_overlaps(raw: Vec<Span>) -> Vec<Span> {
    let mut candidates: Vec<Span> = raw.into_iter().filter(|s| !s.is_empty()).collect();
    candidates.sort_by(|a, b| {
        tier(a.category)
            .cmp(&tier(b.category))
            .then(a.start.cmp(&b.start))
            .then(b.len().cmp(&a.len()))
            .then(a.category.priority().cmp(&b.category.priority()))
    });

    // start -> end of every accepted span
    let mut accepted: BTreeMap<usize, Span> = BTreeMap::new();

    for span in candidates {
        let clashes_before = accepted
            .range(..=span.start)
            .next_back()
            .is_some_and(|(_, prev)| prev.end > span.start);
        let clashes_after = accepted
            .range(span.start..)
            .next()
            .is_some_and(|(start, _)| *start < span.end);

        if !clashes_before && !clashes_after {
            accepted.insert(span.start, span);
        }
    }

    accepted.into_values().collect()
}

fn tier(category: PiiCategory) -> u8 {
    if category.is_structured() {
        0
    } else {
        1
    }
}
