//! Core types for the a3s-pii engine
//!
//! All output types use camelCase JSON serialization so callers can hand
//! them straight to a web layer or session transcript.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category of personally identifiable information
///
/// Closed set. Adding a category means adding a detector and a
/// synthesizer arm for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiCategory {
    Email,
    Phone,
    NationalId,
    DateOfBirth,
    PostalCode,
    StreetAddress,
    PersonName,
}

impl PiiCategory {
    /// Every supported category, in display order
    pub const ALL: [PiiCategory; 7] = [
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::NationalId,
        PiiCategory::DateOfBirth,
        PiiCategory::PostalCode,
        PiiCategory::StreetAddress,
        PiiCategory::PersonName,
    ];

    /// Stable upper-case label (`EMAIL`, `NATIONAL_ID`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::NationalId => "NATIONAL_ID",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::PostalCode => "POSTAL_CODE",
            Self::StreetAddress => "STREET_ADDRESS",
            Self::PersonName => "PERSON_NAME",
        }
    }

    /// Tie-break rank when two spans share start and length. Lower wins.
    ///
    /// Structured patterns rank ahead of the name dictionary because they
    /// are far less likely to false-positive.
    pub fn priority(&self) -> u8 {
        match self {
            Self::NationalId => 0,
            Self::Email => 1,
            Self::Phone => 2,
            Self::DateOfBirth => 3,
            Self::StreetAddress => 4,
            Self::PostalCode => 5,
            Self::PersonName => 6,
        }
    }

    /// Whether this category is detected by a structured regex pattern
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::PersonName)
    }
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected PII occurrence
///
/// `start`/`end` form a half-open byte range into the scanned text and
/// always fall on UTF-8 character boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub category: PiiCategory,
    pub start: usize,
    pub end: usize,
    /// The literal matched substring
    pub text: String,
}

impl Span {
    pub fn new(category: PiiCategory, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            category,
            start,
            end,
            text: text.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the two half-open ranges share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Audit entry for one replaced PII occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionRecord {
    pub category: PiiCategory,
    /// What was found, rendered through the configured preview policy
    pub original: String,
    /// The synthetic value inserted in its place
    pub synthetic: String,
    /// Byte offset of the occurrence in the original text
    pub start: usize,
    /// End byte offset (exclusive) in the original text
    pub end: usize,
}

/// Result of one `redact` call
///
/// Only `sanitized_text` may cross the network boundary; `redactions` is
/// meant for the end user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redaction {
    pub sanitized_text: String,
    pub redactions: Vec<RedactionRecord>,
}

impl Redaction {
    /// True if nothing was replaced
    pub fn is_clean(&self) -> bool {
        self.redactions.is_empty()
    }

    /// Number of redactions per category
    pub fn categories(&self) -> BTreeMap<PiiCategory, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.redactions {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }
}
