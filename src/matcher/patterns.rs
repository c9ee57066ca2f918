//! Structured-pattern detectors
//!
//! One regex per category. The regex crate has no look-around, so each
//! built-in pattern is paired with a validator that sees the surrounding
//! text and rejects matches glued to longer numeric runs or implausible
//! field values.

use super::Detector;
use crate::error::{PiiError, Result};
use crate::types::{PiiCategory, Span};
use regex::Regex;

/// Post-match check: `(text, start, end) -> keep?`
pub type Validator = fn(&str, usize, usize) -> bool;

const EMAIL_PATTERN: &str = r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b";

const PHONE_PATTERN: &str = concat!(
    r"(?:\+\d{1,3}[-. ]?|\b1[-. ])?(?:\(\d{3}\) ?|\b\d{3}[-. ]?)\d{3}[-. ]?\d{4}\b",
    r"|\b\d{3}[-.]\d{4}\b",
);

const NATIONAL_ID_PATTERN: &str = r"\b(?:\d{3}-\d{2}-\d{4}|\d{3} \d{2} \d{4}|\d{9})\b";

const MONTH_NAMES: &str = "(?i:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)";

const POSTAL_CODE_PATTERN: &str = r"\b\d{5}(?:-\d{4})?\b";

const STREET_ADDRESS_PATTERN: &str = concat!(
    r"\b\d{1,6}[ \t]+(?:(?:[A-Z][A-Za-z]*|\d+(?:st|nd|rd|th))\.?[ \t]+){1,4}",
    r"(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl|Way|Terrace|Ter|Circle|Cir|Parkway|Pkwy)\b",
);

/// Street-suffix vocabulary recognised by the address pattern
pub const STREET_SUFFIXES: &[&str] = &[
    "Street", "St", "Avenue", "Ave", "Road", "Rd", "Boulevard", "Blvd", "Lane", "Ln", "Drive",
    "Dr", "Court", "Ct", "Place", "Pl", "Way", "Terrace", "Ter", "Circle", "Cir", "Parkway",
    "Pkwy",
];

fn date_of_birth_pattern() -> String {
    [
        // MM/DD/YYYY, DD-MM-YYYY, DD.MM.YYYY
        r"\b\d{1,2}[/.-]\d{1,2}[/.-](?:19|20)\d{2}\b".to_string(),
        // YYYY-MM-DD, YYYY/MM/DD
        r"\b(?:19|20)\d{2}[/.-]\d{1,2}[/.-]\d{1,2}\b".to_string(),
        // April 12, 1990 / Apr. 12th 1990
        format!(
            r"\b{}\.?[ \t]+\d{{1,2}}(?:st|nd|rd|th)?,?[ \t]+(?:19|20)\d{{2}}\b",
            MONTH_NAMES
        ),
        // 12 April 1990 / 12th of April, 1990
        format!(
            r"\b\d{{1,2}}(?:st|nd|rd|th)?[ \t]+(?:of[ \t]+)?{}\.?,?[ \t]+(?:19|20)\d{{2}}\b",
            MONTH_NAMES
        ),
    ]
    .join("|")
}

/// Built-in pattern and validator for a structured category
pub fn default_pattern(category: PiiCategory) -> Option<(String, Option<Validator>)> {
    let entry: (String, Option<Validator>) = match category {
        PiiCategory::Email => (EMAIL_PATTERN.to_string(), None),
        PiiCategory::Phone => (
            PHONE_PATTERN.to_string(),
            Some(isolated_number as Validator),
        ),
        PiiCategory::NationalId => (
            NATIONAL_ID_PATTERN.to_string(),
            Some(isolated_number as Validator),
        ),
        PiiCategory::DateOfBirth => (
            date_of_birth_pattern(),
            Some(plausible_date as Validator),
        ),
        PiiCategory::PostalCode => (
            POSTAL_CODE_PATTERN.to_string(),
            Some(isolated_number as Validator),
        ),
        PiiCategory::StreetAddress => (
            STREET_ADDRESS_PATTERN.to_string(),
            Some(isolated_number as Validator),
        ),
        PiiCategory::PersonName => return None,
    };
    Some(entry)
}

/// Regex-based detector for one structured category
#[derive(Debug)]
pub struct PatternDetector {
    category: PiiCategory,
    regex: Regex,
    validator: Option<Validator>,
}

impl PatternDetector {
    /// Compile a detector from an explicit pattern
    pub fn new(category: PiiCategory, pattern: &str) -> Result<Self> {
        if !category.is_structured() {
            return Err(PiiError::InvalidPattern {
                category,
                reason: "category is not pattern-based".to_string(),
            });
        }
        let regex = Regex::new(pattern).map_err(|e| PiiError::InvalidPattern {
            category,
            reason: e.to_string(),
        })?;
        Ok(Self {
            category,
            regex,
            validator: None,
        })
    }

    /// Built-in detector for `category`, or one compiled from `pattern` if given
    ///
    /// Overridden patterns run without the built-in validator.
    pub fn for_category(category: PiiCategory, pattern: Option<&str>) -> Result<Self> {
        if let Some(pattern) = pattern {
            return Self::new(category, pattern);
        }
        let (pattern, validator) =
            default_pattern(category).ok_or_else(|| PiiError::InvalidPattern {
                category,
                reason: "category is not pattern-based".to_string(),
            })?;
        let mut detector = Self::new(category, &pattern)?;
        detector.validator = validator;
        Ok(detector)
    }

    /// Attach a post-match validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

impl Detector for PatternDetector {
    fn category(&self) -> PiiCategory {
        self.category
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        self.regex
            .find_iter(text)
            .filter(|m| {
                self.validator
                    .map_or(true, |validate| validate(text, m.start(), m.end()))
            })
            .map(|m| Span::new(self.category, m.start(), m.end(), m.as_str()))
            .collect()
    }
}

/// Reject numbers glued to neighbouring words or digit groups,
/// e.g. the `90210` inside `12-90210` or `A90210`.
fn isolated_number(text: &str, start: usize, end: usize) -> bool {
    let mut before = text[..start].chars().rev();
    match before.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => return false,
        Some('-' | '.' | '/') if before.next().is_some_and(|c| c.is_ascii_digit()) => {
            return false
        }
        _ => {}
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => false,
        Some('-' | '.' | '/') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    }
}

/// Day/month fields within plausible ranges and consistent separators
fn plausible_date(text: &str, start: usize, end: usize) -> bool {
    if !isolated_number(text, start, end) {
        return false;
    }
    let matched = &text[start..end];

    let fields: Vec<&str> = matched
        .split(|c: char| !c.is_ascii_digit())
        .filter(|f| !f.is_empty())
        .collect();
    let values: Vec<u32> = fields.iter().filter_map(|f| f.parse().ok()).collect();

    if matched.chars().any(|c| c.is_alphabetic()) {
        // Written month: one day field and one year field
        return values
            .iter()
            .zip(&fields)
            .filter(|(_, f)| f.len() <= 2)
            .all(|(v, _)| (1..=31).contains(v));
    }

    let separators: Vec<char> = matched.chars().filter(|c| !c.is_ascii_digit()).collect();
    if values.len() != 3 || separators.len() != 2 || separators[0] != separators[1] {
        return false;
    }

    if fields[0].len() == 4 {
        (1..=12).contains(&values[1]) && (1..=31).contains(&values[2])
    } else {
        let (a, b) = (values[0], values[1]);
        (1..=31).contains(&a) && (1..=31).contains(&b) && a.min(b) <= 12
    }
}
