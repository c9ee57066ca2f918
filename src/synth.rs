//! Synthesizer: fabricates structurally plausible replacement values
//!
//! A [`Synthesizer`] is immutable and shared; all per-call state (the
//! original → synthetic map and the RNG) lives in a [`Replacements`] context
//! that the caller creates for one `redact` call and then drops.
//!
//! Every synthetic value is drawn from reserved or fictional ranges:
//! `example.*` domains, the `555-01XX` phone block, national IDs starting
//! with `9`, and a fixed pool of names absent from the detection dictionary.
//! Phones fall back to a random `[2-9]XX-XXXX` exchange once the fictional
//! block keeps colliding. No candidate may equal a literal detected anywhere
//! in the same text, and no two real name tokens share a synthetic token.

use crate::config::{EngineConfig, YearRange};
use crate::dictionary::NameDictionary;
use crate::error::{PiiError, Result};
use crate::matcher::patterns::STREET_SUFFIXES;
use crate::types::PiiCategory;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const SAFE_FIRST_NAMES: &[&str] = &[
    "Alden", "Briar", "Corwin", "Dalia", "Elowen", "Fenna", "Greer", "Hollis", "Isolde", "Jory",
    "Kestrel", "Linnea", "Marlo", "Nell", "Orrin", "Perrin", "Quinlan", "Rowan", "Sable",
    "Tamsin", "Ulric", "Vesper", "Wren", "Yara",
];

const SAFE_LAST_NAMES: &[&str] = &[
    "Ashdown", "Brightwater", "Calloway", "Dunmore", "Everly", "Fairbanks", "Galloway",
    "Hartwell", "Ivers", "Jessup", "Kinsella", "Larkspur", "Merriweather", "Northcott",
    "Oakhurst", "Pemberton", "Quarles", "Redfern", "Stanhope", "Thornbury", "Upcott", "Vance",
    "Whitlock", "Yardley",
];

const STREET_NAMES: &[&str] = &[
    "Oak", "Pine", "Maple", "Cedar", "Elm", "Birch", "Willow", "Chestnut", "Spruce", "Hickory",
    "Sycamore", "Magnolia", "Juniper", "Laurel", "Aspen", "Poplar",
];

/// Consumer mail providers; addresses there get a generic reserved domain
const PERSONAL_MAIL_PROVIDERS: &[&str] = &[
    "gmail", "googlemail", "yahoo", "hotmail", "outlook", "live", "msn", "icloud", "me", "aol",
    "proton", "protonmail", "mail", "gmx",
];

const PERSONAL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];
const BUSINESS_DOMAIN: &str = "corp.example.com";
const DEFAULT_STREET_SUFFIX: &str = "Street";

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Per-call substitution context
///
/// Holds the original → synthetic mapping that makes repeated values
/// consistent within one call, plus the RNG driving generation.
pub struct Replacements {
    entries: HashMap<String, String>,
    issued: HashSet<String>,
    /// Detected literals of the current text; never handed out
    reserved: HashSet<String>,
    /// lower-cased name token → canonical synthetic token
    name_tokens: HashMap<String, String>,
    /// Canonical synthetic tokens already bound in `name_tokens`
    bound_tokens: HashSet<String>,
    rng: StdRng,
}

impl Replacements {
    /// Fresh context; `None` seeds from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            entries: HashMap::new(),
            issued: HashSet::new(),
            reserved: HashSet::new(),
            name_tokens: HashMap::new(),
            bound_tokens: HashSet::new(),
            rng,
        }
    }

    /// Mark literals that must never come back as a synthetic value
    ///
    /// The rewriter reserves every detected literal of a text before
    /// synthesizing any of them.
    pub fn reserve<'a>(&mut self, literals: impl IntoIterator<Item = &'a str>) {
        self.reserved.extend(literals.into_iter().map(str::to_string));
    }

    fn is_available(&self, value: &str) -> bool {
        !self.issued.contains(value) && !self.reserved.contains(value)
    }

    /// Synthetic value already assigned to `original`, if any
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Replacements {
    // Keys are raw PII; only the size is shown
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacements")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Generates synthetic values per category
#[derive(Debug)]
pub struct Synthesizer {
    dictionary: Arc<NameDictionary>,
    first_names: Vec<&'static str>,
    last_names: Vec<&'static str>,
    dob_years: YearRange,
    max_attempts: usize,
}

impl Synthesizer {
    /// Build against the detection dictionary
    ///
    /// Safe names that the dictionary would itself flag are dropped from the
    /// pools. Fails if a pool ends up empty.
    pub fn new(dictionary: Arc<NameDictionary>, config: &EngineConfig) -> Result<Self> {
        let first_names = safe_pool(SAFE_FIRST_NAMES, &dictionary);
        let last_names = safe_pool(SAFE_LAST_NAMES, &dictionary);

        if first_names.is_empty() || last_names.is_empty() {
            return Err(PiiError::Dictionary(
                "dictionary covers every synthetic name; no safe replacement names remain"
                    .to_string(),
            ));
        }

        Ok(Self {
            dictionary,
            first_names,
            last_names,
            dob_years: config.dob_years,
            max_attempts: config.max_synthesis_attempts.max(1),
        })
    }

    /// Synthetic replacement for `original`
    ///
    /// Returns the value already assigned in `replacements` when there is
    /// one; otherwise generates, records and returns a new value that differs
    /// from the original, from every value issued earlier in the call and
    /// from every reserved literal.
    pub fn synthesize(
        &self,
        category: PiiCategory,
        original: &str,
        replacements: &mut Replacements,
    ) -> String {
        if let Some(existing) = replacements.entries.get(original) {
            return existing.clone();
        }

        let mut candidate = String::new();
        for attempt in 0..self.max_attempts {
            candidate = self.generate(category, original, attempt, replacements);
            if candidate != original && replacements.is_available(&candidate) {
                if category == PiiCategory::PersonName {
                    remember_name_tokens(original, &candidate, replacements);
                }
                return commit(original, candidate, replacements);
            }
        }

        tracing::warn!(
            category = %category,
            attempts = self.max_attempts,
            "Synthesis retry budget exhausted, using sentinel suffix"
        );
        let mut n = 1;
        let sentinel = loop {
            let value = format!("{}-x{}", candidate, n);
            if value != original && replacements.is_available(&value) {
                break value;
            }
            n += 1;
        };
        commit(original, sentinel, replacements)
    }

    fn generate(
        &self,
        category: PiiCategory,
        original: &str,
        attempt: usize,
        replacements: &mut Replacements,
    ) -> String {
        match category {
            PiiCategory::Email => self.email(original, &mut replacements.rng),
            PiiCategory::Phone => {
                let fictional = attempt < self.max_attempts / 2;
                phone(original, fictional, &mut replacements.rng)
            }
            PiiCategory::NationalId => national_id(original, &mut replacements.rng),
            PiiCategory::DateOfBirth => self.date(original, &mut replacements.rng),
            PiiCategory::PostalCode => {
                let digits = random_digits(&mut replacements.rng, count_digits(original));
                fill_digits(original, &digits)
            }
            PiiCategory::StreetAddress => address(original, &mut replacements.rng),
            PiiCategory::PersonName => self.name(original, replacements),
        }
    }

    fn email(&self, original: &str, rng: &mut StdRng) -> String {
        let domain = original
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase())
            .unwrap_or_default();
        let provider = domain.split('.').next().unwrap_or_default();

        let domain = if PERSONAL_MAIL_PROVIDERS.contains(&provider) {
            pick(PERSONAL_DOMAINS, rng)
        } else {
            BUSINESS_DOMAIN
        };

        format!(
            "{}.{}{}@{}",
            pick(&self.first_names, rng).to_ascii_lowercase(),
            pick(&self.last_names, rng).to_ascii_lowercase(),
            rng.gen_range(10..=99),
            domain
        )
    }

    fn name(&self, original: &str, replacements: &mut Replacements) -> String {
        let word_count = original.split_whitespace().count();
        let mut out = String::with_capacity(original.len());
        let mut index = 0;

        for piece in original.split_inclusive([' ', '\t']) {
            let word = piece.trim_end_matches([' ', '\t']);
            let separator = &piece[word.len()..];
            if !word.is_empty() {
                let key = word.to_lowercase();
                let canonical = match replacements.name_tokens.get(&key) {
                    Some(known) => known.clone(),
                    None => {
                        let pool = if self.is_last_name_role(word, index, word_count) {
                            &self.last_names
                        } else {
                            &self.first_names
                        };
                        let unbound: Vec<&str> = pool
                            .iter()
                            .copied()
                            .filter(|name| !replacements.bound_tokens.contains(*name))
                            .collect();
                        let pool = if unbound.is_empty() { pool } else { &unbound };
                        pick(pool, &mut replacements.rng).to_string()
                    }
                };
                out.push_str(&match_case(word, &canonical));
                index += 1;
            }
            out.push_str(separator);
        }
        out
    }

    fn is_last_name_role(&self, word: &str, index: usize, word_count: usize) -> bool {
        if word_count >= 2 {
            index + 1 == word_count
        } else {
            self.dictionary.is_last_name(word) && !self.dictionary.is_first_name(word)
        }
    }

    fn date(&self, original: &str, rng: &mut StdRng) -> String {
        let year = rng.gen_range(self.dob_years.min..=self.dob_years.max);
        let month = rng.gen_range(1..=12u32);
        let day = rng.gen_range(1..=28u32);

        let runs = char_runs(original);
        let has_month_name = runs.iter().any(|run| parse_month(run).is_some());
        let fields: Vec<&str> = runs
            .iter()
            .copied()
            .filter(|run| is_digits(run) && run.len() != 4)
            .collect();

        let order: &[DateField] = if has_month_name {
            &[DateField::Day]
        } else if runs.first().is_some_and(|run| is_digits(run) && run.len() == 4) {
            &[DateField::Month, DateField::Day]
        } else if fields
            .first()
            .and_then(|f| f.parse::<u32>().ok())
            .is_some_and(|v| v > 12)
        {
            &[DateField::Day, DateField::Month]
        } else {
            &[DateField::Month, DateField::Day]
        };
        let mut roles = order.iter();

        let mut out = String::with_capacity(original.len() + 8);
        let mut after_day = false;
        for run in runs {
            let mut is_day = false;
            if is_digits(run) {
                if run.len() == 4 {
                    out.push_str(&year.to_string());
                } else {
                    match roles.next() {
                        Some(DateField::Month) => out.push_str(&pad(month, run.len())),
                        Some(DateField::Day) => {
                            out.push_str(&pad(day, run.len()));
                            is_day = true;
                        }
                        None => out.push_str(&pad(u32::from(year) % 100, run.len())),
                    }
                }
            } else if let Some(full) = parse_month(run) {
                let name = MONTHS[month as usize - 1];
                let name = if full { name } else { &name[..3] };
                out.push_str(&match_case(run, name));
            } else if after_day && is_ordinal_suffix(run) {
                out.push_str(&match_case(run, ordinal_suffix(day)));
            } else {
                out.push_str(run);
            }
            after_day = is_day;
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
enum DateField {
    Month,
    Day,
}

fn commit(original: &str, value: String, replacements: &mut Replacements) -> String {
    replacements.issued.insert(value.clone());
    replacements
        .entries
        .insert(original.to_string(), value.clone());
    value
}

fn remember_name_tokens(original: &str, synthetic: &str, replacements: &mut Replacements) {
    for (real, fake) in original.split_whitespace().zip(synthetic.split_whitespace()) {
        let key = real.to_lowercase();
        if !replacements.name_tokens.contains_key(&key) {
            let canonical = title_case(fake);
            replacements.bound_tokens.insert(canonical.clone());
            replacements.name_tokens.insert(key, canonical);
        }
    }
}

fn safe_pool(names: &[&'static str], dictionary: &NameDictionary) -> Vec<&'static str> {
    names
        .iter()
        .copied()
        .filter(|name| !dictionary.contains(name))
        .collect()
}

fn pick<'a>(pool: &[&'a str], rng: &mut StdRng) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Same-shape phone; `fictional` draws the line from the `555-01XX` block
fn phone(original: &str, fictional: bool, rng: &mut StdRng) -> String {
    let total = count_digits(original);
    let national_len = total.min(10);
    let country_code: String = original
        .chars()
        .filter(char::is_ascii_digit)
        .take(total - national_len)
        .collect();

    let national = match national_len {
        10 if !fictional => format!(
            "{}{}{}{}",
            rng.gen_range(2..=9),
            random_digits(rng, 2),
            rng.gen_range(2..=9),
            random_digits(rng, 6)
        ),
        10 => format!(
            "{}{}555{}",
            rng.gen_range(2..=9),
            random_digits(rng, 2),
            fictional_line(rng)
        ),
        7 if fictional => format!("555{}", fictional_line(rng)),
        n => {
            let tail = random_digits(rng, n.saturating_sub(1));
            format!("{}{}", rng.gen_range(2..=9), tail)
        }
    };
    let national: String = national.chars().take(national_len).collect();

    fill_digits(original, &format!("{}{}", country_code, national))
}

/// Line number in the `01XX` block reserved for fiction
fn fictional_line(rng: &mut StdRng) -> String {
    format!("01{}", random_digits(rng, 2))
}

fn national_id(original: &str, rng: &mut StdRng) -> String {
    let count = count_digits(original);
    if count == 0 {
        return original.to_string();
    }
    let digits = format!("9{}", random_digits(rng, count - 1));
    fill_digits(original, &digits)
}

fn address(original: &str, rng: &mut StdRng) -> String {
    let number_len = original.chars().take_while(char::is_ascii_digit).count();
    let number_len = if number_len == 0 { 3 } else { number_len };
    let number = format!(
        "{}{}",
        rng.gen_range(1..=9),
        random_digits(rng, number_len - 1)
    );

    let suffix = original
        .split_whitespace()
        .last()
        .map(|word| word.trim_end_matches('.'))
        .filter(|word| STREET_SUFFIXES.iter().any(|s| s.eq_ignore_ascii_case(word)))
        .unwrap_or(DEFAULT_STREET_SUFFIX);

    format!("{} {} {}", number, pick(STREET_NAMES, rng), suffix)
}

fn count_digits(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

fn random_digits(rng: &mut StdRng, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Overwrite the digits of `shape` in order, keeping every other character
fn fill_digits(shape: &str, digits: &str) -> String {
    let mut fresh = digits.chars();
    shape
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                fresh.next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Re-case `canonical` to follow `model`: ALL CAPS, all lower, or as-is
fn match_case(model: &str, canonical: &str) -> String {
    let letters = || model.chars().filter(|c| c.is_alphabetic());
    if letters().count() > 1 && letters().all(char::is_uppercase) {
        canonical.to_uppercase()
    } else if letters().all(char::is_lowercase) {
        canonical.to_lowercase()
    } else {
        canonical.to_string()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split into maximal runs of digits, letters, and everything else
fn char_runs(s: &str) -> Vec<&str> {
    fn class(c: char) -> u8 {
        if c.is_ascii_digit() {
            0
        } else if c.is_alphabetic() {
            1
        } else {
            2
        }
    }

    let mut runs = Vec::new();
    let mut start = 0;
    let mut current = None;
    for (i, c) in s.char_indices() {
        let k = class(c);
        if current.is_some_and(|prev| prev != k) {
            runs.push(&s[start..i]);
            start = i;
        }
        current = Some(k);
    }
    if start < s.len() {
        runs.push(&s[start..]);
    }
    runs
}

fn is_digits(run: &str) -> bool {
    !run.is_empty() && run.bytes().all(|b| b.is_ascii_digit())
}

/// Month lookup: `Some(true)` for a full name, `Some(false)` for an abbreviation
fn parse_month(word: &str) -> Option<bool> {
    let lower = word.to_ascii_lowercase();
    if MONTHS.iter().any(|m| m.eq_ignore_ascii_case(&lower)) {
        return Some(true);
    }
    let abbreviated = lower == "sept"
        || (lower.len() == 3
            && MONTHS
                .iter()
                .any(|m| m.to_ascii_lowercase().starts_with(&lower)));
    abbreviated.then_some(false)
}

fn is_ordinal_suffix(run: &str) -> bool {
    ["st", "nd", "rd", "th"]
        .iter()
        .any(|s| s.eq_ignore_ascii_case(run))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn pad(value: u32, width: usize) -> String {
    if width >= 2 {
        format!("{:0width$}", value, width = width)
    } else {
        value.to_string()
    }
}
