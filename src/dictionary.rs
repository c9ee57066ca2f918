//! Name dictionary for person-name detection
//!
//! Two ordered sets of lower-cased names, loaded once and shared read-only
//! for the lifetime of the process. An empty dictionary is rejected: running
//! without name detection would silently weaken the protection guarantee.

use crate::config::DictionarySource;
use crate::error::{PiiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

const BUILTIN_FIRST_NAMES: &[&str] = &[
    "james", "mary", "john", "patricia", "robert", "jennifer", "michael", "linda",
    "william", "elizabeth", "david", "barbara", "richard", "susan", "joseph", "jessica",
    "thomas", "sarah", "charles", "karen", "christopher", "nancy", "daniel", "lisa",
    "matthew", "betty", "anthony", "helen", "mark", "sandra", "donald", "donna",
    "steven", "carol", "paul", "ruth", "andrew", "sharon", "joshua", "michelle",
    "kenneth", "laura", "kevin", "brian", "kimberly", "george", "deborah", "timothy",
    "dorothy", "ronald", "jason", "edward", "jeffrey", "ryan", "jacob", "gary",
    "nicholas", "eric", "jonathan", "stephen", "larry", "justin", "scott", "brandon",
    "benjamin", "samuel", "amy", "gregory", "angela", "alexander", "ashley", "patrick",
    "brenda", "frank", "emma", "raymond", "olivia", "jack", "cynthia",
];

const BUILTIN_LAST_NAMES: &[&str] = &[
    "smith", "johnson", "williams", "brown", "jones", "garcia", "miller", "davis",
    "rodriguez", "martinez", "hernandez", "lopez", "gonzalez", "wilson", "anderson",
    "thomas", "taylor", "moore", "jackson", "martin", "lee", "perez", "thompson",
    "white", "harris", "sanchez", "clark", "ramirez", "lewis", "robinson", "walker",
    "young", "allen", "king", "wright", "scott", "torres", "nguyen", "hill",
    "flores", "green", "adams", "nelson", "baker", "hall", "rivera", "campbell",
    "mitchell", "carter", "roberts", "gomez", "phillips", "evans", "turner", "diaz",
    "parker", "cruz", "edwards", "collins", "reyes", "stewart", "morris", "morales",
    "murphy", "cook", "rogers", "gutierrez", "ortiz", "morgan", "cooper", "peterson",
    "bailey", "reed", "kelly", "howard", "ramos", "kim", "cox", "ward", "richardson",
    "watson", "brooks", "chavez", "wood", "james", "bennett", "gray", "mendoza",
];

/// On-disk dictionary format
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DictionaryFile {
    first_names: Vec<String>,
    last_names: Vec<String>,
}

/// Read-only set of known first and last names
#[derive(Debug, Clone)]
pub struct NameDictionary {
    first: BTreeSet<String>,
    last: BTreeSet<String>,
}

impl NameDictionary {
    /// The dictionary compiled into the crate
    pub fn builtin() -> Self {
        Self {
            first: BUILTIN_FIRST_NAMES.iter().map(|n| n.to_string()).collect(),
            last: BUILTIN_LAST_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Build from explicit lists. Entries are trimmed and lower-cased;
    /// blanks are dropped. Fails if either list ends up empty.
    pub fn from_lists<I, J, S, T>(first: I, last: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let first = normalize(first);
        let last = normalize(last);

        if first.is_empty() {
            return Err(PiiError::Dictionary("first-name list is empty".to_string()));
        }
        if last.is_empty() {
            return Err(PiiError::Dictionary("last-name list is empty".to_string()));
        }

        Ok(Self { first, last })
    }

    /// Load a JSON dictionary file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PiiError::Dictionary(format!(
                "Failed to read dictionary file {}: {}",
                path.display(),
                e
            ))
        })?;

        let file: DictionaryFile = serde_json::from_str(&json).map_err(|e| {
            PiiError::Dictionary(format!(
                "Failed to parse dictionary file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_lists(file.first_names, file.last_names).map_err(|e| match e {
            PiiError::Dictionary(reason) => {
                PiiError::Dictionary(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Load from a configured source
    pub fn load(source: &DictionarySource) -> Result<Self> {
        let dictionary = match source {
            DictionarySource::Builtin => Self::builtin(),
            DictionarySource::File { path } => Self::from_file(path)?,
        };

        tracing::info!(
            source = ?source,
            first_names = dictionary.first_count(),
            last_names = dictionary.last_count(),
            "Name dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Case-insensitive first-name lookup
    pub fn is_first_name(&self, word: &str) -> bool {
        self.first.contains(&word.to_lowercase())
    }

    /// Case-insensitive last-name lookup
    pub fn is_last_name(&self, word: &str) -> bool {
        self.last.contains(&word.to_lowercase())
    }

    /// True if the word is in either list
    pub fn contains(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.first.contains(&lower) || self.last.contains(&lower)
    }

    pub fn first_count(&self) -> usize {
        self.first.len()
    }

    pub fn last_count(&self) -> usize {
        self.last.len()
    }
}

fn normalize<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}
