//! # a3s-pii
//!
//! PII detection and synthetic substitution for outbound LLM traffic in the A3S ecosystem.
//!
//! ## Overview
//!
//! `a3s-pii` scans a user message for personally identifiable information and
//! replaces every occurrence with a fabricated, format-preserving stand-in
//! before the message leaves the machine. The caller gets back the sanitized
//! text plus an audit trail of what was replaced.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_pii::{EngineConfig, PiiCategory, PiiEngine};
//!
//! # fn example() -> a3s_pii::Result<()> {
//! let engine = PiiEngine::new(EngineConfig::default())?;
//!
//! let redaction = engine.redact("Hi, I'm Sarah Johnson, email sarah.j@mail.com");
//!
//! assert!(!redaction.sanitized_text.contains("sarah.j@mail.com"));
//! for record in &redaction.redactions {
//!     println!("{}: {} -> {}", record.category, record.original, record.synthetic);
//! }
//! assert_eq!(redaction.redactions[0].category, PiiCategory::PersonName);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Categories
//!
//! - **Structured patterns**: email, phone, national ID, date of birth,
//!   postal code, street address
//! - **Name dictionary**: capitalized first and last names
//!
//! ## Architecture
//!
//! - **Matcher**: runs [`Detector`]s and resolves overlapping matches
//! - **Synthesizer**: fabricates replacement values, consistent within a call
//! - **Rewriter**: splices replacements into the text in one pass
//! - **PiiEngine**: shared, thread-safe facade over all three

pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod rewriter;
pub mod synth;
pub mod types;

// Re-export core types
pub use config::{DictionarySource, EngineConfig, PreviewPolicy, YearRange};
pub use dictionary::NameDictionary;
pub use engine::PiiEngine;
pub use error::{PiiError, Result};
pub use matcher::{Detector, Matcher, NameDetector, PatternDetector};
pub use synth::{Replacements, Synthesizer};
pub use types::{PiiCategory, Redaction, RedactionRecord, Span};
