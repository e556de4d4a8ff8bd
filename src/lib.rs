//! Fuzzy matching for launcher-style incremental search.
//!
//! [`StringMatcher`] decides whether a candidate label matches what the user
//! typed, scores it, and reports which characters to highlight. Candidates
//! can be transliterated first (see [`alphabet`]) while highlights stay in
//! the coordinates of the original label.

pub mod alphabet;
pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod sources;
pub mod state;
pub mod translation;

pub use alphabet::{Alphabet, IdentityAlphabet, PinyinAlphabet, Translation};
pub use error::{Error, Result};
pub use matcher::{MatchOption, StringMatcher};
pub use model::{MatchResult, SearchPrecisionScore};
pub use translation::{MappingError, TranslationMapping};
