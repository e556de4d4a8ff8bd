//! Transliteration of candidate text before matching.
//!
//! An [`Alphabet`] rewrites a candidate into the script the user types in
//! (for example Han characters into pinyin) and hands back a
//! [`TranslationMapping`] so matched positions can be reported against the
//! text the user actually sees.

use std::sync::Arc;

use crate::translation::TranslationMapping;

pub mod pinyin;

pub use self::pinyin::PinyinAlphabet;

#[derive(Debug)]
pub struct TranslatedText {
    pub text: String,
    pub mapping: TranslationMapping,
}

#[derive(Debug, Clone)]
pub enum Translation<'a> {
    Unchanged(&'a str),
    Translated(Arc<TranslatedText>),
}

impl Translation<'_> {
    pub fn text(&self) -> &str {
        match self {
            Translation::Unchanged(text) => text,
            Translation::Translated(translated) => &translated.text,
        }
    }

    pub fn mapping(&self) -> Option<&TranslationMapping> {
        match self {
            Translation::Unchanged(_) => None,
            Translation::Translated(translated) => Some(&translated.mapping),
        }
    }

    pub fn map_to_original_index(&self, translated_index: usize) -> usize {
        self.mapping()
            .map_or(translated_index, |mapping| mapping.map_to_original_index(translated_index))
    }
}

pub trait Alphabet: Send + Sync {
    fn translate<'a>(&self, content: &'a str) -> Translation<'a>;

    /// Whether a query is written in the target alphabet.
    fn should_translate(&self, content: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAlphabet;

impl Alphabet for IdentityAlphabet {
    fn translate<'a>(&self, content: &'a str) -> Translation<'a> {
        Translation::Unchanged(content)
    }

    fn should_translate(&self, _content: &str) -> bool {
        false
    }
}
