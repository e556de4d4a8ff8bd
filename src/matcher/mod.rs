//! Launcher-style fuzzy matching.
//!
//! A query is matched against a candidate with two strategies that advance
//! together over one left-to-right scan of the candidate:
//!
//! - **Acronym match.** Characters at index 0, after whitespace, uppercase
//!   letters and digits are acronyms. The match succeeds when every query
//!   character is consumed, in order, by an acronym. Its score is the share
//!   of the candidate's acronyms that were used.
//! - **Substring match.** The query is split on whitespace and every piece
//!   must appear in order. When a piece's character matches after a gap, the
//!   scan looks back to see whether the whole prefix of the piece also ends
//!   here and, if so, re-anchors onto that contiguous run.
//!
//! An acronym match wins when its score meets the precision level; otherwise
//! the substring result is scored and returned.

mod score;

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::alphabet::{Alphabet, IdentityAlphabet, Translation};
use crate::model::{MatchResult, SearchPrecisionScore};
use self::score::{acronym_score, closest_space_before, substring_score, SubstringMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOption {
    pub ignore_case: bool,
}

impl Default for MatchOption {
    fn default() -> Self {
        Self { ignore_case: true }
    }
}

fn fold(c: char, ignore_case: bool) -> char {
    if !ignore_case {
        c
    } else if c.is_ascii() {
        c.to_ascii_lowercase()
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

fn is_acronym_char(text: &[char], index: usize) -> bool {
    index == 0 || text[index].is_uppercase() || text[index - 1].is_whitespace()
}

fn is_acronym(text: &[char], index: usize) -> bool {
    is_acronym_char(text, index) || text[index].is_ascii_digit()
}

struct AcronymScan<'q> {
    query: &'q [char],
    query_index: usize,
    matched: Vec<usize>,
    total: usize,
}

impl<'q> AcronymScan<'q> {
    fn new(query: &'q [char]) -> Self {
        Self {
            query,
            query_index: 0,
            matched: Vec::with_capacity(query.len()),
            total: 0,
        }
    }

    fn step(&mut self, original: &[char], folded: &[char], index: usize) {
        // Digits match as acronyms but only a digit that starts a word adds to
        // the total, so "2019" counts once.
        if is_acronym_char(original, index) {
            self.total += 1;
        }

        if self.query_index < self.query.len()
            && is_acronym(original, index)
            && folded[index] == self.query[self.query_index]
        {
            self.matched.push(index);
            self.query_index += 1;
        }
    }

    fn is_complete(&self) -> bool {
        !self.matched.is_empty() && self.matched.len() == self.query.len()
    }
}

struct SubstringScan<'q> {
    substrings: Vec<&'q [char]>,
    substring_index: usize,
    char_index: usize,
    first_match: Option<usize>,
    first_match_in_word: usize,
    last_match: usize,
    all_matched: bool,
    match_in_previous: bool,
    all_contiguous: bool,
    indices: Vec<usize>,
    space_indices: Vec<usize>,
}

impl<'q> SubstringScan<'q> {
    fn new(query: &'q [char]) -> Self {
        let substrings: Vec<&[char]> = query
            .split(|c| c.is_whitespace())
            .filter(|piece| !piece.is_empty())
            .collect();

        Self {
            substrings,
            substring_index: 0,
            char_index: 0,
            first_match: None,
            first_match_in_word: 0,
            last_match: 0,
            all_matched: false,
            match_in_previous: false,
            all_contiguous: true,
            indices: Vec::with_capacity(query.len()),
            space_indices: Vec::new(),
        }
    }

    fn step(&mut self, folded: &[char], index: usize) {
        let c = folded[index];

        // Only spaces seen while on the first piece can precede the first match.
        if c.is_whitespace() && self.substring_index == 0 {
            self.space_indices.push(index);
        }

        if self.all_matched || c != self.substrings[self.substring_index][self.char_index] {
            self.match_in_previous = false;
            return;
        }

        let current = self.substrings[self.substring_index];

        if self.first_match.is_none() {
            self.first_match = Some(index);
        }

        if self.char_index == 0 {
            self.match_in_previous = true;
            self.first_match_in_word = index;
        } else if !self.match_in_previous {
            // Matched after a gap: check whether the whole prefix of the piece
            // also ends right here.
            let start = index - self.char_index;
            if folded[start..index] == current[..self.char_index] {
                self.match_in_previous = true;
                if self.substring_index == 0 {
                    self.first_match = Some(start);
                }
                let first_in_word = self.first_match_in_word;
                self.indices.retain(|&i| i < first_in_word);
                self.indices.extend(start..index);
            }
        }

        self.last_match = index + 1;
        self.indices.push(index);
        self.char_index += 1;

        if self.char_index == current.len() {
            self.all_contiguous = self.match_in_previous && self.all_contiguous;
            self.substring_index += 1;
            if self.substring_index >= self.substrings.len() {
                self.all_matched = true;
            } else {
                self.char_index = 0;
            }
        }
    }
}

fn original_indices(indices: &[usize], translation: &Translation<'_>) -> Vec<usize> {
    let mut out = Vec::with_capacity(indices.len());
    for &index in indices {
        let original = translation.map_to_original_index(index);
        if !out.contains(&original) {
            out.push(original);
        }
    }
    out
}

pub struct StringMatcher {
    alphabet: Arc<dyn Alphabet>,
    precision: AtomicU8,
    default_option: MatchOption,
}

impl Default for StringMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StringMatcher {
    pub fn new() -> Self {
        Self::with_alphabet(Arc::new(IdentityAlphabet))
    }

    pub fn with_alphabet(alphabet: Arc<dyn Alphabet>) -> Self {
        Self {
            alphabet,
            precision: AtomicU8::new(SearchPrecisionScore::default() as u8),
            default_option: MatchOption::default(),
        }
    }

    pub fn with_precision(self, precision: SearchPrecisionScore) -> Self {
        self.set_precision(precision);
        self
    }

    pub fn with_option(mut self, option: MatchOption) -> Self {
        self.default_option = option;
        self
    }

    pub fn precision(&self) -> SearchPrecisionScore {
        SearchPrecisionScore::from_u8(self.precision.load(Ordering::Acquire))
    }

    pub fn set_precision(&self, precision: SearchPrecisionScore) {
        self.precision.store(precision as u8, Ordering::Release);
    }

    pub fn alphabet(&self) -> &Arc<dyn Alphabet> {
        &self.alphabet
    }

    pub fn fuzzy_match(&self, query: &str, candidate: &str) -> MatchResult {
        self.fuzzy_match_with(query, candidate, self.default_option)
    }

    pub fn fuzzy_match_with(&self, query: &str, candidate: &str, option: MatchOption) -> MatchResult {
        let precision = self.precision();
        let query = query.trim();
        if query.is_empty() || candidate.is_empty() {
            return MatchResult::failed(precision);
        }

        let translation = self.alphabet.translate(candidate);
        let original: Vec<char> = translation.text().chars().collect();
        let folded: Vec<char> = original.iter().map(|&c| fold(c, option.ignore_case)).collect();
        let query: Vec<char> = query.chars().map(|c| fold(c, option.ignore_case)).collect();

        let mut acronym = AcronymScan::new(&query);
        let mut substring = SubstringScan::new(&query);

        for index in 0..folded.len() {
            acronym.step(&original, &folded, index);
            substring.step(&folded, index);
        }

        if acronym.is_complete() {
            let score = acronym_score(acronym.matched.len(), acronym.total);
            if score >= precision.as_score() {
                let indices = original_indices(&acronym.matched, &translation);
                return MatchResult::matched(precision, indices, score);
            }
        }

        if substring.all_matched {
            let first_match = substring.first_match.unwrap_or(0);
            let word_start = closest_space_before(&substring.space_indices, first_match).map_or(0, |space| space + 1);
            let score = substring_score(&SubstringMatch {
                query_len: query.len(),
                non_whitespace_query_len: query.iter().filter(|c| !c.is_whitespace()).count(),
                candidate_len: original.len(),
                first_index: first_match - word_start,
                match_len: substring.last_match - first_match,
                all_contiguous: substring.all_contiguous,
            });
            let indices = original_indices(&substring.indices, &translation);
            return MatchResult::matched(precision, indices, score);
        }

        MatchResult::failed(precision)
    }

    /// Match every candidate in parallel and return those meeting the
    /// precision level as `(candidate index, result)`, best score first.
    pub fn match_all<S>(&self, query: &str, candidates: &[S]) -> Vec<(usize, MatchResult)>
    where
        S: AsRef<str> + Sync,
    {
        let mut results: Vec<(usize, MatchResult)> = candidates
            .par_iter()
            .enumerate()
            .map(|(i, candidate)| (i, self.fuzzy_match(query, candidate.as_ref())))
            .filter(|(_, result)| result.is_precision_met())
            .collect();

        results.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(&b.0)));
        results
    }
}
