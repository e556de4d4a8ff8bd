//! Score formulas for the two matching strategies.

/// Bonus per query character for a gap-free match, capped after this many characters.
const CONTIGUOUS_BONUS_THRESHOLD: i64 = 4;

/// Share of the candidate's acronyms that the query consumed, as a percentage.
pub(crate) fn acronym_score(matched: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    (matched * 100 / total) as i32
}

/// Closest whitespace position strictly before `first_match`.
pub(crate) fn closest_space_before(space_indices: &[usize], first_match: usize) -> Option<usize> {
    space_indices
        .iter()
        .take_while(|&&index| index < first_match)
        .last()
        .copied()
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SubstringMatch {
    pub query_len: usize,
    pub non_whitespace_query_len: usize,
    pub candidate_len: usize,
    /// Distance from the start of the word holding the first match.
    pub first_index: usize,
    /// From the first matched character to one past the last.
    pub match_len: usize,
    pub all_contiguous: bool,
}

/// Rewards matches that start a word, sit close together, cover most of the
/// candidate and contain no gaps.
pub(crate) fn substring_score(m: &SubstringMatch) -> i32 {
    let query_len = m.query_len as i64;
    let mut score = 100 * (query_len + 1) / ((1 + m.first_index as i64) + (m.match_len as i64 + 1));

    let length_gap = m.candidate_len as i64 - query_len;
    if length_gap < 5 {
        score += 20;
    } else if length_gap < 10 {
        score += 10;
    }

    if m.all_contiguous {
        let count = m.non_whitespace_query_len as i64;
        score += if count <= CONTIGUOUS_BONUS_THRESHOLD {
            count * 10
        } else {
            CONTIGUOUS_BONUS_THRESHOLD * 10 + (count - CONTIGUOUS_BONUS_THRESHOLD) * 5
        };
    }

    score as i32
}
