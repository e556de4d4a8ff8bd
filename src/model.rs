use serde::{Deserialize, Serialize};

/// Minimum raw score a match needs before the launcher shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPrecisionScore {
    None = 0,
    Low = 20,
    #[default]
    Regular = 50,
}

impl SearchPrecisionScore {
    pub fn as_score(self) -> i32 {
        self as i32
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            20 => Self::Low,
            _ => Self::Regular,
        }
    }
}

impl std::str::FromStr for SearchPrecisionScore {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "regular" => Ok(Self::Regular),
            other => Err(format!("unknown precision level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub success: bool,
    pub precision: SearchPrecisionScore,
    pub matched_indices: Vec<usize>,
    pub raw_score: i32,
    /// `raw_score` when it meets `precision`, otherwise 0.
    pub score: i32,
}

impl MatchResult {
    pub fn failed(precision: SearchPrecisionScore) -> Self {
        Self {
            success: false,
            precision,
            matched_indices: Vec::new(),
            raw_score: 0,
            score: 0,
        }
    }

    pub fn matched(precision: SearchPrecisionScore, matched_indices: Vec<usize>, raw_score: i32) -> Self {
        let score = if raw_score >= precision.as_score() { raw_score } else { 0 };
        Self {
            success: true,
            precision,
            matched_indices,
            raw_score,
            score,
        }
    }

    pub fn is_precision_met(&self) -> bool {
        self.success && self.raw_score >= self.precision.as_score()
    }

    pub fn highlight(&self, candidate: &str, open: &str, close: &str) -> String {
        highlight(candidate, &self.matched_indices, open, close)
    }
}

/// Wrap the characters of `candidate` at `indices` in `open`/`close`.
/// Adjacent positions share one pair of markers.
pub fn highlight(candidate: &str, indices: &[usize], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + indices.len() * 2);
    let mut inside = false;
    for (i, c) in candidate.chars().enumerate() {
        let hit = indices.contains(&i);
        if hit && !inside {
            out.push_str(open);
        } else if !hit && inside {
            out.push_str(close);
        }
        inside = hit;
        out.push(c);
    }
    if inside {
        out.push_str(close);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryType {
    Desktop,
    Binary,
    Custom,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,            // Unique ID (e.g., "firefox.desktop" or "ls")
    pub name: String,          // Display name
    pub command: String,       // Executable command
    pub score: i64,            // Match score plus history boost
    pub highlight: Vec<usize>, // Matched character positions in `name`
    pub entry_type: EntryType,
}

impl Entry {
    pub fn new(id: String, name: String, command: String, entry_type: EntryType) -> Self {
        Self {
            id,
            name,
            command,
            score: 0,
            highlight: Vec::new(),
            entry_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_ordering() {
        assert!(SearchPrecisionScore::None < SearchPrecisionScore::Low);
        assert!(SearchPrecisionScore::Low < SearchPrecisionScore::Regular);
        assert_eq!(SearchPrecisionScore::default().as_score(), 50);
    }

    #[test]
    fn test_precision_parse() {
        assert_eq!("Low".parse::<SearchPrecisionScore>(), Ok(SearchPrecisionScore::Low));
        assert!("high".parse::<SearchPrecisionScore>().is_err());
    }

    #[test]
    fn test_score_filtered_below_precision() {
        let result = MatchResult::matched(SearchPrecisionScore::Regular, vec![0], 30);
        assert!(result.success);
        assert_eq!(result.raw_score, 30);
        assert_eq!(result.score, 0);
        assert!(!result.is_precision_met());

        let result = MatchResult::matched(SearchPrecisionScore::Low, vec![0], 30);
        assert_eq!(result.score, 30);
        assert!(result.is_precision_met());
    }

    #[test]
    fn test_highlight_groups_adjacent_matches() {
        let result = MatchResult::matched(SearchPrecisionScore::None, vec![4, 5, 0], 80);
        assert_eq!(result.highlight("FlowLauncher", "[", "]"), "[F]low[La]uncher");
    }
}
