use std::sync::Arc;

use crate::config::LaunchGroup;
use crate::matcher::StringMatcher;
use crate::model::Entry;
use crate::sources::history::History;
use regex::Regex;

/// Ranked view over the launcher's entries for the current query.
pub struct SearchState {
    pub entries: Vec<Entry>,
    pub filtered_indices: Vec<usize>,
    pub query: String,
    pub matcher: Arc<StringMatcher>,
    pub history: History,
    whitelist: Option<Vec<String>>,
    blacklist: Vec<Regex>,
}

impl SearchState {
    pub fn new(matcher: Arc<StringMatcher>, history: History) -> Self {
        Self {
            entries: Vec::new(),
            filtered_indices: Vec::new(),
            query: String::new(),
            matcher,
            history,
            whitelist: None,
            blacklist: Vec::new(),
        }
    }

    /// Apply a group's whitelist and blacklist. Invalid blacklist patterns are skipped.
    pub fn with_group(mut self, group: &LaunchGroup) -> Self {
        self.whitelist = group.whitelist.clone();
        self.blacklist = group.blacklist.as_ref()
            .map(|bl| bl.iter().filter_map(|s| match Regex::new(s) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("Ignoring blacklist pattern '{}': {}", s, e);
                    None
                }
            }).collect())
            .unwrap_or_default();
        self
    }

    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.update_filter();
    }

    pub fn update_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.update_filter();
    }

    pub fn update_filter(&mut self) {
        let mut indices = if self.query.trim().is_empty() {
            for entry in self.entries.iter_mut() {
                entry.score = 0;
                entry.highlight.clear();
            }
            // Most used first when nothing is typed.
            let mut indices: Vec<usize> = (0..self.entries.len()).collect();
            indices.sort_by(|&a, &b| {
                let a_entry = &self.entries[a];
                let b_entry = &self.entries[b];
                self.history.usage(&b_entry.id).cmp(&self.history.usage(&a_entry.id))
                    .then_with(|| a_entry.name.cmp(&b_entry.name))
            });
            indices
        } else {
            let names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
            let matches = self.matcher.match_all(&self.query, &names);

            for entry in self.entries.iter_mut() {
                entry.score = 0;
                entry.highlight.clear();
            }

            let mut indices = Vec::with_capacity(matches.len());
            for (i, result) in matches {
                let entry = &mut self.entries[i];
                entry.score = result.score as i64 + self.history.usage(&entry.id) as i64 * 100;
                entry.highlight = result.matched_indices;
                indices.push(i);
            }

            indices.sort_by(|&a, &b| {
                self.entries[b].score.cmp(&self.entries[a].score)
                    .then_with(|| self.entries[a].name.cmp(&self.entries[b].name))
            });
            indices
        };

        indices.retain(|&idx| self.is_allowed(&self.entries[idx]));
        log::info!("SearchState: query='{}', filtered_count={}", self.query, indices.len());
        self.filtered_indices = indices;
    }

    fn is_allowed(&self, e: &Entry) -> bool {
        if let Some(whitelist) = &self.whitelist {
            if !whitelist.iter().any(|w| e.name.contains(w) || e.id.contains(w)) {
                return false;
            }
        }
        !self.blacklist.iter().any(|re| re.is_match(&e.name) || re.is_match(&e.id))
    }

    pub fn results(&self) -> impl Iterator<Item = &Entry> {
        self.filtered_indices.iter().map(|&idx| &self.entries[idx])
    }
}
