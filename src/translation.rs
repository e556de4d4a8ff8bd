use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("translation mapping has already been constructed")]
    AlreadyConstructed,
    #[error("original index {index} added after {previous}; spans must be added left to right")]
    OutOfOrder { previous: usize, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    original: usize,
    start: usize,
    end: usize,
    // Sum of (len - 1) over every span before this one.
    delta_before: usize,
    // Separators emitted after the runs that closed before this span.
    separators_before: usize,
}

/// Text outside the spans is copied verbatim, with one separator inserted
/// after every run of adjacent spans.
#[derive(Debug, Clone, Default)]
pub struct TranslationMapping {
    spans: Vec<Span>,
    translated_length_delta: usize,
    closed_runs: usize,
    constructed: bool,
}

impl TranslationMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the character at `original_index` occupies
    /// `[translated_index, translated_index + length)` in the translated text.
    pub fn add_new_index(
        &mut self,
        original_index: usize,
        translated_index: usize,
        length: usize,
    ) -> Result<(), MappingError> {
        if self.constructed {
            return Err(MappingError::AlreadyConstructed);
        }
        if let Some(last) = self.spans.last() {
            if original_index <= last.original {
                return Err(MappingError::OutOfOrder {
                    previous: last.original,
                    index: original_index,
                });
            }
            if last.end != translated_index {
                self.closed_runs += 1;
            }
        }

        self.spans.push(Span {
            original: original_index,
            start: translated_index,
            end: translated_index + length,
            delta_before: self.translated_length_delta,
            separators_before: self.closed_runs,
        });
        self.translated_length_delta += length.saturating_sub(1);
        Ok(())
    }

    pub fn end_construct(&mut self) -> Result<(), MappingError> {
        if self.constructed {
            return Err(MappingError::AlreadyConstructed);
        }
        self.constructed = true;
        Ok(())
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn map_to_original_index(&self, translated_index: usize) -> usize {
        let (Some(first), Some(last)) = (self.spans.first(), self.spans.last()) else {
            return translated_index;
        };

        if translated_index < first.start {
            return translated_index;
        }

        if translated_index >= last.end {
            return translated_index
                .saturating_sub(self.translated_length_delta)
                .saturating_sub(self.closed_runs + 1);
        }

        // First span whose end lies beyond the index.
        let pos = self.spans.partition_point(|span| span.end <= translated_index);
        let span = &self.spans[pos];
        if translated_index >= span.start {
            return span.original;
        }

        // Gap between spans[pos - 1] and spans[pos]; pos > 0 since the
        // before-first case returned above, so at least one run has closed.
        translated_index
            .saturating_sub(span.delta_before)
            .saturating_sub(span.separators_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "测a试" translated as "Ce a Shi":
    //   测 -> [0, 2) "Ce", separator at 2, 'a' at 3, 试 -> [4, 8) " Shi"
    fn mixed_mapping() -> TranslationMapping {
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(0, 0, 2).unwrap();
        mapping.add_new_index(2, 4, 4).unwrap();
        mapping.end_construct().unwrap();
        mapping
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let mapping = TranslationMapping::new();
        for i in 0..16 {
            assert_eq!(mapping.map_to_original_index(i), i);
        }
    }

    #[test]
    fn test_single_span_round_trip() {
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(0, 0, 3).unwrap();
        mapping.end_construct().unwrap();

        assert_eq!(mapping.map_to_original_index(0), 0);
        assert_eq!(mapping.map_to_original_index(1), 0);
        assert_eq!(mapping.map_to_original_index(2), 0);
        assert_eq!(mapping.map_to_original_index(3), 0);
        assert_eq!(mapping.map_to_original_index(4), 1);
    }

    #[test]
    fn test_before_first_span_is_unchanged() {
        // "ab测" -> "ab Ce"
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(2, 2, 3).unwrap();
        mapping.end_construct().unwrap();

        assert_eq!(mapping.map_to_original_index(0), 0);
        assert_eq!(mapping.map_to_original_index(1), 1);
        assert_eq!(mapping.map_to_original_index(2), 2);
        assert_eq!(mapping.map_to_original_index(4), 2);
    }

    #[test]
    fn test_within_span_maps_to_source_character() {
        let mapping = mixed_mapping();
        assert_eq!(mapping.map_to_original_index(0), 0);
        assert_eq!(mapping.map_to_original_index(1), 0);
        for i in 4..8 {
            assert_eq!(mapping.map_to_original_index(i), 2);
        }
    }

    #[test]
    fn test_between_spans_skips_expansion_and_separator() {
        let mapping = mixed_mapping();
        // separator after "Ce" folds back onto 测
        assert_eq!(mapping.map_to_original_index(2), 0);
        assert_eq!(mapping.map_to_original_index(3), 1);
    }

    #[test]
    fn test_after_last_span() {
        // "测试ab" -> "Ce Shi ab"
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(0, 0, 2).unwrap();
        mapping.add_new_index(1, 2, 4).unwrap();
        mapping.end_construct().unwrap();

        assert_eq!(mapping.map_to_original_index(7), 2);
        assert_eq!(mapping.map_to_original_index(8), 3);
    }

    #[test]
    fn test_many_spans_use_the_right_gap() {
        // "a测b试c" -> "a Ce b Shi c"
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(1, 1, 3).unwrap();
        mapping.add_new_index(3, 6, 4).unwrap();
        mapping.end_construct().unwrap();

        assert_eq!(mapping.map_to_original_index(0), 0);
        assert_eq!(mapping.map_to_original_index(2), 1);
        assert_eq!(mapping.map_to_original_index(5), 2);
        assert_eq!(mapping.map_to_original_index(8), 3);
        assert_eq!(mapping.map_to_original_index(11), 4);
    }

    #[test]
    fn test_add_after_end_construct_fails_every_time() {
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(0, 0, 2).unwrap();
        mapping.end_construct().unwrap();

        for _ in 0..3 {
            assert_eq!(
                mapping.add_new_index(1, 2, 2),
                Err(MappingError::AlreadyConstructed)
            );
        }
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_end_construct_twice_fails() {
        let mut mapping = TranslationMapping::new();
        mapping.end_construct().unwrap();
        assert_eq!(mapping.end_construct(), Err(MappingError::AlreadyConstructed));
        assert!(mapping.is_constructed());
    }

    #[test]
    fn test_out_of_order_index_rejected() {
        let mut mapping = TranslationMapping::new();
        mapping.add_new_index(3, 3, 2).unwrap();
        assert_eq!(
            mapping.add_new_index(1, 6, 2),
            Err(MappingError::OutOfOrder { previous: 3, index: 1 })
        );
    }
}
