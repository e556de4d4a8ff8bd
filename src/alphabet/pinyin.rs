use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;
use pinyin::ToPinyin;

use super::{Alphabet, TranslatedText, Translation};
use crate::config::MatchingConfig;
use crate::error::{Error, Result};
use crate::translation::{MappingError, TranslationMapping};

/// Full syllable -> double pinyin keys for one schema.
pub type DoublePinyinTable = HashMap<String, String>;

fn is_han(c: char) -> bool {
    ('\u{3400}'..='\u{9FD5}').contains(&c)
}

fn contains_han(content: &str) -> bool {
    content.chars().any(is_han)
}

fn capitalize(syllable: &str) -> String {
    let mut chars = syllable.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Load the table for `schema` from a JSON file shaped `{ schema: { full: double } }`.
pub fn load_double_pinyin_table(path: &Path, schema: &str) -> Result<DoublePinyinTable> {
    let content = fs::read_to_string(path)?;
    let mut tables: HashMap<String, DoublePinyinTable> = serde_json::from_str(&content)?;
    tables
        .remove(schema)
        .ok_or_else(|| Error::UnknownSchema(schema.to_string()))
}

/// Transliterates Han characters into capitalised pinyin syllables.
///
/// `"测试"` becomes `"Ce Shi"` and `"test测试你"` becomes `"test Ce Shi Ni"`.
/// Every syllable not at the very start is preceded by a space that belongs to
/// its span, and one space separates a Han run from the text that follows it.
pub struct PinyinAlphabet {
    cache: RwLock<HashMap<String, Arc<TranslatedText>>>,
    double_pinyin: RwLock<Option<DoublePinyinTable>>,
}

impl Default for PinyinAlphabet {
    fn default() -> Self {
        Self::new()
    }
}

impl PinyinAlphabet {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            double_pinyin: RwLock::new(None),
        }
    }

    pub fn with_double_pinyin(table: DoublePinyinTable) -> Self {
        let alphabet = Self::new();
        *alphabet.double_pinyin.write() = Some(table);
        alphabet
    }

    /// Build from the `[matching]` config. A broken double pinyin table is
    /// logged and replaced by an empty one, which leaves full pinyin in place.
    pub fn from_config(config: &MatchingConfig) -> Self {
        if !config.use_double_pinyin {
            return Self::new();
        }

        let table = match &config.double_pinyin_table {
            Some(path) => load_double_pinyin_table(path, &config.double_pinyin_schema).unwrap_or_else(|e| {
                warn!("Failed to load double pinyin table from {:?}: {}", path, e);
                DoublePinyinTable::new()
            }),
            None => {
                warn!("Double pinyin enabled without a table, using full pinyin");
                DoublePinyinTable::new()
            }
        };
        Self::with_double_pinyin(table)
    }

    /// Swap the double pinyin table (or turn double pinyin off) and drop cached translations.
    pub fn reload(&self, table: Option<DoublePinyinTable>) {
        *self.double_pinyin.write() = table;
        self.cache.write().clear();
    }

    pub fn is_double_pinyin(&self) -> bool {
        self.double_pinyin.read().is_some()
    }

    fn build(&self, content: &str) -> std::result::Result<TranslatedText, MappingError> {
        let double_pinyin = self.double_pinyin.read();
        let mut text = String::with_capacity(content.len() * 2);
        let mut mapping = TranslationMapping::new();
        let mut written = 0;
        let mut previous_is_han = false;

        for (i, c) in content.chars().enumerate() {
            let syllable = if is_han(c) { c.to_pinyin().map(|p| p.plain()) } else { None };

            match syllable {
                Some(full) => {
                    let syllable = double_pinyin
                        .as_ref()
                        .and_then(|table| table.get(full))
                        .map_or(full, String::as_str);
                    let syllable = capitalize(syllable);
                    let separated = written > 0;
                    let length = syllable.chars().count() + usize::from(separated);

                    mapping.add_new_index(i, written, length)?;
                    if separated {
                        text.push(' ');
                    }
                    text.push_str(&syllable);
                    written += length;
                    previous_is_han = true;
                }
                None => {
                    if previous_is_han {
                        text.push(' ');
                        written += 1;
                        previous_is_han = false;
                    }
                    text.push(c);
                    written += 1;
                }
            }
        }

        mapping.end_construct()?;
        Ok(TranslatedText { text, mapping })
    }
}

/// A mapping error here means `build` emitted spans out of order, which is a bug.
fn consistent(content: &str, built: std::result::Result<TranslatedText, MappingError>) -> TranslatedText {
    match built {
        Ok(translated) => translated,
        Err(e) => panic!("pinyin mapping for {content:?} is inconsistent: {e}"),
    }
}

impl Alphabet for PinyinAlphabet {
    fn translate<'a>(&self, content: &'a str) -> Translation<'a> {
        if !contains_han(content) {
            return Translation::Unchanged(content);
        }

        if let Some(cached) = self.cache.read().get(content) {
            return Translation::Translated(Arc::clone(cached));
        }

        let translated = Arc::new(consistent(content, self.build(content)));
        debug!("Translated {:?} to {:?}", content, translated.text);
        self.cache
            .write()
            .insert(content.to_string(), Arc::clone(&translated));
        Translation::Translated(translated)
    }

    fn should_translate(&self, content: &str) -> bool {
        if contains_han(content) {
            return false;
        }
        !self.is_double_pinyin() || content.chars().count() % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_translate_han_only() {
        let alphabet = PinyinAlphabet::new();
        let translation = alphabet.translate("测试");
        assert_eq!(translation.text(), "Ce Shi");
        assert_eq!(translation.map_to_original_index(0), 0);
        assert_eq!(translation.map_to_original_index(1), 0);
        assert_eq!(translation.map_to_original_index(3), 1);
        assert_eq!(translation.map_to_original_index(5), 1);
    }

    #[test]
    fn test_translate_mixed_text() {
        let alphabet = PinyinAlphabet::new();
        let translation = alphabet.translate("test测试你");
        assert_eq!(translation.text(), "test Ce Shi Ni");
        assert_eq!(translation.map_to_original_index(0), 0);
        assert_eq!(translation.map_to_original_index(3), 3);
        assert_eq!(translation.map_to_original_index(5), 4);
        assert_eq!(translation.map_to_original_index(8), 5);
        assert_eq!(translation.map_to_original_index(13), 6);
    }

    #[test]
    fn test_text_after_han_run_maps_back() {
        let alphabet = PinyinAlphabet::new();
        let translation = alphabet.translate("你a好b");
        assert_eq!(translation.text(), "Ni a Hao b");
        let original: Vec<char> = "你a好b".chars().collect();
        assert_eq!(original[translation.map_to_original_index(3)], 'a');
        assert_eq!(original[translation.map_to_original_index(9)], 'b');
    }

    #[test]
    #[should_panic(expected = "inconsistent")]
    fn test_inconsistent_mapping_panics() {
        let mut mapping = TranslationMapping::new();
        let built = mapping
            .add_new_index(1, 0, 2)
            .and_then(|()| mapping.add_new_index(0, 2, 2))
            .map(|()| TranslatedText { text: String::new(), mapping: TranslationMapping::new() });
        consistent("你好", built);
    }

    #[test]
    fn test_non_han_is_unchanged() {
        let alphabet = PinyinAlphabet::new();
        let translation = alphabet.translate("test");
        assert!(matches!(translation, Translation::Unchanged("test")));
        assert!(translation.mapping().is_none());
    }

    #[test]
    fn test_translations_are_cached() {
        let alphabet = PinyinAlphabet::new();
        let first = alphabet.translate("测试");
        let second = alphabet.translate("测试");
        match (first, second) {
            (Translation::Translated(a), Translation::Translated(b)) => assert!(Arc::ptr_eq(&a, &b)),
            _ => panic!("expected translated text"),
        }
    }

    #[test]
    fn test_should_translate() {
        let alphabet = PinyinAlphabet::new();
        assert!(alphabet.should_translate("test"));
        assert!(!alphabet.should_translate("测试"));
        assert!(!alphabet.should_translate("测试test"));

        let alphabet = PinyinAlphabet::with_double_pinyin(DoublePinyinTable::new());
        assert!(alphabet.should_translate("test"));
        assert!(!alphabet.should_translate("tes"));
        assert!(!alphabet.should_translate("测试"));
    }

    #[test]
    fn test_double_pinyin_table() {
        let mut table = DoublePinyinTable::new();
        table.insert("ce".to_string(), "ce".to_string());
        table.insert("shi".to_string(), "ui".to_string());
        let alphabet = PinyinAlphabet::with_double_pinyin(table);
        assert_eq!(alphabet.translate("测试").text(), "Ce Ui");

        alphabet.reload(None);
        assert_eq!(alphabet.translate("测试").text(), "Ce Shi");
    }

    #[test]
    fn test_load_double_pinyin_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"XiaoHe": {{"shi": "ui", "zhong": "vs"}}}}"#).unwrap();

        let table = load_double_pinyin_table(file.path(), "XiaoHe").unwrap();
        assert_eq!(table.get("zhong").map(String::as_str), Some("vs"));

        let err = load_double_pinyin_table(file.path(), "ZiRanMa").unwrap_err();
        assert!(matches!(err, Error::UnknownSchema(ref s) if s == "ZiRanMa"));
    }
}
