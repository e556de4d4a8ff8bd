use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use std::fs;

use crate::error::Result;
use crate::matcher::MatchOption;
use crate::model::SearchPrecisionScore;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub groups: HashMap<String, LaunchGroup>,
    #[serde(default)]
    pub sources: SourceConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_history_size() -> usize { 50 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct MatchingConfig {
    #[serde(default)]
    pub precision: SearchPrecisionScore,
    #[serde(default = "default_true")]
    pub ignore_case: bool,
    #[serde(default)]
    pub use_pinyin: bool,
    #[serde(default)]
    pub use_double_pinyin: bool,
    #[serde(default = "default_double_pinyin_schema")]
    pub double_pinyin_schema: String,
    #[serde(default)]
    pub double_pinyin_table: Option<PathBuf>,
}

fn default_double_pinyin_schema() -> String { "XiaoHe".to_string() }

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            precision: SearchPrecisionScore::default(),
            ignore_case: true,
            use_pinyin: false,
            use_double_pinyin: false,
            double_pinyin_schema: default_double_pinyin_schema(),
            double_pinyin_table: None,
        }
    }
}

impl MatchingConfig {
    pub fn match_option(&self) -> MatchOption {
        MatchOption {
            ignore_case: self.ignore_case,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_true")]
    pub scan_path: bool,
    #[serde(default = "default_true")]
    pub scan_desktop: bool,
    #[serde(default = "default_true")]
    pub scan_scripts: bool,
}

fn default_true() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            scan_path: true,
            scan_desktop: true,
            scan_scripts: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LaunchGroup {
    #[serde(default)]
    pub sources: Vec<String>,
    pub blacklist: Option<Vec<String>>,
    pub whitelist: Option<Vec<String>>,
    #[serde(default)]
    pub items: Vec<StaticEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StaticEntry {
    pub name: String,
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut groups = HashMap::new();
        groups.insert("default".to_string(), LaunchGroup {
            sources: vec!["desktop".to_string(), "bin".to_string(), "scripts".to_string()],
            blacklist: None,
            whitelist: None,
            items: vec![],
        });

        Self {
            general: GeneralConfig::default(),
            matching: MatchingConfig::default(),
            groups,
            sources: SourceConfig::default(),
        }
    }
}

impl Config {
    /// Whether `source` is both listed by the group and enabled globally.
    pub fn source_enabled(&self, group: &LaunchGroup, source: &str) -> bool {
        let enabled = match source {
            "desktop" => self.sources.scan_desktop,
            "bin" => self.sources.scan_path,
            "scripts" => self.sources.scan_scripts,
            _ => false,
        };
        enabled && group.sources.iter().any(|s| s == source)
    }
}

pub fn config_path() -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "runner", "runner");
    if let Some(dirs) = &proj_dirs {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.general.history_size, 50);
        assert_eq!(config.matching.precision, SearchPrecisionScore::Regular);
        assert!(config.matching.ignore_case);
        assert!(config.groups.contains_key("default"));
    }

    #[test]
    fn test_parse_matching_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[matching]
precision = "low"
ignore_case = false
use_pinyin = true
use_double_pinyin = true
double_pinyin_table = "/tmp/double_pinyin.json"

[groups.dev]
sources = ["bin"]
blacklist = ["^x"]

[[groups.dev.items]]
name = "Editor"
command = "vim"
"#
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.matching.precision, SearchPrecisionScore::Low);
        assert!(!config.matching.match_option().ignore_case);
        assert!(config.matching.use_pinyin);
        assert_eq!(config.matching.double_pinyin_schema, "XiaoHe");
        assert_eq!(
            config.matching.double_pinyin_table.as_deref(),
            Some(Path::new("/tmp/double_pinyin.json"))
        );

        let dev = &config.groups["dev"];
        assert_eq!(dev.items[0].name, "Editor");
        assert!(config.source_enabled(dev, "bin"));
        assert!(!config.source_enabled(dev, "desktop"));
    }

    #[test]
    fn test_invalid_precision_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[matching]\nprecision = \"extreme\"\n").unwrap();
        assert!(load_config_from(file.path()).is_err());
    }
}
