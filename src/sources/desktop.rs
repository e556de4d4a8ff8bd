use crate::model::{Entry, EntryType};
use crate::sources::Source;
use anyhow::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use directories::BaseDirs;
use log::{info, debug};

/// `.desktop` applications from the XDG data directories.
pub struct DesktopSource {
    dirs: Vec<PathBuf>,
    locale: Option<String>,
}

impl Default for DesktopSource {
    fn default() -> Self {
        let mut dirs = Vec::new();
        if let Some(base_dirs) = BaseDirs::new() {
            dirs.push(base_dirs.data_dir().join("applications"));
        }
        dirs.push(Path::new("/usr/share/applications").to_path_buf());
        dirs.push(Path::new("/usr/local/share/applications").to_path_buf());

        Self {
            dirs,
            locale: env::var("LC_MESSAGES").or_else(|_| env::var("LANG")).ok(),
        }
    }
}

impl DesktopSource {
    pub fn new(dirs: Vec<PathBuf>, locale: Option<String>) -> Self {
        Self { dirs, locale }
    }
}

impl Source for DesktopSource {
    fn scan(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for dir in &self.dirs {
            if !dir.exists() {
                continue;
            }
            debug!("Scanning desktop files in {:?}", dir);
            let Ok(read_dir) = fs::read_dir(dir) else { continue };

            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("desktop") {
                    continue;
                }
                let Ok(content) = fs::read_to_string(&path) else { continue };
                if let Some(app) = parse_desktop_file(&content, self.locale.as_deref()) {
                    entries.push(Entry::new(
                        path.to_string_lossy().to_string(),
                        app.name,
                        app.exec,
                        EntryType::Desktop,
                    ));
                }
            }
        }
        info!("DesktopSource: found {} entries", entries.len());
        Ok(entries)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DesktopApp {
    pub name: String,
    pub exec: String,
}

/// Locale keys to try for `Name[..]`, most specific first: "zh_CN.UTF-8" gives
/// `zh_CN` then `zh`.
fn locale_keys(locale: &str) -> Vec<String> {
    let base = locale.split(['.', '@']).next().unwrap_or(locale);
    let mut keys = vec![base.to_string()];
    if let Some((lang, _)) = base.split_once('_') {
        keys.push(lang.to_string());
    }
    keys
}

pub(crate) fn parse_desktop_file(content: &str, locale: Option<&str>) -> Option<DesktopApp> {
    let mut name = None;
    let mut localized: Vec<(String, String)> = Vec::new();
    let mut exec = None;
    let mut no_display = false;
    let mut is_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }

        if line == "[Desktop Entry]" {
            is_desktop_entry = true;
            continue;
        }

        if line.starts_with('[') {
            is_desktop_entry = false;
            continue;
        }

        if !is_desktop_entry { continue; }

        let Some((key, value)) = line.split_once('=') else { continue };
        match key.trim() {
            "Name" => name = Some(value.trim().to_string()),
            "Exec" => {
                let clean_exec: String = value.split_whitespace()
                    .filter(|s| !s.starts_with('%'))
                    .collect::<Vec<_>>()
                    .join(" ");
                exec = Some(clean_exec);
            }
            "NoDisplay" => no_display = value.trim() == "true",
            key => {
                if let Some(lang) = key.strip_prefix("Name[").and_then(|k| k.strip_suffix(']')) {
                    localized.push((lang.to_string(), value.trim().to_string()));
                }
            }
        }
    }

    if no_display { return None; }

    if let Some(locale) = locale {
        for wanted in locale_keys(locale) {
            if let Some((_, value)) = localized.iter().find(|(lang, _)| *lang == wanted) {
                name = Some(value.clone());
                break;
            }
        }
    }

    match (name, exec) {
        (Some(name), Some(exec)) => Some(DesktopApp { name, exec }),
        _ => None,
    }
}
