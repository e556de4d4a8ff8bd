use crate::model::{Entry, EntryType};
use crate::sources::{executables_in, Source};
use anyhow::Result;
use std::path::PathBuf;
use log::{info, debug};
use directories::ProjectDirs;

/// Executable user scripts kept in `<config dir>/scripts`.
pub struct ScriptsSource {
    dir: Option<PathBuf>,
}

impl Default for ScriptsSource {
    fn default() -> Self {
        Self {
            dir: ProjectDirs::from("org", "runner", "runner").map(|dirs| dirs.config_dir().join("scripts")),
        }
    }
}

impl ScriptsSource {
    pub fn in_dir(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }
}

impl Source for ScriptsSource {
    fn scan(&self) -> Result<Vec<Entry>> {
        let Some(scripts_dir) = &self.dir else {
            return Ok(vec![]);
        };

        if !scripts_dir.is_dir() {
            debug!("Scripts directory {:?} does not exist, skipping", scripts_dir);
            return Ok(vec![]);
        }

        let entries = executables_in(scripts_dir, EntryType::Custom);
        info!("ScriptsSource: found {} entries", entries.len());
        Ok(entries)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_only_executables_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("backup.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(dir.path().join("notes.txt"), "plain").unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();

        let entries = ScriptsSource::in_dir(dir.path().to_path_buf()).scan().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "backup.sh");
        assert_eq!(entries[0].entry_type, EntryType::Custom);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = ScriptsSource::in_dir(dir.path().join("absent"));
        assert!(source.scan().unwrap().is_empty());
    }
}
