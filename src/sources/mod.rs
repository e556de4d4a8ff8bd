use crate::model::{Entry, EntryType};
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Something that produces launcher candidates.
pub trait Source {
    fn scan(&self) -> Result<Vec<Entry>>;
}

pub mod desktop;
pub mod bin;
pub mod history;
pub mod scripts;

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &fs::Metadata) -> bool {
    metadata.is_file()
}

/// Executable files directly inside `dir`, labelled by file name.
/// Unreadable directories and entries yield nothing.
pub(crate) fn executables_in(dir: &Path, entry_type: EntryType) -> Vec<Entry> {
    let Ok(read_dir) = fs::read_dir(dir) else { return Vec::new() };

    read_dir
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let metadata = fs::metadata(&path).ok()?;
            if !metadata.is_file() || !is_executable(&metadata) {
                return None;
            }
            let name = path.file_name()?.to_str()?.to_string();
            let command = path.to_string_lossy().to_string();
            Some(Entry::new(command.clone(), name, command, entry_type.clone()))
        })
        .collect()
}
