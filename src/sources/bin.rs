use crate::model::{Entry, EntryType};
use crate::sources::{executables_in, Source};
use anyhow::Result;
use std::env;
use log::{info, debug};

/// Executables found on `$PATH`, matched by file name.
pub struct BinSource;

impl Source for BinSource {
    fn scan(&self) -> Result<Vec<Entry>> {
        let Some(path_var) = env::var_os("PATH") else {
            return Ok(vec![]);
        };

        let mut entries = Vec::new();
        for dir in env::split_paths(&path_var) {
            debug!("Scanning binaries in {:?}", dir);
            entries.extend(executables_in(&dir, EntryType::Binary));
        }
        info!("BinSource: found {} entries", entries.len());
        Ok(entries)
    }
}
