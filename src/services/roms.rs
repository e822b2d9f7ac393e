//! ROM directory scanning.
//!
//! A file counts as a ROM when its extension (case-insensitive) is one some installed
//! core advertises. Directories and files without an extension never match.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::collections::BTreeSet;

use crate::models::{CoreInfo, RomEntry};
use crate::services::cores::supported_extensions;

/// Return the files in `dir` whose extension is in `extensions`, sorted by display name.
///
/// `extensions` must be lower-case without dots, as produced by
/// [`supported_extensions`]. An empty set yields an empty list.
pub fn find_supported_roms(dir: &Utf8Path, extensions: &BTreeSet<String>) -> Result<Vec<RomEntry>> {
    let entries = dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to read ROM directory: {}", dir))?;

    let mut roms = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let rom = RomEntry::new(path);
        match rom.extension() {
            Some(ext) if extensions.contains(&ext) => roms.push(rom),
            _ => tracing::trace!("Skipping unsupported file: {}", path),
        }
    }

    roms.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));

    tracing::info!(
        "Found {} supported ROMs in {} ({} known extensions)",
        roms.len(),
        dir,
        extensions.len()
    );

    Ok(roms)
}

/// Scan `dir` for ROMs any of `cores` can run.
pub fn scan_roms(dir: &Utf8Path, cores: &[CoreInfo]) -> Result<Vec<RomEntry>> {
    find_supported_roms(dir, &supported_extensions(cores))
}
