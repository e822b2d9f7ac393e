//! Discovery of libretro core plugins and extension lookups over them.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use std::fs;
use thiserror::Error;

use crate::ffi::SystemInfoReader;
use crate::models::core_info::normalize_extension;
use crate::models::{CoreInfo, RomEntry};

/// File suffixes recognized as core plugins
const CORE_SUFFIXES: [&str; 3] = [".so", ".dll", ".dylib"];

/// Errors from loading or querying core plugins
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read cores directory {path}: {source}")]
    ReadDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load core {path}: {source}")]
    Load {
        path: Utf8PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Core {path} does not export retro_get_system_info: {source}")]
    MissingSymbol {
        path: Utf8PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("No core supports extension: {0}")]
    NoCoreForExtension(String),
}

/// Check if a file name looks like a core plugin (case-insensitive suffix match).
pub fn is_core_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    CORE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Load metadata for every core plugin in `cores_dir`.
///
/// Plugins are visited in file-name order, which defines "first discovered" for
/// extension tie-breaks. A plugin that fails to load aborts the whole scan.
pub fn load_cores<R: SystemInfoReader + ?Sized>(
    cores_dir: &Utf8Path,
    reader: &R,
) -> Result<Vec<CoreInfo>, CoreError> {
    let read_dir_error = |source| CoreError::ReadDir {
        path: cores_dir.to_path_buf(),
        source,
    };

    let mut plugin_paths = Vec::new();
    for entry in cores_dir.read_dir_utf8().map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        if !is_core_file(entry.file_name()) {
            continue;
        }
        if fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false) {
            plugin_paths.push(entry.path().to_path_buf());
        }
    }
    plugin_paths.sort();

    let mut cores = Vec::with_capacity(plugin_paths.len());
    for path in plugin_paths {
        let info = reader.read(&path)?;
        let core = CoreInfo::from_system_info(path, info);
        tracing::info!(
            "Loaded core {} ({} {}) - extensions: {}",
            core.file_name(),
            core.name,
            core.version,
            core.valid_extensions.join(", ")
        );
        cores.push(core);
    }

    if cores.is_empty() {
        tracing::warn!("No core plugins found in {}", cores_dir);
    }

    Ok(cores)
}

/// Union of the extensions supported by all cores.
pub fn supported_extensions(cores: &[CoreInfo]) -> BTreeSet<String> {
    cores
        .iter()
        .flat_map(|core| core.valid_extensions.iter().cloned())
        .collect()
}

/// All cores advertising support for `ext`, in discovery order.
pub fn find_cores_for_extension<'a>(cores: &'a [CoreInfo], ext: &str) -> Vec<&'a CoreInfo> {
    cores
        .iter()
        .filter(|core| core.supports_extension(ext))
        .collect()
}

/// The core used to run a ROM: the first discovered core supporting its extension.
pub fn find_core_for_rom<'a>(cores: &'a [CoreInfo], rom: &RomEntry) -> Result<&'a CoreInfo, CoreError> {
    let ext = rom.extension().unwrap_or_default();
    let candidates = find_cores_for_extension(cores, &ext);

    if candidates.len() > 1 {
        tracing::debug!(
            "{} cores support .{}, using {}",
            candidates.len(),
            ext,
            candidates[0].file_name()
        );
    }

    candidates
        .first()
        .copied()
        .ok_or_else(|| CoreError::NoCoreForExtension(normalize_extension(&ext)))
}
