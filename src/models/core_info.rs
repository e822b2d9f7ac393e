use camino::Utf8PathBuf;

use crate::ffi::SystemInfo;

/// Metadata for one libretro core plugin.
///
/// Built from the core's `retro_get_system_info` export. Extensions are stored
/// lower-case and without a leading dot, in the order the core lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreInfo {
    pub path: Utf8PathBuf,
    pub name: String,
    pub version: String,
    pub valid_extensions: Vec<String>,
    pub need_fullpath: bool,
    pub block_extract: bool,
}

impl CoreInfo {
    /// Build a CoreInfo from the metadata a plugin reported.
    ///
    /// The pipe-delimited extension list is split, trimmed and lower-cased; empty
    /// segments are dropped.
    pub fn from_system_info(path: impl Into<Utf8PathBuf>, info: SystemInfo) -> Self {
        Self {
            path: path.into(),
            name: info.library_name,
            version: info.library_version,
            valid_extensions: parse_extension_list(&info.valid_extensions),
            need_fullpath: info.need_fullpath,
            block_extract: info.block_extract,
        }
    }

    /// Check if this core advertises the given extension.
    ///
    /// Matching is case-insensitive and accepts the extension with or without its dot.
    pub fn supports_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.valid_extensions.iter().any(|e| *e == ext)
    }

    /// File name of the plugin, used in log output.
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }
}

/// Lower-case an extension and strip a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn parse_extension_list(list: &str) -> Vec<String> {
    list.split('|')
        .map(normalize_extension)
        .filter(|ext| !ext.is_empty())
        .collect()
}
