use camino::{Utf8Path, Utf8PathBuf};

/// A ROM file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomEntry {
    pub path: Utf8PathBuf,
    /// File name without its extension; also the title-card cache key
    pub name: String,
}

impl RomEntry {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(str::to_string)
            .unwrap_or_else(|| path.to_string());
        Self { path, name }
    }

    /// Lower-cased extension without the dot, if the file has one.
    pub fn extension(&self) -> Option<String> {
        self.path.extension().map(str::to_lowercase)
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// File name of the title card for this ROM (`<name>.png`).
    pub fn title_card_file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}
