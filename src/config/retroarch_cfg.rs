//! Reader for RetroArch's own `retroarch.cfg`.
//!
//! The file is a flat list of `key = value` lines with no section headers. It is read
//! as if it sat under a single synthesized top-level section:
//!
//! - keys are trimmed and lower-cased
//! - `=` or `:` separates key and value; the first one wins
//! - lines starting with `#` or `;` are comments
//! - one pair of enclosing double quotes is stripped from values (`"null"` becomes `null`)
//!
//! Later duplicates of a key replace earlier ones but keep the original position.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

use super::ConfigError;

/// Name of RetroArch's main config file inside its config directory
pub const RETROARCH_CFG_NAME: &str = "retroarch.cfg";

static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<key>[^=:\s][^=:]*?)\s*[=:]\s*(?P<value>.*?)\s*$")
        .expect("Invalid retroarch.cfg entry regex")
});

/// Parsed contents of retroarch.cfg, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetroArchConfig {
    values: IndexMap<String, String>,
}

impl RetroArchConfig {
    /// Load `retroarch.cfg` from RetroArch's config directory.
    pub fn load_from_dir(config_dir: &Utf8Path) -> Result<Self> {
        Self::load(&config_dir.join(RETROARCH_CFG_NAME))
    }

    /// Load and parse a RetroArch config file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read RetroArch config: {}", path))?;

        let config = Self::parse(&contents);
        tracing::info!("Loaded {} RetroArch settings from {}", config.len(), path);
        Ok(config)
    }

    /// Parse config text. Unparseable lines are logged and skipped.
    pub fn parse(contents: &str) -> Self {
        let mut values = IndexMap::new();

        for (line_number, line) in contents.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            match ENTRY_PATTERN.captures(line) {
                Some(caps) => {
                    let key = caps["key"].to_lowercase();
                    let value = unquote(&caps["value"]).to_string();
                    values.insert(key, value);
                }
                None => {
                    tracing::debug!(
                        "Skipping unparseable retroarch.cfg line {}: {}",
                        line_number + 1,
                        trimmed
                    );
                }
            }
        }

        Self { values }
    }

    /// Look up a value by key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Look up a value that must be present.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Directory holding the libretro core plugins, with `~` expanded.
    pub fn libretro_directory(&self, home: Option<&Utf8Path>) -> Result<Utf8PathBuf, ConfigError> {
        let raw = self.require("libretro_directory")?;
        Ok(expand_home(raw, home))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Strip the first and last character of a value that starts and ends with `"`.
///
/// A lone `"` both starts and ends with a quote and so becomes empty. Anything else
/// passes through unchanged.
pub fn unquote(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') {
        value.get(1..value.len() - 1).unwrap_or("")
    } else {
        value
    }
}

/// Expand a leading `~` to the home directory. Without a home the path is returned as-is.
pub fn expand_home(path: &str, home: Option<&Utf8Path>) -> Utf8PathBuf {
    match (home, path) {
        (Some(home), "~") => home.to_path_buf(),
        (Some(home), p) if p.starts_with("~/") => home.join(&p[2..]),
        _ => Utf8PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_null_is_unquoted() {
        let config = RetroArchConfig::parse("audio_driver = \"null\"\n");
        assert_eq!(config.get("audio_driver"), Some("null"));
    }

    #[test]
    fn test_unquoted_value_passes_through() {
        let config = RetroArchConfig::parse("video_driver = gl\nvideo_scale: 3.000000\n");
        assert_eq!(config.get("video_driver"), Some("gl"));
        assert_eq!(config.get("video_scale"), Some("3.000000"));
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let config = RetroArchConfig::parse("# comment\n\n; other\nmenu_driver = \"ozone\"\n");
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("menu_driver"), Some("ozone"));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let config = RetroArchConfig::parse("Libretro_Directory = \"/cores\"\n");
        assert_eq!(config.get("libretro_directory"), Some("/cores"));
        assert_eq!(config.get("LIBRETRO_DIRECTORY"), Some("/cores"));
    }

    #[test]
    fn test_empty_and_inner_quotes() {
        let config = RetroArchConfig::parse("a = \"\"\nb =\nc = say \"hi\"\n");
        assert_eq!(config.get("a"), Some(""));
        assert_eq!(config.get("b"), Some(""));
        assert_eq!(config.get("c"), Some("say \"hi\""));
    }

    #[test]
    fn test_lone_quote_becomes_empty() {
        assert_eq!(unquote("\""), "");
        let config = RetroArchConfig::parse("a = \"\nb = \"x\n");
        assert_eq!(config.get("a"), Some(""));
        assert_eq!(config.get("b"), Some("\"x"));
    }

    #[test]
    fn test_libretro_directory_expands_home() {
        let config = RetroArchConfig::parse("libretro_directory = \"~/.config/retroarch/cores\"\n");
        let home = Utf8PathBuf::from("/home/player");
        assert_eq!(
            config.libretro_directory(Some(&home)).unwrap(),
            Utf8PathBuf::from("/home/player/.config/retroarch/cores")
        );
    }

    #[test]
    fn test_missing_libretro_directory() {
        let config = RetroArchConfig::parse("video_driver = gl\n");
        let err = config.libretro_directory(None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref key) if key == "libretro_directory"));
    }

    #[test]
    fn test_expand_home_leaves_other_paths() {
        let home = Utf8PathBuf::from("/home/player");
        assert_eq!(expand_home("/opt/cores", Some(&home)), "/opt/cores");
        assert_eq!(expand_home("~other/cores", Some(&home)), "~other/cores");
        assert_eq!(expand_home("~/cores", None), "~/cores");
    }
}
