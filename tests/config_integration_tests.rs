//! Integration tests for configuration handling
//!
//! These tests verify:
//! - retroarch.cfg parsing (quoting, comments, key case)
//! - Resolving the cores directory from retroarch.cfg
//! - Launcher config loading, saving and directory overrides

use arcadenne::config::retroarch_cfg::unquote;
use arcadenne::config::ConfigSource;
use arcadenne::{ConfigManager, DisplayMode, LauncherConfig, Paths, RetroArchConfig};
use camino::{Utf8Path, Utf8PathBuf};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

const SAMPLE_CFG: &str = r#"
# RetroArch config
audio_driver = "null"
video_driver = "gl"
libretro_directory = "~/.config/retroarch/cores"
savefile_directory = "default"
video_fullscreen = "true"
"#;

#[test]
fn test_quoted_null_yields_bare_null() {
    let config = RetroArchConfig::parse(SAMPLE_CFG);
    assert_eq!(config.get("audio_driver"), Some("null"));
}

#[test]
fn test_load_from_config_dir() {
    let (_temp_dir, root) = create_test_config_dir();
    let retroarch_dir = root.join("retroarch");
    fs::create_dir_all(&retroarch_dir).unwrap();
    fs::write(retroarch_dir.join("retroarch.cfg"), SAMPLE_CFG).unwrap();

    let config = RetroArchConfig::load_from_dir(&retroarch_dir).unwrap();
    assert_eq!(config.len(), 5);

    let keys: Vec<_> = config.iter().map(|(k, _)| k).collect();
    assert_eq!(keys[0], "audio_driver");
    assert_eq!(keys[4], "video_fullscreen");

    let home = Utf8PathBuf::from("/home/player");
    assert_eq!(
        config.libretro_directory(Some(&home)).unwrap(),
        Utf8PathBuf::from("/home/player/.config/retroarch/cores")
    );
}

#[test]
fn test_missing_retroarch_cfg_is_an_error() {
    let (_temp_dir, root) = create_test_config_dir();
    assert!(RetroArchConfig::load_from_dir(&root).is_err());
}

#[test]
fn test_launcher_config_round_trip() {
    let (_temp_dir, root) = create_test_config_dir();
    let manager = ConfigManager::new(root.join("arcadenne")).unwrap();

    let config = LauncherConfig {
        retroarch_exe: Utf8PathBuf::from("/usr/bin/retroarch"),
        default_mode: DisplayMode::new(1024, 768),
        render_timeout_secs: Some(30),
        ..LauncherConfig::default()
    };
    manager.save_config(&config).unwrap();

    assert!(manager.config_path().exists());
    assert_eq!(manager.load_config().unwrap(), (config, ConfigSource::File));
}

#[test]
fn test_invalid_launcher_yaml_is_an_error() {
    let (_temp_dir, root) = create_test_config_dir();
    let manager = ConfigManager::new(&root).unwrap();
    fs::write(manager.config_path(), "fps: [not, a, number]\n").unwrap();

    assert!(manager.load_config().is_err());
}

#[test]
fn test_paths_are_created() {
    let (_temp_dir, root) = create_test_config_dir();
    let paths = Paths::under_config_root(&root, None);
    paths.ensure_writable_dirs().unwrap();

    assert!(paths.titles_dir.exists());
    assert!(paths.log_dir.exists());
    assert!(!paths.retroarch_config_dir.exists());
}

#[test]
fn test_paths_override_retroarch_dir() {
    let config = LauncherConfig {
        retroarch_config_dir: Some(Utf8PathBuf::from("/etc/retroarch")),
        ..LauncherConfig::default()
    };
    let paths = Paths::under_config_root(Utf8Path::new("/cfg"), None).with_overrides(&config);
    assert_eq!(paths.retroarch_config_dir, "/etc/retroarch");
    assert_eq!(paths.titles_dir, "/cfg/arcadenne/titles");
}

proptest! {
    #[test]
    fn prop_quoted_values_are_unquoted(value in "[a-zA-Z0-9_./ -]{0,20}") {
        let line = format!("some_key = \"{}\"\n", value);
        let config = RetroArchConfig::parse(&line);
        prop_assert_eq!(config.get("some_key"), Some(value.as_str()));
    }

    #[test]
    fn prop_unquoted_values_pass_through(value in "[a-zA-Z0-9_./-]{1,20}") {
        prop_assert_eq!(unquote(&value), value.as_str());

        let line = format!("some_key = {}\n", value);
        let config = RetroArchConfig::parse(&line);
        prop_assert_eq!(config.get("some_key"), Some(value.as_str()));
    }
}
