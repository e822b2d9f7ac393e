use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::DisplayMode;

/// Launcher configuration from arcadenne.yaml
///
/// Every field has a default, so a partial file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// RetroArch executable used for title cards and play
    pub retroarch_exe: Utf8PathBuf,

    /// Directory holding retroarch.cfg; the XDG location when unset
    pub retroarch_config_dir: Option<Utf8PathBuf>,

    /// Title-card cache; `<config dir>/titles` when unset
    pub titles_dir: Option<Utf8PathBuf>,

    /// Frame at which the title-card screenshot is taken
    pub title_frames: u32,

    /// Optional bound on a single title-card render
    pub render_timeout_secs: Option<u64>,

    /// Extra arguments appended when launching a game for play
    pub play_args: Vec<String>,

    pub fps: u32,

    /// Carousel slide speed in logical pixels per second
    pub slide_speed: f32,

    /// Window resolution used when `--mode` is not given
    pub default_mode: DisplayMode,

    pub debug_mode: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            retroarch_exe: Utf8PathBuf::from(DEFAULT_RETROARCH_EXE),
            retroarch_config_dir: None,
            titles_dir: None,
            title_frames: DEFAULT_TITLE_FRAMES,
            render_timeout_secs: None,
            play_args: Vec::new(),
            fps: DEFAULT_FPS,
            slide_speed: DEFAULT_SLIDE_SPEED,
            default_mode: DisplayMode::default(),
            debug_mode: false,
        }
    }
}

pub const DEFAULT_RETROARCH_EXE: &str = "/opt/retroarch/bin/retroarch";
pub const DEFAULT_TITLE_FRAMES: u32 = 300;
pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_SLIDE_SPEED: f32 = 2400.0;
