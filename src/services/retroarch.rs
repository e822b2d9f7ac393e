use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::{Paths, RetroArchConfig};
use crate::ffi::{DynamicLibraryReader, SystemInfoReader};
use crate::models::{CoreInfo, LauncherConfig, RomEntry};
use crate::services::cores::{self, CoreError};
use crate::services::roms;

/// Settings appended to RetroArch's config for a headless title-card run
pub const HEADLESS_CONFIG: &str = r#"
audio_driver = "null"
input_driver = "null"
video_driver = "null"
config_save_on_exit = "false"
"#;

/// Errors from running the RetroArch executable
#[derive(Error, Debug)]
pub enum RetroArchError {
    #[error("cannot find rom file: {0}")]
    RomNotFound(Utf8PathBuf),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to write temporary RetroArch config: {0}")]
    TempConfig(#[source] std::io::Error),

    #[error("Failed to start RetroArch: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("failed to launch retroarch ({status})\n{stderr}")]
    LaunchFailed { status: String, stderr: String },
}

/// Handle to an installed RetroArch and its cores.
///
/// Launches are one-shot subprocess runs with no retry. Each call resolves until the
/// emulator exits, so a caller that blocks on it (the carousel) is paused for the
/// whole run.
#[derive(Debug, Clone)]
pub struct RetroArch {
    exe: Utf8PathBuf,
    cores: Vec<CoreInfo>,
    title_frames: u32,
    render_timeout: Option<Duration>,
    play_args: Vec<String>,
}

impl RetroArch {
    /// Create a RetroArch handle with default launch settings.
    pub fn new(exe: impl Into<Utf8PathBuf>, cores: Vec<CoreInfo>) -> Self {
        let defaults = LauncherConfig::default();
        Self {
            exe: exe.into(),
            cores,
            title_frames: defaults.title_frames,
            render_timeout: None,
            play_args: Vec::new(),
        }
    }

    /// Create a handle using the launcher settings for launch options.
    pub fn with_config(config: &LauncherConfig, cores: Vec<CoreInfo>) -> Self {
        Self {
            exe: config.retroarch_exe.clone(),
            cores,
            title_frames: config.title_frames,
            render_timeout: config.render_timeout_secs.map(Duration::from_secs),
            play_args: config.play_args.clone(),
        }
    }

    /// Read retroarch.cfg, then load every core from its `libretro_directory`.
    pub fn discover(paths: &Paths, config: &LauncherConfig) -> Result<Self> {
        Self::discover_with(paths, config, &DynamicLibraryReader)
    }

    pub fn discover_with<R: SystemInfoReader + ?Sized>(
        paths: &Paths,
        config: &LauncherConfig,
        reader: &R,
    ) -> Result<Self> {
        let retroarch_cfg = RetroArchConfig::load_from_dir(&paths.retroarch_config_dir)?;
        let cores_dir = retroarch_cfg
            .libretro_directory(paths.home_dir.as_deref())
            .context("RetroArch config does not name a cores directory")?;

        tracing::info!("Loading cores from {}", cores_dir);
        let cores = cores::load_cores(&cores_dir, reader)?;
        tracing::info!("Loaded {} cores", cores.len());

        Ok(Self::with_config(config, cores))
    }

    /// ROMs in `dir` that this install can run.
    pub fn find_supported_roms(&self, dir: &Utf8Path) -> Result<Vec<RomEntry>> {
        roms::scan_roms(dir, &self.cores)
    }

    /// Build the argument list for a RetroArch run.
    ///
    /// `--verbose` is always passed; without it RetroArch logs nothing even on errors.
    pub fn build_args(core: &CoreInfo, rom: &Utf8Path, extra_args: &[String]) -> Vec<String> {
        let mut args = vec![
            "-L".to_string(),
            core.path.to_string(),
            rom.to_string(),
            "--verbose".to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        args
    }

    /// Extra arguments for a headless run that screenshots frame `frames` to `dest`.
    pub fn title_render_args(frames: u32, dest: &Utf8Path, appended_config: &Utf8Path) -> Vec<String> {
        vec![
            format!("--max-frames={}", frames),
            "--max-frames-ss".to_string(),
            format!("--max-frames-ss-path={}", dest),
            "--appendconfig".to_string(),
            appended_config.to_string(),
        ]
    }

    /// Launch a game for play with the first core supporting it.
    pub async fn run(&self, rom: &RomEntry) -> Result<(), RetroArchError> {
        let core = cores::find_core_for_rom(&self.cores, rom)?;
        tracing::info!("Launching {} with {}", rom.name, core.name);
        self.run_retroarch(&rom.path, core, &self.play_args, None).await
    }

    /// Run a ROM headlessly and save a screenshot of its title screen to `dest`.
    pub async fn render_game_title(&self, rom: &RomEntry, dest: &Utf8Path) -> Result<(), RetroArchError> {
        let core = cores::find_core_for_rom(&self.cores, rom)?;

        let mut appended = tempfile::Builder::new()
            .prefix("arcadenne-")
            .suffix(".cfg")
            .tempfile()
            .map_err(RetroArchError::TempConfig)?;
        write_headless_config(&mut appended).map_err(RetroArchError::TempConfig)?;

        let appended_path = Utf8Path::from_path(appended.path())
            .ok_or_else(|| {
                RetroArchError::TempConfig(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "temporary config path is not valid UTF-8",
                ))
            })?
            .to_path_buf();

        let extra_args = Self::title_render_args(self.title_frames, dest, &appended_path);

        tracing::info!("Rendering title card for {} -> {}", rom.name, dest);
        let result = self
            .run_retroarch(&rom.path, core, &extra_args, self.render_timeout)
            .await;

        // Keep the temporary config alive until RetroArch has exited
        drop(appended);
        result
    }

    /// Run RetroArch to completion, capturing its output.
    ///
    /// A non-zero exit logs the captured stderr between separator banners and returns
    /// [`RetroArchError::LaunchFailed`] carrying it.
    pub async fn run_retroarch(
        &self,
        rom: &Utf8Path,
        core: &CoreInfo,
        extra_args: &[String],
        timeout_duration: Option<Duration>,
    ) -> Result<(), RetroArchError> {
        if !rom.exists() {
            return Err(RetroArchError::RomNotFound(rom.to_path_buf()));
        }

        let args = Self::build_args(core, rom, extra_args);
        tracing::debug!("Executing: {} {}", self.exe, args.join(" "));

        let mut cmd = Command::new(&self.exe);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();

        let output = match timeout_duration {
            Some(limit) => timeout(limit, cmd.output()).await.map_err(|_| {
                tracing::warn!("RetroArch timed out after {:?}", limit);
                RetroArchError::Timeout(limit)
            })?,
            None => cmd.output().await,
        }
        .map_err(RetroArchError::Spawn)?;

        tracing::info!(
            "RetroArch exited after {:.2}s with {}",
            start.elapsed().as_secs_f32(),
            output.status
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            let separator = format!("{}\n{}", "#".repeat(80), "#".repeat(80));
            tracing::warn!("{}", separator);
            tracing::warn!("Failed to launch retroarch - output follows:\n");
            tracing::warn!("{}", stderr);
            tracing::warn!("{}", separator);

            return Err(RetroArchError::LaunchFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }
}

fn write_headless_config(file: &mut NamedTempFile) -> std::io::Result<()> {
    file.write_all(HEADLESS_CONFIG.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::SystemInfo;

    fn snes_core() -> CoreInfo {
        CoreInfo::from_system_info(
            "/cores/snes9x_libretro.so",
            SystemInfo {
                library_name: "Snes9x".to_string(),
                library_version: "1.62".to_string(),
                valid_extensions: "smc|sfc".to_string(),
                need_fullpath: false,
                block_extract: false,
            },
        )
    }

    #[test]
    fn test_build_args_order() {
        let args = RetroArch::build_args(
            &snes_core(),
            Utf8Path::new("/roms/Zelda.sfc"),
            &["--fullscreen".to_string()],
        );
        assert_eq!(
            args,
            vec!["-L", "/cores/snes9x_libretro.so", "/roms/Zelda.sfc", "--verbose", "--fullscreen"]
        );
    }

    #[test]
    fn test_title_render_args() {
        let args = RetroArch::title_render_args(
            300,
            Utf8Path::new("/titles/Zelda.png"),
            Utf8Path::new("/tmp/arcadenne-x.cfg"),
        );
        assert_eq!(
            args,
            vec![
                "--max-frames=300",
                "--max-frames-ss",
                "--max-frames-ss-path=/titles/Zelda.png",
                "--appendconfig",
                "/tmp/arcadenne-x.cfg",
            ]
        );
    }

    #[test]
    fn test_headless_config_disables_drivers() {
        let parsed = RetroArchConfig::parse(HEADLESS_CONFIG);
        assert_eq!(parsed.get("audio_driver"), Some("null"));
        assert_eq!(parsed.get("input_driver"), Some("null"));
        assert_eq!(parsed.get("video_driver"), Some("null"));
        assert_eq!(parsed.get("config_save_on_exit"), Some("false"));
    }

    #[test]
    fn test_missing_rom_is_rejected_before_spawn() {
        let retroarch = RetroArch::new("/nonexistent/retroarch", vec![snes_core()]);
        let rom = RomEntry::new("/nonexistent/roms/Zelda.sfc");

        let err = tokio_test::block_on(retroarch.run(&rom)).unwrap_err();
        assert!(matches!(err, RetroArchError::RomNotFound(_)));
        assert_eq!(err.to_string(), "cannot find rom file: /nonexistent/roms/Zelda.sfc");
    }

    #[test]
    fn test_unsupported_rom_has_no_core() {
        let retroarch = RetroArch::new("/nonexistent/retroarch", vec![snes_core()]);
        let rom = RomEntry::new("/roms/game.nes");

        let err = tokio_test::block_on(retroarch.run(&rom)).unwrap_err();
        assert!(matches!(err, RetroArchError::Core(CoreError::NoCoreForExtension(_))));
    }
}
