//! Arcadenne - Simple arcade interface for RetroArch
//!
//! Main entry point for the launcher.
//!
//! # Execution Flow
//!
//! 1. Parse the CLI: `arcadenne <ROMS> [--mode WIDTHxHEIGHT]`
//! 2. Resolve directories and load `arcadenne.yaml`
//! 3. Initialize logging -> `~/.config/arcadenne/logs/arcadenne.<date>`
//! 4. Read `retroarch.cfg` and load every core in its `libretro_directory`
//! 5. Scan the ROM directory; exit with failure if nothing is supported
//! 6. Render missing title cards (one headless RetroArch run per ROM)
//! 7. Load and scale the title cards, then run the carousel until it is closed
//!
//! A tokio runtime hosts RetroArch subprocess I/O. The UI thread drives it with
//! `block_on`, so launches pause the carousel until the emulator exits.

use anyhow::{Context, Result};
use arcadenne::ui::LauncherController;
use arcadenne::{APP_NAME, ConfigManager, DisplayMode, Paths, RetroArch, TitleCards, VERSION};
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use std::rc::Rc;

/// Simple arcade interface for retroarch
#[derive(Parser, Debug)]
#[command(name = "arcadenne")]
#[command(version)]
struct Cli {
    /// Path to your rom files
    roms: Utf8PathBuf,

    /// The display resolution to use (WIDTHxHEIGHT)
    #[arg(long)]
    mode: Option<DisplayMode>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = Paths::discover()?;
    let config_manager = ConfigManager::new(&paths.config_dir)?;
    let (config, config_source) = config_manager.load_config()?;
    let paths = paths.with_overrides(&config);
    paths.ensure_writable_dirs()?;

    let _log_guard =
        arcadenne::logging::setup_logging(&paths.log_dir, APP_NAME, config.debug_mode, true)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    config_manager.log_source(config_source);
    tracing::debug!("Using directories: {:?}", paths);

    // Worker threads drive subprocess I/O while the UI thread sits in block_on
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("arcadenne-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let retroarch = RetroArch::discover(&paths, &config)?;

    let roms = retroarch.find_supported_roms(&cli.roms)?;
    if roms.is_empty() {
        tracing::error!("No supported roms found. Exiting...");
        return Ok(ExitCode::FAILURE);
    }

    let title_cards = TitleCards::new(&paths.titles_dir);
    let rendered = runtime
        .block_on(title_cards.render_missing(&retroarch, &roms))
        .context("Failed to render title cards")?;
    tracing::info!("Rendered {} new title cards", rendered);

    let mode = cli.mode.unwrap_or(config.default_mode);
    let cards = title_cards.load_all(&roms, mode)?;

    let controller = LauncherController::new(
        Rc::new(retroarch),
        roms,
        cards,
        mode,
        &config,
        runtime.handle().clone(),
    )?;

    let result = controller.run();

    tracing::info!("Application shutdown complete");

    result.map_err(|e| {
        tracing::error!("GUI error: {}", e);
        anyhow::anyhow!("GUI error: {}", e)
    })?;

    Ok(ExitCode::SUCCESS)
}
