// Arcadenne - Simple arcade interface for RetroArch
//
// This is the library crate containing the launcher logic and data structures.
// The binary crate (main.rs) provides the CLI entry point.

pub mod carousel;
pub mod config;
pub mod ffi;
pub mod logging;
pub mod models;
pub mod services;
pub mod ui;

// Re-export commonly used types for convenience
pub use carousel::{Carousel, CarouselPhase, SlideDirection};
pub use config::{ConfigManager, Paths, RetroArchConfig};
pub use models::{CoreInfo, DisplayMode, LauncherConfig, RomEntry};
pub use services::{RetroArch, TitleCards};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
