//! Data models for the Arcadenne launcher.
//!
//! This module contains the plain data structures shared by the services and the UI:
//! - [`CoreInfo`]: Metadata of one libretro core plugin, read once at startup
//! - [`RomEntry`]: A ROM file found during a scan, with its display name
//! - [`DisplayMode`]: Window resolution parsed from `WIDTHxHEIGHT`
//! - [`LauncherConfig`]: Launcher settings loaded from `arcadenne.yaml`
//!
//! None of these types own resources; they are cheap to clone and carry no interior
//! mutability.

pub mod config;
pub mod core_info;
pub mod display_mode;
pub mod rom;

pub use config::LauncherConfig;
pub use core_info::CoreInfo;
pub use display_mode::DisplayMode;
pub use rom::RomEntry;
