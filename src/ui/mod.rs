// UI module - Slint carousel window
//
// This module contains:
// - LauncherController: Wires the MainWindow to the carousel state and RetroArch

pub mod controller;

pub use controller::{LauncherController, MainWindow};
