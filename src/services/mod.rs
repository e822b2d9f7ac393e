//! Services module - launcher logic with no UI dependencies.
//!
//! # Components
//!
//! - [`cores`]: Discovers libretro core plugins and answers "which core runs this
//!   extension?". Ties go to the first core discovered (file-name order).
//! - [`roms`]: Scans a directory for files whose extension some core supports.
//! - [`RetroArch`]: Runs the RetroArch executable, either for play or headlessly to
//!   capture a title-card screenshot after a fixed number of frames.
//! - [`TitleCards`]: The on-disk cache of title cards; renders the missing ones and
//!   loads them scaled for display.
//!
//! # RetroArch Integration
//!
//! A title-card run looks like:
//!
//! ```text
//! retroarch -L <core> <rom> --verbose --max-frames=300 --max-frames-ss \
//!     --max-frames-ss-path=<titles>/<rom>.png --appendconfig <tmp.cfg>
//! ```
//!
//! where the appended config switches the audio, input and video drivers to `null`.
//! Runs are never retried; a non-zero exit surfaces RetroArch's stderr.

pub mod cores;
pub mod retroarch;
pub mod roms;
pub mod title_cards;

pub use cores::{CoreError, find_core_for_rom, find_cores_for_extension, load_cores, supported_extensions};
pub use retroarch::{RetroArch, RetroArchError};
pub use roms::{find_supported_roms, scan_roms};
pub use title_cards::TitleCards;
