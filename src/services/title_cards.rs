//! Title-card cache: rendering missing cards and loading them for display.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::models::{DisplayMode, RomEntry};
use crate::services::retroarch::{RetroArch, RetroArchError};

/// Background colour of the placeholder card shown when a title card is missing
const PLACEHOLDER_COLOUR: Rgba<u8> = Rgba([24, 24, 32, 255]);

/// Directory of cached title cards, one `<rom-name>.png` per ROM.
#[derive(Debug, Clone)]
pub struct TitleCards {
    titles_dir: Utf8PathBuf,
}

impl TitleCards {
    pub fn new(titles_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            titles_dir: titles_dir.into(),
        }
    }

    pub fn titles_dir(&self) -> &Utf8Path {
        &self.titles_dir
    }

    /// Cache path of the title card for a ROM.
    pub fn destination(&self, rom: &RomEntry) -> Utf8PathBuf {
        self.titles_dir.join(rom.title_card_file_name())
    }

    /// ROMs that have no cached title card yet.
    pub fn missing<'a>(&self, roms: &'a [RomEntry]) -> Vec<&'a RomEntry> {
        roms.iter()
            .filter(|rom| !self.destination(rom).exists())
            .collect()
    }

    /// Render title cards for every ROM without one, one at a time.
    ///
    /// Cached cards are never re-rendered. The first failure aborts the batch.
    ///
    /// # Returns
    /// The number of cards rendered
    pub async fn render_missing(&self, retroarch: &RetroArch, roms: &[RomEntry]) -> Result<usize, RetroArchError> {
        let missing = self.missing(roms);
        tracing::info!(
            "{} of {} title cards need rendering",
            missing.len(),
            roms.len()
        );

        for (i, rom) in missing.iter().enumerate() {
            tracing::info!("Rendering title card {}/{}: {}", i + 1, missing.len(), rom.name);
            retroarch.render_game_title(rom, &self.destination(rom)).await?;
        }

        Ok(missing.len())
    }

    /// Load the title card for a ROM scaled to fit `mode`.
    ///
    /// A card that is absent after rendering (RetroArch exited cleanly but wrote no
    /// screenshot) is replaced by a blank placeholder.
    pub fn load(&self, rom: &RomEntry, mode: DisplayMode) -> Result<RgbaImage> {
        let path = self.destination(rom);
        if !path.exists() {
            tracing::warn!("No title card for {} at {}, using placeholder", rom.name, path);
            return Ok(placeholder(mode));
        }

        let img = image::open(&path)
            .with_context(|| format!("Failed to load title card: {}", path))?
            .to_rgba8();

        Ok(scale_to_fit(&img, mode))
    }

    /// Load title cards for all ROMs, in the same order.
    pub fn load_all(&self, roms: &[RomEntry], mode: DisplayMode) -> Result<Vec<RgbaImage>> {
        roms.iter().map(|rom| self.load(rom, mode)).collect()
    }
}

/// Resize an image to fit inside `mode`, preserving aspect ratio.
pub fn scale_to_fit(img: &RgbaImage, mode: DisplayMode) -> RgbaImage {
    let (width, height) = mode.fit(img.width(), img.height());
    if (width, height) == img.dimensions() {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Triangle)
}

/// Blank card with the display's aspect ratio (4:3 inside the mode).
pub fn placeholder(mode: DisplayMode) -> RgbaImage {
    let (width, height) = mode.fit(4, 3);
    RgbaImage::from_pixel(width, height, PLACEHOLDER_COLOUR)
}
