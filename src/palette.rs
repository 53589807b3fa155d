//! Fixed 16-entry indexed color palette.
//!
//! Frames reference colors by index (0-15) only; the palette maps each
//! index to an RGB triple. Slots can be repainted at runtime and restored
//! with [`Palette::reset_to_defaults`]. Index range checks are the one
//! place in the crate that fails loudly instead of no-opping.

use thiserror::Error;

/// Number of palette slots. Color indices are always in `0..PALETTE_SIZE`.
pub const PALETTE_SIZE: usize = 16;

/// Error type for palette access failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Index outside the fixed 16-slot table
    #[error("color index {0} out of range, expected 0-15")]
    IndexOutOfRange(usize),
    /// Color name not one of the 16 canonical names
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// An RGB triple with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Default table: the conventional ANSI 16 colors (8 standard + 8 bright).
const DEFAULT_COLORS: [Rgb; PALETTE_SIZE] = [
    Rgb::new(0, 0, 0),       // black
    Rgb::new(128, 0, 0),     // red
    Rgb::new(0, 128, 0),     // green
    Rgb::new(128, 128, 0),   // yellow
    Rgb::new(0, 0, 128),     // blue
    Rgb::new(128, 0, 128),   // magenta
    Rgb::new(0, 128, 128),   // cyan
    Rgb::new(192, 192, 192), // white
    Rgb::new(128, 128, 128), // bright-black
    Rgb::new(255, 0, 0),     // bright-red
    Rgb::new(0, 255, 0),     // bright-green
    Rgb::new(255, 255, 0),   // bright-yellow
    Rgb::new(0, 0, 255),     // bright-blue
    Rgb::new(255, 0, 255),   // bright-magenta
    Rgb::new(0, 255, 255),   // bright-cyan
    Rgb::new(255, 255, 255), // bright-white
];

/// Canonical name token for each palette slot. These are display labels and
/// serialization tokens only; no slot is semantically tied to its name.
pub const COLOR_NAMES: [&str; PALETTE_SIZE] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright-black",
    "bright-red",
    "bright-green",
    "bright-yellow",
    "bright-blue",
    "bright-magenta",
    "bright-cyan",
    "bright-white",
];

/// Returns the canonical name for a color index.
pub fn color_name(index: usize) -> Result<&'static str, PaletteError> {
    COLOR_NAMES
        .get(index)
        .copied()
        .ok_or(PaletteError::IndexOutOfRange(index))
}

/// Resolves a color name to its index.
///
/// Lookup is case-insensitive and treats `_` and spaces as `-`, so
/// `BRIGHT_MAGENTA`, `Bright Magenta`, and `bright-magenta` all resolve
/// to 13.
pub fn color_index(name: &str) -> Result<usize, PaletteError> {
    let normalized = name.trim().to_lowercase().replace(['_', ' '], "-");
    COLOR_NAMES
        .iter()
        .position(|n| *n == normalized)
        .ok_or_else(|| PaletteError::UnknownName(name.to_string()))
}

/// The 16-slot color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Palette { colors: DEFAULT_COLORS }
    }
}

impl Palette {
    /// Creates a palette initialized to the ANSI default table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the color at `index`.
    pub fn get(&self, index: usize) -> Result<Rgb, PaletteError> {
        self.colors
            .get(index)
            .copied()
            .ok_or(PaletteError::IndexOutOfRange(index))
    }

    /// Replaces the color at `index`.
    pub fn set(&mut self, index: usize, color: Rgb) -> Result<(), PaletteError> {
        let slot = self
            .colors
            .get_mut(index)
            .ok_or(PaletteError::IndexOutOfRange(index))?;
        *slot = color;
        Ok(())
    }

    /// Formats the color at `index` as a CSS `rgb(r, g, b)` string.
    pub fn css_color(&self, index: usize) -> Result<String, PaletteError> {
        let Rgb { r, g, b } = self.get(index)?;
        Ok(format!("rgb({}, {}, {})", r, g, b))
    }

    /// Restores every slot to the built-in ANSI default.
    pub fn reset_to_defaults(&mut self) {
        self.colors = DEFAULT_COLORS;
    }

    /// All 16 slots in index order.
    pub fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.colors
    }
}
