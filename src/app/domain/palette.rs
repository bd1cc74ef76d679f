//! Wave colour palette.
//!
//! The palette ships as a JSON list of `{name, hex, darkSuitable}` records.
//! Each activation loads it once, keeps the entries matching the current
//! theme and then draws one entry per published poem.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::app::infrastructure::error::{AppError, Result};

/// Palette compiled into the binary.
pub const BUNDLED_PALETTE: &str = include_str!("../../../assets/waves_colors.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub hex: String,
    #[serde(rename = "darkSuitable")]
    pub dark_suitable: bool,
}

impl PaletteEntry {
    /// Colour value of the entry. Entries inside a [`Palette`] are validated,
    /// so this only fails for hand-built entries.
    pub fn rgb(&self) -> Option<Rgb> {
        Rgb::parse_hex(&self.hex)
    }
}

/// Theme-filtered, non-empty list of palette entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Parse a palette document and validate every colour.
    pub fn parse_entries(json: &str) -> Result<Vec<PaletteEntry>> {
        let entries: Vec<PaletteEntry> = serde_json::from_str(json)
            .map_err(|e| AppError::Palette(format!("malformed palette asset: {}", e)))?;

        if let Some(bad) = entries.iter().find(|e| e.rgb().is_none()) {
            return Err(AppError::Palette(format!(
                "entry '{}' has invalid colour '{}'",
                bad.name, bad.hex
            )));
        }
        Ok(entries)
    }

    /// Load from `path`, or from the bundled asset when no path is given.
    pub fn load_entries(path: Option<&Path>) -> Result<Vec<PaletteEntry>> {
        match path {
            Some(path) => {
                let json = fs::read_to_string(path)?;
                Self::parse_entries(&json)
            }
            None => Self::parse_entries(BUNDLED_PALETTE),
        }
    }

    /// Keep the entries whose `darkSuitable` flag matches the theme.
    pub fn for_theme(entries: Vec<PaletteEntry>, dark: bool) -> Result<Self> {
        let total = entries.len();
        let entries: Vec<PaletteEntry> = entries
            .into_iter()
            .filter(|e| e.dark_suitable == dark)
            .collect();

        debug!(total, kept = entries.len(), dark, "palette filtered");

        if entries.is_empty() {
            let mode = if dark { "dark" } else { "light" };
            return Err(AppError::Palette(format!("no palette entries suit {} mode", mode)));
        }
        Ok(Self { entries })
    }

    pub fn load(path: Option<&Path>, dark: bool) -> Result<Self> {
        Self::for_theme(Self::load_entries(path)?, dark)
    }

    /// Draw one entry uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &PaletteEntry {
        self.entries
            .choose(rng)
            .unwrap_or_else(|| &self.entries[0])
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
