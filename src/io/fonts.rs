//! Loading outlines from font files

use std::fs;
use std::path::Path;

use log::debug;

use crate::core::errors::{validate_ufo_path, TthResult};
use crate::data::{FontOutlines, LoadError};

/// Loads the default layer of a UFO package.
pub fn load_ufo_outlines(path: &Path) -> TthResult<FontOutlines> {
    validate_ufo_path(path)?;
    let font = norad::Font::load(path).map_err(|err| LoadError::Ufo {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    let outlines = FontOutlines::from_norad_font(&font, Some(path));
    debug!("Loaded {} glyphs from {}", outlines.len(), path.display());
    Ok(outlines)
}

/// Loads the glyf outlines of a binary TrueType font.
pub fn load_ttf_outlines(path: &Path) -> TthResult<FontOutlines> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let outlines = FontOutlines::from_ttf_data(&data, path)?;
    debug!("Loaded {} glyphs from {}", outlines.len(), path.display());
    Ok(outlines)
}
