//! File I/O
//!
//! - `workspace`: style folders and their outline sources
//! - `fonts`: loading UFO and TrueType outlines
//! - `convert`: running the external tools for PFA and TXT sources

pub mod convert;
pub mod fonts;
pub mod workspace;

pub use convert::{load_postscript_outlines, run_tool, ConversionError};
pub use fonts::{load_ttf_outlines, load_ufo_outlines};
pub use workspace::{find_style_folders, OutlineSource, StyleFolder};
