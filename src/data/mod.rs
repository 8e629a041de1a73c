//! Outline data model and its conversions from font files
//!
//! Fonts are read once into these plain structures; nothing downstream talks
//! to norad or read-fonts directly.

pub mod conversions;
pub mod font;
pub mod outline;

pub use conversions::LoadError;
pub use font::{FontOutlines, OutlineFlavor};
pub use outline::{Contour, Coord, GlyphOutline, OutlinePoint, PointKind};
