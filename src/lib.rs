//! TrueType hint recipe tools
//!
//! Reads the `tthints` recipe of a hand-hinted template style and carries it
//! over to sibling styles whose outlines are compatible, matching points
//! through their PostScript outlines. Also converts recipes between point
//! indices and point coordinates and normalizes `ppms` stem files.

pub mod core;
pub mod data;
pub mod dupe;
pub mod geometry;
pub mod hints;
pub mod io;
pub mod logger;


pub use crate::core::errors::TthResult;
pub use dupe::{run as run_dupe, DupeOptions, RunSummary};
pub use hints::{recode_folder, RecodeOptions};
