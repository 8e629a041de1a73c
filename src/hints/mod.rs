//! Hint recipes
//!
//! - `instruction`: the instruction model and its text form
//! - `parse`: reading instructions back from text
//! - `recipe`: `tthints` files, one glyph per line
//! - `recode`: switching a recipe between indices and coordinates
//! - `ppms`: the stem ppm companion file

pub mod instruction;
pub mod parse;
pub mod ppms;
pub mod recipe;
pub mod recode;

pub use instruction::{
    format_instructions, Axis, HintFamily, HintInstruction, HintKind, OutputMode, PointRef,
    Sidebearing,
};
pub use parse::{parse_instruction, parse_instructions, InstructionError};
pub use ppms::{PpmsError, PpmsTable, StemPpms};
pub use recipe::{merge_entries, RecipeEntry, RecipeFile, RecipeLineError, WriteOutcome};
pub use recode::{recode_folder, recode_recipe, RecodeCounts, RecodeError, RecodeOptions};
