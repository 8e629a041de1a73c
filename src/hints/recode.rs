//! Switching a recipe between point indices and point coordinates
//!
//! Indices are what the hinting tool reads, coordinates survive edits to the
//! outline that renumber points. Both forms resolve against the TrueType
//! outline of the same folder.

use std::path::Path;

use log::{info, warn};

use crate::core::errors::TthResult;
use crate::core::settings::{TTF_FILE_NAME, TTHINTS_FILE_NAME};
use crate::data::{Coord, FontOutlines, GlyphOutline};
use crate::geometry::{
    classify_index, CorrespondenceError, IndexSlot, MatchStrategy, PointIndexMap, PointMatch,
};
use crate::io::load_ttf_outlines;

use super::instruction::{HintInstruction, OutputMode, PointRef, Sidebearing};
use super::recipe::{merge_entries, RecipeEntry, RecipeFile, WriteOutcome};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecodeError {
    #[error("point index {index} is out of range for an outline of {point_count} points")]
    IndexOutOfRange { index: usize, point_count: usize },
    #[error("no on-curve point at {coord}")]
    CoordinateNotFound { coord: Coord },
    #[error(transparent)]
    Correspondence(#[from] CorrespondenceError),
    #[error("{0} instructions could not be read")]
    Unreadable(usize),
}

/// Rewrites every index of `instruction` as a coordinate, or as a
/// sidebearing flag for the two phantom indices.
pub fn instruction_to_coordinates(
    instruction: &HintInstruction,
    outline: &GlyphOutline,
) -> Result<HintInstruction, RecodeError> {
    let point_count = outline.point_count();
    let mut points = Vec::with_capacity(instruction.points.len());
    for point in &instruction.points {
        let recoded = match *point {
            PointRef::Index(index) => match classify_index(index, point_count) {
                IndexSlot::Point(index) => {
                    // checked by classify_index
                    let Some(found) = outline.point(index) else {
                        return Err(RecodeError::IndexOutOfRange { index, point_count });
                    };
                    if !found.is_on_curve() {
                        warn!(
                            "glyph '{}': point #{} is off-curve, its coordinate {} may not survive a conversion",
                            outline.name, index, found.coord
                        );
                    }
                    PointRef::Coord(found.coord)
                }
                IndexSlot::LeftSidebearing => PointRef::Sidebearing(Sidebearing::Left),
                IndexSlot::RightSidebearing => PointRef::Sidebearing(Sidebearing::Right),
                IndexSlot::OutOfRange => {
                    return Err(RecodeError::IndexOutOfRange { index, point_count })
                }
            },
            other => other,
        };
        points.push(recoded);
    }
    Ok(instruction.with_points(points))
}

/// Rewrites every coordinate and sidebearing flag of `instruction` as a
/// point index.
pub fn instruction_to_indices(
    instruction: &HintInstruction,
    map: &PointIndexMap,
    strategy: MatchStrategy,
) -> Result<HintInstruction, RecodeError> {
    let mut points = Vec::with_capacity(instruction.points.len());
    for point in &instruction.points {
        let recoded = match *point {
            PointRef::Coord(coord) => match map.find(coord, strategy) {
                Some(PointMatch::Exact(index)) => PointRef::Index(index),
                Some(PointMatch::Near { index, found }) => {
                    info!(
                        "glyph '{}': point #{} has moved from {} to {}",
                        map.glyph(),
                        index,
                        coord,
                        found
                    );
                    PointRef::Index(index)
                }
                None => return Err(RecodeError::CoordinateNotFound { coord }),
            },
            PointRef::Sidebearing(Sidebearing::Left) => PointRef::Index(map.point_count()),
            PointRef::Sidebearing(Sidebearing::Right) => PointRef::Index(map.point_count() + 1),
            index @ PointRef::Index(_) => index,
        };
        points.push(recoded);
    }
    Ok(instruction.with_points(points))
}

/// Converts all instructions of one glyph. Any failure fails the glyph.
pub fn recode_instructions(
    instructions: &[HintInstruction],
    outline: &GlyphOutline,
    mode: OutputMode,
    strategy: MatchStrategy,
) -> Result<Vec<HintInstruction>, RecodeError> {
    match mode {
        OutputMode::Coordinates => instructions
            .iter()
            .map(|instruction| instruction_to_coordinates(instruction, outline))
            .collect(),
        OutputMode::Index => {
            let map = PointIndexMap::build(outline)?;
            instructions
                .iter()
                .map(|instruction| instruction_to_indices(instruction, &map, strategy))
                .collect()
        }
    }
}

/// Converts a recipe entry. An entry with an instruction that does not
/// parse fails as a whole, so the caller keeps its line as written.
pub fn recode_entry(
    entry: &RecipeEntry,
    outline: &GlyphOutline,
    mode: OutputMode,
    strategy: MatchStrategy,
) -> Result<RecipeEntry, RecodeError> {
    let (instructions, errors) = entry.instructions();
    for err in &errors {
        warn!("glyph '{}': cannot read instruction: {err}", entry.glyph);
    }
    if !errors.is_empty() {
        return Err(RecodeError::Unreadable(errors.len()));
    }
    if instructions.is_empty() {
        return Ok(entry.clone());
    }
    let recoded = recode_instructions(&instructions, outline, mode, strategy)?;
    Ok(RecipeEntry::from_instructions(&entry.glyph, &recoded, entry.mark))
}

/// What a recode run should touch
#[derive(Clone, Debug, Default)]
pub struct RecodeOptions {
    pub mode: OutputMode,
    pub strategy: MatchStrategy,
    /// Restrict the run to these glyphs; empty means all of them
    pub glyphs: Vec<String>,
}

impl RecodeOptions {
    fn selects(&self, glyph: &str) -> bool {
        self.glyphs.is_empty() || self.glyphs.iter().any(|g| g == glyph)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecodeCounts {
    pub recoded: usize,
    /// Entries written back as they were (not selected or not in the font)
    pub carried: usize,
    /// Glyphs whose conversion failed; also written back as they were
    pub failed: Vec<String>,
}

/// Converts the selected entries of `recipe` against `font` and merges the
/// result back in font glyph order.
pub fn recode_recipe(
    recipe: &RecipeFile,
    font: &FontOutlines,
    options: &RecodeOptions,
) -> (RecipeFile, RecodeCounts) {
    let mut counts = RecodeCounts::default();
    let mut fresh = Vec::new();

    for entry in &recipe.entries {
        if !options.selects(&entry.glyph) {
            counts.carried += 1;
            continue;
        }
        let Some(outline) = font.get(&entry.glyph) else {
            warn!("glyph '{}' is not in {}, keeping its hints as they are", entry.glyph, font.label());
            counts.carried += 1;
            continue;
        };
        match recode_entry(entry, outline, options.mode, options.strategy) {
            Ok(recoded) => {
                counts.recoded += 1;
                fresh.push(recoded);
            }
            Err(err) => {
                warn!("glyph '{}': {err}, keeping its hints as they are", entry.glyph);
                counts.failed.push(entry.glyph.clone());
            }
        }
    }

    (merge_entries(recipe, fresh, font.glyph_order()), counts)
}

/// Recodes the `tthints` file of `folder` in place.
pub fn recode_folder(folder: &Path, options: &RecodeOptions) -> TthResult<(WriteOutcome, RecodeCounts)> {
    let recipe_path = folder.join(TTHINTS_FILE_NAME);
    let recipe = RecipeFile::read(&recipe_path)?;
    let font = load_ttf_outlines(&folder.join(TTF_FILE_NAME))?;

    let (recoded, counts) = recode_recipe(&recipe, &font, options);
    let outcome = recoded.write_if_any(&recipe_path)?;
    Ok((outcome, counts))
}
