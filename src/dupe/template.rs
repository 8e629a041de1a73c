//! Indexing the hinted template
//!
//! Hints reference TrueType point numbers, which are not stable between
//! styles. For every point a template hint touches we record where it sits
//! in the PostScript outline instead; the node number there is what sibling
//! styles share.

use std::collections::BTreeMap;

use log::{error, info, warn};

use crate::data::{Coord, FontOutlines, GlyphOutline};
use crate::geometry::{
    classify_index, CorrespondenceError, IndexSlot, MatchStrategy, PointIndexMap,
};
use crate::hints::{HintInstruction, PointRef, RecipeEntry, RecipeFile, Sidebearing};

/// A template point referenced by a hint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HintedPoint {
    /// Position in the template TrueType outline
    pub coord: Coord,
    pub tt_index: usize,
    /// Point index in the template PostScript outline
    pub ps_index: usize,
    /// Node number in the template PostScript outline, see
    /// [`GlyphOutline::nodes`]
    pub ps_node: usize,
}

/// A template glyph whose hints can be moved to other styles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateGlyph {
    pub name: String,
    /// Keyed by TrueType point index
    pub points: BTreeMap<usize, HintedPoint>,
    /// The glyph's hints with every point written as a TrueType index
    pub instructions: Vec<HintInstruction>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateGlyphError {
    #[error("not in the template {0} font")]
    MissingGlyph(&'static str),
    #[error(transparent)]
    Correspondence(#[from] CorrespondenceError),
    #[error("no readable hints")]
    NoInstructions,
    #[error("no on-curve point at {coord} in the TrueType outline")]
    CoordinateNotFound { coord: Coord },
    #[error("point #{index} does not exist, the outline has {point_count} points")]
    NoSuchPoint { index: usize, point_count: usize },
    #[error("sidebearings are hinted, which cannot be duplicated")]
    SidebearingHinted,
    #[error("point #{index} is off-curve")]
    OffCurve { index: usize },
    #[error("no on-curve point at {coord} in the PostScript outline")]
    NoPostScriptPoint { coord: Coord },
}

impl TemplateGlyphError {
    /// A hint pointing outside the outline means the recipe and the font do
    /// not belong together; nothing built from them can be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TemplateGlyphError::NoSuchPoint { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateCounts {
    pub indexed: usize,
    pub skipped: usize,
    pub instructions_skipped: usize,
}

/// Everything the re-targeting stage needs from the template
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateIndex {
    /// In recipe order
    pub glyphs: Vec<TemplateGlyph>,
    /// False when a glyph failed in a way that rules out the whole run
    pub ok: bool,
    pub counts: TemplateCounts,
}

impl TemplateIndex {
    pub fn get(&self, name: &str) -> Option<&TemplateGlyph> {
        self.glyphs.iter().find(|g| g.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Turns every point reference into a TrueType index.
fn to_tt_indices(
    instruction: &HintInstruction,
    tt_map: &PointIndexMap,
    strategy: MatchStrategy,
) -> Result<HintInstruction, TemplateGlyphError> {
    let mut points = Vec::with_capacity(instruction.points.len());
    for point in &instruction.points {
        let index = match *point {
            PointRef::Index(index) => index,
            PointRef::Coord(coord) => tt_map
                .find(coord, strategy)
                .map(|found| found.index())
                .ok_or(TemplateGlyphError::CoordinateNotFound { coord })?,
            PointRef::Sidebearing(Sidebearing::Left) => tt_map.point_count(),
            PointRef::Sidebearing(Sidebearing::Right) => tt_map.point_count() + 1,
        };
        points.push(PointRef::Index(index));
    }
    Ok(instruction.with_points(points))
}

/// Indexes one template glyph.
pub fn index_glyph(
    entry: &RecipeEntry,
    tt: &GlyphOutline,
    ps: &GlyphOutline,
    strategy: MatchStrategy,
) -> Result<TemplateGlyph, TemplateGlyphError> {
    let (instructions, errors) = entry.instructions();
    for err in &errors {
        warn!("glyph '{}': skipping instruction: {err}", entry.glyph);
    }
    if instructions.is_empty() {
        return Err(TemplateGlyphError::NoInstructions);
    }

    let tt_map = PointIndexMap::build(tt)?;
    let ps_map = PointIndexMap::build(ps)?;
    let ps_nodes = ps.nodes();
    let point_count = tt.point_count();

    let mut points = BTreeMap::new();
    let mut normalized = Vec::with_capacity(instructions.len());

    for instruction in &instructions {
        let instruction = to_tt_indices(instruction, &tt_map, strategy)?;
        if instruction.kind.is_delta() {
            info!(
                "glyph '{}': delta hint {} is not duplicated",
                entry.glyph, instruction
            );
            normalized.push(instruction);
            continue;
        }

        for point in &instruction.points {
            let PointRef::Index(index) = *point else {
                continue;
            };
            let tt_index = match classify_index(index, point_count) {
                IndexSlot::Point(tt_index) => tt_index,
                IndexSlot::LeftSidebearing | IndexSlot::RightSidebearing => {
                    return Err(TemplateGlyphError::SidebearingHinted)
                }
                IndexSlot::OutOfRange => {
                    return Err(TemplateGlyphError::NoSuchPoint { index, point_count })
                }
            };
            if points.contains_key(&tt_index) {
                continue;
            }

            let tt_point = tt
                .point(tt_index)
                .ok_or(TemplateGlyphError::NoSuchPoint { index, point_count })?;
            if !tt_point.is_on_curve() {
                return Err(TemplateGlyphError::OffCurve { index: tt_index });
            }
            let not_found = TemplateGlyphError::NoPostScriptPoint {
                coord: tt_point.coord,
            };
            let ps_index = ps_map
                .find(tt_point.coord, strategy)
                .map(|found| found.index())
                .ok_or_else(|| not_found.clone())?;
            let ps_node = ps
                .point(ps_index)
                .and_then(|ps_point| ps_nodes.iter().position(|&c| c == ps_point.coord))
                .ok_or(not_found)?;
            points.insert(
                tt_index,
                HintedPoint {
                    coord: tt_point.coord,
                    tt_index,
                    ps_index,
                    ps_node,
                },
            );
        }
        normalized.push(instruction);
    }

    Ok(TemplateGlyph {
        name: entry.glyph.clone(),
        points,
        instructions: normalized,
    })
}

/// Indexes every glyph of the template recipe. Failed glyphs are logged and
/// left out; `ok` turns false if any failure is fatal to the run.
pub fn build_template_index(
    recipe: &RecipeFile,
    tt_font: &FontOutlines,
    ps_font: &FontOutlines,
    strategy: MatchStrategy,
) -> TemplateIndex {
    let mut index = TemplateIndex {
        ok: true,
        ..TemplateIndex::default()
    };

    for entry in &recipe.entries {
        let (_, errors) = entry.instructions();
        index.counts.instructions_skipped += errors.len();

        let outlines = match (tt_font.get(&entry.glyph), ps_font.get(&entry.glyph)) {
            (Some(tt), Some(ps)) => Ok((tt, ps)),
            (None, _) => Err(TemplateGlyphError::MissingGlyph("TrueType")),
            (_, None) => Err(TemplateGlyphError::MissingGlyph("PostScript")),
        };
        let result = outlines.and_then(|(tt, ps)| index_glyph(entry, tt, ps, strategy));

        match result {
            Ok(glyph) => {
                index.counts.indexed += 1;
                index.glyphs.push(glyph);
            }
            Err(err) => {
                error!("Template glyph '{}': {err}. Skipping glyph", entry.glyph);
                if err.is_fatal() {
                    index.ok = false;
                }
                index.counts.skipped += 1;
            }
        }
    }

    index
}
