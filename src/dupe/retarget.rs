//! Moving template hints onto a sibling style
//!
//! A template hint names TrueType points. Each one is looked up in the
//! template index to get its PostScript node number, the target's
//! PostScript outline gives the coordinate at that node, and the target's
//! TrueType outline gives the point now sitting at that coordinate.

use log::{error, info, warn};

use crate::core::settings::POSSIBLY_INCOMPATIBLE_MARK;
use crate::data::{Coord, FontOutlines, GlyphOutline};
use crate::geometry::{CorrespondenceError, MatchStrategy, PointIndexMap, PointMatch};
use crate::hints::{HintInstruction, OutputMode, PointRef, RecipeEntry, RecipeFile};

use super::compat::{verify, Compatibility, IncompatibleReason};
use super::template::{TemplateGlyph, TemplateIndex};

#[derive(Clone, Copy, Debug, Default)]
pub struct RetargetOptions {
    pub mode: OutputMode,
    pub strategy: MatchStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetargetError {
    #[error("not in the target {0} font")]
    MissingGlyph(&'static str),
    #[error("definitely not compatible: {0}")]
    Incompatible(IncompatibleReason),
    #[error(transparent)]
    Correspondence(#[from] CorrespondenceError),
    #[error("major incompatibility between the TrueType and PostScript outlines at point #{tt_index}")]
    UnmappedPoint { tt_index: usize },
    #[error("PostScript node #{ps_node} is beyond the {node_count} nodes of the target")]
    PostScriptNodeOutOfRange { ps_node: usize, node_count: usize },
    #[error("could not find the target point at {coord} in the TrueType outline")]
    NotInTrueType { coord: Coord },
    #[error("template hint still refers to {0}")]
    UnresolvedReference(PointRef),
    #[error("only delta hints, nothing to duplicate")]
    NothingLeft,
}

/// The target PostScript coordinate of a template node.
///
/// One node past the end is taken to be the closing copy of a start point
/// and moved to the first node of the last contour.
fn target_ps_coord(target_ps: &GlyphOutline, ps_node: usize) -> Result<Coord, RetargetError> {
    let nodes = target_ps.nodes();
    if let Some(&coord) = nodes.get(ps_node) {
        return Ok(coord);
    }
    let last_contour_start = target_ps
        .on_curve_coords_by_contour()
        .last()
        .and_then(|coords| coords.first().copied());
    match last_contour_start {
        Some(coord) if ps_node == nodes.len() => Ok(coord),
        _ => Err(RetargetError::PostScriptNodeOutOfRange {
            ps_node,
            node_count: nodes.len(),
        }),
    }
}

fn retarget_point(
    template: &TemplateGlyph,
    tt_index: usize,
    target_ps: &GlyphOutline,
    tt_map: &PointIndexMap,
    options: RetargetOptions,
) -> Result<PointRef, RetargetError> {
    let hinted = template
        .points
        .get(&tt_index)
        .ok_or(RetargetError::UnmappedPoint { tt_index })?;
    let coord = target_ps_coord(target_ps, hinted.ps_node)?;

    let (index, found) = match tt_map.find(coord, options.strategy) {
        Some(PointMatch::Exact(index)) => (index, coord),
        Some(PointMatch::Near { index, found }) => {
            info!(
                "glyph '{}': point #{} has moved from {} to {}",
                template.name, index, coord, found
            );
            (index, found)
        }
        None => return Err(RetargetError::NotInTrueType { coord }),
    };

    Ok(match options.mode {
        OutputMode::Index => PointRef::Index(index),
        OutputMode::Coordinates => PointRef::Coord(found),
    })
}

/// Re-targets one glyph. Any point that cannot be found fails the glyph.
pub fn retarget_glyph(
    template: &TemplateGlyph,
    template_ps: &GlyphOutline,
    target_ps: &GlyphOutline,
    target_tt: &GlyphOutline,
    options: RetargetOptions,
) -> Result<RecipeEntry, RetargetError> {
    let mark = match verify(template_ps, target_ps) {
        Compatibility::Compatible => None,
        Compatibility::PossiblyIncompatible => {
            warn!("Possibly not compatible: '{}', please check", template.name);
            Some(POSSIBLY_INCOMPATIBLE_MARK)
        }
        Compatibility::DefinitelyIncompatible(reason) => {
            return Err(RetargetError::Incompatible(reason))
        }
    };

    let tt_map = PointIndexMap::build(target_tt)?;
    let mut instructions: Vec<HintInstruction> = Vec::new();

    for instruction in &template.instructions {
        if instruction.kind.is_delta() {
            info!(
                "glyph '{}': delta hints are not transferred, dropping {}",
                template.name, instruction
            );
            continue;
        }
        let mut points = Vec::with_capacity(instruction.points.len());
        for point in &instruction.points {
            let PointRef::Index(tt_index) = *point else {
                return Err(RetargetError::UnresolvedReference(*point));
            };
            points.push(retarget_point(template, tt_index, target_ps, &tt_map, options)?);
        }
        instructions.push(instruction.with_points(points));
    }

    if instructions.is_empty() {
        return Err(RetargetError::NothingLeft);
    }
    Ok(RecipeEntry::from_instructions(&template.name, &instructions, mark))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetCounts {
    pub written: usize,
    pub skipped: usize,
    /// Written, but marked for review
    pub flagged: usize,
}

/// Re-targets every template glyph onto one target style. The recipe keeps
/// the template's glyph order.
pub fn retarget_font(
    index: &TemplateIndex,
    template_ps: &FontOutlines,
    target_ps: &FontOutlines,
    target_tt: &FontOutlines,
    options: RetargetOptions,
) -> (RecipeFile, TargetCounts) {
    let mut counts = TargetCounts::default();
    let mut entries = Vec::new();

    for template in &index.glyphs {
        let result = match (
            template_ps.get(&template.name),
            target_ps.get(&template.name),
            target_tt.get(&template.name),
        ) {
            (Some(template_ps), Some(target_ps), Some(target_tt)) => {
                retarget_glyph(template, template_ps, target_ps, target_tt, options)
            }
            (_, None, _) => Err(RetargetError::MissingGlyph("PostScript")),
            (_, _, None) => Err(RetargetError::MissingGlyph("TrueType")),
            // indexed glyphs always have a template outline
            (None, _, _) => Err(RetargetError::MissingGlyph("template PostScript")),
        };

        match result {
            Ok(entry) => {
                if entry.mark.is_some() {
                    counts.flagged += 1;
                }
                counts.written += 1;
                entries.push(entry);
            }
            Err(RetargetError::NothingLeft) => {
                info!("Glyph '{}' has only delta hints, leaving it out", template.name);
                counts.skipped += 1;
            }
            Err(err) => {
                error!("Glyph '{}' in {}: {err}. Skipping glyph", template.name, target_tt.label());
                counts.skipped += 1;
            }
        }
    }

    (RecipeFile { entries }, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Contour, OutlineFlavor, OutlinePoint};
    use crate::dupe::template::build_template_index;

    fn outline(name: &str, contours: Vec<Vec<OutlinePoint>>) -> GlyphOutline {
        GlyphOutline::new(name, contours.into_iter().map(Contour::new).collect())
    }

    fn bar(x: i32) -> Vec<OutlinePoint> {
        vec![
            OutlinePoint::on(x, 0),
            OutlinePoint::on(x + 80, 0),
            OutlinePoint::on(x + 80, 700),
            OutlinePoint::on(x, 700),
        ]
    }

    fn fonts(ps: GlyphOutline, tt: GlyphOutline) -> (FontOutlines, FontOutlines) {
        (
            FontOutlines::with_glyphs(OutlineFlavor::PostScript, [ps]),
            FontOutlines::with_glyphs(OutlineFlavor::TrueType, [tt]),
        )
    }

    fn index_for(recipe: &str, ps: &FontOutlines, tt: &FontOutlines) -> TemplateIndex {
        build_template_index(&RecipeFile::parse(recipe), tt, ps, MatchStrategy::Exact)
    }

    #[test]
    fn follows_points_through_renumbering() {
        let (template_ps, template_tt) = fonts(outline("l", vec![bar(0)]), outline("l", vec![bar(0)]));
        let index = index_for("l\t3,0,1,0,-1\n", &template_ps, &template_tt);

        let mut reversed = bar(10);
        reversed.reverse();
        let (target_ps, target_tt) = fonts(outline("l", vec![bar(10)]), outline("l", vec![reversed]));

        let (recipe, counts) = retarget_font(
            &index,
            &template_ps,
            &target_ps,
            &target_tt,
            RetargetOptions::default(),
        );
        assert_eq!(counts.written, 1);
        assert_eq!(recipe.entries[0].hints, "3,3,2,0,-1");

        let (recipe, _) = retarget_font(
            &index,
            &template_ps,
            &target_ps,
            &target_tt,
            RetargetOptions {
                mode: OutputMode::Coordinates,
                ..RetargetOptions::default()
            },
        );
        assert_eq!(recipe.entries[0].hints, "3,(10,0),(90,0),0,-1");
    }

    #[test]
    fn index_past_the_end_falls_back_to_last_contour_start() {
        let target = outline("i", vec![bar(0), bar(200)]);
        assert_eq!(target_ps_coord(&target, 8), Ok(Coord::new(200, 0)));
        assert_eq!(
            target_ps_coord(&target, 9),
            Err(RetargetError::PostScriptNodeOutOfRange {
                ps_node: 9,
                node_count: 8
            })
        );
    }

    #[test]
    fn missing_target_point_drops_the_whole_glyph() {
        let (template_ps, template_tt) = fonts(outline("l", vec![bar(0)]), outline("l", vec![bar(0)]));
        let index = index_for("l\t1,0,0;1,2,0\n", &template_ps, &template_tt);

        let mut moved = bar(0);
        moved[2] = OutlinePoint::on(81, 700);
        let (target_ps, target_tt) = fonts(outline("l", vec![bar(0)]), outline("l", vec![moved]));
        let (recipe, counts) = retarget_font(
            &index,
            &template_ps,
            &target_ps,
            &target_tt,
            RetargetOptions::default(),
        );
        assert!(recipe.is_empty());
        assert_eq!(counts.skipped, 1);

        let fuzzy = RetargetOptions {
            strategy: MatchStrategy::Fuzzy { radius: 2 },
            ..RetargetOptions::default()
        };
        let (recipe, _) = retarget_font(&index, &template_ps, &target_ps, &target_tt, fuzzy);
        assert_eq!(recipe.entries[0].hints, "1,0,0;1,2,0");
    }

    #[test]
    fn glyph_with_only_deltas_is_left_out() {
        let (template_ps, template_tt) = fonts(outline("l", vec![bar(0)]), outline("l", vec![bar(0)]));
        let index = index_for("l\t21,0,1,8,12\n", &template_ps, &template_tt);
        assert_eq!(index.glyphs.len(), 1);
        let (recipe, counts) = retarget_font(
            &index,
            &template_ps,
            &template_ps,
            &template_tt,
            RetargetOptions::default(),
        );
        assert!(recipe.is_empty());
        assert_eq!(counts.skipped, 1);
    }
}
