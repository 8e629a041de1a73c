//! Outline compatibility between a template glyph and its sibling
//!
//! Two checks, cheapest first. The outlines must have the same contours with
//! the same number of on-curve points. Then every on-curve point is joined to
//! its counterpart in the other outline; if two of those joining segments
//! cross, the points probably moved past each other and the glyph is flagged
//! for review.
//!
//! Points are paired by position only. A contour whose start point was
//! rotated but kept its length passes as compatible.

use std::fmt;

use kurbo::Line;

use crate::data::GlyphOutline;
use crate::geometry::segments_intersect;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncompatibleReason {
    ContourCount { template: usize, target: usize },
    ContourLength {
        contour: usize,
        template: usize,
        target: usize,
    },
}

impl fmt::Display for IncompatibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompatibleReason::ContourCount { template, target } => {
                write!(f, "{template} contours in the template, {target} in the target")
            }
            IncompatibleReason::ContourLength {
                contour,
                template,
                target,
            } => write!(
                f,
                "contour {contour} has {template} on-curve points in the template, {target} in the target"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    DefinitelyIncompatible(IncompatibleReason),
    /// Corresponding points cross over; hints can be moved but need a look
    PossiblyIncompatible,
}

impl Compatibility {
    pub fn allows_hints(&self) -> bool {
        !matches!(self, Compatibility::DefinitelyIncompatible(_))
    }
}

/// Compares the PostScript outlines of one glyph in two styles.
pub fn verify(template: &GlyphOutline, target: &GlyphOutline) -> Compatibility {
    let template_coords = template.on_curve_coords_by_contour();
    let target_coords = target.on_curve_coords_by_contour();

    if template_coords.len() != target_coords.len() {
        return Compatibility::DefinitelyIncompatible(IncompatibleReason::ContourCount {
            template: template_coords.len(),
            target: target_coords.len(),
        });
    }

    let mut segments = Vec::new();
    for (contour, (ours, theirs)) in template_coords.iter().zip(&target_coords).enumerate() {
        if ours.len() != theirs.len() {
            return Compatibility::DefinitelyIncompatible(IncompatibleReason::ContourLength {
                contour,
                template: ours.len(),
                target: theirs.len(),
            });
        }
        segments.extend(
            ours.iter()
                .zip(theirs)
                .map(|(&from, &to)| Line::new(from, to)),
        );
    }

    let crossing = segments.iter().enumerate().any(|(i, first)| {
        segments[i + 1..]
            .iter()
            .any(|second| segments_intersect(*first, *second))
    });
    if crossing {
        Compatibility::PossiblyIncompatible
    } else {
        Compatibility::Compatible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Contour, OutlinePoint};

    fn square(name: &str, x: i32, size: i32) -> GlyphOutline {
        GlyphOutline::new(
            name,
            vec![Contour::new(vec![
                OutlinePoint::on(x, 0),
                OutlinePoint::on(x + size, 0),
                OutlinePoint::on(x + size, size),
                OutlinePoint::on(x, size),
            ])],
        )
    }

    #[test]
    fn scaled_outline_is_compatible() {
        assert_eq!(verify(&square("a", 0, 100), &square("a", 0, 120)), Compatibility::Compatible);
        assert_eq!(verify(&square("a", 0, 100), &square("a", 0, 100)), Compatibility::Compatible);
    }

    #[test]
    fn contour_count_mismatch_is_definite() {
        let mut two = square("e", 0, 100);
        two.contours.push(square("e", 300, 50).contours.remove(0));
        assert_eq!(
            verify(&two, &square("e", 0, 100)),
            Compatibility::DefinitelyIncompatible(IncompatibleReason::ContourCount {
                template: 2,
                target: 1
            })
        );
    }

    #[test]
    fn ragged_contour_is_definite() {
        let mut five = square("o", 0, 100);
        five.contours[0].points.insert(1, OutlinePoint::on(50, 0));
        assert!(matches!(
            verify(&square("o", 0, 100), &five),
            Compatibility::DefinitelyIncompatible(IncompatibleReason::ContourLength { contour: 0, .. })
        ));
    }

    #[test]
    fn off_curve_points_and_closing_duplicates_do_not_count() {
        let mut busy = square("o", 0, 100);
        busy.contours[0].points.insert(2, OutlinePoint::off(105, 50));
        busy.contours[0].points.push(OutlinePoint::on(0, 0));
        assert_eq!(verify(&square("o", 0, 100), &busy), Compatibility::Compatible);
    }

    #[test]
    fn crossing_points_are_possibly_incompatible() {
        let target = GlyphOutline::new(
            "a",
            vec![Contour::new(vec![
                OutlinePoint::on(0, 0),
                OutlinePoint::on(100, 0),
                OutlinePoint::on(0, 150),
                OutlinePoint::on(100, 150),
            ])],
        );
        let verdict = verify(&square("a", 0, 100), &target);
        assert_eq!(verdict, Compatibility::PossiblyIncompatible);
        assert!(verdict.allows_hints());
    }

    #[test]
    fn rotated_start_point_still_allows_hints() {
        let rotated = GlyphOutline::new(
            "a",
            vec![Contour::new(vec![
                OutlinePoint::on(100, 0),
                OutlinePoint::on(100, 100),
                OutlinePoint::on(0, 100),
                OutlinePoint::on(0, 0),
            ])],
        );
        assert!(verify(&square("a", 0, 100), &rotated).allows_hints());
    }
}
