//! Point correspondence between outline coordinates and point indices
//!
//! The only thing that survives a PostScript to TrueType conversion, or the
//! step from one style to a compatible sibling, is the position of on-curve
//! points. This index turns such a position back into a point number.

use std::collections::HashMap;

use log::debug;

use crate::data::{Contour, Coord, GlyphOutline};

/// How a coordinate is looked up in a [`PointIndexMap`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Only the exact coordinate matches
    #[default]
    Exact,
    /// When nothing sits at the exact coordinate, accept the single on-curve
    /// point inside the square window of `radius` units around it. Several
    /// candidates in the window is a miss, not a guess. The CLI caps the
    /// radius at `MAX_FUZZINESS`; any value is safe here.
    Fuzzy { radius: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrespondenceError {
    #[error("glyph '{glyph}' has more than one on-curve point at {coord}")]
    DuplicateCoordinate { glyph: String, coord: Coord },
}

/// What a flattened point index refers to in an outline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexSlot {
    /// A real outline point
    Point(usize),
    /// The phantom point for the left sidebearing (index == point count)
    LeftSidebearing,
    /// The phantom point for the right sidebearing (index == point count + 1)
    RightSidebearing,
    /// Beyond the phantom points; nothing there
    OutOfRange,
}

/// Classifies a point index against an outline with `point_count` points.
pub fn classify_index(index: usize, point_count: usize) -> IndexSlot {
    if index < point_count {
        IndexSlot::Point(index)
    } else if index == point_count {
        IndexSlot::LeftSidebearing
    } else if index == point_count + 1 {
        IndexSlot::RightSidebearing
    } else {
        IndexSlot::OutOfRange
    }
}

/// Result of a lookup that may have fallen back to a fuzzy match
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointMatch {
    Exact(usize),
    /// Found within the search window at `found`
    Near { index: usize, found: Coord },
}

impl PointMatch {
    pub fn index(&self) -> usize {
        match *self {
            PointMatch::Exact(index) | PointMatch::Near { index, .. } => index,
        }
    }
}

/// Offset of the on-curve point that repeats the contour's start point at
/// its end, when there is one.
fn closing_copy(contour: &Contour) -> Option<usize> {
    let on_curve: Vec<usize> = (0..contour.points.len())
        .filter(|&offset| contour.points[offset].is_on_curve())
        .collect();
    let (&first, &last) = (on_curve.first()?, on_curve.last()?);
    (on_curve.len() > 2 && contour.points[first].coord == contour.points[last].coord)
        .then_some(last)
}

/// Map from on-curve coordinate to flattened point index for one glyph
#[derive(Clone, Debug)]
pub struct PointIndexMap {
    glyph: String,
    by_coord: HashMap<Coord, usize>,
    point_count: usize,
}

impl PointIndexMap {
    /// Indexes the on-curve points of an outline. Off-curve points are left
    /// out, they have no stable identity across conversions. A closing copy
    /// of a contour's start point (see [`Contour::on_curve_coords`]) is left
    /// out too; the start point keeps the coordinate.
    pub fn build(outline: &GlyphOutline) -> Result<Self, CorrespondenceError> {
        let mut by_coord = HashMap::new();
        let mut start = 0;
        for contour in &outline.contours {
            let closing = closing_copy(contour);
            for (offset, point) in contour.points.iter().enumerate() {
                if !point.is_on_curve() || Some(offset) == closing {
                    continue;
                }
                if by_coord.insert(point.coord, start + offset).is_some() {
                    return Err(CorrespondenceError::DuplicateCoordinate {
                        glyph: outline.name.clone(),
                        coord: point.coord,
                    });
                }
            }
            start += contour.points.len();
        }

        Ok(Self {
            glyph: outline.name.clone(),
            by_coord,
            point_count: outline.point_count(),
        })
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// Number of points (on- and off-curve) of the indexed outline
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Exact lookup
    pub fn get(&self, coord: Coord) -> Option<usize> {
        self.by_coord.get(&coord).copied()
    }

    /// Lookup following `strategy`
    pub fn find(&self, coord: Coord, strategy: MatchStrategy) -> Option<PointMatch> {
        if let Some(index) = self.get(coord) {
            return Some(PointMatch::Exact(index));
        }
        let MatchStrategy::Fuzzy { radius } = strategy else {
            return None;
        };

        let radius = u64::from(radius);
        let mut candidates = self
            .by_coord
            .iter()
            .filter(|(found, _)| {
                coord.x.abs_diff(found.x) as u64 <= radius
                    && coord.y.abs_diff(found.y) as u64 <= radius
            })
            .map(|(&found, &index)| (index, found));

        let (index, found) = candidates.next()?;
        if candidates.next().is_some() {
            debug!(
                "glyph '{}': several points around {}, not guessing",
                self.glyph, coord
            );
            return None;
        }
        Some(PointMatch::Near { index, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Contour, OutlinePoint};

    fn outline(points: Vec<OutlinePoint>) -> GlyphOutline {
        GlyphOutline::new("test", vec![Contour::new(points)])
    }

    #[test]
    fn on_curve_only_outline_is_a_bijection() {
        let glyph = GlyphOutline::new(
            "H",
            vec![
                Contour::new(vec![
                    OutlinePoint::on(0, 0),
                    OutlinePoint::on(80, 0),
                    OutlinePoint::on(80, 700),
                    OutlinePoint::on(0, 700),
                ]),
                Contour::new(vec![
                    OutlinePoint::on(400, 0),
                    OutlinePoint::on(480, 0),
                    OutlinePoint::on(480, 700),
                ]),
            ],
        );
        let map = PointIndexMap::build(&glyph).unwrap();
        let mut seen: Vec<usize> = glyph
            .points()
            .map(|p| map.get(p.coord).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..glyph.point_count()).collect::<Vec<_>>());
    }

    #[test]
    fn off_curve_points_keep_their_index_slot() {
        let glyph = outline(vec![
            OutlinePoint::on(0, 0),
            OutlinePoint::off(50, 80),
            OutlinePoint::on(100, 0),
        ]);
        let map = PointIndexMap::build(&glyph).unwrap();
        assert_eq!(map.get(Coord::new(100, 0)), Some(2));
        assert_eq!(map.get(Coord::new(50, 80)), None);
        assert_eq!(map.point_count(), 3);
    }

    #[test]
    fn duplicate_on_curve_coordinate_is_reported() {
        let glyph = outline(vec![
            OutlinePoint::on(10, 10),
            OutlinePoint::on(20, 10),
            OutlinePoint::on(10, 10),
        ]);
        let err = PointIndexMap::build(&glyph).unwrap_err();
        assert_eq!(
            err,
            CorrespondenceError::DuplicateCoordinate {
                glyph: "test".into(),
                coord: Coord::new(10, 10)
            }
        );
    }

    #[test]
    fn fuzzy_match_needs_a_single_candidate() {
        let glyph = outline(vec![
            OutlinePoint::on(100, 100),
            OutlinePoint::on(200, 100),
            OutlinePoint::on(203, 101),
        ]);
        let map = PointIndexMap::build(&glyph).unwrap();
        let fuzzy = MatchStrategy::Fuzzy { radius: 2 };

        assert_eq!(map.find(Coord::new(101, 99), MatchStrategy::Exact), None);
        assert_eq!(
            map.find(Coord::new(101, 99), fuzzy),
            Some(PointMatch::Near {
                index: 0,
                found: Coord::new(100, 100)
            })
        );
        // (200,100) and (203,101) are both within reach of (201,100)
        assert_eq!(map.find(Coord::new(201, 100), fuzzy), None);
        // exact hits never look around
        assert_eq!(
            map.find(Coord::new(200, 100), fuzzy),
            Some(PointMatch::Exact(1))
        );
    }

    #[test]
    fn huge_radius_stays_exact_and_cheap() {
        let map = PointIndexMap::build(&outline(vec![OutlinePoint::on(10, 10)])).unwrap();
        for radius in [1, 3_000_000_000, i32::MAX as u32, u32::MAX] {
            assert_eq!(
                map.find(Coord::new(9, 9), MatchStrategy::Fuzzy { radius }),
                Some(PointMatch::Near {
                    index: 0,
                    found: Coord::new(10, 10)
                })
            );
        }
        let far = Coord::new(i32::MIN, i32::MAX);
        assert_eq!(map.find(far, MatchStrategy::Fuzzy { radius: 64 }), None);
        assert!(map.find(far, MatchStrategy::Fuzzy { radius: u32::MAX }).is_some());
    }

    #[test]
    fn closing_copy_of_the_start_point_is_not_a_duplicate() {
        let glyph = GlyphOutline::new(
            "o",
            vec![
                Contour::new(vec![OutlinePoint::on(500, 0), OutlinePoint::on(600, 0)]),
                Contour::new(vec![
                    OutlinePoint::on(0, 0),
                    OutlinePoint::on(100, 0),
                    OutlinePoint::off(100, 100),
                    OutlinePoint::on(0, 100),
                    OutlinePoint::on(0, 0),
                ]),
            ],
        );
        let map = PointIndexMap::build(&glyph).unwrap();
        assert_eq!(map.get(Coord::new(0, 0)), Some(2));
        assert_eq!(map.point_count(), 7);

        // a two-point contour folding back is still a real duplicate
        let folded = outline(vec![OutlinePoint::on(1, 1), OutlinePoint::on(1, 1)]);
        assert!(PointIndexMap::build(&folded).is_err());
    }

    #[test]
    fn phantom_indices_follow_the_points() {
        assert_eq!(classify_index(3, 10), IndexSlot::Point(3));
        assert_eq!(classify_index(10, 10), IndexSlot::LeftSidebearing);
        assert_eq!(classify_index(11, 10), IndexSlot::RightSidebearing);
        assert_eq!(classify_index(12, 10), IndexSlot::OutOfRange);
    }
}
