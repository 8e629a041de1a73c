//! Outline data structures
//!
//! Both outline flavours of a glyph (the PostScript outline read from a UFO
//! and the TrueType outline read from the glyf table) are stored in the same
//! shape: contours of integer points with an on/off-curve flag. Point indices
//! are always flattened across contours, which is the numbering TrueType
//! instructions use.

use std::fmt;

/// An integer design-space coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    /// Recipe files write coordinates without inner spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for kurbo::Point {
    fn from(coord: Coord) -> Self {
        kurbo::Point::new(coord.x as f64, coord.y as f64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    OnCurve,
    OffCurve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlinePoint {
    pub coord: Coord,
    pub kind: PointKind,
}

impl OutlinePoint {
    pub fn on(x: i32, y: i32) -> Self {
        Self {
            coord: Coord::new(x, y),
            kind: PointKind::OnCurve,
        }
    }

    pub fn off(x: i32, y: i32) -> Self {
        Self {
            coord: Coord::new(x, y),
            kind: PointKind::OffCurve,
        }
    }

    pub fn is_on_curve(&self) -> bool {
        self.kind == PointKind::OnCurve
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<OutlinePoint>,
}

impl Contour {
    pub fn new(points: Vec<OutlinePoint>) -> Self {
        Self { points }
    }

    /// On-curve coordinates of this contour in order.
    ///
    /// Some editors store the start point of a closed contour a second time
    /// at the end; that trailing copy is dropped so both outlines of a pair
    /// line up position by position.
    pub fn on_curve_coords(&self) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self
            .points
            .iter()
            .filter(|p| p.is_on_curve())
            .map(|p| p.coord)
            .collect();
        if coords.len() > 2 && coords.first() == coords.last() {
            coords.pop();
        }
        coords
    }
}

/// The outline of one glyph in one flavour
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphOutline {
    pub name: String,
    pub contours: Vec<Contour>,
}

impl GlyphOutline {
    pub fn new(name: impl Into<String>, contours: Vec<Contour>) -> Self {
        Self {
            name: name.into(),
            contours,
        }
    }

    /// Total number of points, on- and off-curve, over all contours
    pub fn point_count(&self) -> usize {
        self.contours.iter().map(|c| c.points.len()).sum()
    }

    /// All points in flattened index order
    pub fn points(&self) -> impl Iterator<Item = &OutlinePoint> + '_ {
        self.contours.iter().flat_map(|c| c.points.iter())
    }

    /// The point at a flattened index
    pub fn point(&self, index: usize) -> Option<&OutlinePoint> {
        let mut remaining = index;
        for contour in &self.contours {
            if remaining < contour.points.len() {
                return contour.points.get(remaining);
            }
            remaining -= contour.points.len();
        }
        None
    }

    /// On-curve coordinates grouped per contour, see
    /// [`Contour::on_curve_coords`].
    pub fn on_curve_coords_by_contour(&self) -> Vec<Vec<Coord>> {
        self.contours.iter().map(Contour::on_curve_coords).collect()
    }

    /// The same coordinates flattened. A node number is a position in this
    /// list; unlike a point index it does not move when off-curve points
    /// are added or removed.
    pub fn nodes(&self) -> Vec<Coord> {
        self.contours.iter().flat_map(Contour::on_curve_coords).collect()
    }
}
