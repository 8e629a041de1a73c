//! TrueType hint instructions as stored in recipe files
//!
//! An instruction is written as comma separated items: the kind code, the
//! point references, then the kind's trailing parameters, e.g.
//! `4,(155,181),(180,249),0,-1` or `4,6,9,0,-1`.

use std::fmt;

use crate::data::Coord;

/// Direction an instruction acts in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// The instruction kinds a recipe can hold, keyed by their numeric code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HintKind {
    AlignTop,
    AlignBottom,
    AlignNear(Axis),
    SingleLink(Axis),
    DoubleLink(Axis),
    Interpolate(Axis),
    MidDelta(Axis),
    FinDelta(Axis),
}

/// Broad groups sharing the same item layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintFamily {
    Alignment,
    Link,
    Interpolation,
    Delta,
}

impl HintKind {
    pub fn from_code(code: i32) -> Option<Self> {
        use Axis::*;
        Some(match code {
            1 => HintKind::AlignTop,
            2 => HintKind::AlignBottom,
            3 => HintKind::SingleLink(Horizontal),
            4 => HintKind::SingleLink(Vertical),
            5 => HintKind::DoubleLink(Horizontal),
            6 => HintKind::DoubleLink(Vertical),
            7 => HintKind::AlignNear(Horizontal),
            8 => HintKind::AlignNear(Vertical),
            13 => HintKind::Interpolate(Horizontal),
            14 => HintKind::Interpolate(Vertical),
            20 => HintKind::MidDelta(Horizontal),
            21 => HintKind::MidDelta(Vertical),
            22 => HintKind::FinDelta(Horizontal),
            23 => HintKind::FinDelta(Vertical),
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        use Axis::*;
        match self {
            HintKind::AlignTop => 1,
            HintKind::AlignBottom => 2,
            HintKind::SingleLink(Horizontal) => 3,
            HintKind::SingleLink(Vertical) => 4,
            HintKind::DoubleLink(Horizontal) => 5,
            HintKind::DoubleLink(Vertical) => 6,
            HintKind::AlignNear(Horizontal) => 7,
            HintKind::AlignNear(Vertical) => 8,
            HintKind::Interpolate(Horizontal) => 13,
            HintKind::Interpolate(Vertical) => 14,
            HintKind::MidDelta(Horizontal) => 20,
            HintKind::MidDelta(Vertical) => 21,
            HintKind::FinDelta(Horizontal) => 22,
            HintKind::FinDelta(Vertical) => 23,
        }
    }

    pub fn family(self) -> HintFamily {
        match self {
            HintKind::AlignTop | HintKind::AlignBottom | HintKind::AlignNear(_) => {
                HintFamily::Alignment
            }
            HintKind::SingleLink(_) | HintKind::DoubleLink(_) => HintFamily::Link,
            HintKind::Interpolate(_) => HintFamily::Interpolation,
            HintKind::MidDelta(_) | HintKind::FinDelta(_) => HintFamily::Delta,
        }
    }

    pub fn is_delta(self) -> bool {
        self.family() == HintFamily::Delta
    }

    /// Number of point references; fixed per kind
    pub fn point_count(self) -> usize {
        match self.family() {
            HintFamily::Alignment | HintFamily::Delta => 1,
            HintFamily::Link => 2,
            HintFamily::Interpolation => 3,
        }
    }

    /// Minimum number of trailing parameters. Deltas carry the offset and the
    /// ppm range; everything else at least a stem or alignment value.
    pub fn min_params(self) -> usize {
        match self.family() {
            HintFamily::Delta => 3,
            _ => 1,
        }
    }
}

/// Phantom point a hint can be attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sidebearing {
    Left,
    Right,
}

impl Sidebearing {
    /// The literal used in recipe files
    pub fn flag(self) -> &'static str {
        match self {
            Sidebearing::Left => "BL",
            Sidebearing::Right => "BR",
        }
    }
}

/// A point reference as written in a recipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointRef {
    Index(usize),
    Coord(Coord),
    Sidebearing(Sidebearing),
}

impl fmt::Display for PointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRef::Index(index) => write!(f, "{index}"),
            PointRef::Coord(coord) => write!(f, "{coord}"),
            PointRef::Sidebearing(side) => write!(f, "\"{}\"", side.flag()),
        }
    }
}

/// How point references are written out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Index,
    Coordinates,
}

/// One hint instruction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintInstruction {
    pub kind: HintKind,
    pub points: Vec<PointRef>,
    pub params: Vec<i32>,
}

impl HintInstruction {
    pub fn new(kind: HintKind, points: Vec<PointRef>, params: Vec<i32>) -> Self {
        Self {
            kind,
            points,
            params,
        }
    }

    /// Same kind and parameters, other points
    pub fn with_points(&self, points: Vec<PointRef>) -> Self {
        Self {
            kind: self.kind,
            points,
            params: self.params.clone(),
        }
    }
}

impl fmt::Display for HintInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.code())?;
        for point in &self.points {
            write!(f, ",{point}")?;
        }
        for param in &self.params {
            write!(f, ",{param}")?;
        }
        Ok(())
    }
}

/// Joins instructions into the hint field of a recipe line
pub fn format_instructions(instructions: &[HintInstruction]) -> String {
    instructions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_the_registry() {
        for code in (1..=8).chain([13, 14, 20, 21, 22, 23]) {
            let kind = HintKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        for code in [0, 9, 12, 15, 19, 24, -1] {
            assert_eq!(HintKind::from_code(code), None);
        }
    }

    #[test]
    fn point_counts_depend_on_kind_only() {
        assert_eq!(HintKind::AlignTop.point_count(), 1);
        assert_eq!(HintKind::FinDelta(Axis::Vertical).point_count(), 1);
        assert_eq!(HintKind::DoubleLink(Axis::Horizontal).point_count(), 2);
        assert_eq!(HintKind::Interpolate(Axis::Vertical).point_count(), 3);
    }

    #[test]
    fn display_matches_file_syntax() {
        let link = HintInstruction::new(
            HintKind::SingleLink(Axis::Horizontal),
            vec![
                PointRef::Sidebearing(Sidebearing::Left),
                PointRef::Coord(Coord::new(83, 0)),
            ],
            vec![0, -1],
        );
        assert_eq!(link.to_string(), "3,\"BL\",(83,0),0,-1");

        let align = HintInstruction::new(HintKind::AlignTop, vec![PointRef::Index(9)], vec![0]);
        assert_eq!(
            format_instructions(&[align.clone(), align]),
            "1,9,0;1,9,0"
        );
    }
}
