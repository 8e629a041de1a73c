//! Segment intersection by orientation tests

use kurbo::{Line, Point};

/// True when `a`, `b`, `c` make a strict counter-clockwise turn
fn ccw(a: Point, b: Point, c: Point) -> bool {
    (b - a).cross(c - a) > 0.0
}

/// Strict crossing test for two segments.
///
/// Each segment's endpoints must lie on opposite sides of the other segment.
/// Collinear and zero-length segments never count as crossing; an endpoint
/// resting on the other segment does.
pub fn segments_intersect(first: Line, second: Line) -> bool {
    let (a, b) = (first.p0, first.p1);
    let (c, d) = (second.p0, second.p1);
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(a: (f64, f64), b: (f64, f64)) -> Line {
        Line::new(a, b)
    }

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(
            line((0., 0.), (10., 10.)),
            line((0., 10.), (10., 0.))
        ));
    }

    #[test]
    fn parallel_and_disjoint_segments() {
        assert!(!segments_intersect(
            line((0., 0.), (10., 0.)),
            line((0., 5.), (10., 5.))
        ));
        assert!(!segments_intersect(
            line((0., 0.), (1., 1.)),
            line((5., 0.), (6., -3.))
        ));
    }

    #[test]
    fn degenerate_segments_never_cross() {
        // a point that did not move between styles
        assert!(!segments_intersect(
            line((3., 3.), (3., 3.)),
            line((0., 10.), (10., 0.))
        ));
    }
}
