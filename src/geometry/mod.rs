//! Geometry helpers for matching outlines
//!
//! - `correspondence`: coordinate → point index lookup, fuzzy matching and
//!   sidebearing phantom points
//! - `intersect`: strict segment crossing test

pub mod correspondence;
pub mod intersect;

pub use correspondence::{
    classify_index, CorrespondenceError, IndexSlot, MatchStrategy, PointIndexMap, PointMatch,
};
pub use intersect::segments_intersect;
