//! Font format conversion utilities
//!
//! This module turns the two on-disk outline sources into our outline model:
//! the PostScript outline comes from a UFO loaded with norad, the TrueType
//! outline from the glyf table of a binary font read with read-fonts. This is
//! pure data transformation; finding and converting the files is done in
//! `io`.

use std::path::Path;

use read_fonts::tables::glyf::Glyph;
use read_fonts::types::GlyphId16;
use read_fonts::{FontRef, ReadError, TableProvider};

use super::font::{FontOutlines, OutlineFlavor};
use super::outline::{Contour, GlyphOutline, OutlinePoint, PointKind};

/// UFO lib key holding the designer's glyph order
const GLYPH_ORDER_KEY: &str = "public.glyphOrder";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load UFO {path}: {message}")]
    Ufo { path: String, message: String },
    #[error("failed to parse TrueType font {path}: {source}")]
    TrueType {
        path: String,
        #[source]
        source: ReadError,
    },
    #[error("TrueType font {path} has no glyph name for glyph id {gid}")]
    MissingGlyphName { path: String, gid: u16 },
}

impl PointKind {
    pub fn from_norad_point_type(norad_type: &norad::PointType) -> Self {
        match norad_type {
            norad::PointType::OffCurve => PointKind::OffCurve,
            norad::PointType::Move
            | norad::PointType::Line
            | norad::PointType::Curve
            | norad::PointType::QCurve => PointKind::OnCurve,
        }
    }
}

impl OutlinePoint {
    /// UFO coordinates may be fractional; hint recipes work on the integer
    /// grid, so they are rounded.
    pub fn from_norad_point(norad_point: &norad::ContourPoint) -> Self {
        Self {
            coord: (
                norad_point.x.round() as i32,
                norad_point.y.round() as i32,
            )
                .into(),
            kind: PointKind::from_norad_point_type(&norad_point.typ),
        }
    }
}

impl Contour {
    pub fn from_norad_contour(norad_contour: &norad::Contour) -> Self {
        let points = norad_contour
            .points
            .iter()
            .map(OutlinePoint::from_norad_point)
            .collect();

        Self { points }
    }
}

impl GlyphOutline {
    /// Convert from a norad glyph. Components are ignored, only the glyph's
    /// own contours carry hintable points.
    pub fn from_norad_glyph(norad_glyph: &norad::Glyph) -> Self {
        let contours = norad_glyph
            .contours
            .iter()
            .map(Contour::from_norad_contour)
            .collect();

        Self {
            name: norad_glyph.name().to_string(),
            contours,
        }
    }
}

impl FontOutlines {
    /// Extract the default layer of a norad font.
    ///
    /// The glyph order follows `public.glyphOrder` when the font has one;
    /// glyphs it does not list are appended in layer order.
    pub fn from_norad_font(font: &norad::Font, path: Option<&Path>) -> Self {
        let layer = font.default_layer();
        let mut outlines = FontOutlines::new(OutlineFlavor::PostScript);
        outlines.path = path.map(Path::to_path_buf);

        let ordered_names: Vec<&str> = font
            .lib
            .get(GLYPH_ORDER_KEY)
            .and_then(plist::Value::as_array)
            .map(|names| names.iter().filter_map(plist::Value::as_string).collect())
            .unwrap_or_default();

        for name in ordered_names {
            if let Some(glyph) = layer.get_glyph(name) {
                outlines.insert(GlyphOutline::from_norad_glyph(glyph));
            }
        }

        for glyph in layer.iter() {
            if !outlines.contains(&glyph.name().to_string()) {
                outlines.insert(GlyphOutline::from_norad_glyph(glyph));
            }
        }

        outlines
    }

    /// Extract every glyph of a binary TrueType font, in glyph id order.
    ///
    /// Glyph names come from the `post` table; a font without them cannot be
    /// matched against a recipe file and is rejected. Composite and empty
    /// glyphs get an outline without contours.
    pub fn from_ttf_data(data: &[u8], path: &Path) -> Result<Self, LoadError> {
        let label = path.display().to_string();
        let parse_err = |source| LoadError::TrueType {
            path: label.clone(),
            source,
        };

        let font = FontRef::new(data).map_err(parse_err)?;
        let num_glyphs = font.maxp().map_err(parse_err)?.num_glyphs();
        let post = font.post().map_err(parse_err)?;
        let loca = font.loca(None).map_err(parse_err)?;
        let glyf = font.glyf().map_err(parse_err)?;

        let mut outlines = FontOutlines::new(OutlineFlavor::TrueType);
        outlines.path = Some(path.to_path_buf());

        for gid in 0..num_glyphs {
            let glyph_id = GlyphId16::new(gid);
            let name = post
                .glyph_name(glyph_id)
                .ok_or_else(|| LoadError::MissingGlyphName {
                    path: label.clone(),
                    gid,
                })?;

            let contours = match loca.get_glyf(glyph_id.into(), &glyf).map_err(parse_err)? {
                Some(Glyph::Simple(simple)) => {
                    let mut points = simple.points();
                    let mut contours = Vec::new();
                    let mut start = 0usize;
                    for end in simple.end_pts_of_contours() {
                        let end = end.get() as usize;
                        let len = (end + 1).saturating_sub(start);
                        let contour_points = points
                            .by_ref()
                            .take(len)
                            .map(|p| {
                                let (x, y) = (p.x as i32, p.y as i32);
                                if p.on_curve {
                                    OutlinePoint::on(x, y)
                                } else {
                                    OutlinePoint::off(x, y)
                                }
                            })
                            .collect();
                        contours.push(Contour::new(contour_points));
                        start = end + 1;
                    }
                    contours
                }
                Some(Glyph::Composite(_)) | None => Vec::new(),
            };

            outlines.insert(GlyphOutline::new(name, contours));
        }

        Ok(outlines)
    }
}
