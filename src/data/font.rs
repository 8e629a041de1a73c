//! Font-level outline storage

use std::collections::HashMap;
use std::path::PathBuf;

use super::outline::GlyphOutline;

/// Which kind of outline a font holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlineFlavor {
    PostScript,
    TrueType,
}

/// All glyph outlines of one font, plus its glyph order
#[derive(Clone, Debug)]
pub struct FontOutlines {
    pub flavor: OutlineFlavor,
    /// Where the outlines were read from, for diagnostics
    pub path: Option<PathBuf>,
    glyph_order: Vec<String>,
    glyphs: HashMap<String, GlyphOutline>,
}

impl FontOutlines {
    pub fn new(flavor: OutlineFlavor) -> Self {
        Self {
            flavor,
            path: None,
            glyph_order: Vec::new(),
            glyphs: HashMap::new(),
        }
    }

    /// Builds a font from outlines, keeping their order as the glyph order.
    pub fn with_glyphs(
        flavor: OutlineFlavor,
        outlines: impl IntoIterator<Item = GlyphOutline>,
    ) -> Self {
        let mut font = Self::new(flavor);
        for outline in outlines {
            font.insert(outline);
        }
        font
    }

    /// Adds a glyph at the end of the glyph order, replacing an outline of
    /// the same name in place.
    pub fn insert(&mut self, outline: GlyphOutline) {
        if !self.glyphs.contains_key(&outline.name) {
            self.glyph_order.push(outline.name.clone());
        }
        self.glyphs.insert(outline.name.clone(), outline);
    }

    pub fn get(&self, name: &str) -> Option<&GlyphOutline> {
        self.glyphs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn glyph_order(&self) -> &[String] {
        &self.glyph_order
    }

    pub fn len(&self) -> usize {
        self.glyph_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyph_order.is_empty()
    }

    /// Short label for log lines
    pub fn label(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => match self.flavor {
                OutlineFlavor::PostScript => "<PS outlines>".to_string(),
                OutlineFlavor::TrueType => "<TT outlines>".to_string(),
            },
        }
    }
}
