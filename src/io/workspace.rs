//! Style folders on disk
//!
//! A style folder holds `font.ttf` next to one PostScript outline source.
//! The hinted template is one such folder; its siblings are found by walking
//! a root directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::core::errors::{TthContext, TthResult};
use crate::core::settings::{
    PFA_FILE_NAME, TTF_FILE_NAME, TTHINTS_FILE_NAME, TXT_FILE_NAME, UFO_FILE_NAME,
};

/// Where the PostScript outlines of a style folder come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutlineSource {
    /// Type 1 font, converted to a UFO before loading
    Pfa(PathBuf),
    Ufo(PathBuf),
    /// Decompiled Type 1 text, compiled to a PFA first
    Txt(PathBuf),
}

impl OutlineSource {
    /// Picks the source of `folder`, preferring PFA, then UFO, then TXT.
    pub fn detect(folder: &Path) -> Option<Self> {
        let pfa = folder.join(PFA_FILE_NAME);
        if pfa.is_file() {
            return Some(OutlineSource::Pfa(pfa));
        }
        let ufo = folder.join(UFO_FILE_NAME);
        if ufo.is_dir() {
            return Some(OutlineSource::Ufo(ufo));
        }
        let txt = folder.join(TXT_FILE_NAME);
        if txt.is_file() {
            return Some(OutlineSource::Txt(txt));
        }
        None
    }
}

/// Files of one style folder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleFolder {
    pub path: PathBuf,
    pub ttf: PathBuf,
    pub source: OutlineSource,
}

impl StyleFolder {
    /// `None` unless the folder has a `font.ttf` and an outline source.
    pub fn open(path: &Path) -> Option<Self> {
        let ttf = path.join(TTF_FILE_NAME);
        if !ttf.is_file() {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            ttf,
            source: OutlineSource::detect(path)?,
        })
    }

    pub fn tthints(&self) -> PathBuf {
        self.path.join(TTHINTS_FILE_NAME)
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_ufo_package(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ufo"))
}

/// Every style folder below `root` (itself included) except `template`,
/// sorted by path. UFO packages are not descended into and symlinked
/// directories are not followed.
pub fn find_style_folders(root: &Path, template: &Path) -> TthResult<Vec<PathBuf>> {
    let template = canonical(template);
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut is_root = true;

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if is_root => return Err(err).with_file_context("list", &dir),
            Err(err) => {
                warn!("Skipping unreadable folder {}: {err}", dir.display());
                continue;
            }
        };
        is_root = false;

        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let path = entry.path();
            if is_dir && !is_ufo_package(&path) {
                pending.push(path);
            }
        }

        if StyleFolder::open(&dir).is_some() && canonical(&dir) != template {
            found.push(dir);
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn source_priority_is_pfa_ufo_txt() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(TXT_FILE_NAME));
        assert!(matches!(OutlineSource::detect(dir.path()), Some(OutlineSource::Txt(_))));
        fs::create_dir(dir.path().join(UFO_FILE_NAME)).unwrap();
        assert!(matches!(OutlineSource::detect(dir.path()), Some(OutlineSource::Ufo(_))));
        touch(&dir.path().join(PFA_FILE_NAME));
        assert!(matches!(OutlineSource::detect(dir.path()), Some(OutlineSource::Pfa(_))));
    }

    #[test]
    fn walk_finds_siblings_but_not_the_template() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for style in ["Roman/Bold", "Roman/Regular", "Italic/Light"] {
            touch(&root.join(style).join(TTF_FILE_NAME));
            touch(&root.join(style).join(PFA_FILE_NAME));
        }
        // a folder with only a ttf is not a style
        touch(&root.join("Roman/Draft").join(TTF_FILE_NAME));
        // nothing inside a UFO package counts
        touch(&root.join("Roman/Bold/font.ufo/glyphs").join(TTF_FILE_NAME));
        touch(&root.join("Roman/Bold/font.ufo/glyphs").join(PFA_FILE_NAME));

        let template = root.join("Roman/./Regular");
        let folders = find_style_folders(root, &template).unwrap();
        assert_eq!(folders, vec![root.join("Italic/Light"), root.join("Roman/Bold")]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_style_folders(&dir.path().join("nope"), dir.path()).is_err());
    }
}
