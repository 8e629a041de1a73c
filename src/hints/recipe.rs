//! Recipe files (`tthints`)
//!
//! One glyph per line: `name<TAB>hints[<TAB>mark]`, where `hints` is a `;`
//! separated list of instructions and `mark` an optional glyph colour code.
//! Lines starting with `#` and blank lines are ignored.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::core::errors::{TthContext, TthResult};
use crate::core::settings::TTHINTS_HEADER;

use super::instruction::{format_instructions, HintInstruction};
use super::parse::{parse_instructions, InstructionError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeLineError {
    #[error("line {line}: expected 2 or 3 tab separated fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: glyph mark '{mark}' is not an integer")]
    BadMark { line: usize, mark: String },
    #[error("line {line}: missing glyph name")]
    MissingName { line: usize },
}

/// One glyph line of a recipe file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeEntry {
    pub glyph: String,
    pub hints: String,
    pub mark: Option<i32>,
    /// The line as read, so untouched entries are written back byte for byte
    raw: Option<String>,
}

impl RecipeEntry {
    pub fn new(glyph: impl Into<String>, hints: impl Into<String>, mark: Option<i32>) -> Self {
        Self {
            glyph: glyph.into(),
            hints: hints.into(),
            mark,
            raw: None,
        }
    }

    /// Builds an entry from instructions
    pub fn from_instructions(
        glyph: impl Into<String>,
        instructions: &[HintInstruction],
        mark: Option<i32>,
    ) -> Self {
        Self::new(glyph, format_instructions(instructions), mark)
    }

    /// Parses one non-comment line
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self, RecipeLineError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if !(2..=3).contains(&fields.len()) {
            return Err(RecipeLineError::FieldCount {
                line: line_number,
                found: fields.len(),
            });
        }
        let glyph = fields[0].trim();
        if glyph.is_empty() {
            return Err(RecipeLineError::MissingName { line: line_number });
        }
        let mark = match fields.get(2).map(|m| m.trim()) {
            None | Some("") => None,
            Some(mark) => Some(mark.parse().map_err(|_| RecipeLineError::BadMark {
                line: line_number,
                mark: mark.to_string(),
            })?),
        };

        Ok(Self {
            glyph: glyph.to_string(),
            hints: fields[1].trim().to_string(),
            mark,
            raw: Some(line.trim_end_matches(['\r', '\n']).to_string()),
        })
    }

    /// Parsed instructions plus the ones that could not be read
    pub fn instructions(&self) -> (Vec<HintInstruction>, Vec<InstructionError>) {
        if self.hints.is_empty() {
            return (Vec::new(), Vec::new());
        }
        parse_instructions(&self.hints)
    }

    /// The line written for this entry
    pub fn to_line(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        match self.mark {
            Some(mark) => format!("{}\t{}\t{}", self.glyph, self.hints, mark),
            None => format!("{}\t{}", self.glyph, self.hints),
        }
    }
}

/// The glyph lines of a recipe file, in file order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipeFile {
    pub entries: Vec<RecipeEntry>,
}

impl RecipeFile {
    /// Parses file contents. Malformed lines are logged and skipped; a glyph
    /// listed twice keeps its first position and its last content.
    pub fn parse(contents: &str) -> Self {
        let mut entries: Vec<RecipeEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (number, line) in contents.lines().enumerate() {
            let stripped = line.trim();
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }
            match RecipeEntry::parse_line(line, number + 1) {
                Ok(entry) => match positions.get(&entry.glyph) {
                    Some(&at) => {
                        debug!("glyph '{}' listed again on line {}", entry.glyph, number + 1);
                        entries[at] = entry;
                    }
                    None => {
                        positions.insert(entry.glyph.clone(), entries.len());
                        entries.push(entry);
                    }
                },
                Err(err) => warn!("Skipping recipe line: {err}"),
            }
        }

        Self { entries }
    }

    pub fn read(path: &Path) -> TthResult<Self> {
        let contents = fs::read_to_string(path).with_file_context("read", path)?;
        Ok(Self::parse(&contents))
    }

    pub fn get(&self, glyph: &str) -> Option<&RecipeEntry> {
        self.entries.iter().find(|e| e.glyph == glyph)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// File contents: the header line, then one line per entry
    pub fn to_text(&self) -> String {
        let mut text = String::from(TTHINTS_HEADER);
        text.push('\n');
        for entry in &self.entries {
            text.push_str(&entry.to_line());
            text.push('\n');
        }
        text
    }

    /// Writes the file in one go: the text goes to a scratch file next to
    /// the target which is then renamed over it.
    pub fn write(&self, path: &Path) -> TthResult<()> {
        let scratch = path.with_extension("partial");
        fs::write(&scratch, self.to_text()).with_file_context("write", &scratch)?;
        fs::rename(&scratch, path).with_file_context("replace", path)?;
        Ok(())
    }
}

/// What happened when a recipe was due to be written
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, glyphs: usize },
    /// No glyph survived, so no file was written
    NothingToOutput,
}

impl RecipeFile {
    /// Writes the file unless it has no entries
    pub fn write_if_any(&self, path: &Path) -> TthResult<WriteOutcome> {
        if self.is_empty() {
            return Ok(WriteOutcome::NothingToOutput);
        }
        self.write(path)?;
        Ok(WriteOutcome::Written {
            path: path.to_path_buf(),
            glyphs: self.len(),
        })
    }
}

/// Combines freshly produced entries with an existing file.
///
/// New entries replace old ones of the same glyph; old entries without a
/// replacement are carried over untouched. Glyphs in `glyph_order` come
/// first in that order, then old entries for glyphs the font does not have
/// (in file order), then any new ones still left.
pub fn merge_entries(
    existing: &RecipeFile,
    fresh: Vec<RecipeEntry>,
    glyph_order: &[String],
) -> RecipeFile {
    let mut fresh_by_name: HashMap<String, RecipeEntry> = HashMap::new();
    let mut fresh_order = Vec::new();
    for entry in fresh {
        if !fresh_by_name.contains_key(&entry.glyph) {
            fresh_order.push(entry.glyph.clone());
        }
        fresh_by_name.insert(entry.glyph.clone(), entry);
    }
    let mut old_by_name: HashMap<&str, &RecipeEntry> = existing
        .entries
        .iter()
        .map(|e| (e.glyph.as_str(), e))
        .collect();

    let mut merged = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();

    for name in glyph_order {
        if !placed.insert(name.as_str()) {
            continue;
        }
        if let Some(entry) = fresh_by_name.remove(name) {
            old_by_name.remove(name.as_str());
            merged.push(entry);
        } else if let Some(entry) = old_by_name.remove(name.as_str()) {
            merged.push(entry.clone());
        }
    }

    for entry in &existing.entries {
        if old_by_name.remove(entry.glyph.as_str()).is_some() {
            merged.push(
                fresh_by_name
                    .remove(&entry.glyph)
                    .unwrap_or_else(|| entry.clone()),
            );
        }
    }

    for name in fresh_order {
        if let Some(entry) = fresh_by_name.remove(&name) {
            merged.push(entry);
        }
    }

    RecipeFile { entries: merged }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Glyph name\tTT hints\n\
        n\t5,13,14,1;1,9,0\n\
        \n\
        o\t5,33,5,0;1,10,0\t25\n\
        space\t3,\"BL\",\"BR\",0,-1\n";

    fn names(file: &RecipeFile) -> Vec<&str> {
        file.entries.iter().map(|e| e.glyph.as_str()).collect()
    }

    #[test]
    fn reads_entries_and_marks() {
        let file = RecipeFile::parse(SAMPLE);
        assert_eq!(names(&file), vec!["n", "o", "space"]);
        assert_eq!(file.get("o").unwrap().mark, Some(25));
        assert_eq!(file.get("n").unwrap().mark, None);
        let (instructions, errors) = file.get("n").unwrap().instructions();
        assert_eq!(instructions.len(), 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let file = RecipeFile::parse("a\nb\t1,2,0\tx\nc\t1,2,0\n d e \n");
        assert_eq!(names(&file), vec!["c"]);
        assert_eq!(
            RecipeEntry::parse_line("a\t1,2,0\tred", 4),
            Err(RecipeLineError::BadMark {
                line: 4,
                mark: "red".into()
            })
        );
    }

    #[test]
    fn writes_header_then_lines() {
        let file = RecipeFile {
            entries: vec![
                RecipeEntry::new("a", "1,2,0", None),
                RecipeEntry::new("b", "2,0,0", Some(25)),
            ],
        };
        assert_eq!(
            file.to_text(),
            format!("{TTHINTS_HEADER}\na\t1,2,0\nb\t2,0,0\t25\n")
        );
    }

    #[test]
    fn untouched_lines_are_written_verbatim() {
        let file = RecipeFile::parse("x\t4,( 1, 2 ),(3,4),0,-1\t80\n");
        assert_eq!(file.entries[0].to_line(), "x\t4,( 1, 2 ),(3,4),0,-1\t80");
    }

    #[test]
    fn merge_follows_font_order_and_keeps_foreign_glyphs() {
        let existing = RecipeFile::parse(SAMPLE);
        let fresh = vec![
            RecipeEntry::new("o", "1,99,0", None),
            RecipeEntry::new("a", "2,0,0", None),
        ];
        let order: Vec<String> = ["a", "n", "o"].iter().map(|s| s.to_string()).collect();

        let merged = merge_entries(&existing, fresh, &order);
        assert_eq!(names(&merged), vec!["a", "n", "o", "space"]);
        assert_eq!(merged.get("o").unwrap().hints, "1,99,0");
        assert_eq!(
            merged.get("space").unwrap().to_line(),
            "space\t3,\"BL\",\"BR\",0,-1"
        );
    }

    #[test]
    fn write_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tthints");
        fs::write(&path, "old").unwrap();
        let file = RecipeFile {
            entries: vec![RecipeEntry::new("a", "1,2,0", None)],
        };
        file.write(&path).unwrap();
        assert_eq!(RecipeFile::read(&path).unwrap(), RecipeFile::parse(&file.to_text()));
        assert!(!path.with_extension("partial").exists());
    }
}
