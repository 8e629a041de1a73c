//! The `ppms` companion file
//!
//! Each row describes one TrueType stem: its name, width and the ppm sizes
//! at which it grows from 2 to 6 pixels. Horizontal stems come first;
//! vertical stems are recognised by the `X:` marker the exporting tool puts
//! in the row.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::errors::{TthContext, TthResult};
use crate::core::settings::PPMS_HEADER;

/// Marker identifying a vertical stem row
const VERTICAL_MARKER: &str = "X:";
/// name, width, ppm2..ppm6
const FIELD_COUNT: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PpmsError {
    #[error("line {line}: expected 7 tab separated fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: '{value}' is not an integer")]
    NotANumber { line: usize, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StemPpms {
    pub name: String,
    pub width: i32,
    /// ppm sizes for 2, 3, 4, 5 and 6 pixel stems
    pub ppms: [i32; 5],
}

impl StemPpms {
    fn parse(line: &str, line_number: usize) -> Result<Self, PpmsError> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() != FIELD_COUNT {
            return Err(PpmsError::FieldCount {
                line: line_number,
                found: fields.len(),
            });
        }
        let number = |value: &str| {
            value.parse::<i32>().map_err(|_| PpmsError::NotANumber {
                line: line_number,
                value: value.to_string(),
            })
        };

        let mut ppms = [0; 5];
        for (slot, value) in ppms.iter_mut().zip(&fields[2..]) {
            *slot = number(*value)?;
        }
        Ok(Self {
            name: fields[0].to_string(),
            width: number(fields[1])?,
            ppms,
        })
    }
}

impl fmt::Display for StemPpms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.name, self.width)?;
        for ppm in self.ppms {
            write!(f, "\t{ppm}")?;
        }
        Ok(())
    }
}

/// Horizontal and vertical stem blocks of a ppms file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PpmsTable {
    pub horizontal: Vec<StemPpms>,
    pub vertical: Vec<StemPpms>,
}

impl PpmsTable {
    /// Parses file contents. Lines containing `#` anywhere are comments.
    /// Every malformed row is reported; the table holds the rows that parsed.
    pub fn parse(contents: &str) -> (Self, Vec<PpmsError>) {
        let mut table = Self::default();
        let mut errors = Vec::new();

        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() || line.contains('#') {
                continue;
            }
            match StemPpms::parse(line, number + 1) {
                Ok(stem) if line.contains(VERTICAL_MARKER) => table.vertical.push(stem),
                Ok(stem) => table.horizontal.push(stem),
                Err(err) => errors.push(err),
            }
        }

        (table, errors)
    }

    pub fn read(path: &Path) -> TthResult<(Self, Vec<PpmsError>)> {
        let contents = fs::read_to_string(path).with_file_context("read", path)?;
        Ok(Self::parse(&contents))
    }

    pub fn to_text(&self) -> String {
        let mut text = String::from(PPMS_HEADER);
        text.push('\n');
        for stem in self.horizontal.iter().chain(&self.vertical) {
            text.push_str(&stem.to_string());
            text.push('\n');
        }
        text
    }

    pub fn write(&self, path: &Path) -> TthResult<()> {
        fs::write(path, self.to_text()).with_file_context("write", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_blocks_on_marker() {
        let contents = "#Name\tWidth\tppm2\tppm3\tppm4\tppm5\tppm6\n\
            Y: 40\t40\t20\t34\t48\t62\t76\n\
            X: 86\t86\t11\t17\t24\t30\t36\n\
            Y: 32\t32\t25\t42\t59\t76\t93\n";
        let (table, errors) = PpmsTable::parse(contents);
        assert!(errors.is_empty());
        assert_eq!(table.horizontal.len(), 2);
        assert_eq!(table.vertical.len(), 1);
        assert_eq!(table.vertical[0].width, 86);
        assert_eq!(table.vertical[0].ppms, [11, 17, 24, 30, 36]);
    }

    #[test]
    fn writes_horizontal_block_first() {
        let (table, _) = PpmsTable::parse(
            "X: 86\t86\t11\t17\t24\t30\t36\nY: 40\t40\t20\t34\t48\t62\t76\n",
        );
        assert_eq!(
            table.to_text(),
            format!("{PPMS_HEADER}\nY: 40\t40\t20\t34\t48\t62\t76\nX: 86\t86\t11\t17\t24\t30\t36\n")
        );
    }

    #[test]
    fn reports_bad_rows_by_line() {
        let (table, errors) = PpmsTable::parse("a\t1\t2\n\nb\t1\t2\t3\t4\tfive\t6\n");
        assert!(table.horizontal.is_empty());
        assert_eq!(
            errors,
            vec![
                PpmsError::FieldCount { line: 1, found: 3 },
                PpmsError::NotANumber {
                    line: 3,
                    value: "five".into()
                },
            ]
        );
    }
}
