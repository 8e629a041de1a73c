//! Command line arguments for the application

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::settings::{DEFAULT_TOOL_TIMEOUT, MAX_FUZZINESS};
use crate::geometry::MatchStrategy;
use crate::hints::OutputMode;

/// TrueType hint recipe tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// display debug information
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Duplicate the template style's tthints onto every sibling style
    Dupe {
        /// folder holding the hinted template: tthints, font.ttf and an
        /// outline source (font.pfa, font.ufo or font.txt)
        template: PathBuf,
        /// top folder searched recursively for sibling styles
        root: PathBuf,
        /// write point coordinates instead of point indices
        #[arg(long, default_value_t = false)]
        coords: bool,
        #[command(flatten)]
        matching: MatchingArgs,
        /// seconds an external conversion tool may run
        #[arg(long = "tool-timeout", value_name = "SECS")]
        tool_timeout: Option<u64>,
    },
    /// Rewrite a folder's tthints file using point indices or coordinates
    Recode {
        /// style folder holding tthints and font.ttf
        folder: PathBuf,
        /// encoding of the rewritten point references
        #[arg(long = "to", value_enum)]
        to: Encoding,
        /// only re-encode these glyphs (comma separated), others are kept
        #[arg(long, value_delimiter = ',')]
        glyphs: Vec<String>,
        #[command(flatten)]
        matching: MatchingArgs,
    },
    /// Check a ppms stem file, optionally writing it back normalized
    Ppms {
        /// path to the ppms file
        file: PathBuf,
        /// rewrite the file with the canonical header and block order
        #[arg(long, default_value_t = false)]
        write: bool,
    },
}

/// How point coordinates are matched between outlines
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct MatchingArgs {
    /// accept a single point within N units of a coordinate that has no
    /// exact match (the radius defaults to 2, at most 64)
    #[arg(
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "2",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_FUZZINESS))
    )]
    pub fuzziness: Option<u32>,
}

impl MatchingArgs {
    pub fn strategy(&self) -> MatchStrategy {
        match self.fuzziness {
            Some(0) | None => MatchStrategy::Exact,
            Some(radius) => MatchStrategy::Fuzzy { radius },
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// bare point indices
    Indices,
    /// (x,y) point coordinates
    Coords,
}

impl From<Encoding> for OutputMode {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Indices => OutputMode::Index,
            Encoding::Coords => OutputMode::Coordinates,
        }
    }
}

/// Converts the `--tool-timeout` value, falling back to the default.
pub fn tool_timeout(secs: Option<u64>) -> Duration {
    secs.map(Duration::from_secs).unwrap_or(DEFAULT_TOOL_TIMEOUT)
}
