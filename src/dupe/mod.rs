//! Duplicating a template style's hints onto its sibling styles
//!
//! - `template`: reads the template recipe against its own fonts
//! - `compat`: decides whether a sibling glyph can take the hints
//! - `retarget`: moves the hints onto a sibling
//!
//! A run indexes the template once and then handles every sibling folder on
//! its own; folders share nothing but the read-only template data and are
//! processed in parallel.

pub mod compat;
pub mod retarget;
pub mod template;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use rayon::prelude::*;

use crate::core::errors::{bail, TthResult};
use crate::core::settings::DEFAULT_TOOL_TIMEOUT;
use crate::data::FontOutlines;
use crate::geometry::MatchStrategy;
use crate::hints::{OutputMode, RecipeFile, WriteOutcome};
use crate::io::{find_style_folders, load_postscript_outlines, load_ttf_outlines, StyleFolder};

pub use compat::{verify, Compatibility, IncompatibleReason};
pub use retarget::{retarget_font, retarget_glyph, RetargetError, RetargetOptions, TargetCounts};
pub use template::{build_template_index, HintedPoint, TemplateGlyph, TemplateIndex};

/// Settings of one duplication run
#[derive(Clone, Debug)]
pub struct DupeOptions {
    pub template: PathBuf,
    pub root: PathBuf,
    pub mode: OutputMode,
    pub strategy: MatchStrategy,
    pub tool_timeout: Duration,
}

impl DupeOptions {
    pub fn new(template: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            root: root.into(),
            mode: OutputMode::default(),
            strategy: MatchStrategy::default(),
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    fn retarget(&self) -> RetargetOptions {
        RetargetOptions {
            mode: self.mode,
            strategy: self.strategy,
        }
    }
}

/// What happened in one sibling folder
#[derive(Debug)]
pub struct FolderReport {
    pub folder: PathBuf,
    /// `Err` holds the reason the folder could not be processed
    pub outcome: Result<WriteOutcome, String>,
    pub counts: TargetCounts,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub folders: usize,
    pub written: usize,
    pub nothing_to_output: usize,
    pub failed: usize,
    pub glyphs_written: usize,
    pub glyphs_skipped: usize,
    pub glyphs_flagged: usize,
}

impl RunSummary {
    fn add(&mut self, report: &FolderReport) {
        self.folders += 1;
        match &report.outcome {
            Ok(WriteOutcome::Written { .. }) => self.written += 1,
            Ok(WriteOutcome::NothingToOutput) => self.nothing_to_output += 1,
            Err(_) => self.failed += 1,
        }
        self.glyphs_written += report.counts.written;
        self.glyphs_skipped += report.counts.skipped;
        self.glyphs_flagged += report.counts.flagged;
    }
}

/// Both outline flavours of a style folder
fn load_style(folder: &StyleFolder, timeout: Duration) -> TthResult<(FontOutlines, FontOutlines)> {
    let tt = load_ttf_outlines(&folder.ttf)?;
    let ps = load_postscript_outlines(&folder.path, &folder.source, timeout)?;
    Ok((ps, tt))
}

fn retarget_folder(
    path: &Path,
    index: &TemplateIndex,
    template_ps: &FontOutlines,
    options: &DupeOptions,
) -> TthResult<(WriteOutcome, TargetCounts)> {
    let Some(folder) = StyleFolder::open(path) else {
        bail!("no font.ttf with an outline source");
    };
    let (target_ps, target_tt) = load_style(&folder, options.tool_timeout)?;
    let (recipe, counts) =
        retarget_font(index, template_ps, &target_ps, &target_tt, options.retarget());
    let outcome = recipe.write_if_any(&folder.tthints())?;
    Ok((outcome, counts))
}

fn process_target(
    path: &Path,
    index: &TemplateIndex,
    template_ps: &FontOutlines,
    options: &DupeOptions,
) -> FolderReport {
    match retarget_folder(path, index, template_ps, options) {
        Ok((outcome, counts)) => FolderReport {
            folder: path.to_path_buf(),
            outcome: Ok(outcome),
            counts,
        },
        Err(err) => FolderReport {
            folder: path.to_path_buf(),
            outcome: Err(format!("{err:#}")),
            counts: TargetCounts::default(),
        },
    }
}

/// Runs a whole duplication: template first, then every sibling folder.
///
/// Problems with the template end the run before any sibling is touched.
/// Problems with a sibling are reported for that folder only.
pub fn run(options: &DupeOptions) -> TthResult<RunSummary> {
    let started = Instant::now();

    let Some(template) = StyleFolder::open(&options.template) else {
        bail!(
            "template folder {} needs font.ttf and one of font.pfa, font.ufo or font.txt",
            options.template.display()
        );
    };
    let recipe = RecipeFile::read(&template.tthints())?;
    info!("Read {} glyph recipes from {}", recipe.len(), template.tthints().display());

    let folders = find_style_folders(&options.root, &template.path)?;
    info!("{} folders found", folders.len());

    let (template_ps, template_tt) = load_style(&template, options.tool_timeout)?;
    let index = build_template_index(&recipe, &template_tt, &template_ps, options.strategy);
    if !index.ok {
        bail!("the template hints reference points that do not exist; no target folder was touched");
    }
    info!(
        "Template indexed: {} glyphs usable, {} skipped",
        index.counts.indexed, index.counts.skipped
    );
    if index.is_empty() {
        warn!("No template glyph can be duplicated");
    }

    let reports: Vec<FolderReport> = folders
        .par_iter()
        .map(|folder| process_target(folder, &index, &template_ps, options))
        .collect();

    let mut summary = RunSummary::default();
    for report in &reports {
        match &report.outcome {
            Ok(WriteOutcome::Written { path, glyphs }) => {
                info!("Wrote {glyphs} glyphs to {}", path.display())
            }
            Ok(WriteOutcome::NothingToOutput) => {
                warn!("Nothing to output for {}", report.folder.display())
            }
            Err(err) => error!("Skipping folder {}: {err}", report.folder.display()),
        }
        summary.add(report);
    }

    info!(
        "Done in {:.2}s: {} folders, {} written, {} with nothing to output, {} failed; {} glyphs written ({} flagged), {} skipped",
        started.elapsed().as_secs_f64(),
        summary.folders,
        summary.written,
        summary.nothing_to_output,
        summary.failed,
        summary.glyphs_written,
        summary.glyphs_flagged,
        summary.glyphs_skipped,
    );
    Ok(summary)
}
