// Duplicates TrueType hint recipes across compatible font styles.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use tthints::core::cli::{tool_timeout, CliArgs, Command};
use tthints::core::errors::TthResult;
use tthints::hints::{OutputMode, PpmsTable, WriteOutcome};
use tthints::logger::init_custom_logger;
use tthints::{recode_folder, run_dupe, DupeOptions, RecodeOptions};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_custom_logger(args.debug);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> TthResult<()> {
    match command {
        Command::Dupe {
            template,
            root,
            coords,
            matching,
            tool_timeout: secs,
        } => {
            let options = DupeOptions {
                mode: if coords {
                    OutputMode::Coordinates
                } else {
                    OutputMode::Index
                },
                strategy: matching.strategy(),
                tool_timeout: tool_timeout(secs),
                ..DupeOptions::new(template, root)
            };
            run_dupe(&options)?;
        }
        Command::Recode {
            folder,
            to,
            glyphs,
            matching,
        } => {
            let options = RecodeOptions {
                mode: to.into(),
                strategy: matching.strategy(),
                glyphs,
            };
            let (outcome, counts) = recode_folder(&folder, &options)?;
            for glyph in &counts.failed {
                warn!("Kept glyph '{glyph}' unchanged");
            }
            match outcome {
                WriteOutcome::Written { path, glyphs } => info!(
                    "Wrote {glyphs} glyphs to {} ({} re-encoded, {} failed)",
                    path.display(),
                    counts.recoded,
                    counts.failed.len()
                ),
                WriteOutcome::NothingToOutput => warn!("Nothing to output"),
            }
        }
        Command::Ppms { file, write } => {
            let (table, errors) = PpmsTable::read(&file)?;
            for err in &errors {
                warn!("{}: {err}", file.display());
            }
            info!(
                "{}: {} horizontal and {} vertical stems",
                file.display(),
                table.horizontal.len(),
                table.vertical.len()
            );
            if write {
                table.write(&file)?;
                info!("Wrote {}", file.display());
            }
        }
    }
    Ok(())
}
