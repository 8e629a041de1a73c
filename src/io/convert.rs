//! Running the AFDKO tools that turn PFA and TXT sources into a UFO
//!
//! Tools are blocking child processes with a deadline. Their intermediate
//! files go into the style folder under a scratch name and are removed when
//! the conversion is done, whether it worked or not.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::core::errors::TthResult;
use crate::core::settings::{TEMP_FILE_PREFIX, TOOL_POLL_INTERVAL, TX_TOOL, TYPE1_TOOL};
use crate::data::FontOutlines;

use super::fonts::load_ufo_outlines;
use super::workspace::OutlineSource;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("could not start `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },
    #[error("`{tool}` was stopped after running for {}s", .timeout.as_secs_f32())]
    Timeout { tool: String, timeout: Duration },
    #[error("`{tool}` failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("i/o error around `{tool}`: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

/// A scratch file or directory removed on drop
#[derive(Debug)]
struct ScratchPath(PathBuf);

impl ScratchPath {
    fn new(folder: &Path, extension: &str) -> Self {
        let name = format!("{TEMP_FILE_PREFIX}-{}.{extension}", std::process::id());
        Self(folder.join(name))
    }
}

impl Drop for ScratchPath {
    fn drop(&mut self) {
        let result = if self.0.is_dir() {
            fs::remove_dir_all(&self.0)
        } else if self.0.exists() {
            fs::remove_file(&self.0)
        } else {
            Ok(())
        };
        if let Err(err) = result {
            warn!("Could not remove {}: {err}", self.0.display());
        }
    }
}

/// Runs `tool` and waits at most `timeout` for it. With `stdout_to` the
/// tool's standard output is written to that file.
pub fn run_tool<S: AsRef<OsStr>>(
    tool: &str,
    args: &[S],
    stdout_to: Option<&Path>,
    timeout: Duration,
) -> Result<(), ConversionError> {
    let io_err = |source| ConversionError::Io {
        tool: tool.to_string(),
        source,
    };

    let stdout = match stdout_to {
        Some(path) => Stdio::from(File::create(path).map_err(io_err)?),
        None => Stdio::null(),
    };

    debug!("Running {tool}");
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ConversionError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    // Drain stderr on the side so a chatty tool cannot block on a full pipe
    let stderr = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut text = String::new();
            let _ = pipe.read_to_string(&mut text);
            text
        })
    });
    let collect_stderr = || {
        stderr
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default()
    };

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if started.elapsed() >= timeout => {
                if let Err(err) = child.kill() {
                    warn!("Could not stop {tool}: {err}");
                }
                let _ = child.wait();
                return Err(ConversionError::Timeout {
                    tool: tool.to_string(),
                    timeout,
                });
            }
            Ok(None) => thread::sleep(TOOL_POLL_INTERVAL),
            Err(err) => return Err(io_err(err)),
        }
    };

    let stderr = collect_stderr();
    if !status.success() {
        return Err(ConversionError::Failed {
            tool: tool.to_string(),
            status,
            stderr: stderr.trim().to_string(),
        });
    }
    if !stderr.trim().is_empty() {
        debug!("{tool}: {}", stderr.trim());
    }
    Ok(())
}

fn pfa_to_ufo(pfa: &Path, folder: &Path, timeout: Duration) -> TthResult<FontOutlines> {
    let ufo = ScratchPath::new(folder, "ufo");
    run_tool(
        TX_TOOL,
        &[OsStr::new("-ufo"), pfa.as_os_str(), ufo.0.as_os_str()],
        None,
        timeout,
    )?;
    let mut outlines = load_ufo_outlines(&ufo.0)?;
    outlines.path = Some(pfa.to_path_buf());
    Ok(outlines)
}

/// Loads the PostScript outlines of a style folder, converting the source
/// with the external tools when it is not a UFO.
pub fn load_postscript_outlines(
    folder: &Path,
    source: &OutlineSource,
    timeout: Duration,
) -> TthResult<FontOutlines> {
    match source {
        OutlineSource::Ufo(path) => load_ufo_outlines(path),
        OutlineSource::Pfa(path) => pfa_to_ufo(path, folder, timeout),
        OutlineSource::Txt(path) => {
            let pfa = ScratchPath::new(folder, "pfa");
            run_tool(TYPE1_TOOL, &[path.as_os_str()], Some(&pfa.0), timeout)?;
            let mut outlines = pfa_to_ufo(&pfa.0, folder, timeout)?;
            outlines.path = Some(path.clone());
            Ok(outlines)
        }
    }
}
