//!    Error handling
//!
//! Domain errors that callers need to tell apart (a duplicate point, a bad
//! instruction, a failed conversion) are typed enums living next to the code
//! that produces them. Everything that ends a run is reported through anyhow,
//! with the helpers below attaching file and glyph context.

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, ensure, Error};
use anyhow::{Context, Result};

/// Result type alias for convenience throughout the application
pub type TthResult<T> = Result<T>;

/// Attaches the file an operation was working on to its error
pub trait TthContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> TthResult<T>;
}

impl<T, E> TthContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> TthResult<T> {
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }
}

/// Checks that a path looks like a UFO package before handing it to norad.
pub fn validate_ufo_path<P: AsRef<std::path::Path>>(path: P) -> TthResult<()> {
    let path = path.as_ref();

    ensure!(path.exists(), "UFO path does not exist: {}", path.display());
    ensure!(
        path.is_dir(),
        "UFO path must be a directory: {}",
        path.display()
    );

    let metainfo = path.join("metainfo.plist");
    ensure!(
        metainfo.exists(),
        "Invalid UFO: missing metainfo.plist in {}",
        path.display()
    );

    Ok(())
}
