//! Core application functionality
//!
//! - `cli`: command line arguments
//! - `errors`: the application error type and context helpers
//! - `settings`: file names, marks and other defaults

pub mod cli;
pub mod errors;
pub mod settings;

pub use cli::CliArgs;
