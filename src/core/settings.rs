// Settings ///////////////////////////////////////////////////////////////////
// Defaults for everything a run can be configured with. The CLI overrides
// the ones that make sense to change per run.

use std::time::Duration;

// Style Folder Layout ////////////////////////////////////////////////////////

/// TrueType font of a style folder
pub const TTF_FILE_NAME: &str = "font.ttf";
/// PostScript outline sources, in the order they are looked for
pub const PFA_FILE_NAME: &str = "font.pfa";
pub const UFO_FILE_NAME: &str = "font.ufo";
pub const TXT_FILE_NAME: &str = "font.txt";
/// Hint recipe file of a style folder
pub const TTHINTS_FILE_NAME: &str = "tthints";

/// Prefix of scratch files created inside a style folder during conversion
pub const TEMP_FILE_PREFIX: &str = ".tthints-tmp";

// Recipe File ////////////////////////////////////////////////////////////////

/// First line of every recipe file we write
pub const TTHINTS_HEADER: &str = "# Glyph name\tTT hints\tGlyph color";
/// First line of every ppms file we write
pub const PPMS_HEADER: &str = "#Name\tWidth\tppm2\tppm3\tppm4\tppm5\tppm6";

// Glyph Marks ////////////////////////////////////////////////////////////////

/// Mark for glyphs whose outlines might not match the template (orange)
pub const POSSIBLY_INCOMPATIBLE_MARK: i32 = 25;

// Point Matching /////////////////////////////////////////////////////////////

/// Search radius used when `--fuzziness` is given without a value.
/// 2 means a 5x5 window around the original coordinate.
pub const DEFAULT_FUZZINESS: u32 = 2;
/// Largest radius `--fuzziness` accepts
pub const MAX_FUZZINESS: u32 = 64;

// External Tools /////////////////////////////////////////////////////////////

/// AFDKO tool converting between font formats
pub const TX_TOOL: &str = "tx";
/// AFDKO tool compiling a decompiled Type 1 text file
pub const TYPE1_TOOL: &str = "type1";
/// How long an external conversion may run before it is killed
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);
/// How often a running tool is polled for completion
pub const TOOL_POLL_INTERVAL: Duration = Duration::from_millis(20);
