//! CLI Exit Code Registry
//!
//! Single source of truth for `dashdiff` exit codes. Scripts and CI jobs
//! branch on these, so they only ever grow.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Both trees match                                     |
//! | 1    | Differences found (like `diff(1)`)                   |
//! | 2    | Usage or configuration error, missing input folder   |
//! | 3    | Report could not be written                          |

/// Both trees match: no path-level or record-level differences.
pub const EXIT_SUCCESS: u8 = 0;

/// Comparison ran and found differences.
pub const EXIT_DIFFERENCES: u8 = 1;

/// Usage error: bad arguments, invalid config, missing folder.
/// Nothing is compared and no report is printed.
pub const EXIT_USAGE: u8 = 2;

/// The report was computed but could not be written to stdout or `--output`.
pub const EXIT_OUTPUT: u8 = 3;
