//! Failures of the `isoline` binary and the exit status each one maps to.
//!
//! | status | cause |
//! |--------|-------|
//! | 2  | rejected by clap before `run` starts |
//! | 10 | core refused the material, shape, parameters or image size |
//! | 11 | the PNG could not be written |
//! | 12 | bad `--params`/`--shape-params` JSON or a sample outside [0, 1] |
//! | 13 | JSON output could not be produced |

use isoline_core::CompositeError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Rejected by `isoline-core`.
    Composite(CompositeError),
    /// Filesystem failure while writing output.
    Io(String),
    /// User-supplied value that could not be used.
    Input(String),
    /// Encoding a JSON report failed.
    Serialization(String),
}

impl CliError {
    /// Status passed to `process::exit`; see the module table.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Composite(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Composite(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<CompositeError> for CliError {
    fn from(e: CompositeError) -> Self {
        match e {
            CompositeError::Io(msg) => CliError::Io(msg),
            other => CliError::Composite(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
