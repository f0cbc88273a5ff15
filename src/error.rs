//! Error and warning types shared by the plotting pipeline.

use std::fmt;
use std::io;

use crate::plotting::PlotError;

/// Fatal errors. Each aborts the plot job that raised it, never its siblings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A boolean annotation or key held something other than the recognised literals
    #[error("invalid boolean literal '{value}' for '{key}'")]
    InvalidBooleanLiteral { key: String, value: String },

    /// The data object cannot be read as a one-dimensional point series
    #[error("object '{path}' of kind {kind} cannot be converted to a 1-D point series")]
    InvalidSourceKind { path: String, kind: String },

    /// A ratio was requested between series with different binning
    #[error("binning mismatch between '{series}' and reference '{reference}': {detail}")]
    BinningMismatch {
        series: String,
        reference: String,
        detail: String,
    },

    /// A numeric key (e.g. `XMin`) did not parse as a float
    #[error("invalid number '{value}' for '{key}'")]
    InvalidNumber { key: String, value: String },

    /// A batch manifest did not match its schema
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// A batch job panicked on its worker
    #[error("job {index} panicked: {message}")]
    JobPanicked { index: usize, message: String },

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable anomalies, logged and handed back alongside the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line inside a key-file block matched none of the line classes
    ConfigParse { line: usize, text: String },
    /// More than one series carried `RatioRef`; only the first is used
    MultipleRatioReferences { kept: String, ignored: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ConfigParse { line, text } => {
                write!(f, "line {}: ignoring unrecognised line '{}'", line, text)
            }
            Warning::MultipleRatioReferences { kept, ignored } => write!(
                f,
                "multiple ratio references: using '{}', ignoring {}",
                kept,
                ignored.join(", ")
            ),
        }
    }
}
