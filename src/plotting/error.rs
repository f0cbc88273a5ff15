//! Error types for the SVG canvas.

use std::io;

/// Errors raised while laying out or exporting a figure.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Error during IO operations (file writing, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Invalid data provided for plotting
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A layout the canvas cannot provide (e.g. degenerate panel ratios)
    #[error("Unsupported layout: {0}")]
    UnsupportedLayout(String),
}

/// Result type alias for canvas operations.
pub type PlotResult<T> = Result<T, PlotError>;
