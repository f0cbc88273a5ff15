//! Comparison plots of binned datasets with an optional ratio panel.
//!
//! Plot-key files configure each plot, per-series annotations style each
//! curve, and the batch dispatcher fans independent plots out over workers.

pub mod batch;
pub mod compositor;
pub mod config;
pub mod error;
pub mod flat;
pub mod geometry;
pub mod keys;
pub mod plotting;
pub mod range;
pub mod series;
pub mod style;

pub use compositor::{RenderedPlot, plot, render};
pub use error::{Error, Result, Warning};
