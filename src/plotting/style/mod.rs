//! Styling module for the canvas.
//!
//! Colors, line styles, markers, fills, text styles and themes.

pub mod color;
pub mod fill_style;
pub mod line_style;
pub mod marker;
pub mod text_style;
pub mod theme;

pub use color::Color;
pub use fill_style::FillStyle;
pub use line_style::{DashPattern, LineStyle};
pub use marker::{Marker, MarkerStyle};
pub use text_style::{named_size_scale, FontWeight, TextAnchor, TextStyle};
pub use theme::{Theme, ThemeConfig};
