//! Minimal plotting canvas.
//! Provides a matplotlib-like figure/axes API with SVG output.

pub mod axes;
pub mod backend;
pub mod data;
pub mod element;
pub mod error;
pub mod figure;
pub mod plot;
pub mod scale;
pub mod style;

pub use axes::Axes;
pub use data::IntoPlotData;
pub use element::{Bounds, LegendPosition};
pub use error::{PlotError, PlotResult};
pub use figure::Figure;
pub use plot::{Plot, PlotKind};
pub use scale::{Scale, ScaleKind};
pub use style::{
    Color, DashPattern, FillStyle, LineStyle, Marker, MarkerStyle, TextStyle, Theme, ThemeConfig,
};
