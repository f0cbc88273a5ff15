//! Per-series style resolution.
//!
//! Every drawing attribute falls back through a short cascade of
//! annotations and ends at a caller-supplied or hard default.

use log::warn;

use crate::error::{Error, Result};
use crate::plotting::{Color, DashPattern, Marker};
use crate::series::AnnotatedSeries;

/// Legacy marker glyphs and their native equivalents.
const MARKER_SYNONYMS: &[(&str, &str)] = &[("*", "o")];

/// Named line styles and their dash codes. `dotdashed` and `dashdotted`
/// deliberately share one code.
const LINESTYLE_SYNONYMS: &[(&str, &str)] = &[
    ("solid", "-"),
    ("dashed", "--"),
    ("dotdashed", "-."),
    ("dashdotted", "-."),
    ("dotted", ":"),
];

const TRUE_LITERALS: &[&str] = &["true", "yes", "on", "1"];
const FALSE_LITERALS: &[&str] = &["false", "no", "off", "0"];

/// Parse a boolean annotation or key value, case-insensitively.
///
/// `key` only feeds the error message.
pub fn as_bool(key: &str, value: &str) -> Result<bool> {
    let v = value.trim().to_ascii_lowercase();
    if TRUE_LITERALS.contains(&v.as_str()) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&v.as_str()) {
        Ok(false)
    } else {
        Err(Error::InvalidBooleanLiteral {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn translate<'a>(table: &[(&str, &'a str)], value: &'a str) -> &'a str {
    table
        .iter()
        .find(|(from, _)| *from == value)
        .map_or(value, |(_, to)| to)
}

/// How the central values are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Right-continuous staircase over the bin edges
    Step,
    /// Straight segments between bin centres
    Diagonal,
    /// Interpolating spline through the bin centres
    Smooth,
}

impl LineMode {
    /// `Ok(None)` for `none`; unknown names are reported with `Err(name)`.
    fn parse(value: &str) -> std::result::Result<Option<Self>, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "step" => Ok(Some(LineMode::Step)),
            "diag" | "diagonal" => Ok(Some(LineMode::Diagonal)),
            "smooth" => Ok(Some(LineMode::Smooth)),
            "none" | "" => Ok(None),
            _ => Err(value.to_string()),
        }
    }
}

/// Per-call fallbacks for a series that sets no color or line style of its own.
#[derive(Debug, Clone)]
pub struct StyleDefaults {
    pub color: Color,
    pub dash: DashPattern,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        StyleDefaults {
            color: Color::BLACK,
            dash: DashPattern::Solid,
        }
    }
}

/// Concrete drawing attributes for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub marker: Option<Marker>,
    pub line: Option<LineMode>,
    pub dash: DashPattern,
    pub error_bars: bool,
    pub marker_color: Color,
    pub line_color: Color,
    pub error_color: Color,
}

/// Resolve the style of `series`.
///
/// If the annotations enable none of marker, line and error bars, the line
/// defaults to [`LineMode::Step`]. An explicit `Line` annotation counts as
/// enabling the line even when its value is `none`.
pub fn resolve<S: AnnotatedSeries + ?Sized>(series: &S, defaults: &StyleDefaults) -> Result<StyleSpec> {
    let base = series
        .annotation("Color")
        .map(Color::from)
        .unwrap_or_else(|| defaults.color.clone());
    let line_color = series
        .annotation("LineColor")
        .map(Color::from)
        .unwrap_or_else(|| base.clone());

    let marker = series
        .annotation("Marker")
        .or_else(|| series.annotation("PolyMarker"))
        .map(|glyph| translate(MARKER_SYNONYMS, glyph.trim()))
        .filter(|glyph| !glyph.is_empty() && !glyph.eq_ignore_ascii_case("none"))
        .map(|glyph| {
            Marker::from_glyph(glyph).unwrap_or_else(|| {
                warn!("{}: unknown marker '{}', using a circle", series.path(), glyph);
                Marker::Circle
            })
        });

    let line_annotation = series.annotation("Line");
    let mut line = match line_annotation.map(LineMode::parse) {
        Some(Ok(mode)) => mode,
        Some(Err(name)) => {
            warn!("{}: unknown line mode '{}', drawing no line", series.path(), name);
            None
        }
        None => None,
    };

    let dash = match series.annotation("LineStyle") {
        Some(style) => {
            let code = translate(LINESTYLE_SYNONYMS, style.trim());
            DashPattern::from_code(code).unwrap_or_else(|| {
                warn!("{}: unknown line style '{}', using solid", series.path(), style);
                DashPattern::Solid
            })
        }
        None => defaults.dash.clone(),
    };

    let error_bars = series
        .annotation("ErrorBars")
        .map(|v| as_bool("ErrorBars", v))
        .transpose()?
        .unwrap_or(false);
    let error_color = series
        .annotation("ErrorBarsColor")
        .map(Color::from)
        .unwrap_or_else(|| base.clone());

    if marker.is_none() && line_annotation.is_none() && !error_bars {
        line = Some(LineMode::Step);
    }

    Ok(StyleSpec {
        marker,
        line,
        dash,
        error_bars,
        marker_color: line_color.clone(),
        line_color,
        error_color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Series;

    fn series() -> Series {
        Series::from_edges("/h", &[0.0, 1.0, 2.0], &[1.0, 2.0])
    }

    #[test]
    fn test_as_bool_literals() {
        for v in ["true", "YES", "On", "1"] {
            assert!(as_bool("k", v).unwrap(), "{}", v);
        }
        for v in ["False", "no", "Off", "0"] {
            assert!(!as_bool("k", v).unwrap(), "{}", v);
        }
        for v in ["maybe", "", "2", "y"] {
            assert!(matches!(as_bool("k", v), Err(Error::InvalidBooleanLiteral { .. })), "{}", v);
        }
    }

    #[test]
    fn test_default_intent_is_step() {
        let spec = resolve(&series(), &StyleDefaults::default()).unwrap();
        assert_eq!(spec.line, Some(LineMode::Step));
        assert_eq!(spec.marker, None);
        assert!(!spec.error_bars);
    }

    #[test]
    fn test_diagonal_only() {
        let s = series().with_annotation("Line", "diagonal");
        let spec = resolve(&s, &StyleDefaults::default()).unwrap();
        assert_eq!(spec.line, Some(LineMode::Diagonal));
        assert_eq!(spec.marker, None);
        assert!(!spec.error_bars);
    }

    #[test]
    fn test_explicit_line_none_suppresses_default() {
        let s = series().with_annotation("Line", "none");
        let spec = resolve(&s, &StyleDefaults::default()).unwrap();
        assert_eq!(spec.line, None);
    }

    #[test]
    fn test_marker_cascade_and_translation() {
        let s = series().with_annotation("PolyMarker", "*");
        let spec = resolve(&s, &StyleDefaults::default()).unwrap();
        assert_eq!(spec.marker, Some(Marker::Circle));
        assert_eq!(spec.line, None);

        let s = s.with_annotation("Marker", "s");
        assert_eq!(resolve(&s, &StyleDefaults::default()).unwrap().marker, Some(Marker::Square));
    }

    #[test]
    fn test_color_cascade() {
        let defaults = StyleDefaults {
            color: Color::BLUE,
            dash: DashPattern::Dashed,
        };
        let s = series()
            .with_annotation("ErrorBars", "yes")
            .with_annotation("LineColor", "green");
        let spec = resolve(&s, &defaults).unwrap();
        assert_eq!(spec.line_color, Color::from("green"));
        assert_eq!(spec.marker_color, Color::from("green"));
        assert_eq!(spec.error_color, Color::BLUE);
        assert_eq!(spec.dash, DashPattern::Dashed);
        // Error bars alone keep the default step away
        assert_eq!(spec.line, None);

        let s = s.with_annotation("Color", "red").with_annotation("ErrorBarsColor", "#00ff00");
        let spec = resolve(&s, &defaults).unwrap();
        assert_eq!(spec.error_color, Color::rgb(0, 255, 0));
    }

    #[test]
    fn test_linestyle_synonyms() {
        for (name, dash) in [
            ("solid", DashPattern::Solid),
            ("dashed", DashPattern::Dashed),
            ("dotdashed", DashPattern::DashDot),
            ("dashdotted", DashPattern::DashDot),
            ("dotted", DashPattern::Dotted),
            ("--", DashPattern::Dashed),
        ] {
            let s = series().with_annotation("LineStyle", name);
            assert_eq!(resolve(&s, &StyleDefaults::default()).unwrap().dash, dash, "{}", name);
        }
    }

    #[test]
    fn test_bad_errorbars_literal_fails() {
        let s = series().with_annotation("ErrorBars", "sometimes");
        assert!(matches!(
            resolve(&s, &StyleDefaults::default()),
            Err(Error::InvalidBooleanLiteral { .. })
        ));
    }
}
