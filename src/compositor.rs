//! Assembles one comparison figure: main panel plus optional ratio panel.

use std::path::Path;

use log::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::{Result, Warning};
use crate::geometry::{doubled_edges, doubled_values, ratio, ratio_band, smooth_curve, step_polyline};
use crate::keys::PlotKeys;
use crate::plotting::style::named_size_scale;
use crate::plotting::{Axes, Color, Figure, LegendPosition, LineStyle, PlotError};
use crate::range::{Axis, axis_scale, ratio_scale, resolve_axis, resolve_ratio_axis};
use crate::series::AnnotatedSeries;
use crate::style::{self, LineMode, StyleSpec, as_bool};

const DEFAULT_LEGEND_SIZE: &str = "x-small";

/// A finished figure with what the caller may want to know about it.
#[derive(Debug)]
pub struct RenderedPlot {
    pub figure: Figure,
    /// A ratio panel was drawn below the main panel
    pub has_ratio: bool,
    /// Index of the ratio reference in the input series
    pub reference: Option<usize>,
    pub warnings: Vec<Warning>,
}

/// Index of the first series whose `RatioRef` is true.
///
/// The scan stops at the second flagged series, which is reported as a
/// warning and ignored; series after it are never inspected.
pub fn select_reference<S: AnnotatedSeries>(
    series: &[S],
    warnings: &mut Vec<Warning>,
) -> Result<Option<usize>> {
    let mut flagged = Vec::new();
    for (i, s) in series.iter().enumerate() {
        if let Some(value) = s.annotation("RatioRef")
            && as_bool("RatioRef", value)?
        {
            flagged.push(i);
            if flagged.len() == 2 {
                break;
            }
        }
    }

    let Some((&first, rest)) = flagged.split_first() else {
        return Ok(None);
    };
    if !rest.is_empty() {
        let warning = Warning::MultipleRatioReferences {
            kept: series[first].path().to_string(),
            ignored: rest.iter().map(|&i| series[i].path().to_string()).collect(),
        };
        warn!("{}", warning);
        warnings.push(warning);
    }
    Ok(Some(first))
}

/// Legend font size from `LegendFontSize`: a point size or a named size
/// relative to the base font.
fn legend_font_size(keys: &PlotKeys, base: f64) -> f64 {
    let value = keys.get("LegendFontSize").unwrap_or(DEFAULT_LEGEND_SIZE).trim();
    if let Ok(size) = value.parse::<f64>()
        && size > 0.0
    {
        return size;
    }
    let scale = named_size_scale(value).unwrap_or_else(|| {
        warn!("unknown legend font size '{}', using {}", value, DEFAULT_LEGEND_SIZE);
        named_size_scale(DEFAULT_LEGEND_SIZE).unwrap_or(1.0)
    });
    scale * base
}

fn non_blank<'a>(keys: &'a PlotKeys, key: &str) -> Option<&'a str> {
    keys.get(key).filter(|v| !v.trim().is_empty())
}

/// Main-panel representation of one series: error bars, line, markers.
///
/// The legend label goes on the last element drawn so it sits on top.
fn draw_series<S: AnnotatedSeries>(main: &mut Axes, series: &S, spec: &StyleSpec, cfg: &RenderConfig) {
    let label = series.title();
    let label_on_line = spec.marker.is_none();
    let label_on_bars = label_on_line && spec.line.is_none();

    if spec.error_bars {
        let mut bars = main
            .errorbar(series.x(), series.y())
            .xerr(series.exminus(), series.explus())
            .yerr(series.eyminus(), series.eyplus())
            .color(spec.error_color.clone())
            .linewidth(cfg.line_width);
        if label_on_bars && let Some(label) = label {
            bars = bars.label(label);
        }
        bars.build();
    }

    if let Some(mode) = spec.line {
        let label = label.filter(|_| label_on_line);
        match mode {
            LineMode::Step => {
                let (xs, ys) = step_polyline(series);
                let mut line = main
                    .step(xs, ys)
                    .color(spec.line_color.clone())
                    .linewidth(cfg.line_width)
                    .linestyle(spec.dash.clone());
                if let Some(label) = label {
                    line = line.label(label);
                }
                line.build();
            }
            LineMode::Diagonal | LineMode::Smooth => {
                let (xs, ys) = match mode {
                    LineMode::Smooth => smooth_curve(series, cfg.smooth_oversample),
                    _ => (series.x().to_vec(), series.y().to_vec()),
                };
                let mut line = main
                    .plot(xs, ys)
                    .color(spec.line_color.clone())
                    .linewidth(cfg.line_width)
                    .linestyle(spec.dash.clone());
                if let Some(label) = label {
                    line = line.label(label);
                }
                line.build();
            }
        }
    }

    if let Some(marker) = spec.marker {
        let mut dots = main
            .scatter(series.x(), series.y())
            .color(spec.marker_color.clone())
            .marker(marker)
            .size(cfg.marker_size);
        if let Some(label) = label {
            dots = dots.label(label);
        }
        dots.build();
    }
}

/// Build the comparison figure for `series`.
///
/// The ratio panel only appears when `want_ratio` is set and some series
/// carries a true `RatioRef`. Nothing is shown or written; see [`plot`].
pub fn render<S: AnnotatedSeries>(
    series: &[S],
    keys: &PlotKeys,
    want_ratio: bool,
    cfg: &RenderConfig,
) -> Result<RenderedPlot> {
    let mut warnings = Vec::new();
    let reference = if want_ratio {
        select_reference(series, &mut warnings)?
    } else {
        None
    };

    // Everything fallible about the data happens before drawing starts
    let styles = series
        .iter()
        .enumerate()
        .map(|(i, s)| style::resolve(s, &cfg.style_defaults(i)))
        .collect::<Result<Vec<_>>>()?;
    let ratios = match reference {
        Some(r) => series
            .iter()
            .enumerate()
            .map(|(i, s)| if i == r { Ok(None) } else { ratio(s, &series[r]).map(Some) })
            .collect::<Result<Vec<_>>>()?,
        None => vec![None; series.len()],
    };

    let x_scale = axis_scale(keys, Axis::X)?;
    let y_scale = axis_scale(keys, Axis::Y)?;
    let (x_min, x_max) = resolve_axis(keys, series, Axis::X, cfg.headroom)?;
    let (y_min, y_max) = resolve_axis(keys, series, Axis::Y, cfg.headroom)?;

    let mut figure = Figure::new(cfg.width, cfg.height).theme(cfg.theme_config());
    if let Some(title) = non_blank(keys, "Title") {
        figure = figure.suptitle(title);
    }

    let has_ratio = reference.is_some()
        && match figure.stacked_panels(&cfg.ratio_heights, 0.0) {
            Ok(_) => true,
            Err(e) => {
                warn!("no ratio panel: {}", e);
                false
            }
        };
    if !has_ratio {
        figure.add_subplot(1, 1, 1);
    }

    let (main, rest) = figure
        .get_axes_mut()
        .split_first_mut()
        .ok_or_else(|| PlotError::UnsupportedLayout("figure has no axes".to_string()))?;
    let mut ratio_axes = rest.first_mut().filter(|_| has_ratio);

    main.set_xscale(x_scale)
        .set_yscale(y_scale)
        .set_xlim(x_min, x_max)
        .set_ylim(y_min, y_max);
    if let Some(label) = non_blank(keys, "YLabel") {
        main.set_ylabel(label);
    }

    match (ratio_axes.as_deref_mut(), reference) {
        (Some(ratio_ax), Some(r)) => {
            main.hide_x_tick_labels();
            if let Some(label) = non_blank(keys, "XLabel") {
                ratio_ax.set_xlabel(label);
            }
            ratio_ax
                .set_ylabel(keys.get("RatioYLabel").unwrap_or("Ratio"))
                .set_xscale(x_scale)
                .set_yscale(ratio_scale(keys)?)
                .set_xlim(x_min, x_max)
                .set_max_yticks(4);

            // Band and unity line go first so the curves sit on top
            let reference = &series[r];
            let (band_lo, band_hi) = ratio_band(reference);
            let band_color = keys.get("RatioErrColor").unwrap_or(&cfg.ratio_band_color);
            ratio_ax
                .fill_between(
                    doubled_edges(reference),
                    doubled_values(&band_lo),
                    doubled_values(&band_hi),
                )
                .color(band_color)
                .build();
            ratio_ax.axhline(1.0, LineStyle::new().color(Color::GRAY));

            let mut extent: Vec<f32> = vec![1.0];
            extent.extend(&band_lo);
            extent.extend(&band_hi);
            for values in ratios.iter().flatten() {
                extent.extend(values);
            }
            let (lo, hi) = resolve_ratio_axis(keys, &extent)?;
            ratio_ax.set_ylim(lo, hi);
        }
        _ => {
            if let Some(label) = non_blank(keys, "XLabel") {
                main.set_xlabel(label);
            }
        }
    }

    for (i, (s, spec)) in series.iter().zip(&styles).enumerate() {
        debug!("drawing {} with {:?}", s.path(), spec);
        draw_series(main, s, spec, cfg);

        if let (Some(ratio_ax), Some(r), Some(values)) =
            (ratio_axes.as_deref_mut(), reference, &ratios[i])
        {
            let (xs, _) = step_polyline(&series[r]);
            let mut ys = values.clone();
            if let Some(&last) = values.last() {
                ys.push(last);
            }
            ratio_ax
                .step(xs, ys)
                .color(spec.line_color.clone())
                .linewidth(cfg.line_width)
                .linestyle(spec.dash.clone())
                .build();
        }
    }

    if series.iter().any(|s| s.title().is_some()) {
        let loc = keys.get("LegendPos").unwrap_or("best");
        let position = LegendPosition::from_loc(loc).unwrap_or_else(|| {
            warn!("unknown legend position '{}', using the default", loc);
            LegendPosition::default()
        });
        main.legend_at(position, legend_font_size(keys, cfg.font_size));
    }

    figure.tight_layout();
    Ok(RenderedPlot {
        figure,
        has_ratio,
        reference,
        warnings,
    })
}

/// Render and, when `output` is given, write the figure as SVG.
pub fn plot<S: AnnotatedSeries>(
    series: &[S],
    output: Option<&Path>,
    want_ratio: bool,
    keys: &PlotKeys,
    cfg: &RenderConfig,
) -> Result<RenderedPlot> {
    let mut rendered = render(series, keys, want_ratio, cfg)?;
    if let Some(path) = output {
        rendered.figure.save(path)?;
        info!("wrote {}", path.display());
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::plotting::PlotKind;
    use crate::series::{Point, Series};

    fn pair() -> Vec<Series> {
        vec![
            Series::new(
                "/REF/h",
                &[
                    Point::from_bin(0.0, 1.0, 1.0, 0.1, 0.1),
                    Point::from_bin(1.0, 2.0, 2.0, 0.2, 0.2),
                ],
            )
            .with_annotation("Title", "Data")
            .with_annotation("RatioRef", "yes")
            .with_annotation("ErrorBars", "1")
            .with_annotation("Marker", "*"),
            Series::from_edges("/MC/h", &[0.0, 1.0, 2.0], &[2.0, 4.0]).with_annotation("Title", "MC"),
        ]
    }

    #[test]
    fn test_ratio_panel_drawn_for_reference() {
        let keys: PlotKeys = [("XLabel", "x"), ("Title", "Comparison")].into_iter().collect();
        let mut rendered = render(&pair(), &keys, true, &RenderConfig::default()).unwrap();
        assert!(rendered.has_ratio);
        assert_eq!(rendered.reference, Some(0));
        assert_eq!(rendered.figure.get_axes().len(), 2);
        assert!(rendered.warnings.is_empty());

        let axes = rendered.figure.get_axes();
        // errorbar + markers, step
        assert_eq!(axes[0].plot_count(), 3);
        // band, unity line, one ratio curve
        assert_eq!(axes[1].plot_count(), 3);
        assert!(axes[1].x_label.is_some());
        assert!(axes[0].x_label.is_none());

        let svg = rendered.figure.render().unwrap();
        assert!(svg.contains("Comparison"));
        assert!(svg.contains("Ratio"));
    }

    #[test]
    fn test_no_reference_means_no_ratio_panel() {
        let series: Vec<Series> = pair()
            .into_iter()
            .map(|s| s.with_annotation("RatioRef", "no"))
            .collect();
        let rendered = render(&series, &PlotKeys::new(), true, &RenderConfig::default()).unwrap();
        assert!(!rendered.has_ratio);
        assert_eq!(rendered.reference, None);
        assert_eq!(rendered.figure.get_axes().len(), 1);
    }

    #[test]
    fn test_ratio_not_requested() {
        let rendered = render(&pair(), &PlotKeys::new(), false, &RenderConfig::default()).unwrap();
        assert!(!rendered.has_ratio);
        assert_eq!(rendered.figure.get_axes().len(), 1);
    }

    #[test]
    fn test_multiple_references_keep_first() {
        let series: Vec<Series> = pair()
            .into_iter()
            .map(|s| s.with_annotation("RatioRef", "1"))
            .collect();
        let rendered = render(&series, &PlotKeys::new(), true, &RenderConfig::default()).unwrap();
        assert_eq!(rendered.reference, Some(0));
        assert_eq!(
            rendered.warnings,
            vec![Warning::MultipleRatioReferences {
                kept: "/REF/h".to_string(),
                ignored: vec!["/MC/h".to_string()],
            }]
        );
    }

    #[test]
    fn test_reference_scan_stops_at_second_flag() {
        let mut series = pair();
        series[1] = series[1].clone().with_annotation("RatioRef", "1");
        series.push(
            Series::from_edges("/MC/other", &[0.0, 1.0, 2.0], &[1.0, 1.0])
                .with_annotation("RatioRef", "perhaps"),
        );
        let rendered = render(&series, &PlotKeys::new(), true, &RenderConfig::default()).unwrap();
        assert_eq!(rendered.reference, Some(0));
        assert_eq!(
            rendered.warnings,
            vec![Warning::MultipleRatioReferences {
                kept: "/REF/h".to_string(),
                ignored: vec!["/MC/h".to_string()],
            }]
        );

        series[1] = Series::from_edges("/MC/h", &[0.0, 1.0, 2.0], &[2.0, 4.0]);
        let err = render(&series, &PlotKeys::new(), true, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidBooleanLiteral { .. }));
    }

    #[test]
    fn test_layers_drawn_in_order() {
        let rendered = render(&pair(), &PlotKeys::new(), true, &RenderConfig::default()).unwrap();
        let axes = rendered.figure.get_axes();
        // reference: bars under markers; MC: default step
        assert_eq!(
            axes[0].plot_kinds(),
            vec![PlotKind::ErrorBars, PlotKind::Scatter, PlotKind::Step]
        );
        assert_eq!(
            axes[1].plot_kinds(),
            vec![PlotKind::Fill, PlotKind::HLine, PlotKind::Step]
        );

        let series = vec![
            pair().remove(0).with_annotation("Line", "diag"),
            pair().remove(1),
        ];
        let mut rendered = render(&series, &PlotKeys::new(), true, &RenderConfig::default()).unwrap();
        assert_eq!(
            rendered.figure.get_axes()[0].plot_kinds(),
            vec![PlotKind::ErrorBars, PlotKind::Line, PlotKind::Scatter, PlotKind::Step]
        );

        let svg = rendered.figure.render().unwrap();
        let band = svg.find("<polygon").unwrap();
        let last_curve = svg.rfind("<polyline").unwrap();
        assert!(band < last_curve);
    }

    #[test]
    fn test_log_axis_with_zero_lower_error_renders() {
        let series = vec![Series::new("/h", &[Point::from_bin(0.0, 1.0, 1.0, 1.0, 1.0)])];
        let keys: PlotKeys = [("LogY", "1")].into_iter().collect();
        let mut rendered = render(&series, &keys, false, &RenderConfig::default()).unwrap();
        assert_eq!(rendered.figure.get_axes()[0].ylim().map(|(lo, _)| lo), Some(1.0));
        assert!(rendered.figure.render().is_ok());
    }

    #[test]
    fn test_binning_mismatch_aborts() {
        let mut series = pair();
        series[1] = Series::from_edges("/MC/h", &[0.0, 1.0, 3.0], &[2.0, 4.0]);
        let err = render(&series, &PlotKeys::new(), true, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::BinningMismatch { .. }));
    }

    #[test]
    fn test_invalid_layout_degrades_to_main_panel() {
        let cfg = RenderConfig {
            ratio_heights: [3.0, 0.0],
            ..RenderConfig::default()
        };
        let rendered = render(&pair(), &PlotKeys::new(), true, &cfg).unwrap();
        assert!(!rendered.has_ratio);
        assert_eq!(rendered.figure.get_axes().len(), 1);
    }

    #[test]
    fn test_axis_keys_applied() {
        let keys: PlotKeys = [("XMin", "0.5"), ("YMax", "10"), ("LogY", "on")]
            .into_iter()
            .collect();
        let rendered = render(&pair(), &keys, false, &RenderConfig::default()).unwrap();
        let main = &rendered.figure.get_axes()[0];
        assert_eq!(main.xlim(), Some((0.5, 2.0)));
        assert_eq!(main.ylim().map(|(_, hi)| hi), Some(10.0));
    }

    #[test]
    fn test_legend_font_size() {
        let keys: PlotKeys = [("LegendFontSize", "14")].into_iter().collect();
        assert_eq!(legend_font_size(&keys, 10.0), 14.0);
        let keys: PlotKeys = [("LegendFontSize", "large")].into_iter().collect();
        assert!((legend_font_size(&keys, 10.0) - 12.0).abs() < 1e-9);
        assert!((legend_font_size(&PlotKeys::new(), 10.0) - 6.94).abs() < 1e-9);
    }
}
