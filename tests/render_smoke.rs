use std::io::Cursor;

use binplot::config::RenderConfig;
use binplot::flat;
use binplot::keys;
use binplot::series::Series;

const DATA: &str = "\
# BEGIN HISTOGRAM /REF/pt
Title=Data
RatioRef=1
ErrorBars=1
Marker=*
# xlow xhigh val errminus errplus
0.0 10.0 100.0 10.0 10.0
10.0 20.0 50.0 7.0 7.0
20.0 40.0 20.0 4.5 4.5
# END HISTOGRAM

# BEGIN HISTOGRAM /MC/pt
Title=Simulation
LineStyle=dashed
# xlow xhigh val errminus errplus
0.0 10.0 90.0 1.0 1.0
10.0 20.0 55.0 1.0 1.0
20.0 40.0 25.0 1.0 1.0
# END HISTOGRAM
";

const KEYS: &str = "\
# BEGIN PLOT pt
Title=Transverse momentum
XLabel=p_T [GeV]
YLabel=Events
LogY=1
RatioYMin=0.5
RatioYMax=1.5
LegendPos=upper right
# END PLOT pt
";

fn series() -> Vec<Series> {
    let file = flat::read(Cursor::new(DATA)).unwrap();
    file.objects
        .iter()
        .map(|o| Series::from_source(o).unwrap())
        .collect()
}

#[test]
fn key_file_to_svg() {
    let parsed = keys::parse_str(KEYS);
    let keys = &parsed.plots["pt"];
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pt.svg");

    let rendered = binplot::plot(&series(), Some(&out), true, keys, &RenderConfig::default()).unwrap();
    assert!(rendered.has_ratio);
    assert_eq!(rendered.reference, Some(0));

    let ratio_panel = &rendered.figure.get_axes()[1];
    assert_eq!(ratio_panel.ylim(), Some((0.5, 1.5)));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("Transverse momentum"));
    assert!(svg.contains("Simulation"));
    assert!(svg.contains("Events"));
}

#[test]
fn ratio_suppressed_without_reference() {
    let data = DATA.replace("RatioRef=1", "RatioRef=0");
    let file = flat::read(Cursor::new(data)).unwrap();
    let series: Vec<Series> = file
        .objects
        .iter()
        .map(|o| Series::from_source(o).unwrap())
        .collect();
    let keys = keys::parse_str(KEYS);

    let rendered = binplot::render(&series, &keys.plots["pt"], true, &RenderConfig::default()).unwrap();
    assert!(!rendered.has_ratio);
    assert_eq!(rendered.figure.get_axes().len(), 1);
}

#[test]
fn bad_boolean_annotation_fails_the_plot() {
    let data = DATA.replace("ErrorBars=1", "ErrorBars=perhaps");
    let file = flat::read(Cursor::new(data)).unwrap();
    let series: Vec<Series> = file
        .objects
        .iter()
        .map(|o| Series::from_source(o).unwrap())
        .collect();

    let err = binplot::render(&series, &Default::default(), true, &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, binplot::Error::InvalidBooleanLiteral { .. }));
}
