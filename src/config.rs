//! Render configuration and batch manifests.
//!
//! [`RenderConfig`] is created once at startup and borrowed by every render
//! call. [`BatchManifest`] describes a list of plot jobs and carries a JSON
//! Schema so manifests can be checked before any job runs.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::plotting::{Color, DashPattern, Theme, ThemeConfig};
use crate::style::StyleDefaults;

// ============================================================================
// Render configuration
// ============================================================================

/// Figure-wide settings shared by all render calls.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Figure size in pixels
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Base font size; tick labels and legend text scale from it
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    /// Per-series default colors, cycled by series index
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    /// Per-series default dash codes, cycled by series index
    #[serde(default = "default_dashes")]
    pub dashes: Vec<String>,
    /// Factor applied to a computed (never an explicit) Y maximum
    #[serde(default = "default_headroom")]
    pub headroom: f64,
    /// Ratio band color unless `RatioErrColor` is set
    #[serde(default = "default_ratio_band_color")]
    pub ratio_band_color: String,
    /// Main and ratio panel heights
    #[serde(default = "default_ratio_heights")]
    pub ratio_heights: [f64; 2],
    /// Samples per point for `Line=smooth`
    #[serde(default = "default_smooth_oversample")]
    pub smooth_oversample: usize,
}

fn default_width() -> f64 { 640.0 }
fn default_height() -> f64 { 480.0 }
fn default_font_family() -> String { "sans-serif".to_string() }
fn default_font_size() -> f64 { 11.0 }
fn default_line_width() -> f64 { 1.4 }
fn default_marker_size() -> f64 { 7.0 }
fn default_headroom() -> f64 { 1.1 }
fn default_ratio_band_color() -> String { "yellow".to_string() }
fn default_ratio_heights() -> [f64; 2] { [3.0, 1.0] }
fn default_smooth_oversample() -> usize { 3 }

fn default_colors() -> Vec<String> {
    ["red", "blue", "magenta", "orange", "green"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_dashes() -> Vec<String> {
    ["-", "--", "-.", ":"].into_iter().map(String::from).collect()
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: default_width(),
            height: default_height(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            theme: Theme::default(),
            line_width: default_line_width(),
            marker_size: default_marker_size(),
            colors: default_colors(),
            dashes: default_dashes(),
            headroom: default_headroom(),
            ratio_band_color: default_ratio_band_color(),
            ratio_heights: default_ratio_heights(),
            smooth_oversample: default_smooth_oversample(),
        }
    }
}

impl RenderConfig {
    /// Load a render configuration from a JSON file; missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: RenderConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Theme with the configured font applied.
    pub fn theme_config(&self) -> ThemeConfig {
        self.theme.config().with_font(&self.font_family, self.font_size)
    }

    /// Fallback color and dash for the series at `index`.
    pub fn style_defaults(&self, index: usize) -> StyleDefaults {
        let color = match self.colors.len() {
            0 => Color::BLACK,
            n => Color::from(self.colors[index % n].as_str()),
        };
        let dash = match self.dashes.len() {
            0 => DashPattern::Solid,
            n => DashPattern::from_code(&self.dashes[index % n]).unwrap_or_default(),
        };
        StyleDefaults { color, dash }
    }
}

// ============================================================================
// Batch manifest
// ============================================================================

/// One plot job as written in a manifest.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    /// FLAT data files whose objects are overlaid in one plot
    pub inputs: Vec<PathBuf>,
    /// Object paths to keep; empty keeps every object
    #[serde(default)]
    pub paths: Vec<String>,
    /// SVG output file; the job only renders when absent
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Draw a ratio panel when a series carries `RatioRef`
    #[serde(default = "default_ratio")]
    pub ratio: bool,
    /// Key file with plot configuration
    #[serde(default)]
    pub keys: Option<PathBuf>,
    /// Block of the key file to apply
    #[serde(default)]
    pub plot: Option<String>,
}

fn default_ratio() -> bool { true }

/// A list of plot jobs.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BatchManifest {
    pub jobs: Vec<JobSpec>,
}

static SCHEMA: LazyLock<schemars::Schema> = LazyLock::new(|| schema_for!(BatchManifest));

/// The manifest JSON Schema as a pretty-printed string.
pub fn schema_json_pretty() -> String {
    serde_json::to_string_pretty(&*SCHEMA).expect("schema serialization should not fail")
}

/// Validate a JSON value against the manifest schema.
///
/// Returns `Err` with a description of all validation errors.
pub fn validate(value: &Value) -> std::result::Result<(), String> {
    let schema_val = serde_json::to_value(&*SCHEMA).expect("schema serialization should not fail");
    let validator = jsonschema::validator_for(&schema_val)
        .map_err(|e| format!("Failed to compile schema: {}", e))?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("  - {}: {}", e.instance_path, e))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "manifest failed schema validation ({} errors):\n{}",
            errors.len(),
            errors.join("\n")
        ))
    }
}

impl BatchManifest {
    /// Parse and validate a manifest from a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        validate(&value).map_err(Error::InvalidManifest)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load and validate a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_render_config_defaults() {
        let config: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.line_width, 1.4);
        assert_eq!(config.ratio_heights, [3.0, 1.0]);
    }

    #[test]
    fn test_render_config_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"width": 800, "theme": "high-contrast", "colors": ["black"]}}"#).unwrap();
        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.theme, Theme::HighContrast);
        assert_eq!(config.height, 480.0);
        assert_eq!(config.style_defaults(3).color, Color::from("black"));
    }

    #[test]
    fn test_style_defaults_cycle() {
        let config = RenderConfig::default();
        assert_eq!(config.style_defaults(0).color, Color::from("red"));
        assert_eq!(config.style_defaults(5).color, Color::from("red"));
        assert_eq!(config.style_defaults(1).dash, DashPattern::Dashed);
        assert_eq!(config.style_defaults(4).dash, DashPattern::Solid);
    }

    #[test]
    fn test_schema_generation() {
        let schema = schema_json_pretty();
        let parsed: Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(parsed.get("type").and_then(|v| v.as_str()), Some("object"));
    }

    #[test]
    fn test_manifest_validation() {
        let manifest = BatchManifest::from_value(json!({
            "jobs": [
                {"inputs": ["a.dat"], "output": "a.svg"},
                {"inputs": ["b.dat", "c.dat"], "ratio": false, "paths": ["/REF/h"]}
            ]
        }))
        .unwrap();
        assert_eq!(manifest.jobs.len(), 2);
        assert!(manifest.jobs[0].ratio);
        assert!(!manifest.jobs[1].ratio);

        let bad = BatchManifest::from_value(json!({"jobs": [{"output": "x.svg"}]}));
        assert!(matches!(bad, Err(Error::InvalidManifest(_))));
    }
}
