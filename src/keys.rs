//! Plot key-file parsing.
//!
//! A key file is line oriented. Blocks open with `BEGIN PLOT <id>` and close
//! with `END PLOT <id>` (either may carry leading `#`s); `Key=Value` lines
//! inside a block are recorded for that identifier and everything else is
//! skipped. Values stay raw strings until a consumer asks for a typed view.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result, Warning};
use crate::style::as_bool;

/// Configuration keys for one plot, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlotKeys(IndexMap<String, String>);

/// Plot identifier -> keys.
pub type PlotConfig = IndexMap<String, PlotKeys>;

impl PlotKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parse a float-valued key; absent keys are `Ok(None)`.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        self.get(key)
            .map(|value| {
                value.trim().parse::<f64>().map_err(|_| Error::InvalidNumber {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Parse a boolean-valued key with [`as_bool`]; absent keys are `Ok(None)`.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key).map(|value| as_bool(key, value)).transpose()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlotKeys {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut keys = PlotKeys::new();
        for (k, v) in iter {
            keys.insert(k, v);
        }
        keys
    }
}

/// Result of parsing a key file.
#[derive(Debug, Clone, Default)]
pub struct ParsedKeys {
    pub plots: PlotConfig,
    /// Lines inside a block that were neither comments nor attributes
    pub warnings: Vec<Warning>,
}

fn re_begin() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#*\s*BEGIN\s+PLOT\s*(\w*)").expect("valid BEGIN pattern"))
}

fn re_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#*\s*END\s+PLOT\s+\w*").expect("valid END pattern"))
}

fn re_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\s*=\s*(.*)").expect("valid attribute pattern"))
}

/// Parse a key file from any buffered reader.
///
/// Only I/O failures are errors. An unterminated final block keeps the
/// attributes recorded so far, and re-opening an identifier merges into it.
pub fn parse<R: BufRead>(reader: R) -> Result<ParsedKeys> {
    let mut parsed = ParsedKeys::default();
    // None = outside any block
    let mut active: Option<String> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let l = line.trim();

        if let Some(caps) = re_begin().captures(l) {
            active = Some(caps[1].to_string());
        } else if re_end().is_match(l) {
            active = None;
        } else if l.starts_with('#') {
            continue;
        } else if let Some(ref name) = active {
            match re_attr().captures(l) {
                Some(caps) => {
                    parsed
                        .plots
                        .entry(name.clone())
                        .or_default()
                        .insert(&caps[1], &caps[2]);
                }
                None if l.is_empty() => {}
                None => {
                    debug!("key file line {}: skipping '{}'", idx + 1, l);
                    parsed.warnings.push(Warning::ConfigParse {
                        line: idx + 1,
                        text: l.to_string(),
                    });
                }
            }
        }
    }

    Ok(parsed)
}

/// Parse key-file text held in memory.
pub fn parse_str(text: &str) -> ParsedKeys {
    // Reading from a byte slice cannot fail
    parse(text.as_bytes()).unwrap_or_default()
}

/// Parse a key file from disk.
pub fn load(path: impl AsRef<Path>) -> Result<ParsedKeys> {
    let file = File::open(path)?;
    parse(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_single_block() {
        let parsed = parse(Cursor::new("BEGIN PLOT h1\nXLabel=pT\nLogY=1\nEND PLOT h1\n")).unwrap();
        assert_eq!(parsed.plots.len(), 1);
        let h1 = &parsed.plots["h1"];
        assert_eq!(h1.get("XLabel"), Some("pT"));
        assert_eq!(h1.get("LogY"), Some("1"));
        assert_eq!(h1.len(), 2);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_attributes_outside_blocks_are_dropped() {
        let text = "\
XLabel=outside
# BEGIN PLOT a
YLabel = counts
# a comment inside
END PLOT a
Title=also outside
";
        let parsed = parse_str(text);
        assert_eq!(parsed.plots.len(), 1);
        let a = &parsed.plots["a"];
        assert_eq!(a.get("YLabel"), Some("counts"));
        assert_eq!(a.get("XLabel"), None);
        assert_eq!(a.get("Title"), None);
    }

    #[test]
    fn test_unmatched_line_inside_block_warns() {
        let parsed = parse_str("BEGIN PLOT p\nnot an attribute\n\nXMin=0\nEND PLOT p\n");
        assert_eq!(parsed.plots["p"].get("XMin"), Some("0"));
        assert_eq!(
            parsed.warnings,
            vec![Warning::ConfigParse {
                line: 2,
                text: "not an attribute".to_string()
            }]
        );
    }

    #[test]
    fn test_unterminated_block_keeps_progress() {
        let parsed = parse_str("BEGIN PLOT open\nXLabel=x\nYLabel=y");
        assert_eq!(parsed.plots["open"].len(), 2);
    }

    #[test]
    fn test_reopened_block_merges_last_write_wins() {
        let parsed = parse_str(
            "BEGIN PLOT p\nA=1\nB=2\nEND PLOT p\nBEGIN PLOT p\nB=3\nEND PLOT p\n",
        );
        let p = &parsed.plots["p"];
        assert_eq!(p.get("A"), Some("1"));
        assert_eq!(p.get("B"), Some("3"));
    }

    #[test]
    fn test_non_word_identifier_captures_empty_name() {
        let parsed = parse_str("BEGIN PLOT /ATLAS/h\nA=1\nEND PLOT /ATLAS/h\n");
        assert_eq!(parsed.plots[""].get("A"), Some("1"));
    }

    #[test]
    fn test_value_keeps_inner_spacing() {
        let parsed = parse_str("BEGIN PLOT p\nXLabel =  $p_T$ [GeV]  \nEND PLOT p\n");
        assert_eq!(parsed.plots["p"].get("XLabel"), Some("$p_T$ [GeV]"));
    }

    #[test]
    fn test_typed_accessors() {
        let keys: PlotKeys = [("XMin", "0.5"), ("LogY", "Yes"), ("YMax", "lots")]
            .into_iter()
            .collect();
        assert_eq!(keys.get_f64("XMin").unwrap(), Some(0.5));
        assert_eq!(keys.get_f64("XMax").unwrap(), None);
        assert_eq!(keys.get_bool("LogY").unwrap(), Some(true));
        assert!(matches!(keys.get_f64("YMax"), Err(Error::InvalidNumber { .. })));
    }
}
