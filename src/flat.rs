//! Reader for FLAT text data files.
//!
//! ```text
//! # BEGIN HISTOGRAM /REF/h_pt
//! Title=Data
//! # xlow	 xhigh	 val	 errminus	 errplus
//! 0.0	1.0	5.0	0.5	0.5
//! # END HISTOGRAM
//! ```
//!
//! Only `HISTOGRAM` blocks have a 1-D point view; other kinds are kept so
//! that asking for their points fails loudly instead of vanishing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::warn;
use regex::Regex;

use crate::error::{Result, Warning};
use crate::series::{BinnedSource, Point};

const HISTOGRAM: &str = "HISTOGRAM";
const HISTOGRAM_COLUMNS: usize = 5;

/// One `BEGIN`/`END` block of a FLAT file.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatObject {
    kind: String,
    path: String,
    annotations: IndexMap<String, String>,
    rows: Vec<Vec<f64>>,
}

impl FlatObject {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

impl BinnedSource for FlatObject {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    fn annotations(&self) -> Vec<(String, String)> {
        self.annotations
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn points(&self) -> Option<Vec<Point>> {
        if self.kind != HISTOGRAM {
            return None;
        }
        let points = self
            .rows
            .iter()
            .map(|r| Point::from_bin(r[0], r[1], r[2], r[3], r[4]))
            .collect();
        Some(points)
    }
}

/// All objects of one file plus the lines that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct FlatFile {
    pub objects: Vec<FlatObject>,
    pub warnings: Vec<Warning>,
}

impl FlatFile {
    /// Keep only objects whose path is listed; an empty filter keeps everything.
    pub fn select(self, paths: &[String]) -> Vec<FlatObject> {
        if paths.is_empty() {
            return self.objects;
        }
        self.objects
            .into_iter()
            .filter(|o| paths.iter().any(|p| p == &o.path))
            .collect()
    }
}

fn re_begin() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s*BEGIN\s+(\w+)\s*(\S*)").expect("valid BEGIN pattern"))
}

fn re_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\s*END\s+(\w+)").expect("valid END pattern"))
}

fn re_annotation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\s*=\s*(.*)").expect("valid annotation pattern"))
}

fn skip(warnings: &mut Vec<Warning>, line: usize, text: &str, why: &str) {
    warn!("FLAT line {}: {}, skipping '{}'", line, why, text);
    warnings.push(Warning::ConfigParse {
        line,
        text: text.to_string(),
    });
}

/// Read every block from a FLAT stream.
pub fn read<R: BufRead>(reader: R) -> Result<FlatFile> {
    let mut file = FlatFile::default();
    let mut current: Option<FlatObject> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let l = line.trim();
        let lineno = idx + 1;

        let Some(ref mut obj) = current else {
            if let Some(caps) = re_begin().captures(l) {
                let mut obj = FlatObject {
                    kind: caps[1].to_string(),
                    path: caps[2].to_string(),
                    annotations: IndexMap::new(),
                    rows: Vec::new(),
                };
                if obj.path.is_empty() {
                    obj.path = format!("/object{}", file.objects.len());
                }
                current = Some(obj);
            }
            continue;
        };

        if let Some(caps) = re_end().captures(l) {
            if caps[1] == obj.kind {
                if let Some(obj) = current.take() {
                    file.objects.push(obj);
                }
            } else {
                skip(&mut file.warnings, lineno, l, "END does not match the open block");
            }
        } else if l.is_empty() || l.starts_with('#') {
            continue;
        } else if let Some(caps) = re_annotation().captures(l) {
            obj.annotations.insert(caps[1].to_string(), caps[2].to_string());
        } else {
            let parsed: std::result::Result<Vec<f64>, _> =
                l.split_whitespace().map(str::parse::<f64>).collect();
            match parsed {
                Ok(row) if obj.kind != HISTOGRAM || row.len() == HISTOGRAM_COLUMNS => {
                    obj.rows.push(row)
                }
                Ok(_) => skip(&mut file.warnings, lineno, l, "wrong number of columns"),
                Err(_) => skip(&mut file.warnings, lineno, l, "not a numeric row"),
            }
        }
    }

    if let Some(obj) = current {
        warn!("FLAT block '{}' is not terminated, dropping it", obj.path);
    }
    Ok(file)
}

/// Read a FLAT file from disk.
pub fn load(path: impl AsRef<Path>) -> Result<FlatFile> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}
