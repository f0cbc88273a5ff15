//! Fan-out of independent plot jobs.
//!
//! Each job builds its own series and figure on whichever worker picks it
//! up; nothing mutable is shared between jobs. Results come back in job
//! order no matter which worker finished first.

use std::panic;
use std::path::PathBuf;
use std::thread;

use crossbeam_channel::unbounded;
use log::{debug, info, warn};

use crate::compositor;
use crate::config::{BatchManifest, JobSpec, RenderConfig};
use crate::error::{Error, Result, Warning};
use crate::flat;
use crate::keys::{self, PlotKeys};
use crate::series::{AnnotatedSeries, BinnedSource, Series};

/// One unit of batch work.
pub struct PlotJob {
    /// Data objects overlaid in this plot, in drawing order
    pub sources: Vec<Box<dyn BinnedSource + Send>>,
    pub output: Option<PathBuf>,
    pub want_ratio: bool,
    pub keys: PlotKeys,
}

impl std::fmt::Debug for PlotJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<&str> = self.sources.iter().map(|s| s.path()).collect();
        f.debug_struct("PlotJob")
            .field("sources", &paths)
            .field("output", &self.output)
            .field("want_ratio", &self.want_ratio)
            .field("keys", &self.keys)
            .finish()
    }
}

impl PlotJob {
    /// Load the data files and key block a manifest entry names.
    ///
    /// Without an explicit `plot` identifier the key file is only used when
    /// it holds exactly one block.
    pub fn from_spec(spec: &JobSpec) -> Result<Self> {
        let mut sources: Vec<Box<dyn BinnedSource + Send>> = Vec::new();
        for input in &spec.inputs {
            let file = flat::load(input)?;
            let objects = file.select(&spec.paths);
            if objects.is_empty() {
                warn!("{}: no matching objects", input.display());
            }
            sources.extend(
                objects
                    .into_iter()
                    .map(|o| Box::new(o) as Box<dyn BinnedSource + Send>),
            );
        }

        let keys = match &spec.keys {
            Some(path) => select_keys(keys::load(path)?.plots, spec.plot.as_deref(), path),
            None => PlotKeys::new(),
        };

        Ok(PlotJob {
            sources,
            output: spec.output.clone(),
            want_ratio: spec.ratio,
            keys,
        })
    }
}

fn select_keys(mut plots: keys::PlotConfig, id: Option<&str>, path: &std::path::Path) -> PlotKeys {
    match id {
        Some(id) => plots.swap_remove(id).unwrap_or_else(|| {
            warn!("{}: no block for plot '{}'", path.display(), id);
            PlotKeys::new()
        }),
        None if plots.len() == 1 => plots.swap_remove_index(0).map(|(_, k)| k).unwrap_or_default(),
        None => {
            if !plots.is_empty() {
                warn!(
                    "{}: {} blocks and no plot identifier, ignoring the key file",
                    path.display(),
                    plots.len()
                );
            }
            PlotKeys::new()
        }
    }
}

/// What a successful job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub output: Option<PathBuf>,
    /// Number of series drawn
    pub series: usize,
    pub has_ratio: bool,
    /// Path of the ratio reference, if one was used
    pub reference: Option<String>,
    pub warnings: Vec<Warning>,
}

/// Convert, render and optionally write one job.
pub fn execute(job: PlotJob, cfg: &RenderConfig) -> Result<JobOutcome> {
    let series = job
        .sources
        .iter()
        .map(|source| Series::from_source(source.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let rendered = compositor::plot(&series, job.output.as_deref(), job.want_ratio, &job.keys, cfg)?;
    Ok(JobOutcome {
        output: job.output,
        series: series.len(),
        has_ratio: rendered.has_ratio,
        reference: rendered.reference.map(|i| series[i].path().to_string()),
        warnings: rendered.warnings,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run `work`, turning a panic into an error for slot `index`.
fn isolated(index: usize, work: impl FnOnce() -> Result<JobOutcome>) -> Result<JobOutcome> {
    panic::catch_unwind(panic::AssertUnwindSafe(work)).unwrap_or_else(|payload| {
        Err(Error::JobPanicked {
            index,
            message: panic_message(payload.as_ref()),
        })
    })
}

/// Run every job and return one result per job, in input order.
///
/// `workers == 1` runs the jobs one after another on the calling thread;
/// `workers == 0` uses one worker per available CPU. A failing job never
/// stops the others.
pub fn run(jobs: Vec<PlotJob>, workers: usize, cfg: &RenderConfig) -> Vec<Result<JobOutcome>> {
    dispatch(jobs, workers, |index, job| isolated(index, || execute(job, cfg)))
}

/// Like [`run`], but each job also loads its own inputs on its worker, so
/// an unreadable file only fails that job.
pub fn run_manifest(manifest: BatchManifest, workers: usize, cfg: &RenderConfig) -> Vec<Result<JobOutcome>> {
    dispatch(manifest.jobs, workers, |index, spec| {
        isolated(index, || PlotJob::from_spec(&spec).and_then(|job| execute(job, cfg)))
    })
}

fn dispatch<T, F>(items: Vec<T>, workers: usize, work: F) -> Vec<Result<JobOutcome>>
where
    T: Send,
    F: Fn(usize, T) -> Result<JobOutcome> + Sync,
{
    let n_jobs = items.len();
    let workers = match workers {
        0 => num_cpus::get(),
        n => n,
    }
    .clamp(1, n_jobs.max(1));

    info!("running {} plot jobs on {} worker(s)", n_jobs, workers);

    let results: Vec<Result<JobOutcome>> = if workers == 1 {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| work(index, item))
            .collect()
    } else {
        dispatch_parallel(items, workers, &work)
    };

    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(outcome) => info!("job {} done ({} series)", index, outcome.series),
            Err(e) => warn!("job {} failed: {}", index, e),
        }
    }
    results
}

fn dispatch_parallel<T, F>(items: Vec<T>, workers: usize, work: &F) -> Vec<Result<JobOutcome>>
where
    T: Send,
    F: Fn(usize, T) -> Result<JobOutcome> + Sync,
{
    let n_jobs = items.len();
    let (job_tx, job_rx) = unbounded::<(usize, T)>();
    let (result_tx, result_rx) = unbounded::<(usize, Result<JobOutcome>)>();

    for item in items.into_iter().enumerate() {
        if job_tx.send(item).is_err() {
            break;
        }
    }
    drop(job_tx);

    thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (index, item) in job_rx.iter() {
                    debug!("worker {} took job {}", worker, index);
                    if result_tx.send((index, work(index, item))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<Result<JobOutcome>>> = (0..n_jobs).map(|_| None).collect();
    for (index, result) in result_rx.iter() {
        slots[index] = Some(result);
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                Err(Error::JobPanicked {
                    index,
                    message: "worker exited without a result".to_string(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Point;

    struct Hist {
        path: String,
        kind: &'static str,
        values: Vec<f64>,
        annotations: Vec<(String, String)>,
    }

    impl Hist {
        fn new(path: &str, values: &[f64]) -> Self {
            Hist {
                path: path.to_string(),
                kind: "HISTOGRAM",
                values: values.to_vec(),
                annotations: Vec::new(),
            }
        }
    }

    impl BinnedSource for Hist {
        fn path(&self) -> &str {
            &self.path
        }
        fn kind(&self) -> &str {
            self.kind
        }
        fn annotation(&self, key: &str) -> Option<&str> {
            self.annotations
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
        fn annotations(&self) -> Vec<(String, String)> {
            self.annotations.clone()
        }
        fn points(&self) -> Option<Vec<Point>> {
            if self.kind != "HISTOGRAM" {
                return None;
            }
            Some(
                self.values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Point::from_bin(i as f64, i as f64 + 1.0, v, 0.0, 0.0))
                    .collect(),
            )
        }
    }

    fn job(sources: Vec<Hist>) -> PlotJob {
        PlotJob {
            sources: sources
                .into_iter()
                .map(|h| Box::new(h) as Box<dyn BinnedSource + Send>)
                .collect(),
            output: None,
            want_ratio: true,
            keys: PlotKeys::new(),
        }
    }

    fn jobs() -> Vec<PlotJob> {
        let mut grid = Hist::new("/grid", &[1.0]);
        grid.kind = "HISTOGRAM2D";
        vec![
            job(vec![Hist::new("/a", &[1.0, 2.0])]),
            job(vec![Hist::new("/b", &[1.0]), grid]),
            job(vec![Hist::new("/c", &[3.0]), Hist::new("/d", &[4.0])]),
        ]
    }

    fn check(results: &[Result<JobOutcome>]) {
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().series, 1);
        assert!(matches!(
            results[1],
            Err(Error::InvalidSourceKind { ref path, .. }) if path == "/grid"
        ));
        assert_eq!(results[2].as_ref().unwrap().series, 2);
    }

    #[test]
    fn test_sequential_keeps_order_and_isolates_failure() {
        check(&run(jobs(), 1, &RenderConfig::default()));
    }

    #[test]
    fn test_parallel_keeps_order_and_isolates_failure() {
        check(&run(jobs(), 3, &RenderConfig::default()));
    }

    #[test]
    fn test_reference_reported() {
        let mut reference = Hist::new("/ref", &[1.0, 2.0]);
        reference.annotations.push(("RatioRef".to_string(), "true".to_string()));
        let results = run(
            vec![job(vec![reference, Hist::new("/mc", &[2.0, 4.0])])],
            0,
            &RenderConfig::default(),
        );
        let outcome = results[0].as_ref().unwrap();
        assert!(outcome.has_ratio);
        assert_eq!(outcome.reference.as_deref(), Some("/ref"));
    }

    #[test]
    fn test_empty_batch() {
        assert!(run(Vec::new(), 4, &RenderConfig::default()).is_empty());
    }

    #[test]
    fn test_manifest_missing_input_fails_its_slot_only() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("h.dat");
        std::fs::write(
            &data,
            "# BEGIN HISTOGRAM /h\n0 1 1 0.1 0.1\n1 2 2 0.1 0.1\n# END HISTOGRAM\n",
        )
        .unwrap();
        let keys = dir.path().join("h.plot");
        std::fs::write(&keys, "BEGIN PLOT h\nXLabel=x\nEND PLOT h\n").unwrap();

        let manifest = BatchManifest {
            jobs: vec![
                JobSpec {
                    inputs: vec![dir.path().join("missing.dat")],
                    paths: Vec::new(),
                    output: None,
                    ratio: true,
                    keys: None,
                    plot: None,
                },
                JobSpec {
                    inputs: vec![data],
                    paths: Vec::new(),
                    output: Some(dir.path().join("h.svg")),
                    ratio: true,
                    keys: Some(keys),
                    plot: None,
                },
            ],
        };
        let results = run_manifest(manifest, 2, &RenderConfig::default());
        assert!(matches!(results[0], Err(Error::Io(_))));
        let outcome = results[1].as_ref().unwrap();
        assert_eq!(outcome.series, 1);
        assert!(dir.path().join("h.svg").exists());
    }

    #[test]
    fn test_select_keys() {
        let parsed = keys::parse_str("BEGIN PLOT a\nX=1\nEND PLOT a\nBEGIN PLOT b\nX=2\nEND PLOT b\n");
        let path = std::path::Path::new("k.plot");
        assert_eq!(select_keys(parsed.plots.clone(), Some("b"), path).get("X"), Some("2"));
        assert!(select_keys(parsed.plots.clone(), None, path).is_empty());
        assert!(select_keys(parsed.plots, Some("c"), path).is_empty());
    }
}
