use binplot::batch::{self, JobOutcome, PlotJob};
use binplot::config::{BatchManifest, JobSpec, RenderConfig};
use binplot::flat::FlatObject;
use binplot::series::BinnedSource;
use binplot::{Error, Result};

fn objects(text: &str) -> Vec<FlatObject> {
    binplot::flat::read(text.as_bytes()).unwrap().objects
}

fn job(text: &str) -> PlotJob {
    PlotJob {
        sources: objects(text)
            .into_iter()
            .map(|o| Box::new(o) as Box<dyn BinnedSource + Send>)
            .collect(),
        output: None,
        want_ratio: true,
        keys: Default::default(),
    }
}

fn jobs() -> Vec<PlotJob> {
    vec![
        job("# BEGIN HISTOGRAM /one\n0 1 1 0 0\n# END HISTOGRAM\n"),
        job("# BEGIN HISTOGRAM2D /two\n0 1 0 1 1 0 0\n# END HISTOGRAM2D\n"),
        job("# BEGIN HISTOGRAM /three\n0 1 1 0 0\n1 2 3 0 0\n# END HISTOGRAM\n"),
    ]
}

fn assert_slots(results: &[Result<JobOutcome>]) {
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::InvalidSourceKind { .. })));
    assert!(results[2].is_ok());
}

#[test]
fn sequential_batch_isolates_failures() {
    assert_slots(&batch::run(jobs(), 1, &RenderConfig::default()));
}

#[test]
fn parallel_batch_keeps_input_order() {
    let many: Vec<PlotJob> = (0..12)
        .map(|i| job(&format!("# BEGIN HISTOGRAM /h{}\n0 1 {} 0 0\n# END HISTOGRAM\n", i, i + 1)))
        .collect();
    let results = batch::run(many, 4, &RenderConfig::default());
    assert_eq!(results.len(), 12);
    assert!(results.iter().all(|r| r.as_ref().map(|o| o.series == 1).unwrap_or(false)));

    assert_slots(&batch::run(jobs(), 2, &RenderConfig::default()));
}

#[test]
fn manifest_jobs_write_their_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.dat");
    std::fs::write(
        &data,
        "# BEGIN HISTOGRAM /REF/a\nRatioRef=yes\n0 1 2 0.5 0.5\n1 2 4 0.5 0.5\n# END HISTOGRAM\n\
         # BEGIN HISTOGRAM /MC/a\n0 1 1 0 0\n1 2 5 0 0\n# END HISTOGRAM\n",
    )
    .unwrap();

    let spec = |name: &str, paths: Vec<String>| JobSpec {
        inputs: vec![data.clone()],
        paths,
        output: Some(dir.path().join(name)),
        ratio: true,
        keys: None,
        plot: None,
    };
    let manifest = BatchManifest {
        jobs: vec![
            spec("both.svg", Vec::new()),
            spec("mc.svg", vec!["/MC/a".to_string()]),
        ],
    };

    let results = batch::run_manifest(manifest, 0, &RenderConfig::default());
    let both = results[0].as_ref().unwrap();
    assert_eq!(both.series, 2);
    assert_eq!(both.reference.as_deref(), Some("/REF/a"));
    let mc = results[1].as_ref().unwrap();
    assert_eq!(mc.series, 1);
    assert!(!mc.has_ratio);
    assert!(dir.path().join("both.svg").exists());
    assert!(dir.path().join("mc.svg").exists());
}
