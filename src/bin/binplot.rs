use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info, warn};

use binplot::batch::{self, PlotJob};
use binplot::config::{self, BatchManifest, JobSpec, RenderConfig};

#[derive(Parser)]
#[command(name = "binplot")]
#[command(
    about = "Comparison plots of binned datasets",
    long_about = "Overlay histograms from FLAT data files, styled by their annotations and configured by plot-key files, with an optional ratio panel against a reference series."
)]
struct Cli {
    /// Log verbosity level
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,
    /// Write log output to a file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<String>,
    /// Append to log file instead of truncating
    #[arg(long, global = true)]
    append_log: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Overlay the objects of one or more data files in a single plot
    Plot {
        /// FLAT data files; objects are drawn in file order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Plot-key file
        #[arg(long)]
        keys: Option<PathBuf>,
        /// Block of the key file to apply (defaults to the only block)
        #[arg(long)]
        plot: Option<String>,
        /// Only plot objects with these paths (comma-separated)
        #[arg(long, value_delimiter = ',')]
        paths: Option<Vec<String>>,
        /// Output SVG file
        #[arg(long, required = true)]
        out: PathBuf,
        /// Never draw a ratio panel
        #[arg(long)]
        no_ratio: bool,
        /// Render configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Force overwrite of existing output files.
        #[arg(short, long)]
        force: bool,
    },
    /// Run every job of a batch manifest
    Batch {
        /// Manifest JSON file (see `binplot schema`)
        manifest: PathBuf,
        /// Number of workers; 0 uses one per CPU, 1 runs in order on this thread
        #[arg(long, default_value_t = 0)]
        workers: usize,
        /// Render configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Force overwrite of existing output files.
        #[arg(short, long)]
        force: bool,
    },
    /// Parse a plot-key file and print it as JSON
    Keys {
        /// Plot-key file
        file: PathBuf,
    },
    /// Print the JSON schema of batch manifests
    Schema,
}

/// Create missing parent directories and refuse to clobber existing outputs.
fn check_output_paths(paths: &[&Path], force: bool) -> anyhow::Result<()> {
    for path in paths {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        if !force && path.exists() {
            bail!(
                "Output file {} already exists. Use --force to overwrite.",
                path.display()
            );
        }
    }
    Ok(())
}

fn load_render_config(path: Option<&Path>) -> anyhow::Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading render config {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

fn run_plot(spec: JobSpec, config: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let cfg = load_render_config(config)?;
    if let Some(ref out) = spec.output {
        check_output_paths(&[out.as_path()], force)?;
    }
    let job = PlotJob::from_spec(&spec)?;
    if job.sources.is_empty() {
        bail!("no objects to plot");
    }
    let outcome = batch::execute(job, &cfg)?;
    for warning in &outcome.warnings {
        warn!("{}", warning);
    }
    info!(
        "plotted {} series{}",
        outcome.series,
        match outcome.reference {
            Some(ref r) => format!(" with ratios against {}", r),
            None => String::new(),
        }
    );
    Ok(())
}

fn run_batch(manifest: &Path, workers: usize, config: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let cfg = load_render_config(config)?;
    let manifest = BatchManifest::load(manifest)
        .with_context(|| format!("loading manifest {}", manifest.display()))?;
    let outputs: Vec<&Path> = manifest
        .jobs
        .iter()
        .filter_map(|j| j.output.as_deref())
        .collect();
    check_output_paths(&outputs, force)?;

    let results = batch::run_manifest(manifest, workers, &cfg);
    let mut failed = 0;
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(outcome) => {
                let target = outcome
                    .output
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string());
                println!("{}\tok\t{}\t{} series", index, target, outcome.series);
            }
            Err(e) => {
                failed += 1;
                println!("{}\tfailed\t{}", index, e);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} jobs failed", failed, results.len());
    }
    Ok(())
}

fn run_keys(file: &Path) -> anyhow::Result<()> {
    let parsed = binplot::keys::load(file).with_context(|| format!("reading {}", file.display()))?;
    for warning in &parsed.warnings {
        warn!("{}: {}", file.display(), warning);
    }
    println!("{}", serde_json::to_string_pretty(&parsed.plots)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let mut log_builder = env_logger::Builder::from_default_env();
    log_builder
        .filter_level(cli.log_level.to_level_filter())
        .format_module_path(false);
    if let Some(ref path) = cli.log_file {
        let file = if cli.append_log {
            std::fs::File::options().create(true).append(true).open(path)
        } else {
            std::fs::File::create(path)
        }
        .unwrap_or_else(|e| panic!("Could not open log file '{}': {}", path, e));
        log_builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    log_builder.init();

    let result = match cli.command {
        Commands::Plot {
            inputs,
            keys,
            plot,
            paths,
            out,
            no_ratio,
            config,
            force,
        } => {
            let spec = JobSpec {
                inputs,
                paths: paths.unwrap_or_default(),
                output: Some(out),
                ratio: !no_ratio,
                keys,
                plot,
            };
            run_plot(spec, config.as_deref(), force)
        }
        Commands::Batch {
            manifest,
            workers,
            config,
            force,
        } => run_batch(&manifest, workers, config.as_deref(), force),
        Commands::Keys { file } => run_keys(&file),
        Commands::Schema => {
            println!("{}", config::schema_json_pretty());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
