//! Aegis CLI
//!
//! Labels recorded matches into a training corpus and serves live macro
//! hints from a stream of game-state snapshots.

use aegis_lib::live::extract::extract_live_features;
use aegis_lib::live::hint::new_shared_hint;
use aegis_lib::live::ingest::watch_snapshots;
use aegis_lib::live::{
    new_shared_state, DeathTracker, Evaluator, HttpModel, LiveClock, LiveSnapshot,
};
use aegis_lib::offline::{build_dataset, DatasetOptions};
use aegis_lib::settings::{LiveSettings, Settings};
use aegis_lib::{classify, AegisError, Side};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aegis")]
#[command(about = "Macro tactical state labeling for match telemetry", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "aegis.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label raw match records into a CSV dataset
    Dataset {
        /// Directory of raw match JSON files
        #[arg(long)]
        raw: Option<PathBuf>,
        /// Output CSV path
        #[arg(long)]
        out: Option<PathBuf>,
        /// Seconds between labeled instants
        #[arg(long)]
        step: Option<u32>,
        /// Matches labeled in parallel
        #[arg(long)]
        workers: Option<usize>,
        /// Side the features are computed for
        #[arg(long)]
        side: Option<Side>,
    },
    /// Serve live hints from snapshot files dropped into a directory
    Live {
        /// Directory the game-state receiver writes snapshots into
        #[arg(long)]
        watch: Option<PathBuf>,
        /// Model inference endpoint
        #[arg(long)]
        model_url: Option<String>,
        /// Publish rule labels without asking the model
        #[arg(long)]
        no_model: bool,
        /// File each published hint is written to
        #[arg(long)]
        hint_file: Option<PathBuf>,
    },
    /// Write the effective configuration to the config path if it is missing
    Init,
    /// Print the features and rule label of one snapshot file
    Inspect {
        /// Snapshot JSON file
        snapshot: PathBuf,
        /// Side to evaluate for (defaults to the snapshot's own team)
        #[arg(long)]
        side: Option<Side>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = match Settings::load_or_default(&cli.config) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(
                config = %cli.config.display(),
                error = %error,
                "Failed to load config"
            );
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Dataset {
            raw,
            out,
            step,
            workers,
            side,
        } => {
            let mut options = DatasetOptions::from(&settings.dataset);
            options.raw_dir = raw.unwrap_or(options.raw_dir);
            options.out = out.unwrap_or(options.out);
            options.step_seconds = step.unwrap_or(options.step_seconds);
            options.workers = workers.unwrap_or(options.workers);
            options.own_side = side.unwrap_or(options.own_side);
            run_dataset(&options)
        }
        Commands::Live {
            watch,
            model_url,
            no_model,
            hint_file,
        } => {
            let mut live_settings = settings.live;
            if let Some(watch_dir) = watch {
                live_settings.watch_dir = watch_dir;
            }
            if let Some(model_url) = model_url {
                live_settings.model_url = model_url;
            }
            if no_model {
                live_settings.use_model = false;
            }
            if let Some(hint_path) = hint_file {
                live_settings.hint_path = hint_path;
                live_settings.write_hint_file = true;
            }
            run_live(live_settings)
        }
        Commands::Inspect { snapshot, side } => run_inspect(&snapshot, side),
        Commands::Init => run_init(&cli.config, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "Command failed");
            ExitCode::FAILURE
        }
    }
}

fn run_dataset(options: &DatasetOptions) -> aegis_lib::Result<()> {
    let report = build_dataset(options)?;
    tracing::info!(
        rows = report.rows,
        matches = report.matches,
        skipped = report.skipped,
        "Dataset complete"
    );
    Ok(())
}

fn run_live(live_settings: LiveSettings) -> aegis_lib::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve_live(live_settings))
}

async fn serve_live(live_settings: LiveSettings) -> aegis_lib::Result<()> {
    let clock = LiveClock::start();
    let state = new_shared_state(live_settings.death_buffer_capacity);
    let hint = new_shared_hint();

    let model = match live_settings.model_endpoint() {
        Some(url) => {
            tracing::info!(model_url = %url, "Using model service");
            Some(HttpModel::new(url, live_settings.model_timeout())?)
        }
        None => {
            tracing::info!("Model disabled, publishing rule labels");
            None
        }
    };

    let evaluator = Evaluator::new(state.clone(), hint, clock)
        .with_model(model, live_settings.model_timeout())
        .with_recent_window(live_settings.recent_window_seconds)
        .with_hint_file(live_settings.hint_file().map(Path::to_path_buf));

    let mut watch_task = tokio::spawn(watch_snapshots(
        live_settings.watch_dir.clone(),
        state,
        clock,
    ));
    let mut evaluator_task = tokio::spawn(evaluator.run(live_settings.tick_interval()));

    let outcome = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            signal.map_err(AegisError::from)
        }
        watch_result = &mut watch_task => {
            watch_result.map_err(AegisError::from).and_then(|result| result)
        }
        evaluator_result = &mut evaluator_task => {
            tracing::error!("Evaluator stopped, no further hints will be published");
            evaluator_result.map_err(AegisError::from)
        }
    };

    watch_task.abort();
    evaluator_task.abort();
    outcome
}

fn run_inspect(snapshot_path: &Path, side: Option<Side>) -> aegis_lib::Result<()> {
    let snapshot = LiveSnapshot::from_path(snapshot_path)?;
    let own_side = side.or(snapshot.own_team).unwrap_or(Side::Radiant);

    let mut tracker = DeathTracker::default();
    tracker.observe(&snapshot, 0.0);
    let features = extract_live_features(&snapshot, own_side, &tracker, 0.0, 0.0);

    let report = serde_json::json!({
        "side": own_side,
        "features": features.to_json_map(),
        "label": classify(&features),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_init(config_path: &Path, settings: &Settings) -> aegis_lib::Result<()> {
    if config_path.exists() {
        tracing::info!(config = %config_path.display(), "Config already exists");
        return Ok(());
    }

    settings.save(config_path)?;
    tracing::info!(config = %config_path.display(), "Config written");
    Ok(())
}
