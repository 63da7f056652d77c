use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{AegisError, Result};
use crate::label::MacroLabel;
use crate::offline::record::MatchRecord;
use crate::offline::sequencer::{label_match, LabeledRow};
use crate::settings::DatasetSettings;
use crate::Side;

#[derive(Debug, Clone)]
pub struct DatasetOptions {
    pub raw_dir: PathBuf,
    pub out: PathBuf,
    pub step_seconds: u32,
    pub workers: usize,
    pub own_side: Side,
}

impl From<&DatasetSettings> for DatasetOptions {
    fn from(settings: &DatasetSettings) -> Self {
        Self {
            raw_dir: settings.raw_dir.clone(),
            out: settings.out.clone(),
            step_seconds: settings.step_seconds,
            workers: settings.workers,
            own_side: settings.own_side,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatasetReport {
    pub rows: usize,
    pub matches: usize,
    pub skipped: usize,
    pub label_counts: BTreeMap<MacroLabel, usize>,
}

type MatchOutcome = (PathBuf, Result<Vec<LabeledRow>>);

pub fn build_dataset(options: &DatasetOptions) -> Result<DatasetReport> {
    if options.step_seconds == 0 {
        return Err(AegisError::InvalidStep);
    }

    let match_paths = list_match_files(&options.raw_dir)?;
    tracing::info!(
        raw_dir = %options.raw_dir.display(),
        files = match_paths.len(),
        step_seconds = options.step_seconds,
        workers = options.workers,
        own_side = %options.own_side,
        "Labeling matches"
    );

    let outcomes = label_files(
        &match_paths,
        options.step_seconds,
        options.own_side,
        options.workers,
    )?;

    let mut report = DatasetReport::default();
    let mut rows = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(match_rows) => {
                report.matches += 1;
                rows.extend(match_rows);
            }
            Err(error) => {
                report.skipped += 1;
                tracing::warn!(
                    file = %display_name(&path),
                    error = %error,
                    "Skipping match"
                );
            }
        }
    }

    if rows.is_empty() {
        return Err(AegisError::EmptyDataset {
            raw_dir: options.raw_dir.clone(),
            skipped: report.skipped,
        });
    }

    for row in &rows {
        *report.label_counts.entry(row.label).or_insert(0) += 1;
    }
    report.rows = rows.len();

    if let Some(parent_directory) = options.out.parent() {
        if !parent_directory.as_os_str().is_empty() {
            std::fs::create_dir_all(parent_directory)?;
        }
    }
    let file = std::fs::File::create(&options.out)?;
    write_rows_csv(std::io::BufWriter::new(file), &rows)?;

    for (label, count) in &report.label_counts {
        tracing::info!(label = %label, count, "Label balance");
    }
    tracing::info!(
        out = %options.out.display(),
        rows = report.rows,
        matches = report.matches,
        skipped = report.skipped,
        "Dataset saved"
    );

    Ok(report)
}

// Sorted so repeated runs see matches in the same order.
pub fn list_match_files(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let directory_entries = match std::fs::read_dir(raw_dir) {
        Ok(entries) => entries,
        Err(error) => {
            if raw_dir.exists() {
                return Err(error.into());
            }
            return Ok(Vec::new());
        }
    };

    let mut match_paths = Vec::new();
    for entry_result in directory_entries {
        let path = entry_result?.path();
        if path.is_file() && is_json_file(&path) {
            match_paths.push(path);
        }
    }
    match_paths.sort();

    Ok(match_paths)
}

pub(crate) fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn label_file(path: &Path, step_seconds: u32, own_side: Side) -> Result<Vec<LabeledRow>> {
    let record = MatchRecord::from_path(path)?;
    label_match(&record, step_seconds, own_side)
}

fn label_files(
    paths: &[PathBuf],
    step_seconds: u32,
    own_side: Side,
    workers: usize,
) -> Result<Vec<MatchOutcome>> {
    let label_one = |path: &PathBuf| (path.clone(), label_file(path, step_seconds, own_side));

    if workers <= 1 || paths.len() <= 1 {
        return Ok(paths.iter().map(label_one).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    Ok(pool.install(|| paths.par_iter().map(label_one).collect()))
}

pub fn write_rows_csv<W: Write>(writer: W, rows: &[LabeledRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(LabeledRow::csv_header())?;
    for row in rows {
        csv_writer.write_record(row.csv_record())?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
