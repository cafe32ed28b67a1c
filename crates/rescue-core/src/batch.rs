//! Batch driver: relocate, then transform, for every configured target
//!
//! Failures are isolated per file. Whatever goes wrong with one file is
//! logged, recorded in the [`BatchReport`], and the run moves on to the next
//! file and the next target. A run never aborts.

use crate::config::{BatchConfig, FileTarget};
use crate::error::{Error, ErrorCategory};
use crate::relocator::move_all;
use crate::scanner::list_csv_files;
use crate::transform::transform_in_place;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Where in the pipeline a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Listing a directory
    Scan,
    /// Moving a file into the destination
    Move,
    /// Rewriting a file
    Transform,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Scan => write!(f, "scan"),
            Stage::Move => write!(f, "move"),
            Stage::Transform => write!(f, "transform"),
        }
    }
}

/// A single recorded failure
#[derive(Debug, Serialize)]
pub struct FileFailure {
    /// File (or directory, for scan failures) concerned
    pub path: PathBuf,
    /// Pipeline stage
    pub stage: Stage,
    /// Coarse error category
    pub category: ErrorCategory,
    /// The error itself
    #[serde(serialize_with = "serialize_error")]
    pub error: Error,
}

impl FileFailure {
    fn new(path: PathBuf, stage: Stage, error: Error) -> Self {
        Self {
            path,
            stage,
            category: error.category(),
            error,
        }
    }
}

fn serialize_error<S: Serializer>(error: &Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Counts and failures for one target
#[derive(Debug, Serialize)]
pub struct TargetReport {
    /// Target name
    pub name: String,
    /// Target label
    pub label: String,
    /// CSV files found in the source directory
    pub source_listed: usize,
    /// Files moved into the destination
    pub moved: usize,
    /// CSV files found in the destination
    pub listed: usize,
    /// Files rewritten successfully
    pub transformed: usize,
    /// Cells replaced across all transformed files
    pub replacements: usize,
    /// Everything that went wrong
    pub failures: Vec<FileFailure>,
}

impl TargetReport {
    fn new(target: &FileTarget) -> Self {
        Self {
            name: target.name.clone(),
            label: target.label.clone(),
            source_listed: 0,
            moved: 0,
            listed: 0,
            transformed: 0,
            replacements: 0,
            failures: Vec::new(),
        }
    }

    /// Number of failures
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn record(&mut self, path: PathBuf, stage: Stage, error: Error) {
        tracing::warn!(
            target_name = %self.name,
            stage = %stage,
            file = %path.display(),
            error = %error,
            "failed"
        );
        self.failures.push(FileFailure::new(path, stage, error));
    }
}

/// Outcome of a whole batch
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// One report per target, in configured order
    pub targets: Vec<TargetReport>,
}

impl BatchReport {
    /// Files moved across all targets
    pub fn total_moved(&self) -> usize {
        self.targets.iter().map(|t| t.moved).sum()
    }

    /// Files transformed across all targets
    pub fn total_transformed(&self) -> usize {
        self.targets.iter().map(|t| t.transformed).sum()
    }

    /// Cells replaced across all targets
    pub fn total_replacements(&self) -> usize {
        self.targets.iter().map(|t| t.replacements).sum()
    }

    /// Failures across all targets
    pub fn total_failed(&self) -> usize {
        self.targets.iter().map(TargetReport::failed).sum()
    }

    /// Whether every file went through
    pub fn is_clean(&self) -> bool {
        self.total_failed() == 0
    }

    /// Iterate over every failure with its target name
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FileFailure)> + '_ {
        self.targets
            .iter()
            .flat_map(|t| t.failures.iter().map(move |f| (t.name.as_str(), f)))
    }
}

/// Runs a [`BatchConfig`]
#[derive(Debug, Clone)]
pub struct BatchDriver {
    config: BatchConfig,
}

impl BatchDriver {
    /// Create a driver for an already-resolved config
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Process every target in order
    pub fn run(&self) -> BatchReport {
        let started_at = Utc::now();
        tracing::info!(targets = self.config.targets.len(), "starting batch");

        let targets = self.config.targets.iter().map(run_target).collect();

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            targets,
        };

        tracing::info!(
            moved = report.total_moved(),
            transformed = report.total_transformed(),
            failed = report.total_failed(),
            "batch complete"
        );
        report
    }
}

fn run_target(target: &FileTarget) -> TargetReport {
    let mut report = TargetReport::new(target);
    tracing::info!(target_name = %target.name, "--- {} ---", target.label);

    if let Some(source_dir) = &target.source_dir {
        relocate(target, source_dir, &mut report);
    }

    let files = match list_csv_files(&target.dest_dir) {
        Ok(files) => files,
        Err(e) => {
            report.record(target.dest_dir.clone(), Stage::Scan, e);
            return report;
        }
    };
    report.listed = files.len();

    if files.is_empty() {
        tracing::info!(dir = %target.dest_dir.display(), "no CSV files to process");
        return report;
    }

    let rule = target.rule();
    for file in files {
        tracing::info!(file = %file.display(), "processing");
        match transform_in_place(&file, &rule, target.encoding) {
            Ok(outcome) => {
                tracing::info!(
                    file = %file.display(),
                    replacements = outcome.replacements,
                    "transformed"
                );
                report.transformed += 1;
                report.replacements += outcome.replacements;
            }
            Err(e) => report.record(file, Stage::Transform, e),
        }
    }

    report
}

fn relocate(target: &FileTarget, source_dir: &Path, report: &mut TargetReport) {
    let files = match list_csv_files(source_dir) {
        Ok(files) => files,
        Err(e) => {
            report.record(source_dir.to_path_buf(), Stage::Scan, e);
            return;
        }
    };
    report.source_listed = files.len();

    if files.is_empty() {
        tracing::info!(dir = %source_dir.display(), "nothing to relocate");
        return;
    }

    let outcomes = match move_all(&files, &target.dest_dir, target.collision) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            report.record(target.dest_dir.clone(), Stage::Move, e);
            return;
        }
    };

    for outcome in outcomes {
        match outcome.result {
            Ok(dest) => {
                tracing::info!(from = %outcome.source.display(), to = %dest.display(), "moved");
                report.moved += 1;
            }
            Err(e) => report.record(outcome.source, Stage::Move, e),
        }
    }
}
