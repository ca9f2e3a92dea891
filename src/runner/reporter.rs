//! # Reporting Module
//!
//! Destinazione dei messaggi di una run, passata esplicitamente al runner e
//! a ogni step al posto di un logger globale.
//!
//! - `LogReporter`: righe leggibili via `tracing`, barra `indicatif` opzionale
//! - `JsonReporter`: una riga JSON per evento su stdout

use crate::error::TranscodeError;
use crate::json_output::JsonMessage;
use crate::progress::{ProgressManager, RunSummary, SizeStats};
use crate::runner::Job;
use std::path::Path;
use tracing::{error, info, warn};

/// Sink for everything a run reports
pub trait Reporter: Send + Sync {
    /// Input missing, job skipped
    fn skipped(&self, index: usize, input: &Path);
    /// Full engine command line, only reported in debug mode
    fn command(&self, index: usize, command_line: &str);
    fn completed(&self, index: usize, job: &Job, stats: &SizeStats);
    fn failed(&self, index: usize, job: &Job, error: &TranscodeError);
    /// Called exactly once per run, after every job finished
    fn summary(&self, summary: &RunSummary);
}

/// Human-readable output through `tracing`
#[derive(Clone, Default)]
pub struct LogReporter {
    progress: Option<ProgressManager>,
}

impl LogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: ProgressManager) -> Self {
        Self { progress: Some(progress) }
    }

    fn advance(&self, message: String) {
        if let Some(ref progress) = self.progress {
            progress.update(&message);
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap_or_default().to_string_lossy().to_string()
}

impl Reporter for LogReporter {
    fn skipped(&self, index: usize, input: &Path) {
        warn!("{}. input file not found: {}", index, input.display());
        self.advance(format!("[SKIP] {}", file_name(input)));
    }

    fn command(&self, _index: usize, command_line: &str) {
        info!("FFmpeg command: {}", command_line);
    }

    fn completed(&self, _index: usize, job: &Job, stats: &SizeStats) {
        info!(" ✓ {} » {}", job.input.display(), job.output.display());
        info!("   Filesize: {}", stats.describe());
        self.advance(format!("[OK] {}", file_name(&job.output)));
    }

    fn failed(&self, _index: usize, job: &Job, err: &TranscodeError) {
        error!(
            "An error occurred: {} [{} -> {}]",
            err,
            job.input.display(),
            job.output.display()
        );
        self.advance(format!("[ERROR] {}", file_name(&job.input)));
    }

    fn summary(&self, summary: &RunSummary) {
        let line = summary.format_summary();
        if let Some(ref progress) = self.progress {
            progress.finish(&line);
        }
        info!("{}", line);
    }
}

/// One JSON object per line on stdout
#[derive(Debug, Clone)]
pub struct JsonReporter {
    task: String,
}

impl JsonReporter {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

impl Reporter for JsonReporter {
    fn skipped(&self, index: usize, input: &Path) {
        JsonMessage::Skip {
            task: self.task.clone(),
            index,
            input: input.to_path_buf(),
        }
        .emit();
    }

    fn command(&self, index: usize, command_line: &str) {
        JsonMessage::Command {
            task: self.task.clone(),
            index,
            command_line: command_line.to_string(),
        }
        .emit();
    }

    fn completed(&self, index: usize, job: &Job, stats: &SizeStats) {
        JsonMessage::file_complete(
            &self.task,
            index,
            job.input.clone(),
            job.output.clone(),
            stats,
        )
        .emit();
    }

    fn failed(&self, index: usize, job: &Job, err: &TranscodeError) {
        JsonMessage::FileError {
            task: self.task.clone(),
            index,
            input: job.input.clone(),
            output: job.output.clone(),
            message: err.to_string(),
        }
        .emit();
    }

    fn summary(&self, summary: &RunSummary) {
        JsonMessage::summary(&self.task, summary).emit();
    }
}
