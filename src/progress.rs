//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di dimensione.
//!
//! ## Componenti principali:
//! - `ProgressManager`: barra di progresso `indicatif` sui job di una task
//! - `SizeStats`: byte originali/risultanti di un job o della run intera
//! - `RunSummary`: riepilogo finale, emesso una sola volta per run
//!
//! ## Formato:
//! ```text
//! Filesize: 500 kB (50% reduction from 1000 kB)
//! Total Filesize: 2.7 kB (90% reduction from 3 kB)
//! Total Filesize: 0 kB (N/A from 0 kB)
//! ```
//!
//! Il rapporto è `result / original * 100` arrotondato a 2 decimali;
//! con `original == 0` il rapporto non è definito e viene stampato `N/A`.

use crate::utils::{kilobytes, round2};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Manages the progress bar of one task
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_jobs: u64) -> Self {
        let bar = ProgressBar::new(total_jobs);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that draws nothing
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    /// Advance by one finished job
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Direction of a size change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeChange {
    Reduction,
    Increase,
}

impl fmt::Display for SizeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reduction => f.write_str("reduction"),
            Self::Increase => f.write_str("increase"),
        }
    }
}

/// Byte counts before and after encoding
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeStats {
    pub original_bytes: u64,
    pub result_bytes: u64,
}

impl SizeStats {
    pub fn new(original_bytes: u64, result_bytes: u64) -> Self {
        Self { original_bytes, result_bytes }
    }

    pub fn add(&mut self, other: SizeStats) {
        self.original_bytes += other.original_bytes;
        self.result_bytes += other.result_bytes;
    }

    /// `result / original * 100`, two decimals; `None` when nothing was measured
    pub fn ratio_percent(&self) -> Option<f64> {
        if self.original_bytes == 0 {
            return None;
        }
        Some(round2(self.result_bytes as f64 / self.original_bytes as f64 * 100.0))
    }

    pub fn change(&self) -> Option<SizeChange> {
        if self.original_bytes == 0 {
            None
        } else if self.result_bytes <= self.original_bytes {
            Some(SizeChange::Reduction)
        } else {
            Some(SizeChange::Increase)
        }
    }

    pub fn original_kb(&self) -> f64 {
        kilobytes(self.original_bytes)
    }

    pub fn result_kb(&self) -> f64 {
        kilobytes(self.result_bytes)
    }

    /// `"<result> kB (<ratio>% <change> from <original> kB)"`
    pub fn describe(&self) -> String {
        match (self.ratio_percent(), self.change()) {
            (Some(ratio), Some(change)) => format!(
                "{} kB ({}% {} from {} kB)",
                self.result_kb(),
                ratio,
                change,
                self.original_kb()
            ),
            _ => format!("{} kB (N/A from {} kB)", self.result_kb(), self.original_kb()),
        }
    }
}

/// Final statistics of one run
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub totals: SizeStats,
    pub jobs: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn format_summary(&self) -> String {
        format!("Total Filesize: {}", self.totals.describe())
    }
}
