//! # Runner Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `job_runner`: orchestratore della run con concorrenza limitata
//! - `transcode_step`: worker per il singolo job
//! - `profile_resolver`: default per estensione di output
//! - `size_tracker`: accumulatore delle dimensioni
//! - `reporter`: destinazione dei messaggi (log o JSON)

pub mod job_runner;
pub mod profile_resolver;
pub mod reporter;
pub mod size_tracker;
pub mod transcode_step;

pub use job_runner::{JobRunner, RunReport};
pub use profile_resolver::FormatProfile;
pub use reporter::{JsonReporter, LogReporter, Reporter};
pub use size_tracker::SizeTracker;
pub use transcode_step::TranscodeStep;

use crate::progress::SizeStats;
use std::path::PathBuf;

/// One input/output pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// How a job ended
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Input missing, engine never invoked
    Skipped,
    Completed(SizeStats),
    /// Engine or filesystem error message
    Failed(String),
}
