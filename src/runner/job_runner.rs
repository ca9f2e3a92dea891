//! # Job Runner
//!
//! Orchestratore di una run: distribuisce i job in ordine su un pool di
//! worker limitato da un semaforo e, dopo il join di tutti i job, emette il
//! riepilogo una sola volta.
//!
//! ## Per ogni job:
//! 1. Input inesistente → skip riportato, nessuna invocazione di FFmpeg
//! 2. Destinazione inesistente → placeholder vuoto (directory incluse)
//! 3. Transcodifica tramite `TranscodeStep`
//!
//! Nessun errore di un job interrompe la run.

use crate::config::{EffectiveOptions, DEFAULT_WORKERS};
use crate::engine::Engine;
use crate::error::TranscodeError;
use crate::file_manager::FileManager;
use crate::progress::RunSummary;
use crate::runner::reporter::Reporter;
use crate::runner::size_tracker::SizeTracker;
use crate::runner::transcode_step::TranscodeStep;
use crate::runner::{Job, JobOutcome};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error};

/// Everything a run produced, outcomes in job order
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<JobOutcome>,
    pub summary: RunSummary,
}

/// Runs a batch of jobs with bounded concurrency
pub struct JobRunner {
    options: Arc<EffectiveOptions>,
    engine: Arc<dyn Engine>,
    reporter: Arc<dyn Reporter>,
    workers: usize,
}

impl JobRunner {
    pub fn new(
        options: EffectiveOptions,
        engine: Arc<dyn Engine>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            options: Arc::new(options),
            engine,
            reporter,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Maximum number of jobs in flight (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every job, then report the summary once
    pub async fn run(&self, jobs: Vec<Job>) -> Result<RunReport, TranscodeError> {
        let tracker = SizeTracker::new();
        let step = TranscodeStep::new(
            self.options.clone(),
            self.engine.clone(),
            tracker.clone(),
            self.reporter.clone(),
        );
        debug!("Running {} jobs with {} workers", jobs.len(), self.workers);

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.iter().cloned().enumerate() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| TranscodeError::Engine(format!("worker pool closed: {}", e)))?;
            let step = step.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = permit; // released when the job ends
                dispatch(&step, index, &job).await
            }));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (index, result) in futures::future::join_all(tasks).await.into_iter().enumerate() {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Job {} ({}) aborted: {}", index, jobs[index].input.display(), e);
                    JobOutcome::Failed(e.to_string())
                }
            };
            outcomes.push(outcome);
        }

        let summary = RunSummary {
            totals: tracker.totals().await,
            jobs: outcomes.len(),
            completed: outcomes.iter().filter(|o| matches!(o, JobOutcome::Completed(_))).count(),
            skipped: outcomes.iter().filter(|o| matches!(o, JobOutcome::Skipped)).count(),
            failed: outcomes.iter().filter(|o| matches!(o, JobOutcome::Failed(_))).count(),
        };
        self.reporter.summary(&summary);

        Ok(RunReport { outcomes, summary })
    }
}

async fn dispatch(step: &TranscodeStep, index: usize, job: &Job) -> JobOutcome {
    if !FileManager::exists(&job.input).await {
        step.reporter().skipped(index, &job.input);
        return JobOutcome::Skipped;
    }

    if let Err(e) = FileManager::ensure_placeholder(&job.output).await {
        step.reporter().failed(index, job, &e);
        return JobOutcome::Failed(e.to_string());
    }

    step.run(index, job).await
}
