//! # FFmpeg Batch - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento e validazione del task file
//! - Risoluzione del binario ffmpeg e avvio di una run per task
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (task file, task, workers, etc.)
//! 2. Configura il logging (`RUST_LOG`, altrimenti INFO o DEBUG)
//! 3. Carica il task file e seleziona le task da eseguire
//! 4. Individua ffmpeg una sola volta
//! 5. Per ogni task: merge delle opzioni, espansione dei file, run
//!
//! ## Esempio di utilizzo:
//! ```bash
//! ffmpeg-batch tasks.json --task web --workers 8 --progress
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ffmpeg_batch::platform::PlatformCommands;
use ffmpeg_batch::progress::ProgressManager;
use ffmpeg_batch::{FfmpegEngine, JobRunner, JsonReporter, LogReporter, Reporter, TaskFile};

#[derive(Parser)]
#[command(name = "ffmpeg-batch")]
#[command(about = "Batch-transcode media files with ffmpeg")]
struct Args {
    /// JSON task file
    task_file: PathBuf,

    /// Task to run (repeatable); all tasks run when omitted
    #[arg(short, long)]
    task: Vec<String>,

    /// Number of parallel ffmpeg processes (overrides the task file)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Log the full ffmpeg command of every job
    #[arg(short, long)]
    debug: bool,

    /// Path to the ffmpeg binary
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Emit JSON events on stdout instead of human-readable logs
    #[arg(long)]
    json: bool,

    /// Show a progress bar per task
    #[arg(long)]
    progress: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!args.json)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Running on {}", PlatformCommands::system_info());

    if let Some(0) = args.workers {
        return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
    }

    let task_file = TaskFile::from_file(&args.task_file).await?;
    let selected = task_file.select_tasks(&args.task)?;
    if selected.is_empty() {
        info!("No tasks defined in {}", args.task_file.display());
        return Ok(());
    }

    let explicit = args.ffmpeg.as_deref().or(task_file.ffmpeg_path.as_deref());
    let engine = Arc::new(FfmpegEngine::locate(explicit)?);
    info!("Using ffmpeg at {}", engine.program().display());

    for name in selected {
        let task = &task_file.tasks[name];

        let mut options = task_file.effective_options(task);
        if args.debug {
            options.debug = true;
        }
        let jobs = task.jobs()?;
        let workers = args.workers.or(task.workers).unwrap_or(task_file.workers);

        let reporter: Arc<dyn Reporter> = if args.json {
            Arc::new(JsonReporter::new(name))
        } else if args.progress {
            Arc::new(LogReporter::with_progress(ProgressManager::new(jobs.len() as u64)))
        } else {
            Arc::new(LogReporter::new())
        };

        let runner = JobRunner::new(options, engine.clone(), reporter).with_workers(workers);
        info!("Task `{}`: {} files, {} workers", name, jobs.len(), runner.workers());
        runner.run(jobs).await?;
    }

    Ok(())
}
