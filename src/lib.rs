//! # FFmpeg Batch Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Task file, opzioni e merge dei default
//! - `engine`: Comando FFmpeg, capability, parsing dei codec e processo esterno
//! - `error`: Tipi di errore custom
//! - `file_manager`: Esistenza, dimensioni, placeholder ed espansione dei file
//! - `hooks`: Callback opzionali del ciclo di vita di un job
//! - `runner`: Orchestratore della run e step di transcodifica
//! - `progress`: Statistiche di dimensione e riepilogo
//! - `json_output`: Eventi JSON per consumatori esterni
//! - `platform`: Ricerca del binario ffmpeg
//!
//! ## Utilizzo:
//! ```ignore
//! use ffmpeg_batch::{EffectiveOptions, FfmpegEngine, Job, JobRunner, LogReporter};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(FfmpegEngine::locate(None)?);
//! let runner = JobRunner::new(EffectiveOptions::default(), engine, Arc::new(LogReporter::new()));
//! let report = runner.run(vec![Job::new("in.mov", "out.mp4")]).await?;
//! println!("{}", report.summary.format_summary());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod file_manager;
pub mod hooks;
pub mod json_output;
pub mod platform;
pub mod progress;
pub mod runner;
pub mod utils;

pub use config::{EffectiveOptions, TaskConfig, TaskFile, TaskOptions};
pub use engine::{Engine, EngineCommand, EngineEvent, FfmpegEngine};
pub use error::TranscodeError;
pub use hooks::Hooks;
pub use progress::{RunSummary, SizeStats};
pub use runner::{Job, JobOutcome, JobRunner, JsonReporter, LogReporter, Reporter, RunReport};
