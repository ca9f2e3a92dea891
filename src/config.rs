//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `TaskFile`, il documento JSON con default globali e task
//! - Definisce `TaskOptions`, le opzioni (tutte opzionali) di una task
//! - Unisce default globali e opzioni della task in `EffectiveOptions`
//! - Converte le voci `files` di una task nella lista di `Job`
//!
//! ## Regole di merge:
//! - Scalari (bitrate, size, canali, debug, hook): valore della task, poi
//!   default globale, poi default built-in (`128k`, `2`, `false`)
//! - `engine_overrides`: unione shallow delle chiavi, vince la task
//!
//! ## Esempio di task file:
//! ```json
//! {
//!   "options": { "audio_bitrate": "96k" },
//!   "tasks": {
//!     "web": {
//!       "options": { "engine_overrides": { "fps": 25 } },
//!       "files": [{ "src": "in/a.mov", "dest": "out/a.mp4" }]
//!     }
//!   }
//! }
//! ```

use crate::error::TranscodeError;
use crate::file_manager::FileManager;
use crate::hooks::Hooks;
use crate::runner::Job;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Audio bitrate applied when neither the task nor the defaults set one
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Audio channel count applied when neither the task nor the defaults set one
pub const DEFAULT_AUDIO_CHANNELS: u32 = 2;
/// Jobs in flight at the same time when nothing else is configured
pub const DEFAULT_WORKERS: usize = 4;

/// Options of a task, or the global defaults shared by every task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskOptions {
    #[serde(alias = "videoBitrate")]
    pub video_bitrate: Option<String>,
    #[serde(alias = "audioBitrate")]
    pub audio_bitrate: Option<String>,
    #[serde(alias = "audioChannels")]
    pub audio_channels: Option<u32>,
    pub size: Option<String>,
    /// Capability name -> value, applied after format defaults
    #[serde(alias = "engineOverrides", alias = "FFmpegOptions")]
    pub engine_overrides: BTreeMap<String, Value>,
    pub debug: Option<bool>,
    #[serde(skip)]
    pub hooks: Hooks,
}

impl TaskOptions {
    pub fn validate(&self) -> Result<(), TranscodeError> {
        if self.audio_channels == Some(0) {
            return Err(TranscodeError::Config(
                "audio_channels must be greater than 0".to_string(),
            ));
        }
        let scalars = [
            ("video_bitrate", &self.video_bitrate),
            ("audio_bitrate", &self.audio_bitrate),
            ("size", &self.size),
        ];
        for (name, value) in scalars {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(TranscodeError::Config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

/// Options actually used for one run
#[derive(Debug, Clone)]
pub struct EffectiveOptions {
    pub video_bitrate: Option<String>,
    pub audio_bitrate: String,
    pub audio_channels: u32,
    pub size: Option<String>,
    pub engine_overrides: BTreeMap<String, Value>,
    pub hooks: Hooks,
    pub debug: bool,
}

impl Default for EffectiveOptions {
    fn default() -> Self {
        Self::merge(None, &TaskOptions::default())
    }
}

impl EffectiveOptions {
    /// Merges global defaults with the options of one task.
    pub fn merge(defaults: Option<&TaskOptions>, task: &TaskOptions) -> Self {
        let empty = TaskOptions::default();
        let defaults = defaults.unwrap_or(&empty);

        let mut engine_overrides = defaults.engine_overrides.clone();
        engine_overrides.extend(task.engine_overrides.clone());

        Self {
            video_bitrate: task.video_bitrate.clone().or_else(|| defaults.video_bitrate.clone()),
            audio_bitrate: task
                .audio_bitrate
                .clone()
                .or_else(|| defaults.audio_bitrate.clone())
                .unwrap_or_else(|| DEFAULT_AUDIO_BITRATE.to_string()),
            audio_channels: task
                .audio_channels
                .or(defaults.audio_channels)
                .unwrap_or(DEFAULT_AUDIO_CHANNELS),
            size: task.size.clone().or_else(|| defaults.size.clone()),
            engine_overrides,
            hooks: task.hooks.or(&defaults.hooks),
            debug: task.debug.or(defaults.debug).unwrap_or(false),
        }
    }
}

/// Source of a file pair: one path, or a list of which only the first is used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SourceSpec {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl SourceSpec {
    /// Path handed to the job; an empty list yields an empty path that never exists
    pub fn first(&self) -> PathBuf {
        match self {
            Self::One(path) => path.clone(),
            Self::Many(paths) => paths.first().cloned().unwrap_or_default(),
        }
    }
}

/// One entry of a task's `files` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileMapping {
    /// Explicit source/destination pair
    Pair { src: SourceSpec, dest: PathBuf },
    /// Every matching file under `cwd`, mirrored under `dest`
    Expand {
        cwd: PathBuf,
        dest: PathBuf,
        #[serde(default)]
        ext: Option<String>,
        #[serde(default)]
        extensions: Vec<String>,
    },
}

/// A named task: options plus the files it transcodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub options: TaskOptions,
    #[serde(default)]
    pub files: Vec<FileMapping>,
    /// Per-task override of the global worker count
    #[serde(default)]
    pub workers: Option<usize>,
}

impl TaskConfig {
    /// Expands the `files` list into jobs, keeping declaration order
    pub fn jobs(&self) -> Result<Vec<Job>, TranscodeError> {
        let mut jobs = Vec::new();
        for mapping in &self.files {
            match mapping {
                FileMapping::Pair { src, dest } => jobs.push(Job::new(src.first(), dest.clone())),
                FileMapping::Expand { cwd, dest, ext, extensions } => {
                    jobs.extend(FileManager::expand(cwd, dest, ext.as_deref(), extensions)?);
                }
            }
        }
        Ok(jobs)
    }
}

/// The task file: global defaults and named tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFile {
    /// Defaults shared by every task
    #[serde(default)]
    pub options: Option<TaskOptions>,
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,
    /// Concurrency bound for every task without its own `workers`
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Explicit ffmpeg binary
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for TaskFile {
    fn default() -> Self {
        Self {
            options: None,
            tasks: BTreeMap::new(),
            workers: DEFAULT_WORKERS,
            ffmpeg_path: None,
        }
    }
}

impl TaskFile {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), TranscodeError> {
        if self.workers == 0 {
            return Err(TranscodeError::Config(
                "Number of workers must be greater than 0".to_string(),
            ));
        }
        if let Some(ref options) = self.options {
            options.validate()?;
        }
        for (name, task) in &self.tasks {
            task.options
                .validate()
                .map_err(|e| TranscodeError::Config(format!("task `{}`: {}", name, e)))?;
            if task.workers == Some(0) {
                return Err(TranscodeError::Config(format!(
                    "task `{}`: workers must be greater than 0",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Names of the tasks to run: the requested ones, or all of them in name order
    pub fn select_tasks<'a>(
        &'a self,
        requested: &'a [String],
    ) -> Result<Vec<&'a str>, TranscodeError> {
        if requested.is_empty() {
            return Ok(self.tasks.keys().map(String::as_str).collect());
        }
        requested
            .iter()
            .map(|name| {
                if self.tasks.contains_key(name) {
                    Ok(name.as_str())
                } else {
                    Err(TranscodeError::Config(format!("unknown task `{}`", name)))
                }
            })
            .collect()
    }

    /// Effective options of one task
    pub fn effective_options(&self, task: &TaskConfig) -> EffectiveOptions {
        EffectiveOptions::merge(self.options.as_ref(), &task.options)
    }

    /// Load a task file from disk
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read task file {}", path.display()))?;
        let task_file: TaskFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse task file {}", path.display()))?;
        task_file.validate()?;
        Ok(task_file)
    }

    /// Save the task file (hooks are not serialized)
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
