//! # Transcode Step Module
//!
//! Worker per la transcodifica di una singola coppia input/output.
//!
//! ## Costruzione del comando (in quest'ordine, l'ultimo vince):
//! 1. Baseline: bitrate e canali audio
//! 2. Profilo del formato di output (`.mp4`, `.webm`, `.mp3`)
//! 3. Scalari espliciti: video bitrate, audio bitrate, size
//! 4. `engine_overrides` mappati sulle `Capability` (chiavi ignote ignorate)
//! 5. Per output `.mp3` la frequenza audio viene sempre rimossa
//!
//! ## Esito:
//! - Successo: dimensioni prima/dopo, report, accumulo, hook `on_end`
//! - Errore: report con input/output, hook `on_error`, nessun accumulo

use crate::config::EffectiveOptions;
use crate::engine::{Capability, Engine, EngineCommand, EngineEvent, SizeSpec};
use crate::error::TranscodeError;
use crate::file_manager::FileManager;
use crate::progress::SizeStats;
use crate::runner::profile_resolver::{output_extension, FormatProfile};
use crate::runner::reporter::Reporter;
use crate::runner::size_tracker::SizeTracker;
use crate::runner::{Job, JobOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs one job through the engine
#[derive(Clone)]
pub struct TranscodeStep {
    options: Arc<EffectiveOptions>,
    engine: Arc<dyn Engine>,
    tracker: SizeTracker,
    reporter: Arc<dyn Reporter>,
}

impl TranscodeStep {
    pub fn new(
        options: Arc<EffectiveOptions>,
        engine: Arc<dyn Engine>,
        tracker: SizeTracker,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            options,
            engine,
            tracker,
            reporter,
        }
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// Builds the engine invocation for a job
    pub fn build_command(&self, job: &Job) -> EngineCommand {
        build_command(&self.options, job)
    }

    /// Transcodes one job and reports the result
    pub async fn run(&self, index: usize, job: &Job) -> JobOutcome {
        let command = self.build_command(job);
        let options = &self.options;
        let reporter = &self.reporter;

        let on_event = |event: EngineEvent| match event {
            EngineEvent::Start { command_line } => {
                if options.debug {
                    reporter.command(index, &command_line);
                }
                if let Some(ref hook) = options.hooks.on_start {
                    hook(&command_line);
                }
            }
            EngineEvent::CodecData(data) => {
                debug!("Codec data for {}: {:?}", job.input.display(), data);
                if let Some(ref hook) = options.hooks.on_codec_data {
                    hook(&data, &job.input);
                }
            }
        };

        let result = match self.engine.run(&command, &on_event).await {
            Ok(()) => self.measure(job).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(stats) => {
                self.reporter.completed(index, job, &stats);
                self.tracker.add(stats).await;
                if let Some(ref hook) = self.options.hooks.on_end {
                    hook(&job.input, &job.output);
                }
                JobOutcome::Completed(stats)
            }
            Err(e) => {
                self.reporter.failed(index, job, &e);
                if let Some(ref hook) = self.options.hooks.on_error {
                    hook(&e, &job.input, &job.output);
                }
                JobOutcome::Failed(e.to_string())
            }
        }
    }

    async fn measure(&self, job: &Job) -> Result<SizeStats, TranscodeError> {
        let original = FileManager::file_size(&job.input).await?;
        let result = FileManager::file_size(&job.output).await?;
        Ok(SizeStats::new(original, result))
    }
}

fn build_command(options: &EffectiveOptions, job: &Job) -> EngineCommand {
    let mut command = EngineCommand::new(job.input.clone(), job.output.clone());
    command
        .with_audio_bitrate(crate::config::DEFAULT_AUDIO_BITRATE)
        .with_audio_channels(options.audio_channels);

    let profile = FormatProfile::for_output(&job.output);
    if profile.is_empty() {
        debug!("No format defaults for {}", job.output.display());
    } else {
        command.apply_profile(&profile);
    }

    if let Some(ref bitrate) = options.video_bitrate {
        command.with_video_bitrate(bitrate.clone());
    }
    command.with_audio_bitrate(options.audio_bitrate.clone());
    if let Some(ref size) = options.size {
        match size.parse::<SizeSpec>() {
            Ok(spec) => {
                command.with_size(spec);
            }
            Err(e) => warn!("Ignoring size for {}: {}", job.output.display(), e),
        }
    }

    for (key, value) in &options.engine_overrides {
        let applied = key
            .parse::<Capability>()
            .and_then(|capability| capability.apply(&mut command, value));
        if let Err(reason) = applied {
            warn!("Ignoring engine override `{}`: {}", key, reason);
        }
    }

    // ffmpeg rejects an explicit audio frequency for mp3 output
    if output_extension(&job.output) == Some(".mp3") {
        command.clear_audio_frequency();
    }

    command
}
