//! End-to-end runs through the public API with a fake engine standing in for ffmpeg.

use async_trait::async_trait;
use ffmpeg_batch::engine::{CodecData, EngineCommand, EngineEvent};
use ffmpeg_batch::{
    EffectiveOptions, Engine, Hooks, Job, JobOutcome, JobRunner, Reporter, RunSummary, SizeStats,
    TaskFile, TaskOptions, TranscodeError,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Writes a configurable number of bytes per output, or fails for chosen inputs
#[derive(Default)]
struct FakeEngine {
    result_sizes: HashMap<PathBuf, usize>,
    failing: Vec<PathBuf>,
    commands: Mutex<Vec<Vec<String>>>,
    calls: AtomicUsize,
}

impl FakeEngine {
    fn writing(mut self, output: &Path, bytes: usize) -> Self {
        self.result_sizes.insert(output.to_path_buf(), bytes);
        self
    }

    fn failing_on(mut self, input: &Path) -> Self {
        self.failing.push(input.to_path_buf());
        self
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn run(
        &self,
        command: &EngineCommand,
        on_event: &(dyn Fn(EngineEvent) + Send + Sync),
    ) -> Result<(), TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.commands.lock().unwrap().push(command.args());
        on_event(EngineEvent::Start {
            command_line: command.command_line(Path::new("ffmpeg")),
        });
        on_event(EngineEvent::CodecData(CodecData {
            format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
            ..Default::default()
        }));

        if self.failing.iter().any(|p| p == command.input()) {
            return Err(TranscodeError::Engine(
                "ffmpeg exited with code 1: Invalid data found when processing input".to_string(),
            ));
        }
        let bytes = self.result_sizes.get(command.output()).copied().unwrap_or(0);
        tokio::fs::write(command.output(), vec![1u8; bytes]).await?;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingReporter {
    skipped: Mutex<Vec<(usize, PathBuf)>>,
    commands: Mutex<Vec<String>>,
    completed: Mutex<Vec<(usize, SizeStats)>>,
    failed: Mutex<Vec<(usize, String)>>,
    summaries: Mutex<Vec<RunSummary>>,
}

impl Reporter for RecordingReporter {
    fn skipped(&self, index: usize, input: &Path) {
        self.skipped.lock().unwrap().push((index, input.to_path_buf()));
    }

    fn command(&self, _index: usize, command_line: &str) {
        self.commands.lock().unwrap().push(command_line.to_string());
    }

    fn completed(&self, index: usize, _job: &Job, stats: &SizeStats) {
        self.completed.lock().unwrap().push((index, *stats));
    }

    fn failed(&self, index: usize, _job: &Job, error: &TranscodeError) {
        self.failed.lock().unwrap().push((index, error.to_string()));
    }

    fn summary(&self, summary: &RunSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }
}

fn write_input(dir: &Path, name: &str, bytes: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0u8; bytes]).unwrap();
    path
}

#[tokio::test]
async fn missing_input_is_skipped_and_valid_one_is_transcoded() {
    let temp_dir = TempDir::new().unwrap();
    let valid = write_input(temp_dir.path(), "b.mov", 1000);
    let missing = temp_dir.path().join("a.mov");
    let out_a = temp_dir.path().join("out/a.mp4");
    let out_b = temp_dir.path().join("out/b.mp4");

    let engine = Arc::new(FakeEngine::default().writing(&out_b, 500));
    let reporter = Arc::new(RecordingReporter::default());
    let jobs = vec![Job::new(missing.clone(), out_a.clone()), Job::new(valid, out_b.clone())];

    let report = JobRunner::new(EffectiveOptions::default(), engine.clone(), reporter.clone())
        .run(jobs)
        .await
        .unwrap();

    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*reporter.skipped.lock().unwrap(), vec![(0, missing)]);
    assert!(!out_a.exists());
    assert_eq!(std::fs::metadata(&out_b).unwrap().len(), 500);
    assert_eq!(report.outcomes[0], JobOutcome::Skipped);
    assert_eq!(report.outcomes[1], JobOutcome::Completed(SizeStats::new(1000, 500)));

    let summaries = reporter.summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].format_summary(), "Total Filesize: 0.5 kB (50% reduction from 1 kB)");
}

#[tokio::test]
async fn totals_cover_every_successful_job() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_input(temp_dir.path(), "one.mov", 1000);
    let second = write_input(temp_dir.path(), "two.mov", 2000);
    let out_first = temp_dir.path().join("one.mp4");
    let out_second = temp_dir.path().join("two.mp4");

    let engine = Arc::new(
        FakeEngine::default()
            .writing(&out_first, 500)
            .writing(&out_second, 2200),
    );
    let reporter = Arc::new(RecordingReporter::default());

    let report = JobRunner::new(EffectiveOptions::default(), engine, reporter.clone())
        .with_workers(2)
        .run(vec![Job::new(first, out_first), Job::new(second, out_second)])
        .await
        .unwrap();

    assert_eq!(report.summary.totals, SizeStats::new(3000, 2700));
    assert_eq!(report.summary.completed, 2);
    assert_eq!(
        report.summary.format_summary(),
        "Total Filesize: 2.7 kB (90% reduction from 3 kB)"
    );

    let mut completed = reporter.completed.lock().unwrap().clone();
    completed.sort_by_key(|(index, _)| *index);
    assert_eq!(completed[0].1.describe(), "0.5 kB (50% reduction from 1 kB)");
    assert_eq!(completed[1].1.describe(), "2.2 kB (110% increase from 2 kB)");
}

#[tokio::test]
async fn no_successful_job_reports_the_sentinel() {
    let temp_dir = TempDir::new().unwrap();
    let broken = write_input(temp_dir.path(), "broken.mov", 1000);

    let engine = Arc::new(FakeEngine::default().failing_on(&broken));
    let reporter = Arc::new(RecordingReporter::default());

    let report = JobRunner::new(EffectiveOptions::default(), engine, reporter.clone())
        .run(vec![
            Job::new(temp_dir.path().join("ghost.mov"), temp_dir.path().join("ghost.mp4")),
            Job::new(broken, temp_dir.path().join("broken.mp4")),
        ])
        .await
        .unwrap();

    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.totals.ratio_percent(), None);
    assert_eq!(report.summary.format_summary(), "Total Filesize: 0 kB (N/A from 0 kB)");
    assert_eq!(reporter.summaries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn engine_error_does_not_stop_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let broken = write_input(temp_dir.path(), "a.mov", 800);
    let fine = write_input(temp_dir.path(), "b.mov", 800);
    let out_fine = temp_dir.path().join("b.webm");

    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_hook = errors.clone();
    let task = TaskOptions {
        hooks: Hooks::new().on_error(move |err, input, _| {
            errors_hook.lock().unwrap().push((err.to_string(), input.to_path_buf()));
        }),
        ..Default::default()
    };

    let engine = Arc::new(FakeEngine::default().failing_on(&broken).writing(&out_fine, 400));
    let reporter = Arc::new(RecordingReporter::default());

    let options = EffectiveOptions::merge(None, &task);
    let report = JobRunner::new(options, engine.clone(), reporter.clone())
        .with_workers(1)
        .run(vec![
            Job::new(broken.clone(), temp_dir.path().join("a.webm")),
            Job::new(fine, out_fine),
        ])
        .await
        .unwrap();

    assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    assert!(matches!(report.outcomes[0], JobOutcome::Failed(_)));
    assert_eq!(report.outcomes[1], JobOutcome::Completed(SizeStats::new(800, 400)));
    assert_eq!(report.summary.totals, SizeStats::new(800, 400));

    let failed = reporter.failed.lock().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, 0);
    assert!(failed[0].1.contains("Invalid data"));

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].1, broken);
}

#[tokio::test]
async fn existing_destination_is_not_truncated_before_the_engine_runs() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "clip.mov", 1000);
    let output = temp_dir.path().join("clip.mp4");
    std::fs::write(&output, vec![9u8; 321]).unwrap();

    let engine = Arc::new(FakeEngine::default().failing_on(&input));
    let reporter = Arc::new(RecordingReporter::default());

    JobRunner::new(EffectiveOptions::default(), engine.clone(), reporter)
        .run(vec![Job::new(input, output.clone())])
        .await
        .unwrap();

    // The job still ran, but the placeholder step left the file alone
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(std::fs::metadata(&output).unwrap().len(), 321);
}

#[tokio::test]
async fn task_file_options_reach_the_engine_command() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "talk.wav", 1000);
    let output = temp_dir.path().join("nested/dir/talk.mp3");

    let json = serde_json::json!({
        "options": {
            "audioBitrate": "96k",
            "debug": true,
            "engine_overrides": { "audio_frequency": 22050, "fps": 24 }
        },
        "tasks": {
            "podcast": {
                "options": { "engine_overrides": { "fps": 30 } },
                "files": [{ "src": [input, temp_dir.path().join("ignored.wav")], "dest": output }]
            }
        }
    });
    let task_file: TaskFile = serde_json::from_value(json).unwrap();
    task_file.validate().unwrap();
    let task = &task_file.tasks["podcast"];

    let engine = Arc::new(FakeEngine::default().writing(&output, 250));
    let reporter = Arc::new(RecordingReporter::default());

    let report = JobRunner::new(task_file.effective_options(task), engine.clone(), reporter.clone())
        .run(task.jobs().unwrap())
        .await
        .unwrap();

    assert_eq!(report.summary.completed, 1);
    assert!(output.exists());

    let commands = engine.commands.lock().unwrap();
    let args = &commands[0];
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .map(|i| args[i + 1].clone())
    };
    assert_eq!(value_of("-b:a").as_deref(), Some("96k"));
    assert_eq!(value_of("-acodec").as_deref(), Some("libmp3lame"));
    assert_eq!(value_of("-r").as_deref(), Some("30"));
    assert_eq!(value_of("-ar"), None);
    assert!(args.contains(&"-y".to_string()));

    // debug mode reports the command line
    assert_eq!(reporter.commands.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn success_hooks_receive_codec_data_and_paths() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "clip.mov", 1000);
    let output = temp_dir.path().join("clip.mp4");

    let codec_seen = Arc::new(Mutex::new(Vec::new()));
    let codec_hook = codec_seen.clone();
    let ended = Arc::new(Mutex::new(Vec::new()));
    let end_hook = ended.clone();
    let task = TaskOptions {
        hooks: Hooks::new()
            .on_codec_data(move |data, input| {
                codec_hook.lock().unwrap().push((data.format.clone(), input.to_path_buf()));
            })
            .on_end(move |input, output| {
                end_hook.lock().unwrap().push((input.to_path_buf(), output.to_path_buf()));
            }),
        ..Default::default()
    };

    let engine = Arc::new(FakeEngine::default().writing(&output, 600));
    let reporter = Arc::new(RecordingReporter::default());

    let report = JobRunner::new(EffectiveOptions::merge(None, &task), engine, reporter)
        .run(vec![Job::new(input.clone(), output.clone())])
        .await
        .unwrap();

    assert_eq!(report.outcomes[0], JobOutcome::Completed(SizeStats::new(1000, 600)));

    let codec_seen = codec_seen.lock().unwrap();
    assert_eq!(codec_seen.len(), 1);
    assert_eq!(codec_seen[0].0, "mov,mp4,m4a,3gp,3g2,mj2");
    assert_eq!(codec_seen[0].1, input);

    let ended = ended.lock().unwrap();
    assert_eq!(ended.len(), 1);
    assert_eq!(ended[0], (input, output));
}
