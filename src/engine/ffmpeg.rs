//! # FFmpeg Process Engine
//!
//! Esegue un `EngineCommand` lanciando il binario `ffmpeg` come processo
//! esterno con `tokio::process::Command`.
//!
//! ## Eventi:
//! 1. `Start` con la riga di comando completa, prima dello spawn
//! 2. `CodecData` quando ffmpeg ha finito di descrivere l'input su stderr
//! 3. Terminale: `Ok(())` se exit code 0, altrimenti `TranscodeError::Engine`
//!    con l'ultima riga di stderr
//!
//! Nessun timeout: un job dura quanto dura ffmpeg.

use crate::engine::codec_data::CodecDataParser;
use crate::engine::command::EngineCommand;
use crate::engine::{Engine, EngineEvent};
use crate::error::TranscodeError;
use crate::platform::PlatformCommands;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Runs jobs through an ffmpeg binary
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    program: PathBuf,
}

impl FfmpegEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Locates ffmpeg (explicit path, `FFMPEG_PATH`, then `PATH`)
    pub fn locate(explicit: Option<&Path>) -> Result<Self, TranscodeError> {
        PlatformCommands::resolve_ffmpeg(explicit).map(Self::new)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl Engine for FfmpegEngine {
    async fn run(
        &self,
        command: &EngineCommand,
        on_event: &(dyn Fn(EngineEvent) + Send + Sync),
    ) -> Result<(), TranscodeError> {
        on_event(EngineEvent::Start {
            command_line: command.command_line(&self.program),
        });

        let start_time = std::time::Instant::now();
        let mut child = Command::new(&self.program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TranscodeError::Engine(format!(
                    "Failed to execute {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TranscodeError::Engine("ffmpeg stderr was not captured".to_string()))?;

        let mut parser = CodecDataParser::new();
        let mut last_line = String::new();
        let mut segments = BufReader::new(stderr).split(b'\n');

        while let Some(bytes) = segments.next_segment().await? {
            let line = String::from_utf8_lossy(&bytes);
            // progress updates are separated by carriage returns
            for segment in line.split('\r') {
                if let Some(data) = parser.feed_line(segment) {
                    on_event(EngineEvent::CodecData(data));
                }
                if !segment.trim().is_empty() {
                    last_line = segment.trim().to_string();
                }
            }
        }
        if let Some(data) = parser.finish() {
            on_event(EngineEvent::CodecData(data));
        }

        let status = child.wait().await?;
        debug!(
            "ffmpeg finished in {:.1}s for {}",
            start_time.elapsed().as_secs_f64(),
            command.input().display()
        );

        if status.success() {
            return Ok(());
        }
        let message = match status.code() {
            Some(code) => format!("ffmpeg exited with code {}: {}", code, last_line),
            None => format!("ffmpeg was killed by a signal: {}", last_line),
        };
        Err(TranscodeError::Engine(message))
    }
}
