//! # Engine Module
//!
//! Confine verso il motore di transcodifica esterno:
//! - `command`: builder tipizzato della riga di comando
//! - `capability`: chiavi di override supportate e loro setter
//! - `codec_data`: parsing dei metadata dell'input da stderr
//! - `ffmpeg`: implementazione reale che lancia il processo `ffmpeg`
//!
//! Il runner dipende solo dal trait [`Engine`], così i test possono
//! sostituire ffmpeg con un motore finto.

pub mod capability;
pub mod codec_data;
pub mod command;
pub mod ffmpeg;

pub use capability::Capability;
pub use codec_data::{CodecData, CodecDataParser};
pub use command::{EngineCommand, SizeSpec};
pub use ffmpeg::FfmpegEngine;

use crate::error::TranscodeError;
use async_trait::async_trait;

/// Non-terminal events emitted while a command runs
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Start { command_line: String },
    CodecData(CodecData),
}

/// An executor for engine commands.
///
/// `run` resolves once per command: `Ok` when the output was written, `Err`
/// with the engine's message otherwise. Events are delivered before it resolves.
#[async_trait]
pub trait Engine: Send + Sync {
    async fn run(
        &self,
        command: &EngineCommand,
        on_event: &(dyn Fn(EngineEvent) + Send + Sync),
    ) -> Result<(), TranscodeError>;
}
