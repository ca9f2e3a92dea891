//! Named engine capabilities that `engine_overrides` keys map onto.
//!
//! Each capability accepts a snake_case name plus the fluent-style method
//! names used by older task files (`withAudioCodec`, `toFormat`, ...).

use crate::engine::command::{EngineCommand, SizeSpec};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AudioBitrate,
    AudioChannels,
    AudioCodec,
    AudioFrequency,
    AudioQuality,
    VideoBitrate,
    VideoCodec,
    Size,
    Aspect,
    Fps,
    Format,
    StartTime,
    Duration,
    NoAudio,
    NoVideo,
}

impl Capability {
    pub const ALL: [Capability; 15] = [
        Self::AudioBitrate,
        Self::AudioChannels,
        Self::AudioCodec,
        Self::AudioFrequency,
        Self::AudioQuality,
        Self::VideoBitrate,
        Self::VideoCodec,
        Self::Size,
        Self::Aspect,
        Self::Fps,
        Self::Format,
        Self::StartTime,
        Self::Duration,
        Self::NoAudio,
        Self::NoVideo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AudioBitrate => "audio_bitrate",
            Self::AudioChannels => "audio_channels",
            Self::AudioCodec => "audio_codec",
            Self::AudioFrequency => "audio_frequency",
            Self::AudioQuality => "audio_quality",
            Self::VideoBitrate => "video_bitrate",
            Self::VideoCodec => "video_codec",
            Self::Size => "size",
            Self::Aspect => "aspect",
            Self::Fps => "fps",
            Self::Format => "format",
            Self::StartTime => "start_time",
            Self::Duration => "duration",
            Self::NoAudio => "no_audio",
            Self::NoVideo => "no_video",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::AudioBitrate => &["withAudioBitrate", "audioBitrate"],
            Self::AudioChannels => &["withAudioChannels", "audioChannels"],
            Self::AudioCodec => &["withAudioCodec", "audioCodec"],
            Self::AudioFrequency => &["withAudioFrequency", "audioFrequency"],
            Self::AudioQuality => &["withAudioQuality", "audioQuality"],
            Self::VideoBitrate => &["withVideoBitrate", "videoBitrate"],
            Self::VideoCodec => &["withVideoCodec", "videoCodec"],
            Self::Size => &["withSize", "setSize"],
            Self::Aspect => &["withAspect", "withAspectRatio", "aspectRatio"],
            Self::Fps => &["withFps", "withFpsOutput", "fpsOutput"],
            Self::Format => &["toFormat", "withOutputFormat", "outputFormat"],
            Self::StartTime => &["setStartTime", "seekInput", "seek"],
            Self::Duration => &["setDuration", "withDuration"],
            Self::NoAudio => &["withNoAudio", "noAudio"],
            Self::NoVideo => &["withNoVideo", "noVideo"],
        }
    }

    /// Applies `value` to `command`; the error explains why the value was refused
    pub fn apply(&self, command: &mut EngineCommand, value: &Value) -> Result<(), String> {
        match self {
            Self::AudioBitrate => command.with_audio_bitrate(text(value)?),
            Self::AudioChannels => command.with_audio_channels(positive(value)?),
            Self::AudioCodec => command.with_audio_codec(text(value)?),
            Self::AudioFrequency => command.with_audio_frequency(frequency(value)?),
            Self::AudioQuality => command.with_audio_quality(integer(value)?),
            Self::VideoBitrate => command.with_video_bitrate(text(value)?),
            Self::VideoCodec => command.with_video_codec(text(value)?),
            Self::Size => command.with_size(text(value)?.parse::<SizeSpec>()?),
            Self::Aspect => command.with_aspect(text(value)?),
            Self::Fps => command.with_fps(text(value)?),
            Self::Format => command.to_format(text(value)?),
            Self::StartTime => command.with_start_time(text(value)?),
            Self::Duration => command.with_duration(text(value)?),
            Self::NoAudio => command.with_no_audio(flag(value)?),
            Self::NoVideo => command.with_no_video(flag(value)?),
        };
        Ok(())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.name() == s || c.aliases().contains(&s))
            .copied()
            .ok_or_else(|| format!("unknown engine capability `{}`", s))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Strings pass through, numbers are stringified. Blank values are refused.
fn text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err("expected a non-empty string".to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected a string or a number, got {}", other)),
    }
}

// Null or blank clears the frequency.
fn frequency(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) if s.trim().is_empty() => Ok(String::new()),
        other => text(other),
    }
}

fn integer(value: &Value) -> Result<u32, String> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| format!("expected a non-negative integer, got {}", value))
}

fn positive(value: &Value) -> Result<u32, String> {
    match integer(value)? {
        0 => Err("expected a value greater than 0".to_string()),
        n => Ok(n),
    }
}

fn flag(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(true),
        other => Err(format!("expected a boolean, got {}", other)),
    }
}
