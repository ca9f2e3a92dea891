//! # Engine Command Builder
//!
//! Costruisce la riga di comando FFmpeg per un singolo job con setter
//! tipizzati, al posto del probing dinamico dei metodi.
//!
//! Ordine degli argomenti generati:
//! `[-ss start] -i input -y [audio] [video] [-t durata] [-f formato] output`

use crate::args;
use crate::runner::profile_resolver::FormatProfile;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output frame size, in the notations ffmpeg users already write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    /// `640x480`
    Fixed { width: u32, height: u32 },
    /// `640x?`, height follows the aspect ratio
    Width(u32),
    /// `?x480`, width follows the aspect ratio
    Height(u32),
    /// `50%` of the input size
    Percent(u32),
}

impl FromStr for SizeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("invalid size `{}`", s);

        if let Some(percent) = s.strip_suffix('%') {
            let value: u32 = percent.trim().parse().map_err(|_| invalid())?;
            if value == 0 {
                return Err(invalid());
            }
            return Ok(Self::Percent(value));
        }

        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let parse = |v: &str| -> Result<u32, String> {
            match v.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(invalid()),
            }
        };
        match (width, height) {
            ("?", "?") => Err(invalid()),
            ("?", h) => Ok(Self::Height(parse(h)?)),
            (w, "?") => Ok(Self::Width(parse(w)?)),
            (w, h) => Ok(Self::Fixed { width: parse(w)?, height: parse(h)? }),
        }
    }
}

impl SizeSpec {
    pub fn args(&self) -> Vec<String> {
        match *self {
            Self::Fixed { width, height } => args!["-s", format!("{}x{}", width, height)],
            Self::Width(width) => args!["-vf", format!("scale={}:-2", width)],
            Self::Height(height) => args!["-vf", format!("scale=-2:{}", height)],
            Self::Percent(p) => args![
                "-vf",
                format!("scale=trunc(iw*{p}/100/2)*2:trunc(ih*{p}/100/2)*2")
            ],
        }
    }
}

/// A fully configured ffmpeg invocation for one job
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineCommand {
    input: PathBuf,
    output: PathBuf,
    audio_bitrate: Option<String>,
    audio_channels: Option<u32>,
    audio_codec: Option<String>,
    audio_frequency: Option<String>,
    audio_quality: Option<u32>,
    video_bitrate: Option<String>,
    video_codec: Option<String>,
    size: Option<SizeSpec>,
    aspect: Option<String>,
    fps: Option<String>,
    format: Option<String>,
    start_time: Option<String>,
    duration: Option<String>,
    no_audio: bool,
    no_video: bool,
}

impl EngineCommand {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn with_audio_bitrate(&mut self, bitrate: impl Into<String>) -> &mut Self {
        self.audio_bitrate = Some(bitrate.into());
        self
    }

    pub fn with_audio_channels(&mut self, channels: u32) -> &mut Self {
        self.audio_channels = Some(channels);
        self
    }

    pub fn with_audio_codec(&mut self, codec: impl Into<String>) -> &mut Self {
        self.audio_codec = Some(codec.into());
        self
    }

    /// An empty frequency clears the setting
    pub fn with_audio_frequency(&mut self, frequency: impl Into<String>) -> &mut Self {
        let frequency = frequency.into();
        self.audio_frequency = if frequency.is_empty() { None } else { Some(frequency) };
        self
    }

    pub fn clear_audio_frequency(&mut self) -> &mut Self {
        self.audio_frequency = None;
        self
    }

    pub fn with_audio_quality(&mut self, quality: u32) -> &mut Self {
        self.audio_quality = Some(quality);
        self
    }

    pub fn with_video_bitrate(&mut self, bitrate: impl Into<String>) -> &mut Self {
        self.video_bitrate = Some(bitrate.into());
        self
    }

    pub fn with_video_codec(&mut self, codec: impl Into<String>) -> &mut Self {
        self.video_codec = Some(codec.into());
        self
    }

    pub fn with_size(&mut self, size: SizeSpec) -> &mut Self {
        self.size = Some(size);
        self
    }

    pub fn with_aspect(&mut self, aspect: impl Into<String>) -> &mut Self {
        self.aspect = Some(aspect.into());
        self
    }

    pub fn with_fps(&mut self, fps: impl Into<String>) -> &mut Self {
        self.fps = Some(fps.into());
        self
    }

    pub fn to_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_start_time(&mut self, start: impl Into<String>) -> &mut Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn with_duration(&mut self, duration: impl Into<String>) -> &mut Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_no_audio(&mut self, no_audio: bool) -> &mut Self {
        self.no_audio = no_audio;
        self
    }

    pub fn with_no_video(&mut self, no_video: bool) -> &mut Self {
        self.no_video = no_video;
        self
    }

    /// Applies the codec/container defaults of an output format
    pub fn apply_profile(&mut self, profile: &FormatProfile) -> &mut Self {
        if let Some(codec) = profile.video_codec {
            self.with_video_codec(codec);
        }
        if let Some(codec) = profile.audio_codec {
            self.with_audio_codec(codec);
        }
        if let Some(format) = profile.container_format {
            self.to_format(format);
        }
        self
    }

    pub fn audio_bitrate(&self) -> Option<&str> {
        self.audio_bitrate.as_deref()
    }

    pub fn audio_channels(&self) -> Option<u32> {
        self.audio_channels
    }

    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    pub fn audio_frequency(&self) -> Option<&str> {
        self.audio_frequency.as_deref()
    }

    pub fn video_bitrate(&self) -> Option<&str> {
        self.video_bitrate.as_deref()
    }

    pub fn video_codec(&self) -> Option<&str> {
        self.video_codec.as_deref()
    }

    pub fn size(&self) -> Option<SizeSpec> {
        self.size
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn fps(&self) -> Option<&str> {
        self.fps.as_deref()
    }

    /// ffmpeg arguments, program name excluded
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(ref start) = self.start_time {
            args.extend(args!["-ss", start]);
        }
        args.extend(args!["-i", self.input.display(), "-y"]);

        if self.no_audio {
            args.push("-an".to_string());
        } else {
            if let Some(ref codec) = self.audio_codec {
                args.extend(args!["-acodec", codec]);
            }
            if let Some(ref bitrate) = self.audio_bitrate {
                args.extend(args!["-b:a", bitrate]);
            }
            if let Some(channels) = self.audio_channels {
                args.extend(args!["-ac", channels]);
            }
            if let Some(ref frequency) = self.audio_frequency {
                args.extend(args!["-ar", frequency]);
            }
            if let Some(quality) = self.audio_quality {
                args.extend(args!["-aq", quality]);
            }
        }

        if self.no_video {
            args.push("-vn".to_string());
        } else {
            if let Some(ref codec) = self.video_codec {
                args.extend(args!["-vcodec", codec]);
            }
            if let Some(ref bitrate) = self.video_bitrate {
                args.extend(args!["-b:v", bitrate]);
            }
            if let Some(size) = self.size {
                args.extend(size.args());
            }
            if let Some(ref aspect) = self.aspect {
                args.extend(args!["-aspect", aspect]);
            }
            if let Some(ref fps) = self.fps {
                args.extend(args!["-r", fps]);
            }
        }

        if let Some(ref duration) = self.duration {
            args.extend(args!["-t", duration]);
        }
        if let Some(ref format) = self.format {
            args.extend(args!["-f", format]);
        }
        args.push(self.output.display().to_string());
        args
    }

    /// Printable command line, arguments with blanks quoted
    pub fn command_line(&self, program: &Path) -> String {
        CommandLine { program, args: self.args() }.to_string()
    }
}

struct CommandLine<'a> {
    program: &'a Path,
    args: Vec<String>,
}

impl fmt::Display for CommandLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
