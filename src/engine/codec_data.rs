//! Input metadata reported by ffmpeg on stderr before encoding starts.
//!
//! ```text
//! Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mov':
//!   Duration: 00:00:10.00, start: 0.000000, bitrate: 2500 kb/s
//!     Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1280x720, 25 fps
//!     Stream #0:1(und): Audio: aac (LC) (mp4a / 0x6134706D), 44100 Hz, stereo, fltp, 128 kb/s
//! Output #0, mp4, to 'clip.mp4':
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodecData {
    /// Container format(s) ffmpeg detected, e.g. `mov,mp4,m4a,3gp,3g2,mj2`
    pub format: String,
    /// `HH:MM:SS.ss` as printed by ffmpeg
    pub duration: Option<String>,
    pub video: Option<String>,
    pub video_details: Vec<String>,
    pub audio: Option<String>,
    pub audio_details: Vec<String>,
}

/// Line-by-line parser for the input section of ffmpeg's stderr
#[derive(Debug, Default)]
pub struct CodecDataParser {
    current: Option<CodecData>,
    emitted: bool,
}

impl CodecDataParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one stderr line; returns the codec data once, when the input section ends
    pub fn feed_line(&mut self, line: &str) -> Option<CodecData> {
        if self.emitted {
            return None;
        }
        let line = line.trim();

        if line.starts_with("Input #") {
            if self.current.is_none() {
                self.current = Some(CodecData {
                    format: parse_input_format(line).unwrap_or_default(),
                    ..Default::default()
                });
            }
            return None;
        }

        if self.current.is_none() {
            return None;
        }
        if line.starts_with("Output #")
            || line.starts_with("Stream mapping:")
            || line.starts_with("Press [q]")
        {
            return self.finish();
        }
        let data = self.current.as_mut()?;

        if let Some(rest) = line.strip_prefix("Duration:") {
            let duration = rest.split(',').next().unwrap_or("").trim();
            if !duration.is_empty() && duration != "N/A" {
                data.duration = Some(duration.to_string());
            }
        } else if line.starts_with("Stream #") {
            if let Some(details) = stream_details(line, ": Video: ") {
                if data.video.is_none() {
                    data.video = details.first().cloned();
                    data.video_details = details;
                }
            } else if let Some(details) = stream_details(line, ": Audio: ") {
                if data.audio.is_none() {
                    data.audio = details.first().cloned();
                    data.audio_details = details;
                }
            }
        }
        None
    }

    /// Flushes codec data that was never closed by an output section
    pub fn finish(&mut self) -> Option<CodecData> {
        if self.emitted {
            return None;
        }
        let data = self.current.take()?;
        self.emitted = true;
        Some(data)
    }
}

fn parse_input_format(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(", ")?;
    let end = rest.rfind(", from ")?;
    Some(rest[..end].to_string())
}

fn stream_details(line: &str, marker: &str) -> Option<Vec<String>> {
    let (_, rest) = line.split_once(marker)?;
    Some(rest.split(", ").map(|part| part.trim().to_string()).collect())
}
