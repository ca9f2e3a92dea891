//! # Format Profile Resolution
//!
//! Default di codec/container scelti in base all'estensione dell'output.
//! Il match è esatto e case-sensitive sul suffisso dopo l'ultimo `.` del
//! nome file: `clip.MP4` non riceve i default di `.mp4`.

use std::path::Path;

/// Codec and container defaults of an output extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatProfile {
    pub video_codec: Option<&'static str>,
    pub audio_codec: Option<&'static str>,
    pub container_format: Option<&'static str>,
}

impl FormatProfile {
    pub const MP4: FormatProfile = FormatProfile {
        video_codec: Some("libx264"),
        audio_codec: Some("libmp3lame"),
        container_format: None,
    };
    pub const WEBM: FormatProfile = FormatProfile {
        video_codec: None,
        audio_codec: None,
        container_format: Some("webm"),
    };
    pub const MP3: FormatProfile = FormatProfile {
        video_codec: None,
        audio_codec: Some("libmp3lame"),
        container_format: None,
    };

    /// Profile for an output path; unknown extensions get the empty profile
    pub fn for_output(path: &Path) -> Self {
        match output_extension(path) {
            Some(".mp4") => Self::MP4,
            Some(".webm") => Self::WEBM,
            Some(".mp3") => Self::MP3,
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Suffix of the file name starting at its last `.`, dot included
pub fn output_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').map(|i| &name[i..])
}
