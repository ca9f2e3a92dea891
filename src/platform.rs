//! # Platform-specific utilities
//!
//! Questo modulo centralizza la ricerca del binario ffmpeg e le differenze
//! tra piattaforme (estensione `.exe`, separatore del `PATH`).
//!
//! ## Ordine di risoluzione:
//! 1. Path esplicito (`--ffmpeg` o `ffmpeg_path` nel task file)
//! 2. Variabile d'ambiente `FFMPEG_PATH`
//! 3. Ricerca nel `PATH` di sistema

use crate::error::TranscodeError;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable pointing at an ffmpeg binary
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

/// Platform-specific command lookup
pub struct PlatformCommands;

impl PlatformCommands {
    /// Executable file name for a tool on this platform
    pub fn executable_name(base_name: &str) -> String {
        if cfg!(windows) && !base_name.ends_with(".exe") {
            format!("{}.exe", base_name)
        } else {
            base_name.to_string()
        }
    }

    /// Find a tool in the system PATH
    pub fn find_in_path(base_name: &str) -> Option<PathBuf> {
        let file_name = Self::executable_name(base_name);
        let path_var = env::var_os("PATH")?;
        env::split_paths(&path_var)
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }

    /// Resolve the ffmpeg binary to use for a run
    pub fn resolve_ffmpeg(explicit: Option<&Path>) -> Result<PathBuf, TranscodeError> {
        if let Some(path) = explicit {
            return Self::resolve_candidate(path).ok_or_else(|| {
                TranscodeError::MissingDependency(format!("ffmpeg not found at {}", path.display()))
            });
        }

        if let Some(from_env) = env::var_os(FFMPEG_PATH_ENV) {
            let path = PathBuf::from(from_env);
            debug!("Checking {}: {}", FFMPEG_PATH_ENV, path.display());
            if let Some(resolved) = Self::resolve_candidate(&path) {
                return Ok(resolved);
            }
        }

        Self::find_in_path("ffmpeg").ok_or_else(|| {
            TranscodeError::MissingDependency(format!(
                "ffmpeg is required for transcoding (install it, or set {} / --ffmpeg)",
                FFMPEG_PATH_ENV
            ))
        })
    }

    // A bare name is looked up in PATH, anything else must exist as given.
    fn resolve_candidate(path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        let is_bare_name = path.components().count() == 1;
        if is_bare_name {
            return Self::find_in_path(&path.to_string_lossy());
        }
        None
    }

    /// Get system information for debugging
    pub fn system_info() -> SystemInfo {
        SystemInfo {
            os: env::consts::OS,
            arch: env::consts::ARCH,
            family: env::consts::FAMILY,
        }
    }
}

/// System information structure
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_existing_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let fake = temp_dir.path().join("my-ffmpeg");
        std::fs::write(&fake, b"").unwrap();

        let resolved = PlatformCommands::resolve_ffmpeg(Some(&fake)).unwrap();
        assert_eq!(resolved, fake);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope").join("ffmpeg");

        match PlatformCommands::resolve_ffmpeg(Some(&missing)) {
            Err(TranscodeError::MissingDependency(message)) => {
                assert!(message.contains("ffmpeg not found"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_executable_name() {
        let name = PlatformCommands::executable_name("ffmpeg");
        if cfg!(windows) {
            assert_eq!(name, "ffmpeg.exe");
        } else {
            assert_eq!(name, "ffmpeg");
        }
    }

    #[test]
    fn test_system_info() {
        let info = PlatformCommands::system_info();
        assert!(!info.os.is_empty());
        assert!(!info.arch.is_empty());
        assert!(!info.to_string().is_empty());
    }
}
