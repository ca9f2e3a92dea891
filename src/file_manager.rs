//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file richieste da un job.
//!
//! ## Responsabilità:
//! - Verifica esistenza dei file sorgente
//! - Lettura dimensioni (prima/dopo la transcodifica)
//! - Creazione del placeholder vuoto di destinazione (con directory parent)
//! - Espansione delle voci `{ cwd, dest, ext }` in coppie sorgente/destinazione
//!
//! ## Placeholder:
//! FFmpeg fallisce se la directory di destinazione non esiste, quindi prima
//! di ogni job viene creato un file vuoto. Un file già esistente non viene
//! mai toccato.

use crate::error::TranscodeError;
use crate::runner::Job;
use std::path::Path;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// True when `path` exists (errors count as missing)
    pub async fn exists(path: &Path) -> bool {
        if path.as_os_str().is_empty() {
            return false;
        }
        fs::try_exists(path).await.unwrap_or(false)
    }

    /// Size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64, TranscodeError> {
        Ok(fs::metadata(path).await?.len())
    }

    /// Creates an empty file at `path` unless something is already there.
    ///
    /// Returns `true` when the placeholder was created.
    pub async fn ensure_placeholder(path: &Path) -> Result<bool, TranscodeError> {
        if Self::exists(path).await {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, b"").await?;
        debug!("Created placeholder: {}", path.display());
        Ok(true)
    }

    /// Expands every file under `cwd` into a job writing below `dest`.
    ///
    /// `extensions` filters by source extension (case-insensitive, all files
    /// when empty); `ext` replaces the extension of the destination.
    pub fn expand(
        cwd: &Path,
        dest: &Path,
        ext: Option<&str>,
        extensions: &[String],
    ) -> Result<Vec<Job>, TranscodeError> {
        if !cwd.is_dir() {
            return Err(TranscodeError::Config(format!(
                "expand source is not a directory: {}",
                cwd.display()
            )));
        }

        let mut jobs = Vec::new();
        for entry in WalkDir::new(cwd)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if !Self::matches_extension(path, extensions) {
                continue;
            }
            let relative = path.strip_prefix(cwd).unwrap_or(path);
            let mut output = dest.join(relative);
            if let Some(ext) = ext {
                output.set_extension(ext.trim_start_matches('.'));
            }
            jobs.push(Job::new(path.to_path_buf(), output));
        }
        Ok(jobs)
    }

    fn matches_extension(path: &Path, extensions: &[String]) -> bool {
        if extensions.is_empty() {
            return true;
        }
        match path.extension() {
            Some(ext) => {
                let ext_lower = ext.to_string_lossy().to_lowercase();
                extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').to_lowercase() == ext_lower)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_placeholder_created_with_parents() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out").join("nested").join("clip.mp4");

        assert!(FileManager::ensure_placeholder(&dest).await.unwrap());
        assert!(dest.exists());
        assert_eq!(FileManager::file_size(&dest).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_existing_destination_is_not_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("clip.mp4");
        std::fs::write(&dest, b"previous output").unwrap();

        assert!(!FileManager::ensure_placeholder(&dest).await.unwrap());
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous output");
    }

    #[tokio::test]
    async fn test_empty_path_does_not_exist() {
        assert!(!FileManager::exists(Path::new("")).await);
    }

    #[test]
    fn test_expand_mirrors_tree() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("raw");
        std::fs::create_dir_all(src.join("day1")).unwrap();
        std::fs::write(src.join("b.MOV"), b"x").unwrap();
        std::fs::write(src.join("a.mov"), b"x").unwrap();
        std::fs::write(src.join("notes.txt"), b"x").unwrap();
        std::fs::write(src.join("day1").join("c.mp4"), b"x").unwrap();

        let dest = PathBuf::from("out");
        let jobs = FileManager::expand(
            &src,
            &dest,
            Some(".webm"),
            &["mov".to_string(), ".mp4".to_string()],
        )
        .unwrap();

        let outputs: Vec<PathBuf> = jobs.iter().map(|j| j.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/a.webm"),
                PathBuf::from("out/b.webm"),
                PathBuf::from("out/day1/c.webm"),
            ]
        );
        assert_eq!(jobs[0].input, src.join("a.mov"));
    }

    #[test]
    fn test_expand_requires_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let result = FileManager::expand(&missing, Path::new("out"), None, &[]);
        assert!(matches!(result, Err(TranscodeError::Config(_))));
    }
}
