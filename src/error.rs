//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della libreria.
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (placeholder, dimensioni file, task file)
//! - `Engine`: Errore riportato da FFmpeg per un singolo job
//! - `Config`: Task file o opzioni non valide
//! - `MissingDependency`: Binario ffmpeg non trovato
//!
//! ## Recupero:
//! `Engine` e `Io` di un job sono recuperati localmente dal runner: il job
//! conta come terminato e la run prosegue. Un input inesistente non è un
//! errore ma un job saltato (`JobOutcome::Skipped`). `Config` e
//! `MissingDependency` vengono segnalati prima che la run parta.
//!
//! ## Esempio:
//! ```ignore
//! if task_file.workers == 0 {
//!     return Err(TranscodeError::Config("Number of workers must be greater than 0".into()));
//! }
//! ```

/// Custom error types for batch transcoding
#[derive(thiserror::Error, Debug)]
pub enum TranscodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Engine(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_displays_raw_message() {
        let err = TranscodeError::Engine("ffmpeg exited with code 1: boom".to_string());
        assert_eq!(err.to_string(), "ffmpeg exited with code 1: boom");
    }

    #[test]
    fn test_config_error_prefix() {
        let err = TranscodeError::Config("workers must be greater than 0".to_string());
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
