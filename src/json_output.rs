//! # JSON Output Module
//!
//! Output strutturato (una riga JSON per evento) per chi lancia il tool da
//! un altro programma, attivato con `--json`.
//!
//! ## Tipi di messaggi:
//! - `command`: riga di comando FFmpeg (solo con `debug`)
//! - `skip`: file sorgente inesistente
//! - `file_complete`: job completato con statistiche
//! - `file_error`: FFmpeg ha fallito
//! - `summary`: totale della task

use crate::progress::{RunSummary, SizeChange, SizeStats};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    Command {
        task: String,
        index: usize,
        command_line: String,
    },
    Skip {
        task: String,
        index: usize,
        input: PathBuf,
    },
    FileComplete {
        task: String,
        index: usize,
        input: PathBuf,
        output: PathBuf,
        original_size: u64,
        result_size: u64,
        ratio_percent: Option<f64>,
        change: Option<SizeChange>,
    },
    FileError {
        task: String,
        index: usize,
        input: PathBuf,
        output: PathBuf,
        message: String,
    },
    Summary {
        task: String,
        jobs: usize,
        completed: usize,
        skipped: usize,
        failed: usize,
        original_size: u64,
        result_size: u64,
        ratio_percent: Option<f64>,
        change: Option<SizeChange>,
    },
}

impl JsonMessage {
    /// Serialize to a single line
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        let line = self.to_line();
        if !line.is_empty() {
            println!("{}", line);
        }
    }

    pub fn file_complete(
        task: &str,
        index: usize,
        input: PathBuf,
        output: PathBuf,
        stats: &SizeStats,
    ) -> Self {
        Self::FileComplete {
            task: task.to_string(),
            index,
            input,
            output,
            original_size: stats.original_bytes,
            result_size: stats.result_bytes,
            ratio_percent: stats.ratio_percent(),
            change: stats.change(),
        }
    }

    pub fn summary(task: &str, summary: &RunSummary) -> Self {
        Self::Summary {
            task: task.to_string(),
            jobs: summary.jobs,
            completed: summary.completed,
            skipped: summary.skipped,
            failed: summary.failed,
            original_size: summary.totals.original_bytes,
            result_size: summary.totals.result_bytes,
            ratio_percent: summary.totals.ratio_percent(),
            change: summary.totals.change(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_file_complete_shape() {
        let message = JsonMessage::file_complete(
            "web",
            0,
            PathBuf::from("a.mov"),
            PathBuf::from("a.mp4"),
            &SizeStats::new(1000, 500),
        );
        let value: Value = serde_json::from_str(&message.to_line()).unwrap();
        assert_eq!(value["type"], "file_complete");
        assert_eq!(value["ratio_percent"], json!(50.0));
        assert_eq!(value["change"], "reduction");
    }

    #[test]
    fn test_empty_summary_has_null_ratio() {
        let message = JsonMessage::summary("web", &RunSummary::default());
        let value: Value = serde_json::from_str(&message.to_line()).unwrap();
        assert_eq!(value["type"], "summary");
        assert!(value["ratio_percent"].is_null());
        assert!(value["change"].is_null());
    }
}
