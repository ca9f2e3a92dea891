//! # Size Tracker
//!
//! Accumulatore condiviso tra i job di una run. Solo i job completati con
//! successo ci scrivono; la lettura finale avviene dopo il join di tutti i job.

use crate::progress::SizeStats;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct SizeTracker {
    totals: Arc<Mutex<SizeStats>>,
}

impl SizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggiunge le dimensioni di un job completato
    pub async fn add(&self, stats: SizeStats) {
        let mut totals = self.totals.lock().await;
        totals.add(stats);
    }

    /// Totali correnti
    pub async fn totals(&self) -> SizeStats {
        *self.totals.lock().await
    }
}
