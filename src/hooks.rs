//! # Hooks Module
//!
//! Callback opzionali invocati durante la vita di un job.
//!
//! - `on_start(command_line)`: FFmpeg sta per partire
//! - `on_codec_data(codec_data, input)`: metadata dell'input disponibili
//! - `on_end(input, output)`: job completato con successo
//! - `on_error(error, input, output)`: FFmpeg ha fallito
//!
//! Gli hook di una task sostituiscono uno per uno quelli dei default globali
//! (vedi [`Hooks::or`]).

use crate::engine::CodecData;
use crate::error::TranscodeError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub type StartHook = Arc<dyn Fn(&str) + Send + Sync>;
pub type CodecDataHook = Arc<dyn Fn(&CodecData, &Path) + Send + Sync>;
pub type EndHook = Arc<dyn Fn(&Path, &Path) + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(&TranscodeError, &Path, &Path) + Send + Sync>;

/// Set of optional job callbacks
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_start: Option<StartHook>,
    pub on_codec_data: Option<CodecDataHook>,
    pub on_end: Option<EndHook>,
    pub on_error: Option<ErrorHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(hook));
        self
    }

    pub fn on_codec_data(
        mut self,
        hook: impl Fn(&CodecData, &Path) + Send + Sync + 'static,
    ) -> Self {
        self.on_codec_data = Some(Arc::new(hook));
        self
    }

    pub fn on_end(mut self, hook: impl Fn(&Path, &Path) + Send + Sync + 'static) -> Self {
        self.on_end = Some(Arc::new(hook));
        self
    }

    pub fn on_error(
        mut self,
        hook: impl Fn(&TranscodeError, &Path, &Path) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Keeps every hook set on `self`, filling the gaps from `fallback`
    pub fn or(&self, fallback: &Hooks) -> Hooks {
        Hooks {
            on_start: self.on_start.clone().or_else(|| fallback.on_start.clone()),
            on_codec_data: self.on_codec_data.clone().or_else(|| fallback.on_codec_data.clone()),
            on_end: self.on_end.clone().or_else(|| fallback.on_end.clone()),
            on_error: self.on_error.clone().or_else(|| fallback.on_error.clone()),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_codec_data", &self.on_codec_data.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
