//! Whisper inference wrapper.
//!
//! [`WhisperAsr`] wraps a `whisper_rs::WhisperContext`. A fresh
//! `WhisperState` is created per call, so one engine instance can serve any
//! number of sequential transcriptions.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

// ---------------------------------------------------------------------------
// AsrError
// ---------------------------------------------------------------------------

/// All errors that can arise from the ASR subsystem. Each failure mode is a
/// distinct variant so the command-line boundary can explain exactly what
/// went wrong.
#[derive(Debug, Clone, Error)]
pub enum AsrError {
    /// The model file was not found at the given path.
    #[error("speech model not found: {0}")]
    ModelNotFound(String),

    /// The input audio file does not exist.
    #[error("audio file not found: {0}")]
    AudioNotFound(String),

    /// Decoding the input file to PCM failed.
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// whisper-rs failed to initialise a context or state.
    #[error("model initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// WhisperAsr
// ---------------------------------------------------------------------------

/// A loaded whisper model ready for inference.
pub struct WhisperAsr {
    ctx: WhisperContext,
    language: String,
    n_threads: i32,
}

impl std::fmt::Debug for WhisperAsr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperAsr")
            .field("language", &self.language)
            .field("n_threads", &self.n_threads)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send`/`Sync` in whisper-rs — the model weights are read-only
// after loading.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperAsr {}
unsafe impl Sync for WhisperAsr {}

impl WhisperAsr {
    /// Load a GGML model from `model_path`.
    ///
    /// # Errors
    ///
    /// - [`AsrError::ModelNotFound`] — `model_path` does not exist.
    /// - [`AsrError::ContextInit`]  — whisper-rs failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, language: &str) -> Result<Self, AsrError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(AsrError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            AsrError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| AsrError::ContextInit(e.to_string()))?;

        Ok(Self {
            ctx,
            language: language.to_string(),
            n_threads: optimal_threads(),
        })
    }

    /// Transcribe 16 kHz mono f32 samples to raw model output.
    ///
    /// Silence-only or empty input yields an empty string rather than an
    /// error — there is simply nothing to say.
    pub fn transcribe(&self, audio: &[f32]) -> Result<String, AsrError> {
        if audio.is_empty() {
            return Ok(String::new());
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        let lang: Option<&str> = if self.language == "auto" {
            None
        } else {
            Some(self.language.as_str())
        };
        params.set_language(lang);
        params.set_n_threads(self.n_threads);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| AsrError::ContextInit(e.to_string()))?;

        state
            .full(params, audio)
            .map_err(|e| AsrError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| AsrError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let seg = state
                .full_get_segment_text(i)
                .map_err(|e| AsrError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&seg);
        }

        Ok(text.trim().to_string())
    }
}

/// CPU threads handed to whisper, capped at 8 — more gives diminishing
/// returns on this workload.
fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let result = WhisperAsr::load("/nonexistent/model.bin", "auto");
        assert!(
            matches!(result, Err(AsrError::ModelNotFound(_))),
            "expected ModelNotFound, got: {result:?}"
        );
    }

    #[test]
    fn error_display_carries_the_path() {
        let e = AsrError::ModelNotFound("/some/path.bin".into());
        assert!(e.to_string().contains("/some/path.bin"));
        let e = AsrError::AudioNotFound("/clip.wav".into());
        assert!(e.to_string().contains("/clip.wav"));
    }

    #[test]
    fn optimal_threads_is_positive_and_at_most_8() {
        let t = optimal_threads();
        assert!((1..=8).contains(&t));
    }
}
