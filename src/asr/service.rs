//! Lazily-initialised transcription service.
//!
//! [`AsrService`] owns the model path and loads the engine (whisper context
//! plus VAD trimmer) at most once per process, on the first transcription
//! call. The `OnceCell` guard makes concurrent first calls safe — exactly one
//! caller performs the load, the rest wait and share the instance.
//!
//! Raw model output passes through two cleanup steps before it reaches the
//! caller: bracket-delimited markup tokens (`<|zh|>`, `<|HAPPY|>`, …) are
//! stripped, then whitespace is normalised.

use std::path::{Path, PathBuf};

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use crate::asr::engine::{AsrError, WhisperAsr};
use crate::audio::{decode_to_pcm16k, VadTrimmer};
use crate::config::{AppPaths, AsrConfig};

/// Matches the model's internal markup tokens, e.g. `<|zh|>` or `<|EMO|>`.
static MARKUP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\|.*?\|>").expect("markup token pattern is valid"));

// ---------------------------------------------------------------------------
// AsrService
// ---------------------------------------------------------------------------

/// Process-lifetime transcription service with one-time model loading.
#[derive(Debug)]
pub struct AsrService {
    model_path: PathBuf,
    language: String,
    vad: VadTrimmer,
    engine: OnceCell<WhisperAsr>,
}

impl AsrService {
    /// Build a service from config; the model itself is not touched until
    /// the first transcription.
    pub fn new(config: &AsrConfig, paths: &AppPaths) -> Self {
        Self::with_model_path(config.model_path(paths), config)
    }

    /// Build with an explicit model file (CLI `--model` override, tests).
    pub fn with_model_path(model_path: impl Into<PathBuf>, config: &AsrConfig) -> Self {
        Self {
            model_path: model_path.into(),
            language: config.language.clone(),
            vad: VadTrimmer::new(config.vad_threshold),
            engine: OnceCell::new(),
        }
    }

    /// Path of the model file this service will load.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn engine(&self) -> Result<&WhisperAsr, AsrError> {
        self.engine.get_or_try_init(|| {
            log::info!("loading speech model: {}", self.model_path.display());
            WhisperAsr::load(&self.model_path, &self.language)
        })
    }

    /// Transcribe an audio file to clean text.
    ///
    /// # Errors
    ///
    /// Distinct variants for a missing input file, a missing model, a decode
    /// failure and an inference failure — see [`AsrError`].
    pub fn transcribe_file(&self, audio_path: &Path) -> Result<String, AsrError> {
        if !audio_path.exists() {
            return Err(AsrError::AudioNotFound(audio_path.display().to_string()));
        }

        let samples = decode_to_pcm16k(audio_path).map_err(AsrError::Decode)?;
        let speech = self.vad.trim(&samples);
        log::debug!(
            "decoded {} samples, {} after VAD trim",
            samples.len(),
            speech.len()
        );

        let raw = self.engine()?.transcribe(speech)?;
        Ok(postprocess(&strip_markup(&raw)))
    }
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

/// Remove every `<|…|>` markup token emitted by the model.
pub fn strip_markup(text: &str) -> String {
    MARKUP_TOKEN.replace_all(text, "").into_owned()
}

/// Normalise the stripped transcript: collapse whitespace runs left behind by
/// token removal into single spaces and trim the ends.
pub fn postprocess(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
