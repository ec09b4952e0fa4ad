//! Core TTS backend trait, error type and capability probing results.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::tts::voice::EngineKind;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// All errors that can arise from the TTS subsystem.
///
/// `NoEngineAvailable` is deliberately distinct from `Synthesis`: the first
/// means no backend could even be attempted (missing credentials, missing
/// runtime dependency), the second means a backend ran and failed.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Neither backend can synthesize. Carries the per-backend reasons.
    #[error("no TTS engine available: {0}")]
    NoEngineAvailable(String),

    /// The selected backend ran and reported a failure.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// HTTP transport or connection error.
    #[error("TTS request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("TTS request timed out")]
    Timeout,

    /// Writing the synthesized audio to disk failed.
    #[error("failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// TtsBackend trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for a synthesis backend.
///
/// # Contract
///
/// A successful call leaves exactly one complete audio file at `output`.
/// On failure nothing is written there — backends buffer the full response
/// (or synthesize into a staging path) before the output file appears.
#[async_trait]
pub trait TtsBackend: Send + Sync {
    /// Which catalog this backend serves.
    fn kind(&self) -> EngineKind;

    /// Synthesize `text` with the backend voice `voice_id` into `output`.
    async fn synthesize(&self, text: &str, voice_id: &str, output: &Path)
        -> Result<(), TtsError>;
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Result of probing one backend's runtime requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// The backend cannot run; carries a human-readable reason.
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    /// The reason string for an unavailable backend, or `"available"`.
    pub fn reason(&self) -> &str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable(reason) => reason,
        }
    }
}

/// Capability probe results for both backends, produced at construction
/// time and carried by the dispatcher for diagnostics.
#[derive(Debug, Clone)]
pub struct EngineAvailability {
    pub cloud: Availability,
    pub local: Availability,
}

impl EngineAvailability {
    pub fn any_available(&self) -> bool {
        self.cloud.is_available() || self.local.is_available()
    }

    /// One-line summary used in `NoEngineAvailable` errors and logs.
    pub fn summary(&self) -> String {
        format!(
            "cosyvoice: {}; piper: {}",
            self.cloud.reason(),
            self.local.reason()
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
