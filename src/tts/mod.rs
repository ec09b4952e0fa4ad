//! TTS (Text-to-Speech) subsystem.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  TtsDispatcher                        │
//! │                                                      │
//! │  resolve_voice() ──▶ catalog (voice.rs)              │
//! │        │                                             │
//! │        ▼ engine tag                                  │
//! │  ┌───────────────┐        ┌───────────────┐          │
//! │  │ CosyVoice     │        │ Piper         │          │
//! │  │ (DashScope    │        │ (local        │          │
//! │  │  HTTP API)    │        │  subprocess)  │          │
//! │  └───────────────┘        └───────────────┘          │
//! │        └── unavailable? fall back to the other ──┘    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Both backends implement [`TtsBackend`] and honour the same contract:
//! exactly one complete audio file per successful call, nothing on failure.

pub mod cosyvoice;
pub mod dispatcher;
pub mod engine;
pub mod piper;
pub mod voice;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use cosyvoice::CosyVoiceBackend;
pub use dispatcher::TtsDispatcher;
pub use engine::{Availability, EngineAvailability, TtsBackend, TtsError};
pub use piper::PiperBackend;
pub use voice::{
    default_voice, find_voice, list_voices, match_voice, EngineKind, Gender, Voice,
    CLOUD_VOICES, DEFAULT_VOICE, LOCAL_DEFAULT_VOICE, LOCAL_VOICES,
};
