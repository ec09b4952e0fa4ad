//! feishu-voice — send synthesized voice messages to Feishu and transcribe
//! audio with a local speech model.
//!
//! # Subsystems
//!
//! - [`text`]     — punctuation-aware segmentation of long input text.
//! - [`tts`]      — voice catalog plus cloud (CosyVoice) and local (Piper)
//!                  synthesis backends behind one dispatcher.
//! - [`audio`]    — ffmpeg transcoding to OPUS, duration probing, PCM decode
//!                  and voice-activity trimming.
//! - [`feishu`]   — open-platform client: token exchange, file upload,
//!                  message delivery.
//! - [`pipeline`] — the sequential, fail-fast send orchestration.
//! - [`asr`]      — lazily-loaded whisper transcription service.
//! - [`config`]   — settings, paths and credential resolution.

pub mod asr;
pub mod audio;
pub mod config;
pub mod feishu;
pub mod pipeline;
pub mod text;
pub mod tts;
