//! ASR (speech-to-text) subsystem.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use feishu_voice::asr::AsrService;
//! use feishu_voice::config::{AppPaths, AsrConfig};
//!
//! let service = AsrService::new(&AsrConfig::default(), &AppPaths::new());
//! // The model loads on the first call and is reused afterwards.
//! let text = service.transcribe_file(Path::new("voice.wav")).unwrap();
//! println!("{text}");
//! ```

pub mod engine;
pub mod service;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{AsrError, WhisperAsr};
pub use service::{postprocess, strip_markup, AsrService};
