//! Text preparation for speech synthesis.
//!
//! Long input text is broken into speakable segments before TTS so that each
//! voice message stays short enough for comfortable playback (80 characters
//! is roughly 15–25 seconds of Mandarin speech).

pub mod splitter;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use splitter::{split_text, SECONDARY_MARKS, TERMINAL_MARKS};
