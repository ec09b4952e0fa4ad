//! Voice-send pipeline: text → segments → TTS → OPUS → Feishu.
//!
//! ```text
//! send_voice(text)
//!   ├─ split_text()            — punctuation-aware segmentation
//!   ├─ tenant_access_token()   — fetched ONCE per send
//!   └─ for each segment, strictly in order:
//!        ├─ TtsDispatcher::synthesize  → voice.mp3
//!        ├─ Transcoder::probe_duration_ms
//!        ├─ Transcoder::to_opus        → voice.opus
//!        ├─ FeishuClient::upload_voice → file_key
//!        └─ FeishuClient::send_voice_message
//! ```
//!
//! Segments are processed sequentially — recipients expect voice messages in
//! speaking order — and the first failure aborts everything that remains.

pub mod runner;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use runner::{SendError, SendOptions, VoiceSender};
