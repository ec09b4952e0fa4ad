//! Audio handling: transcoding for outgoing voice messages, PCM decoding for
//! incoming transcription requests, and voice-activity trimming.

pub mod decode;
pub mod transcode;
pub mod vad;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use decode::{decode_to_pcm16k, ASR_SAMPLE_RATE};
pub use transcode::{
    FfmpegTranscoder, TranscodeError, Transcoder, FALLBACK_DURATION_MS, OPUS_BITRATE,
};
pub use vad::VadTrimmer;
