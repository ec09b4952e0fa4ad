//! MP3 → OPUS transcoding and duration probing via ffmpeg/ffprobe.
//!
//! Voice messages are encoded with libopus at 24 kbit/s in `voip` mode —
//! tuned for speech intelligibility rather than file size, and matching what
//! the receiving platform expects for real-time playback.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Opus bitrate passed to ffmpeg.
pub const OPUS_BITRATE: &str = "24k";

/// Duration reported when probing fails for any reason.
pub const FALLBACK_DURATION_MS: u64 = 5_000;

/// Upper bound on a single ffprobe run; probing must never hang a send.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// TranscodeError
// ---------------------------------------------------------------------------

/// Errors from the transcoding step. Duration probing never produces one.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// `ffmpeg` / `ffprobe` is not installed or not on `PATH`.
    #[error("media tool not found: {0}")]
    ToolMissing(String),

    /// ffmpeg ran and exited non-zero.
    #[error("ffmpeg failed: {0}")]
    Ffmpeg(String),

    #[error("transcode I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Transcoder trait
// ---------------------------------------------------------------------------

/// Object-safe audio transcoding interface.
///
/// `probe_duration_ms` is deliberately infallible: callers always get a
/// usable duration, falling back to [`FALLBACK_DURATION_MS`].
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Convert `src` into an Opus file at `dst`.
    async fn to_opus(&self, src: &Path, dst: &Path) -> Result<(), TranscodeError>;

    /// Media duration of `path` in whole milliseconds, or the fixed fallback.
    async fn probe_duration_ms(&self, path: &Path) -> u64;
}

// ---------------------------------------------------------------------------
// FfmpegTranscoder
// ---------------------------------------------------------------------------

/// Production transcoder shelling out to `ffmpeg` and `ffprobe`.
pub struct FfmpegTranscoder {
    ffmpeg: PathBuf,
    ffprobe: Option<PathBuf>,
}

impl FfmpegTranscoder {
    /// Locate the tools on `PATH`. A missing `ffmpeg` is fatal; a missing
    /// `ffprobe` only disables probing (the fallback duration is used).
    pub fn new() -> Result<Self, TranscodeError> {
        let ffmpeg = which::which("ffmpeg")
            .map_err(|e| TranscodeError::ToolMissing(format!("ffmpeg: {e}")))?;
        let ffprobe = which::which("ffprobe").ok();
        if ffprobe.is_none() {
            log::warn!("ffprobe not found; durations will use the {FALLBACK_DURATION_MS} ms fallback");
        }
        Ok(Self { ffmpeg, ffprobe })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_opus(&self, src: &Path, dst: &Path) -> Result<(), TranscodeError> {
        let output = Command::new(&self.ffmpeg)
            .arg("-y")
            .arg("-i")
            .arg(src)
            .args(["-c:a", "libopus", "-b:a", OPUS_BITRATE, "-application", "voip"])
            .arg(dst)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::Ffmpeg(format!(
                "exit {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn probe_duration_ms(&self, path: &Path) -> u64 {
        let Some(ffprobe) = &self.ffprobe else {
            return FALLBACK_DURATION_MS;
        };

        let mut probe = Command::new(ffprobe);
        probe
            .args(["-v", "error", "-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path);

        let output = match tokio::time::timeout(PROBE_TIMEOUT, probe.output()).await {
            Ok(Ok(out)) if out.status.success() => out,
            Ok(Ok(out)) => {
                log::warn!("ffprobe exited with {}; using fallback duration", out.status);
                return FALLBACK_DURATION_MS;
            }
            Ok(Err(e)) => {
                log::warn!("ffprobe failed to run ({e}); using fallback duration");
                return FALLBACK_DURATION_MS;
            }
            Err(_) => {
                log::warn!("ffprobe timed out; using fallback duration");
                return FALLBACK_DURATION_MS;
            }
        };

        match String::from_utf8_lossy(&output.stdout).trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => (secs * 1000.0) as u64,
            _ => {
                log::warn!("ffprobe output was not a duration; using fallback");
                FALLBACK_DURATION_MS
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
