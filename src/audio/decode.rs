//! Decode an audio file to the 16 kHz mono f32 PCM that the ASR engine
//! expects, by shelling out to ffmpeg.
//!
//! This runs synchronously: transcription is a blocking operation end to end
//! and the decode is the cheap part of it.

use std::path::Path;
use std::process::Command;

/// Sample rate required by the speech model.
pub const ASR_SAMPLE_RATE: u32 = 16_000;

/// Decode `path` into 16 kHz mono f32 samples.
///
/// Any ffmpeg failure (missing binary, unreadable file, unsupported codec)
/// is reported as a single descriptive error string; the caller wraps it
/// into its own error type.
pub fn decode_to_pcm16k(path: &Path) -> Result<Vec<f32>, String> {
    let ffmpeg = which::which("ffmpeg").map_err(|e| format!("ffmpeg not found: {e}"))?;

    let output = Command::new(ffmpeg)
        .args(["-v", "error"])
        .arg("-i")
        .arg(path)
        .args(["-f", "f32le", "-ac", "1"])
        .args(["-ar", &ASR_SAMPLE_RATE.to_string()])
        .arg("pipe:1")
        .output()
        .map_err(|e| format!("failed to run ffmpeg: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("ffmpeg exit {}: {}", output.status, stderr.trim()));
    }

    let samples: Vec<f32> = output
        .stdout
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    if samples.is_empty() {
        return Err("no audio samples decoded".into());
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        // Regardless of whether ffmpeg is installed, this must not succeed.
        assert!(decode_to_pcm16k(Path::new("/nonexistent/clip.wav")).is_err());
    }
}
