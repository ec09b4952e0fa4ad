//! Piper local backend — offline neural synthesis via the `piper` binary.
//!
//! Text is fed on stdin; piper writes the audio itself, so synthesis goes to
//! a staging path that is renamed over the output only on success. A failed
//! run never leaves a file at the output path.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::tts::engine::{Availability, TtsBackend, TtsError};
use crate::tts::voice::EngineKind;

/// Name of the piper executable looked up on `PATH`.
pub const PIPER_BINARY: &str = "piper";

// ---------------------------------------------------------------------------
// PiperBackend
// ---------------------------------------------------------------------------

/// Local TTS backend wrapping a `piper` subprocess.
pub struct PiperBackend {
    binary: PathBuf,
    voices_dir: PathBuf,
}

impl PiperBackend {
    /// Create a backend using the given voices directory. The binary is
    /// resolved from `PATH`; call [`PiperBackend::probe`] first to get a
    /// diagnosable availability result.
    pub fn new(voices_dir: impl Into<PathBuf>) -> Result<Self, TtsError> {
        let binary = which::which(PIPER_BINARY).map_err(|e| {
            TtsError::NoEngineAvailable(format!("piper binary not found: {e}"))
        })?;
        Ok(Self {
            binary,
            voices_dir: voices_dir.into(),
        })
    }

    /// Probe whether the local backend can run: the `piper` binary must be on
    /// `PATH` and the voices directory must exist.
    pub fn probe(voices_dir: &Path) -> Availability {
        if which::which(PIPER_BINARY).is_err() {
            return Availability::Unavailable("piper binary not found on PATH".into());
        }
        if !voices_dir.is_dir() {
            return Availability::Unavailable(format!(
                "piper voices directory not found: {}",
                voices_dir.display()
            ));
        }
        Availability::Available
    }

    /// On-disk model file for a catalog voice id.
    fn model_path(&self, voice_id: &str) -> PathBuf {
        self.voices_dir.join(format!("{voice_id}.onnx"))
    }
}

#[async_trait]
impl TtsBackend for PiperBackend {
    fn kind(&self) -> EngineKind {
        EngineKind::Piper
    }

    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        output: &Path,
    ) -> Result<(), TtsError> {
        let model = self.model_path(voice_id);
        if !model.exists() {
            return Err(TtsError::Synthesis(format!(
                "piper voice model not found: {}",
                model.display()
            )));
        }

        // Piper streams straight to its output file, so stage and rename to
        // keep the no-partial-file contract.
        let staging = output.with_extension("part");

        let mut child = Command::new(&self.binary)
            .arg("--model")
            .arg(&model)
            .arg("--output_file")
            .arg(&staging)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TtsError::Synthesis(format!("failed to spawn piper: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // Close stdin so piper sees EOF and starts synthesis.
            drop(stdin);
        }

        let result = child
            .wait_with_output()
            .await
            .map_err(|e| TtsError::Synthesis(format!("piper did not exit cleanly: {e}")));

        match result {
            Ok(out) if out.status.success() => {
                tokio::fs::rename(&staging, output).await?;
                log::debug!(
                    "piper: synthesized {} chars to {} (voice={voice_id})",
                    text.chars().count(),
                    output.display()
                );
                Ok(())
            }
            Ok(out) => {
                let _ = tokio::fs::remove_file(&staging).await;
                let stderr = String::from_utf8_lossy(&out.stderr);
                Err(TtsError::Synthesis(format!(
                    "piper exited with {}: {}",
                    out.status,
                    stderr.trim()
                )))
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&staging).await;
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
