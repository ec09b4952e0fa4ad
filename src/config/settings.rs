//! Application settings structs, defaults and TOML persistence.
//!
//! These are the non-secret knobs (endpoints, defaults, model selection).
//! Credentials are resolved separately — see [`crate::config::credentials`].

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the TTS dispatcher and its backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Voice used when the caller requests none (catalog id).
    pub default_voice: String,
    /// Directory holding piper `.onnx` voice models. `None` means
    /// `<models_dir>/piper`.
    pub piper_voices_dir: Option<PathBuf>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            default_voice: crate::tts::voice::DEFAULT_VOICE.into(),
            piper_voices_dir: None,
        }
    }
}

impl TtsConfig {
    /// Effective piper voices directory.
    pub fn piper_voices_dir(&self) -> PathBuf {
        self.piper_voices_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().models_dir.join("piper"))
    }
}

// ---------------------------------------------------------------------------
// FeishuConfig
// ---------------------------------------------------------------------------

/// Non-secret Feishu client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeishuConfig {
    /// Open-platform API base, without a trailing slash.
    pub api_base: String,
    /// Per-request timeout for token/upload/send calls.
    pub timeout_secs: u64,
    /// Disable TLS certificate verification. The original implementation did
    /// this unconditionally; here it is opt-in and off by default.
    pub accept_invalid_certs: bool,
}

impl Default for FeishuConfig {
    fn default() -> Self {
        Self {
            api_base: crate::feishu::FEISHU_API_BASE.into(),
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

// ---------------------------------------------------------------------------
// SendConfig
// ---------------------------------------------------------------------------

/// Defaults for the voice-send pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SendConfig {
    /// Split long text into multiple voice messages.
    pub auto_split: bool,
    /// Maximum characters per segment (60–100 ≈ 15–25 s of speech).
    pub max_segment_chars: usize,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            auto_split: true,
            max_segment_chars: 80,
        }
    }
}

// ---------------------------------------------------------------------------
// AsrConfig
// ---------------------------------------------------------------------------

/// Settings for the local speech-recognition engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsrConfig {
    /// Model name / file stem under the models directory (`<model>.bin`).
    pub model: String,
    /// ISO-639-1 language code, or `"auto"` for built-in detection.
    pub language: String,
    /// RMS threshold for the VAD silence trimmer.
    pub vad_threshold: f32,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            model: "ggml-whisper-small".into(),
            language: "auto".into(),
            vad_threshold: 0.01,
        }
    }
}

impl AsrConfig {
    /// Resolve the model file path under `paths`.
    pub fn model_path(&self, paths: &AppPaths) -> PathBuf {
        paths.models_dir.join(format!("{}.bin", self.model))
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tts: TtsConfig,
    pub feishu: FeishuConfig,
    pub send: SendConfig,
    pub asr: AsrConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet so
    /// callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.tts.default_voice, "longwan");
        assert_eq!(cfg.feishu.api_base, "https://open.feishu.cn/open-apis");
        assert_eq!(cfg.feishu.timeout_secs, 30);
        assert!(!cfg.feishu.accept_invalid_certs);
        assert!(cfg.send.auto_split);
        assert_eq!(cfg.send.max_segment_chars, 80);
        assert_eq!(cfg.asr.language, "auto");
    }

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let mut original = AppConfig::default();
        original.tts.default_voice = "longfei".into();
        original.send.max_segment_chars = 120;
        original.feishu.timeout_secs = 10;
        original.asr.model = "ggml-whisper-medium".into();

        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.tts.default_voice, "longfei");
        assert_eq!(loaded.send.max_segment_chars, 120);
        assert_eq!(loaded.feishu.timeout_secs, 10);
        assert_eq!(loaded.asr.model, "ggml-whisper-medium");
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let cfg = AppConfig::load_from(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(cfg.send.max_segment_chars, 80);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[send]\nmax_segment_chars = 40\n").unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.send.max_segment_chars, 40);
        assert_eq!(cfg.tts.default_voice, "longwan");
    }
}
