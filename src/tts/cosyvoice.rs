//! CosyVoice cloud backend (DashScope synthesis API).
//!
//! Sends a JSON synthesis request with bearer authentication and receives the
//! complete MP3 body, which is only written to disk once fully received — a
//! failed call never leaves a partial file behind.

use std::path::Path;

use async_trait::async_trait;

use crate::tts::engine::{Availability, TtsBackend, TtsError};
use crate::tts::voice::EngineKind;

/// DashScope speech-synthesis endpoint.
pub const DASHSCOPE_TTS_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/audio/tts/generation";

/// Synthesis model identifier sent with every request.
pub const TTS_MODEL: &str = "cosyvoice-v1";

const REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// CosyVoiceBackend
// ---------------------------------------------------------------------------

/// Cloud TTS backend calling the DashScope CosyVoice API.
pub struct CosyVoiceBackend {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl CosyVoiceBackend {
    /// Build a backend against the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(api_key, DASHSCOPE_TTS_URL)
    }

    /// Build a backend against an explicit endpoint (used in tests).
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into(),
            url: url.into(),
        }
    }

    /// Probe whether the cloud backend can run at all.
    ///
    /// The only runtime requirement is a non-empty API key.
    pub fn probe(api_key: Option<&str>) -> Availability {
        match api_key {
            Some(key) if !key.trim().is_empty() => Availability::Available,
            _ => Availability::Unavailable("DashScope API key not configured".into()),
        }
    }
}

#[async_trait]
impl TtsBackend for CosyVoiceBackend {
    fn kind(&self) -> EngineKind {
        EngineKind::CosyVoice
    }

    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        output: &Path,
    ) -> Result<(), TtsError> {
        let body = serde_json::json!({
            "model": TTS_MODEL,
            "input": { "text": text },
            "parameters": { "voice": voice_id, "format": "mp3" }
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TtsError::Synthesis(format!(
                "CosyVoice returned {status}: {detail}"
            )));
        }

        // Buffer the whole body before touching the output path.
        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(TtsError::Synthesis("CosyVoice returned no audio".into()));
        }

        tokio::fs::write(output, &audio).await?;
        log::debug!(
            "cosyvoice: {} bytes written to {} (voice={voice_id})",
            audio.len(),
            output.display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
