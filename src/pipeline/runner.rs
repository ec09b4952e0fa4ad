//! The [`VoiceSender`] orchestrator.

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{TranscodeError, Transcoder};
use crate::feishu::{FeishuClient, FeishuError, SendReceipt};
use crate::text::split_text;
use crate::tts::{TtsDispatcher, TtsError};

// ---------------------------------------------------------------------------
// SendError
// ---------------------------------------------------------------------------

/// A failure anywhere in the send pipeline. Each stage keeps its own error
/// type; this enum just strings them together for the caller.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("nothing to send: text is empty")]
    EmptyText,

    #[error(transparent)]
    Tts(#[from] TtsError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Feishu(#[from] FeishuError),

    #[error("scratch directory error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// SendOptions
// ---------------------------------------------------------------------------

/// Per-call options for [`VoiceSender::send_voice`].
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Voice id or free-form description; `None` uses the engine default.
    pub voice: Option<String>,
    /// Recipient `open_id`; `None` falls back to the configured default.
    pub target_user: Option<String>,
    /// Split long text into multiple messages.
    pub auto_split: bool,
    /// Character budget per segment.
    pub max_segment_chars: usize,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            voice: None,
            target_user: None,
            auto_split: true,
            max_segment_chars: 80,
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceSender
// ---------------------------------------------------------------------------

/// Owns the three collaborators of a voice send and runs them in order.
pub struct VoiceSender {
    dispatcher: TtsDispatcher,
    transcoder: Arc<dyn Transcoder>,
    client: FeishuClient,
    default_target: Option<String>,
}

impl VoiceSender {
    pub fn new(
        dispatcher: TtsDispatcher,
        transcoder: Arc<dyn Transcoder>,
        client: FeishuClient,
        default_target: Option<String>,
    ) -> Self {
        Self {
            dispatcher,
            transcoder,
            client,
            default_target,
        }
    }

    /// Synthesize `text` and deliver it as one or more voice messages.
    ///
    /// The tenant token is fetched once and reused for every segment;
    /// segments are uploaded and sent strictly in input order, and the first
    /// failure aborts the remaining segments.
    pub async fn send_voice(
        &self,
        text: &str,
        options: &SendOptions,
    ) -> Result<Vec<SendReceipt>, SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyText);
        }

        // Resolve the recipient before spending anything on synthesis.
        let target = options
            .target_user
            .as_deref()
            .or(self.default_target.as_deref())
            .ok_or(FeishuError::MissingRecipient)?
            .to_string();

        let segments =
            if options.auto_split && text.chars().count() > options.max_segment_chars {
                split_text(text, options.max_segment_chars)
            } else {
                vec![text.to_string()]
            };

        if segments.len() > 1 {
            log::info!("text split into {} segments", segments.len());
            for (i, seg) in segments.iter().enumerate() {
                let preview: String = seg.chars().take(40).collect();
                log::debug!("  segment {}: {preview}", i + 1);
            }
        }

        let token = self.client.tenant_access_token().await?;

        let mut receipts = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            if segments.len() > 1 {
                log::info!("sending segment {}/{}", i + 1, segments.len());
            }

            let workdir = tempfile::tempdir()?;
            let mp3_path = workdir.path().join("voice.mp3");
            let opus_path = workdir.path().join("voice.opus");

            let voice = self
                .dispatcher
                .synthesize(segment, options.voice.as_deref(), &mp3_path)
                .await?;
            log::debug!("synthesized segment {} with voice {}", i + 1, voice.id);

            // Duration is probed on the synthesized file, before transcoding.
            let duration_ms = self.transcoder.probe_duration_ms(&mp3_path).await;

            self.transcoder.to_opus(&mp3_path, &opus_path).await?;

            let file_key = self
                .client
                .upload_voice(&token, &opus_path, duration_ms)
                .await?;
            let receipt = self
                .client
                .send_voice_message(&token, &file_key, duration_ms, &target)
                .await?;

            log::info!("segment {} delivered: {}", i + 1, receipt.message_id);
            receipts.push(receipt);
        }

        Ok(receipts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
