//! Backend dispatch: resolve a requested voice, pick the engine that serves
//! it, and fall back to the other engine's default voice when the first
//! choice is unavailable.

use std::path::Path;
use std::sync::Arc;

use crate::config::TtsConfig;
use crate::tts::cosyvoice::CosyVoiceBackend;
use crate::tts::engine::{Availability, EngineAvailability, TtsBackend, TtsError};
use crate::tts::piper::PiperBackend;
use crate::tts::voice::{self, default_voice, EngineKind, Voice};

// ---------------------------------------------------------------------------
// TtsDispatcher
// ---------------------------------------------------------------------------

/// Routes synthesis requests to the cloud or local backend.
///
/// Backends are probed once at construction ([`TtsDispatcher::from_config`])
/// and injected as `None` when unavailable; dispatch never re-checks the
/// environment.
pub struct TtsDispatcher {
    cloud: Option<Arc<dyn TtsBackend>>,
    local: Option<Arc<dyn TtsBackend>>,
    availability: EngineAvailability,
}

impl TtsDispatcher {
    /// Probe both backends from config and construct whichever are usable.
    pub fn from_config(config: &TtsConfig, api_key: Option<&str>) -> Self {
        let cloud_availability = CosyVoiceBackend::probe(api_key);
        let voices_dir = config.piper_voices_dir();
        let local_availability = PiperBackend::probe(&voices_dir);

        let cloud: Option<Arc<dyn TtsBackend>> = match (&cloud_availability, api_key) {
            (Availability::Available, Some(key)) => {
                Some(Arc::new(CosyVoiceBackend::new(key)))
            }
            _ => None,
        };

        let local: Option<Arc<dyn TtsBackend>> = if local_availability.is_available() {
            PiperBackend::new(&voices_dir).ok().map(|b| {
                let b: Arc<dyn TtsBackend> = Arc::new(b);
                b
            })
        } else {
            None
        };

        let availability = EngineAvailability {
            cloud: cloud_availability,
            local: local_availability,
        };

        if !availability.any_available() {
            log::warn!("no TTS engine available ({})", availability.summary());
        } else {
            log::info!("TTS engines: {}", availability.summary());
        }

        Self {
            cloud,
            local,
            availability,
        }
    }

    /// Construct from explicit backends — the injection seam used by tests
    /// and by callers that probe on their own.
    pub fn with_backends(
        cloud: Option<Arc<dyn TtsBackend>>,
        local: Option<Arc<dyn TtsBackend>>,
    ) -> Self {
        let describe = |present: bool| {
            if present {
                Availability::Available
            } else {
                Availability::Unavailable("not configured".into())
            }
        };
        let availability = EngineAvailability {
            cloud: describe(cloud.is_some()),
            local: describe(local.is_some()),
        };
        Self {
            cloud,
            local,
            availability,
        }
    }

    /// Probe results recorded at construction time.
    pub fn availability(&self) -> &EngineAvailability {
        &self.availability
    }

    /// Resolve an optional voice request to a catalog entry.
    ///
    /// `None` picks the default voice of the preferred available engine;
    /// a known id resolves to itself; anything else is treated as a
    /// description and matched against the catalog.
    pub fn resolve_voice(&self, requested: Option<&str>) -> &'static Voice {
        match requested {
            Some(id_or_description) => match voice::find_voice(id_or_description) {
                Some(v) => v,
                None => voice::match_voice(id_or_description),
            },
            None => {
                if self.cloud.is_some() || self.local.is_none() {
                    default_voice(EngineKind::CosyVoice)
                } else {
                    default_voice(EngineKind::Piper)
                }
            }
        }
    }

    fn backend_for(&self, kind: EngineKind) -> Option<&Arc<dyn TtsBackend>> {
        match kind {
            EngineKind::CosyVoice => self.cloud.as_ref(),
            EngineKind::Piper => self.local.as_ref(),
        }
    }

    fn other(kind: EngineKind) -> EngineKind {
        match kind {
            EngineKind::CosyVoice => EngineKind::Piper,
            EngineKind::Piper => EngineKind::CosyVoice,
        }
    }

    /// Synthesize `text` into `output`, honouring the requested voice where
    /// possible. Returns the voice actually used.
    ///
    /// # Errors
    ///
    /// - [`TtsError::NoEngineAvailable`] — neither backend can run;
    /// - any backend error from the attempted synthesis.
    pub async fn synthesize(
        &self,
        text: &str,
        requested_voice: Option<&str>,
        output: &Path,
    ) -> Result<&'static Voice, TtsError> {
        let mut voice = self.resolve_voice(requested_voice);

        let backend = match self.backend_for(voice.engine) {
            Some(b) => b,
            None => {
                // Preferred engine is down: fall back to the other engine's
                // default voice if that one is usable.
                let fallback_kind = Self::other(voice.engine);
                match self.backend_for(fallback_kind) {
                    Some(b) => {
                        let fallback = default_voice(fallback_kind);
                        log::warn!(
                            "{} backend unavailable; falling back to {} voice {}",
                            voice.engine.label(),
                            fallback_kind.label(),
                            fallback.id
                        );
                        voice = fallback;
                        b
                    }
                    None => {
                        return Err(TtsError::NoEngineAvailable(
                            self.availability.summary(),
                        ));
                    }
                }
            }
        };

        backend.synthesize(text, voice.id, output).await?;
        Ok(voice)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
