//! Energy-based voice-activity detection.
//!
//! [`VadTrimmer`] strips leading and trailing silence from a decoded clip
//! before it reaches the speech model. Whisper-family models hallucinate on
//! long silent spans, and skipping them also shortens inference.
//!
//! Audio is scanned in 30 ms frames (480 samples at 16 kHz); a frame counts
//! as voice when its RMS amplitude exceeds the threshold. The trimmed span
//! runs from the first to the last voice frame.

/// Samples per analysis frame: 30 ms at 16 kHz.
const FRAME_SAMPLES: usize = 480;

// ---------------------------------------------------------------------------
// VadTrimmer
// ---------------------------------------------------------------------------

/// Silence trimmer applied ahead of transcription.
#[derive(Debug, Clone, Copy)]
pub struct VadTrimmer {
    /// RMS amplitude below which a frame is treated as silence.
    threshold: f32,
}

impl VadTrimmer {
    /// `threshold` is an RMS amplitude in `[0.0, 1.0]`; `0.01` suits quiet
    /// recordings, `0.02`–`0.05` noisy ones.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn frame_has_voice(&self, frame: &[f32]) -> bool {
        if frame.is_empty() {
            return false;
        }
        let mean_sq = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        mean_sq.sqrt() > self.threshold
    }

    /// Return the sub-slice of `audio` spanning first to last voice frame.
    ///
    /// A fully silent clip yields an empty slice; no allocation either way.
    pub fn trim<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let frames = audio.chunks(FRAME_SAMPLES);
        let voiced: Vec<bool> = frames.map(|f| self.frame_has_voice(f)).collect();

        let first = match voiced.iter().position(|&v| v) {
            Some(i) => i,
            None => return &audio[0..0],
        };
        let last = voiced.iter().rposition(|&v| v).unwrap_or(first);

        let start = first * FRAME_SAMPLES;
        let end = ((last + 1) * FRAME_SAMPLES).min(audio.len());
        &audio[start..end]
    }
}

impl Default for VadTrimmer {
    fn default() -> Self {
        Self::new(0.01)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(pre: usize, voice: usize, post: usize) -> Vec<f32> {
        let mut v = vec![0.0_f32; pre];
        v.extend(std::iter::repeat(0.5_f32).take(voice));
        v.extend(std::iter::repeat(0.0_f32).take(post));
        v
    }

    #[test]
    fn trims_leading_and_trailing_silence() {
        let audio = clip(FRAME_SAMPLES * 2, FRAME_SAMPLES, FRAME_SAMPLES * 3);
        let trimmed = VadTrimmer::default().trim(&audio);
        assert_eq!(trimmed.len(), FRAME_SAMPLES);
        assert!(trimmed.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn all_silence_yields_empty_slice() {
        let audio = vec![0.0_f32; FRAME_SAMPLES * 4];
        assert!(VadTrimmer::default().trim(&audio).is_empty());
    }

    #[test]
    fn all_voice_is_untouched() {
        let audio = vec![0.5_f32; FRAME_SAMPLES * 4];
        assert_eq!(VadTrimmer::default().trim(&audio).len(), audio.len());
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(VadTrimmer::default().trim(&[]).is_empty());
    }

    #[test]
    fn partial_final_frame_is_kept() {
        // Voice extends into a final frame shorter than FRAME_SAMPLES.
        let mut audio = vec![0.0_f32; FRAME_SAMPLES];
        audio.extend(vec![0.5_f32; FRAME_SAMPLES + 100]);
        let trimmed = VadTrimmer::default().trim(&audio);
        assert_eq!(trimmed.len(), FRAME_SAMPLES + 100);
    }

    #[test]
    fn threshold_controls_sensitivity() {
        let quiet = vec![0.02_f32; FRAME_SAMPLES * 2];
        assert!(VadTrimmer::new(0.05).trim(&quiet).is_empty());
        assert!(!VadTrimmer::new(0.01).trim(&quiet).is_empty());
    }
}
