//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\feishu-voice\
//!   macOS:   ~/Library/Application Support/feishu-voice/
//!   Linux:   ~/.config/feishu-voice/
//!
//! Data dir (models):
//!   Windows: %LOCALAPPDATA%\feishu-voice\
//!   macOS:   ~/Library/Application Support/feishu-voice/
//!   Linux:   ~/.local/share/feishu-voice/
//!
//! Credentials additionally come from `openclaw.json`, looked up at a fixed
//! home-directory path and then the current directory — see
//! [`openclaw_candidates`].

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for speech model files (whisper `.bin`, piper `.onnx`).
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "feishu-voice";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            models_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate locations for `openclaw.json`, in lookup order: the fixed
/// home-directory path, then the current working directory.
pub fn openclaw_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".openclaw").join("openclaw.json"));
    }
    candidates.push(PathBuf::from("openclaw.json"));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths.models_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
    }

    #[test]
    fn openclaw_candidates_end_with_cwd_file() {
        let candidates = openclaw_candidates();
        assert!(!candidates.is_empty());
        assert_eq!(
            candidates.last().unwrap(),
            &PathBuf::from("openclaw.json")
        );
    }
}
