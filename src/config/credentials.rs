//! Feishu/DashScope credential resolution.
//!
//! Resolution order for every field, first hit wins:
//!
//! 1. explicit value handed to the constructor (e.g. from CLI flags),
//! 2. environment variable,
//! 3. `openclaw.json` under `channels.feishu` — checked at
//!    `~/.openclaw/openclaw.json`, then `./openclaw.json`.

use std::path::Path;

use serde::Deserialize;

use super::paths::openclaw_candidates;

pub const ENV_APP_ID: &str = "FEISHU_APP_ID";
pub const ENV_APP_SECRET: &str = "FEISHU_APP_SECRET";
pub const ENV_TARGET_USER: &str = "FEISHU_TARGET_USER";
pub const ENV_DASHSCOPE_KEY: &str = "DASHSCOPE_API_KEY";

// ---------------------------------------------------------------------------
// openclaw.json shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct OpenclawFile {
    #[serde(default)]
    channels: OpenclawChannels,
}

#[derive(Debug, Default, Deserialize)]
struct OpenclawChannels {
    #[serde(default)]
    feishu: OpenclawFeishu,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenclawFeishu {
    app_id: Option<String>,
    app_secret: Option<String>,
    #[serde(default)]
    allow_from: Vec<String>,
    dashscope_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolved secrets and the default recipient.
///
/// Any field may stay `None`; the components that need a missing field fail
/// with their own descriptive error when actually used.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Feishu application id.
    pub app_id: Option<String>,
    /// Feishu application secret.
    pub app_secret: Option<String>,
    /// Default recipient `open_id` for voice messages.
    pub target_user: Option<String>,
    /// DashScope API key for the cloud TTS backend.
    pub dashscope_api_key: Option<String>,
}

impl Credentials {
    /// Resolve against the environment and the standard `openclaw.json`
    /// locations, starting from explicitly supplied values.
    pub fn resolve(explicit: Credentials) -> Self {
        Self::resolve_with(explicit, &openclaw_candidates())
    }

    /// Resolution with explicit config-file candidates (used in tests).
    pub fn resolve_with(mut creds: Credentials, config_files: &[impl AsRef<Path>]) -> Self {
        creds.fill_from_env();

        if creds.is_complete() {
            return creds;
        }
        for path in config_files {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            match Self::read_openclaw(path) {
                Ok(file) => {
                    creds.fill_from_file(file);
                    break;
                }
                Err(e) => {
                    log::warn!("failed to load config from {}: {e}", path.display());
                }
            }
        }
        creds
    }

    fn fill_from_env(&mut self) {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        self.app_id = self.app_id.take().or_else(|| env(ENV_APP_ID));
        self.app_secret = self.app_secret.take().or_else(|| env(ENV_APP_SECRET));
        self.target_user = self.target_user.take().or_else(|| env(ENV_TARGET_USER));
        self.dashscope_api_key = self
            .dashscope_api_key
            .take()
            .or_else(|| env(ENV_DASHSCOPE_KEY));
    }

    fn read_openclaw(path: &Path) -> anyhow::Result<OpenclawFeishu> {
        let content = std::fs::read_to_string(path)?;
        let file: OpenclawFile = serde_json::from_str(&content)?;
        Ok(file.channels.feishu)
    }

    fn fill_from_file(&mut self, feishu: OpenclawFeishu) {
        self.app_id = self.app_id.take().or(feishu.app_id);
        self.app_secret = self.app_secret.take().or(feishu.app_secret);
        self.target_user = self
            .target_user
            .take()
            .or_else(|| feishu.allow_from.first().cloned());
        self.dashscope_api_key = self.dashscope_api_key.take().or(feishu.dashscope_api_key);
    }

    fn is_complete(&self) -> bool {
        self.app_id.is_some()
            && self.app_secret.is_some()
            && self.target_user.is_some()
            && self.dashscope_api_key.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "channels": {
            "feishu": {
                "appId": "cli_abc",
                "appSecret": "s3cret",
                "allowFrom": ["ou_first", "ou_second"],
                "dashscopeApiKey": "sk-dash"
            }
        }
    }"#;

    #[test]
    fn explicit_values_win_over_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("openclaw.json");
        std::fs::write(&file, SAMPLE).unwrap();

        let creds = Credentials::resolve_with(
            Credentials {
                app_id: Some("cli_explicit".into()),
                ..Default::default()
            },
            &[&file],
        );

        assert_eq!(creds.app_id.as_deref(), Some("cli_explicit"));
        assert_eq!(creds.app_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn file_fills_missing_fields_and_takes_first_allowed_user() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("openclaw.json");
        std::fs::write(&file, SAMPLE).unwrap();

        let creds = Credentials::resolve_with(Credentials::default(), &[&file]);
        assert_eq!(creds.app_id.as_deref(), Some("cli_abc"));
        assert_eq!(creds.target_user.as_deref(), Some("ou_first"));
        assert_eq!(creds.dashscope_api_key.as_deref(), Some("sk-dash"));
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let present = dir.path().join("openclaw.json");
        std::fs::write(&present, SAMPLE).unwrap();

        let creds = Credentials::resolve_with(Credentials::default(), &[&missing, &present]);
        assert_eq!(creds.app_id.as_deref(), Some("cli_abc"));
    }

    #[test]
    fn malformed_file_is_skipped_gracefully() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("openclaw.json");
        std::fs::write(&bad, "{ not json").unwrap();

        let creds = Credentials::resolve_with(Credentials::default(), &[&bad]);
        assert!(creds.app_id.is_none());
    }

    #[test]
    fn missing_sections_default_cleanly() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("openclaw.json");
        std::fs::write(&file, r#"{"channels": {}}"#).unwrap();

        let creds = Credentials::resolve_with(Credentials::default(), &[&file]);
        assert!(creds.app_id.is_none());
        assert!(creds.target_user.is_none());
    }
}
