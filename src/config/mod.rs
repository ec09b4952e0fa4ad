//! Configuration: application settings (TOML), path resolution, and
//! credential lookup.

pub mod credentials;
pub mod paths;
pub mod settings;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use credentials::{
    Credentials, ENV_APP_ID, ENV_APP_SECRET, ENV_DASHSCOPE_KEY, ENV_TARGET_USER,
};
pub use paths::{openclaw_candidates, AppPaths};
pub use settings::{AppConfig, AsrConfig, FeishuConfig, SendConfig, TtsConfig};
