//! Feishu (Lark) open-platform client.

pub mod client;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use client::{FeishuClient, FeishuError, SendReceipt, FEISHU_API_BASE};
