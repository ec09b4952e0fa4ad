//! HTTP client for the Feishu open platform: token exchange, voice file
//! upload, and audio message delivery.
//!
//! Every endpoint responds with a JSON envelope carrying a numeric `code`
//! (`0` = success) and a `msg`; transport and envelope failures are collapsed
//! into one descriptive error per operation so callers never see raw
//! `reqwest` errors.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{Credentials, FeishuConfig};

/// Production open-platform API base.
pub const FEISHU_API_BASE: &str = "https://open.feishu.cn/open-apis";

// ---------------------------------------------------------------------------
// FeishuError
// ---------------------------------------------------------------------------

/// All errors that can arise from the platform client.
#[derive(Debug, Error)]
pub enum FeishuError {
    /// `app_id` / `app_secret` are not configured.
    #[error("Feishu credentials missing: {0}")]
    MissingCredentials(&'static str),

    /// No recipient was supplied and none is configured.
    #[error("target user not specified")]
    MissingRecipient,

    /// The token endpoint refused the credential exchange.
    #[error("failed to get tenant access token: {0}")]
    Token(String),

    /// The file upload was rejected.
    #[error("upload failed: {0}")]
    Upload(String),

    /// The message send was rejected.
    #[error("send failed: {0}")]
    Send(String),

    /// HTTP transport or connection error.
    #[error("Feishu request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("Feishu request timed out")]
    Timeout,

    /// Reading the audio file to upload failed.
    #[error("failed to read upload payload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FeishuError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FeishuError::Timeout
        } else {
            FeishuError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    file_key: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<SendData>,
}

#[derive(Debug, Deserialize)]
struct SendData {
    message_id: String,
    chat_id: Option<String>,
}

/// Result of one delivered voice message.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: String,
    pub chat_id: Option<String>,
}

// ---------------------------------------------------------------------------
// FeishuClient
// ---------------------------------------------------------------------------

/// Thin client over the three open-platform endpoints the voice pipeline
/// needs. Holds no token state — the caller fetches a token once per logical
/// send and passes it back in.
pub struct FeishuClient {
    client: reqwest::Client,
    base_url: String,
    app_id: Option<String>,
    app_secret: Option<String>,
}

impl FeishuClient {
    /// Build a client from resolved credentials and settings.
    pub fn new(credentials: &Credentials, config: &FeishuConfig) -> Self {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if config.accept_invalid_certs {
            // Development-only escape hatch; off by default.
            log::warn!("TLS certificate verification is disabled for Feishu calls");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            app_id: credentials.app_id.clone(),
            app_secret: credentials.app_secret.clone(),
        }
    }

    /// Exchange application credentials for a short-lived tenant token.
    pub async fn tenant_access_token(&self) -> Result<String, FeishuError> {
        let app_id = self
            .app_id
            .as_deref()
            .ok_or(FeishuError::MissingCredentials("app_id"))?;
        let app_secret = self
            .app_secret
            .as_deref()
            .ok_or(FeishuError::MissingCredentials("app_secret"))?;

        let url = format!("{}/auth/v3/tenant_access_token/internal", self.base_url);
        let body = serde_json::json!({
            "app_id": app_id,
            "app_secret": app_secret,
        });

        let response: TokenResponse = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| FeishuError::Token(format!("unparseable response: {e}")))?;

        match (response.code, response.tenant_access_token) {
            (0, Some(token)) => Ok(token),
            (code, _) => Err(FeishuError::Token(format!(
                "code {code}: {}",
                response.msg
            ))),
        }
    }

    /// Upload an Opus voice file; returns the platform's `file_key`.
    ///
    /// The multipart field names and their order (`file_type`, `file_name`,
    /// `duration`, `file`) are part of the wire contract.
    pub async fn upload_voice(
        &self,
        token: &str,
        path: &Path,
        duration_ms: u64,
    ) -> Result<String, FeishuError> {
        let bytes = tokio::fs::read(path).await?;

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name("voice.opus")
            .mime_str("audio/opus")?;

        let form = reqwest::multipart::Form::new()
            .text("file_type", "opus")
            .text("file_name", "voice.opus")
            .text("duration", duration_ms.to_string())
            .part("file", file_part);

        let url = format!("{}/im/v1/files", self.base_url);
        let response: UploadResponse = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| FeishuError::Upload(format!("unparseable response: {e}")))?;

        match (response.code, response.data) {
            (0, Some(data)) => Ok(data.file_key),
            (code, _) => Err(FeishuError::Upload(format!(
                "code {code}: {}",
                response.msg
            ))),
        }
    }

    /// Send an uploaded voice file as an audio message to `receive_id`.
    pub async fn send_voice_message(
        &self,
        token: &str,
        file_key: &str,
        duration_ms: u64,
        receive_id: &str,
    ) -> Result<SendReceipt, FeishuError> {
        if receive_id.is_empty() {
            return Err(FeishuError::MissingRecipient);
        }

        // The content field is itself a JSON-encoded string.
        let content = serde_json::json!({
            "file_key": file_key,
            "duration": duration_ms,
        })
        .to_string();

        let body = serde_json::json!({
            "receive_id": receive_id,
            "content": content,
            "msg_type": "audio",
        });

        let url = format!("{}/im/v1/messages", self.base_url);
        let response: SendResponse = self
            .client
            .post(&url)
            .query(&[("receive_id_type", "open_id")])
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| FeishuError::Send(format!("unparseable response: {e}")))?;

        match (response.code, response.data) {
            (0, Some(data)) => Ok(SendReceipt {
                message_id: data.message_id,
                chat_id: data.chat_id,
            }),
            (code, _) => Err(FeishuError::Send(format!(
                "code {code}: {}",
                response.msg
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> FeishuClient {
        let credentials = Credentials {
            app_id: Some("cli_test".into()),
            app_secret: Some("secret".into()),
            ..Default::default()
        };
        let config = FeishuConfig {
            api_base: base_url.into(),
            timeout_secs: 5,
            accept_invalid_certs: false,
        };
        FeishuClient::new(&credentials, &config)
    }

    #[tokio::test]
    async fn token_exchange_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v3/tenant_access_token/internal")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "app_id": "cli_test",
                "app_secret": "secret",
            })))
            .with_body(r#"{"code":0,"msg":"ok","tenant_access_token":"t-abc"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let token = client.tenant_access_token().await.unwrap();
        assert_eq!(token, "t-abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn token_exchange_error_code_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/v3/tenant_access_token/internal")
            .with_body(r#"{"code":99991663,"msg":"app not found"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.tenant_access_token().await.unwrap_err();
        match err {
            FeishuError::Token(msg) => assert!(msg.contains("app not found")),
            other => panic!("expected Token error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let config = FeishuConfig::default();
        let client = FeishuClient::new(&Credentials::default(), &config);
        let err = client.tenant_access_token().await.unwrap_err();
        assert!(matches!(err, FeishuError::MissingCredentials("app_id")));
    }

    #[tokio::test]
    async fn upload_sends_contract_fields_and_returns_file_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/im/v1/files")
            .match_header("authorization", "Bearer t-abc")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex(r#"name="file_type""#.into()),
                mockito::Matcher::Regex("opus".into()),
                mockito::Matcher::Regex(r#"name="file_name""#.into()),
                mockito::Matcher::Regex(r#"name="duration""#.into()),
                mockito::Matcher::Regex("4321".into()),
                mockito::Matcher::Regex(r#"filename="voice.opus""#.into()),
            ]))
            .with_body(r#"{"code":0,"msg":"ok","data":{"file_key":"fk-1"}}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("voice.opus");
        std::fs::write(&audio, b"opus-bytes").unwrap();

        let client = test_client(&server.url());
        let key = client.upload_voice("t-abc", &audio, 4321).await.unwrap();
        assert_eq!(key, "fk-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_error_code_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/im/v1/files")
            .with_body(r#"{"code":234001,"msg":"file type invalid"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("voice.opus");
        std::fs::write(&audio, b"x").unwrap();

        let client = test_client(&server.url());
        let err = client.upload_voice("t", &audio, 1000).await.unwrap_err();
        assert!(matches!(err, FeishuError::Upload(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn send_posts_nested_content_and_receive_id_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/im/v1/messages")
            .match_query(mockito::Matcher::UrlEncoded(
                "receive_id_type".into(),
                "open_id".into(),
            ))
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "receive_id": "ou_123",
                "msg_type": "audio",
            })))
            .with_body(
                r#"{"code":0,"msg":"ok","data":{"message_id":"om_1","chat_id":"oc_9"}}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let receipt = client
            .send_voice_message("t-abc", "fk-1", 4321, "ou_123")
            .await
            .unwrap();
        assert_eq!(receipt.message_id, "om_1");
        assert_eq!(receipt.chat_id.as_deref(), Some("oc_9"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_without_recipient_is_rejected_locally() {
        let client = test_client("http://localhost:1");
        let err = client
            .send_voice_message("t", "fk", 1000, "")
            .await
            .unwrap_err();
        assert!(matches!(err, FeishuError::MissingRecipient));
    }

    #[test]
    fn content_field_is_json_encoded_string() {
        // Wire contract: the message content is a string containing JSON,
        // not a nested object.
        let content = serde_json::json!({"file_key": "fk", "duration": 5000}).to_string();
        let body = serde_json::json!({"receive_id": "ou", "content": content, "msg_type": "audio"});
        assert!(body["content"].is_string());
        let inner: serde_json::Value =
            serde_json::from_str(body["content"].as_str().unwrap()).unwrap();
        assert_eq!(inner["file_key"], "fk");
        assert_eq!(inner["duration"], 5000);
    }
}
