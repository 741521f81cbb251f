//! ElevenLabs Client - 调用 ElevenLabs 音色克隆 API
//!
//! 实现 VoiceCloningPort trait
//!
//! 外部 API:
//! POST https://api.elevenlabs.io/v1/voices/add
//! Header: xi-api-key
//! Request: multipart/form-data {name, files}
//! Response: {"voice_id": "...", "requires_verification": false}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde_json::Value;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::application::ports::{AudioSample, ClonedVoice, CloningError, VoiceCloningPort};
use crate::domain::voice::VoiceName;

/// 认证头
const API_KEY_HEADER: &str = "xi-api-key";

/// 无法识别上游类型时使用的 MIME
const FALLBACK_MIME: &str = "application/octet-stream";

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ElevenLabsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ElevenLabs 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsClientConfig) -> Result<Self, CloningError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CloningError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取添加音色 URL
    fn add_voice_url(&self) -> String {
        format!("{}/voices/add", self.config.base_url.trim_end_matches('/'))
    }

    /// 以流的方式从临时文件构造 `files` 表单项
    async fn file_part(sample: &AudioSample) -> Result<Part, CloningError> {
        let file = tokio::fs::File::open(sample.path())
            .await
            .map_err(|e| CloningError::IoError(format!("Failed to open audio: {}", e)))?;
        let body = Body::wrap_stream(ReaderStream::new(file));

        Part::stream_with_length(body, sample.len())
            .file_name(sample.file_name().to_string())
            .mime_str(&upload_mime(sample.content_type()))
            .map_err(|e| CloningError::IoError(format!("Invalid content type: {}", e)))
    }
}

/// 取上游 Content-Type 的主体部分，格式不合法时回退到 octet-stream
fn upload_mime(content_type: Option<&str>) -> String {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let valid = essence
        .split_once('/')
        .map(|(ty, sub)| {
            let token = |s: &str| {
                !s.is_empty()
                    && s.chars()
                        .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
            };
            token(ty) && token(sub)
        })
        .unwrap_or(false);

    if valid {
        essence
    } else {
        FALLBACK_MIME.to_string()
    }
}

fn map_request_error(e: reqwest::Error) -> CloningError {
    if e.is_timeout() {
        CloningError::Timeout
    } else if e.is_connect() {
        CloningError::NetworkError(format!("Cannot connect to ElevenLabs: {}", e))
    } else {
        CloningError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl VoiceCloningPort for ElevenLabsClient {
    async fn add_voice(
        &self,
        api_key: &str,
        name: &VoiceName,
        sample: &AudioSample,
    ) -> Result<ClonedVoice, CloningError> {
        let form = Form::new()
            .text("name", name.as_str().to_string())
            .part("files", Self::file_part(sample).await?);

        tracing::debug!(
            url = %self.add_voice_url(),
            name = %name,
            bytes = sample.len(),
            "Sending voice clone request"
        );

        let response = self
            .client
            .post(self.add_voice_url())
            .header(API_KEY_HEADER, api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_request_error)?;
        let payload = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            return Err(CloningError::ServiceError {
                status: status.as_u16(),
                payload,
            });
        }

        let voice_id = match payload.get("voice_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(CloningError::InvalidResponse {
                    message: "response has no voice_id".to_string(),
                    payload,
                });
            }
        };
        let requires_verification = payload
            .get("requires_verification")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if requires_verification {
            tracing::warn!(voice_id = %voice_id, "Cloned voice requires verification");
        }

        Ok(ClonedVoice {
            voice_id,
            requires_verification,
            raw: payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample(bytes: &[u8], content_type: Option<&str>) -> AudioSample {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), bytes).unwrap();
        AudioSample::new(
            file.into_temp_path(),
            bytes.len() as u64,
            "alice.m4a",
            content_type.map(|s| s.to_string()),
        )
    }

    fn client(server: &MockServer) -> ElevenLabsClient {
        ElevenLabsClient::new(ElevenLabsClientConfig::new(format!("{}/v1", server.uri()))).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ElevenLabsClientConfig::default();
        assert_eq!(config.base_url, "https://api.elevenlabs.io/v1");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_upload_mime() {
        assert_eq!(upload_mime(Some("audio/mp4; codecs=mp4a")), "audio/mp4");
        assert_eq!(upload_mime(Some("Audio/MPEG")), "audio/mpeg");
        assert_eq!(upload_mime(Some("garbage")), FALLBACK_MIME);
        assert_eq!(upload_mime(None), FALLBACK_MIME);
    }

    #[tokio::test]
    async fn test_add_voice_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/voices/add"))
            .and(header("xi-api-key", "secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"voice_id": "v123", "requires_verification": false})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let voice = client(&server)
            .add_voice(
                "secret",
                &VoiceName::new("alice").unwrap(),
                &sample(b"m4a-bytes", Some("audio/mp4")),
            )
            .await
            .unwrap();

        assert_eq!(voice.voice_id, "v123");
        assert!(!voice.requires_verification);

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"name\""));
        assert!(body.contains("alice"));
        assert!(body.contains("name=\"files\"; filename=\"alice.m4a\""));
        assert!(body.contains("audio/mp4"));
        assert!(body.contains("m4a-bytes"));
    }

    #[tokio::test]
    async fn test_missing_voice_id_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .add_voice("k", &VoiceName::new("alice").unwrap(), &sample(b"x", None))
            .await
            .unwrap_err();

        match err {
            CloningError::InvalidResponse { payload, .. } => {
                assert_eq!(payload, json!({"status": "queued"}));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_payload_is_forwarded() {
        let server = MockServer::start().await;
        let detail = json!({"detail": {"status": "invalid_api_key", "message": "Invalid API key"}});
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(detail.clone()))
            .mount(&server)
            .await;

        let err = client(&server)
            .add_voice("bad", &VoiceName::new("alice").unwrap(), &sample(b"x", None))
            .await
            .unwrap_err();

        match err {
            CloningError::ServiceError { status, payload } => {
                assert_eq!(status, 401);
                assert_eq!(payload, detail);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_is_forwarded_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server)
            .add_voice("k", &VoiceName::new("alice").unwrap(), &sample(b"x", None))
            .await
            .unwrap_err();

        assert_eq!(err.payload(), Some(&Value::String("Bad Gateway".to_string())));
    }
}
