//! Data Transfer Objects

use serde::Serialize;
use serde_json::Value;

/// 克隆成功响应
#[derive(Debug, Serialize)]
pub struct CloneVoiceSuccess {
    pub success: bool,
    #[serde(rename = "voiceId")]
    pub voice_id: String,
}

impl CloneVoiceSuccess {
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self {
            success: true,
            voice_id: voice_id.into(),
        }
    }
}

/// 错误响应
///
/// `error` 为可读消息，或克隆服务原样返回的错误内容
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: Value,
    pub stage: &'static str,
}
