//! Voice Cloning Port - 外部音色克隆服务抽象

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::voice::VoiceName;

use super::AudioSample;

/// 克隆服务错误
///
/// 服务端返回的原始内容保存在 `payload` 中，原样转发给调用方
#[derive(Debug, Error)]
pub enum CloningError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}")]
    ServiceError { status: u16, payload: Value },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String, payload: Value },

    #[error("IO error: {0}")]
    IoError(String),
}

impl CloningError {
    /// 服务端原始返回（如果有）
    pub fn payload(&self) -> Option<&Value> {
        match self {
            CloningError::ServiceError { payload, .. }
            | CloningError::InvalidResponse { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// 克隆成功的音色
#[derive(Debug, Clone)]
pub struct ClonedVoice {
    pub voice_id: String,
    pub requires_verification: bool,
    /// 服务端原始响应
    pub raw: Value,
}

/// Voice Cloning Port
#[async_trait]
pub trait VoiceCloningPort: Send + Sync {
    /// 上传参考音频创建新音色
    ///
    /// `api_key` 每次调用时传入，适配器本身不持有凭据
    async fn add_voice(
        &self,
        api_key: &str,
        name: &VoiceName,
        sample: &AudioSample,
    ) -> Result<ClonedVoice, CloningError>;
}
