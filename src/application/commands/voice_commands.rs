//! Voice Commands

use serde_json::Value;

use crate::application::error::CloneVoiceError;
use crate::domain::voice::CloneRequest;

/// 克隆音色命令
#[derive(Debug, Clone)]
pub struct CloneVoice {
    pub request: CloneRequest,
}

impl CloneVoice {
    pub fn new(request: CloneRequest) -> Self {
        Self { request }
    }

    /// 从请求体构造，校验失败返回 `InvalidInput`
    pub fn from_json(body: &Value) -> Result<Self, CloneVoiceError> {
        Ok(Self::new(CloneRequest::from_json(body)?))
    }
}
