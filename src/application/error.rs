//! 应用层错误定义
//!
//! 克隆流程各阶段的错误类型，全部为终止性错误，不做自动重试

use thiserror::Error;

use crate::application::ports::{CloningError, FetchError, StoreError};
use crate::domain::voice::VoiceError;

/// 克隆流程错误
#[derive(Debug, Error)]
pub enum CloneVoiceError {
    /// 请求体不合法
    #[error("{0}")]
    InvalidInput(String),

    /// 缺少必需的凭据配置
    #[error("Missing {0}")]
    Configuration(String),

    /// 下载参考音频失败
    #[error("Failed to fetch audio: {0}")]
    UpstreamFetch(#[from] FetchError),

    /// 克隆服务调用失败或返回不合法
    #[error("Cloning service error: {0}")]
    CloningService(#[from] CloningError),

    /// 外部音色已创建，但写入记录失败（不回滚）
    #[error("Failed to persist voiceId {voice_id}: {source}")]
    Persistence {
        voice_id: String,
        #[source]
        source: StoreError,
    },
}

impl CloneVoiceError {
    /// 出错阶段名称
    pub fn stage(&self) -> &'static str {
        match self {
            CloneVoiceError::InvalidInput(_) => "input",
            CloneVoiceError::Configuration(_) => "configuration",
            CloneVoiceError::UpstreamFetch(_) => "fetch",
            CloneVoiceError::CloningService(_) => "clone",
            CloneVoiceError::Persistence { .. } => "persist",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, CloneVoiceError::InvalidInput(_))
    }
}

impl From<VoiceError> for CloneVoiceError {
    fn from(err: VoiceError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
