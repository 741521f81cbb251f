//! Application State
//!
//! 进程内共享的 Handler 与端口实现

use std::sync::Arc;

use crate::application::{
    AudioFetcherPort, CloneVoiceHandler, RecordStorePort, SecretProviderPort, VoiceCloningPort,
};

/// 应用状态
pub struct AppState {
    pub clone_voice_handler: CloneVoiceHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `api_key_secret` 为 API Key 所在凭据的名称，每次请求时读取
    pub fn new(
        secrets: Arc<dyn SecretProviderPort>,
        fetcher: Arc<dyn AudioFetcherPort>,
        cloner: Arc<dyn VoiceCloningPort>,
        record_store: Arc<dyn RecordStorePort>,
        api_key_secret: impl Into<String>,
    ) -> Self {
        Self {
            clone_voice_handler: CloneVoiceHandler::new(
                secrets,
                fetcher,
                cloner,
                record_store,
                api_key_secret,
            ),
        }
    }
}
