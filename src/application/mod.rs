//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 出站端口定义（音频下载、音色克隆、记录存储、凭据）
//! - commands: 命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

pub use commands::{
    handlers::{CloneVoiceHandler, CloneVoiceResponse},
    CloneVoice,
};

pub use error::CloneVoiceError;

pub use ports::{
    AudioFetcherPort, AudioSample, ClonedVoice, CloningError, FetchError, RecordStorePort,
    SecretProviderPort, StoreError, VoiceCloningPort,
};
