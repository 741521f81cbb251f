//! Voiceclone - 音色克隆服务
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 克隆请求、角色音色设置、记录路径
//!
//! 应用层 (application/):
//! - Ports: 端口定义（AudioFetcher, VoiceCloning, RecordStore, SecretProvider）
//! - Commands: CloneVoice 命令处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: POST /cloneVoice
//! - Adapters: 音频下载、ElevenLabs Client、凭据读取
//! - Persistence: Firebase Realtime Database + Sled 存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
