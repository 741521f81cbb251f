//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// ElevenLabs 克隆服务配置
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,

    /// 参考音频下载配置
    #[serde(default)]
    pub fetch: FetchConfig,

    /// 记录存储配置
    #[serde(default)]
    pub store: StoreConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// ElevenLabs 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ElevenLabsConfig {
    /// API 基础 URL
    #[serde(default = "default_elevenlabs_url")]
    pub base_url: String,

    /// 直接配置的 API Key（优先于环境变量）
    #[serde(default)]
    pub api_key: Option<String>,

    /// 存放 API Key 的 secret 名称
    #[serde(default = "default_api_key_secret")]
    pub api_key_secret: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_elevenlabs_timeout")]
    pub timeout_secs: u64,
}

fn default_elevenlabs_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_api_key_secret() -> String {
    "ELEVEN_API_KEY".to_string()
}

fn default_elevenlabs_timeout() -> u64 {
    120
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: default_elevenlabs_url(),
            api_key: None,
            api_key_secret: default_api_key_secret(),
            timeout_secs: default_elevenlabs_timeout(),
        }
    }
}

/// 下载配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// 单个音频最大字节数
    #[serde(default = "default_fetch_max_bytes")]
    pub max_bytes: u64,

    /// 临时文件目录，未设置时使用系统临时目录
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_fetch_timeout() -> u64 {
    60
}

fn default_fetch_max_bytes() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_bytes: default_fetch_max_bytes(),
            temp_dir: None,
        }
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Firebase Realtime Database（REST）
    #[default]
    Firebase,
    /// 本地 sled 数据库
    Sled,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Firebase => write!(f, "firebase"),
            StoreBackend::Sled => write!(f, "sled"),
        }
    }
}

/// 记录存储配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub firebase: FirebaseConfig,

    #[serde(default)]
    pub sled: SledConfig,
}

/// Firebase Realtime Database 配置
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    /// 数据库 URL，例如 https://<project>-default-rtdb.firebaseio.com
    #[serde(default)]
    pub database_url: String,

    /// 访问令牌（database secret 或 ID token），作为 `auth` 参数发送
    #[serde(default)]
    pub auth_token: Option<String>,

    /// 命名空间（本地模拟器使用，作为 `ns` 参数发送）
    #[serde(default)]
    pub namespace: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_firebase_timeout")]
    pub timeout_secs: u64,
}

fn default_firebase_timeout() -> u64 {
    30
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            auth_token: None,
            namespace: None,
            timeout_secs: default_firebase_timeout(),
        }
    }
}

/// sled 本地存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct SledConfig {
    #[serde(default = "default_sled_path")]
    pub path: PathBuf,
}

fn default_sled_path() -> PathBuf {
    PathBuf::from("data/records.sled")
}

impl Default for SledConfig {
    fn default() -> Self {
        Self {
            path: default_sled_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
